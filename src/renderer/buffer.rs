use super::Pixel;
use crate::error::{EngineError, Result};

/// An owned, row-major `width * height` array of packed pixels.
///
/// The pixel vector always holds exactly `width * height` entries. Reads
/// outside the buffer return `None` and writes outside it are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: Vec<Pixel>,
    width: usize,
    height: usize,
}

impl PixelBuffer {
    /// Create a zero-filled (transparent black) buffer.
    pub fn new(width: i32, height: i32) -> Result<Self> {
        Self::filled(width, height, Pixel::TRANSPARENT)
    }

    pub fn filled(width: i32, height: i32, color: Pixel) -> Result<Self> {
        let (w, h) = checked_dimensions(width as i64, height as i64)?;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(w * h)
            .map_err(|_| EngineError::InvalidDimension {
                width: width as i64,
                height: height as i64,
            })?;
        pixels.resize(w * h, color);

        Ok(Self {
            pixels,
            width: w,
            height: h,
        })
    }

    /// Copy externally supplied packed pixels into a new buffer.
    pub fn load(raw: &[Pixel], width: usize, height: usize) -> Result<Self> {
        let len = width.checked_mul(height).ok_or(EngineError::InvalidDimension {
            width: width as i64,
            height: height as i64,
        })?;
        if raw.len() != len {
            return Err(EngineError::InvalidDimension {
                width: width as i64,
                height: height as i64,
            });
        }

        Ok(Self {
            pixels: raw.to_vec(),
            width,
            height,
        })
    }

    /// Copy decoder output (4 bytes per pixel, R G B A) into a new buffer.
    pub fn from_rgba_bytes(bytes: &[u8], width: usize, height: usize) -> Result<Self> {
        let invalid = || EngineError::InvalidDimension {
            width: width as i64,
            height: height as i64,
        };
        let len = width.checked_mul(height).ok_or_else(invalid)?;
        if bytes.len() != len * 4 {
            return Err(invalid());
        }

        let pixels = bytes
            .chunks_exact(4)
            .map(|c| Pixel::from_bytes([c[0], c[1], c[2], c[3]]))
            .collect();

        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Serialize as R G B A bytes, optionally emitting the rows bottom-up.
    pub fn to_rgba_bytes(&self, flip_vertical: bool) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        if self.width == 0 {
            return bytes;
        }

        let mut push_row = |row: &[Pixel]| {
            for pixel in row {
                bytes.extend_from_slice(&pixel.to_bytes());
            }
        };

        if flip_vertical {
            self.pixels.chunks_exact(self.width).rev().for_each(&mut push_row);
        } else {
            self.pixels.chunks_exact(self.width).for_each(&mut push_row);
        }
        bytes
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Linear index of `(x, y)`, or `None` when either axis is out of range.
    #[inline]
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Pixel> {
        self.index_of(x, y).map(|idx| self.pixels[idx])
    }

    pub fn try_get(&self, x: i32, y: i32) -> Result<Pixel> {
        self.get(x, y).ok_or(EngineError::OutOfBounds {
            x: x as i64,
            y: y as i64,
        })
    }

    pub fn set(&mut self, x: i32, y: i32, color: Pixel) {
        if let Some(idx) = self.index_of(x, y) {
            self.pixels[idx] = color;
        }
    }

    pub fn get_index(&self, index: usize) -> Option<Pixel> {
        self.pixels.get(index).copied()
    }

    pub fn set_index(&mut self, index: usize, color: Pixel) {
        if let Some(slot) = self.pixels.get_mut(index) {
            *slot = color;
        }
    }

    pub fn fill(&mut self, color: Pixel) {
        self.pixels.fill(color);
    }

    /// Copy `other` into this buffer. Dimensions must already match.
    pub(crate) fn copy_from(&mut self, other: &PixelBuffer) {
        debug_assert_eq!((self.width, self.height), (other.width, other.height));
        self.pixels.copy_from_slice(&other.pixels);
    }

    /// One row of pixels, or an empty slice past the last row.
    pub(crate) fn row(&self, y: usize) -> &[Pixel] {
        if y >= self.height {
            return &[];
        }
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    pub(crate) fn row_mut(&mut self, y: usize) -> &mut [Pixel] {
        if y >= self.height {
            return &mut [];
        }
        &mut self.pixels[y * self.width..(y + 1) * self.width]
    }
}

fn checked_dimensions(width: i64, height: i64) -> Result<(usize, usize)> {
    let invalid = EngineError::InvalidDimension { width, height };
    if width < 0 || height < 0 {
        return Err(invalid);
    }
    let (w, h) = (width as usize, height as usize);
    match w
        .checked_mul(h)
        .and_then(|len| len.checked_mul(std::mem::size_of::<Pixel>()))
    {
        Some(bytes) if bytes <= isize::MAX as usize => Ok((w, h)),
        _ => Err(invalid),
    }
}
