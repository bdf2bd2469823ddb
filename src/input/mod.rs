use std::path::Path;
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::renderer::{Pixel, PixelBuffer};

/// Raw result of decoding an image: dimensions plus packed pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Pixel>,
}

impl LoadedImage {
    pub fn into_buffer(self) -> Result<PixelBuffer> {
        PixelBuffer::load(&self.pixels, self.width, self.height)
    }
}

/// Anything that can turn a path into pixels.
pub trait ImageLoader {
    fn load(&self, path: &Path) -> Result<LoadedImage>;
}

/// Decodes images from disk with the `image` crate.
///
/// With `flip_vertical` set the first image row ends up at the bottom of
/// pixel memory, which is the row order sprite sheet cells are addressed in.
#[derive(Debug, Clone, Copy)]
pub struct FileImageLoader {
    pub flip_vertical: bool,
}

impl Default for FileImageLoader {
    fn default() -> Self {
        Self { flip_vertical: true }
    }
}

impl FileImageLoader {
    pub fn new(flip_vertical: bool) -> Self {
        Self { flip_vertical }
    }

    pub fn load_from_bytes(&self, data: &[u8], name: &str) -> Result<LoadedImage> {
        let img = image::load_from_memory(data).map_err(|e| EngineError::LoadFailure {
            path: name.into(),
            reason: e.to_string(),
        })?;
        Ok(self.convert(img))
    }

    fn convert(&self, img: image::DynamicImage) -> LoadedImage {
        let img = if self.flip_vertical { img.flipv() } else { img };
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        let pixels = rgba
            .pixels()
            .map(|p| Pixel::from_bytes(p.0))
            .collect();

        LoadedImage {
            width: width as usize,
            height: height as usize,
            pixels,
        }
    }
}

impl ImageLoader for FileImageLoader {
    fn load(&self, path: &Path) -> Result<LoadedImage> {
        let img = image::open(path).map_err(|e| EngineError::LoadFailure {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let loaded = self.convert(img);
        debug!(
            path = %path.display(),
            width = loaded.width,
            height = loaded.height,
            "loaded image"
        );
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn two_row_png() -> Vec<u8> {
        let mut img = RgbaImage::new(2, 2);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 255, 0, 128]));
        img.put_pixel(0, 1, Rgba([0, 0, 255, 255]));
        img.put_pixel(1, 1, Rgba([1, 2, 3, 0]));

        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn decodes_without_flip_in_file_order() {
        let loaded = FileImageLoader::new(false)
            .load_from_bytes(&two_row_png(), "mem.png")
            .unwrap();

        assert_eq!((loaded.width, loaded.height), (2, 2));
        assert_eq!(loaded.pixels[0], Pixel::rgba(255, 0, 0, 255));
        assert_eq!(loaded.pixels[1], Pixel::rgba(0, 255, 0, 128));
        assert_eq!(loaded.pixels[2], Pixel::rgba(0, 0, 255, 255));
        assert_eq!(loaded.pixels[3], Pixel::rgba(1, 2, 3, 0));
    }

    #[test]
    fn flip_puts_first_row_last() {
        let loaded = FileImageLoader::default()
            .load_from_bytes(&two_row_png(), "mem.png")
            .unwrap();

        assert_eq!(loaded.pixels[0], Pixel::rgba(0, 0, 255, 255));
        assert_eq!(loaded.pixels[2], Pixel::rgba(255, 0, 0, 255));
    }

    #[test]
    fn missing_file_is_a_load_failure() {
        let err = FileImageLoader::default()
            .load(Path::new("/definitely/not/here.png"))
            .unwrap_err();

        assert!(matches!(err, EngineError::LoadFailure { .. }));
    }

    #[test]
    fn garbage_bytes_are_a_load_failure() {
        let err = FileImageLoader::default()
            .load_from_bytes(b"not an image", "junk")
            .unwrap_err();

        assert!(matches!(err, EngineError::LoadFailure { .. }));
    }
}
