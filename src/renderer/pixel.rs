use std::fmt;

/// A packed 32-bit RGBA pixel.
///
/// The layout is fixed as `0xRRGGBBAA`: red in the most significant byte,
/// alpha in the least significant one. Decoders hand us bytes in R, G, B, A
/// order, which map onto this layout through [`Pixel::from_bytes`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pixel(pub u32);

impl Pixel {
    pub const TRANSPARENT: Pixel = Pixel(0);
    pub const BLACK: Pixel = Pixel::rgba(0, 0, 0, 255);
    pub const WHITE: Pixel = Pixel::rgba(255, 255, 255, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Pixel(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | a as u32)
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Pixel(u32::from_be_bytes(bytes))
    }

    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    /// Paint `self` over `background` (alpha-over).
    ///
    /// Opaque sources replace the background and fully transparent ones leave
    /// it untouched. Partial alpha mixes each channel with truncating integer
    /// math, `(bg * (255 - a) + fg * a) / 255`, and the result is opaque.
    #[inline]
    pub fn over(self, background: Pixel) -> Pixel {
        match self.a() {
            255 => self,
            0 => background,
            alpha => {
                let alpha = alpha as u32;
                let mix = |fg: u8, bg: u8| -> u8 {
                    ((bg as u32 * (255 - alpha) + fg as u32 * alpha) / 255) as u8
                };

                Pixel::rgba(
                    mix(self.r(), background.r()),
                    mix(self.g(), background.g()),
                    mix(self.b(), background.b()),
                    255,
                )
            }
        }
    }
}

impl From<[u8; 4]> for Pixel {
    fn from(bytes: [u8; 4]) -> Self {
        Pixel::from_bytes(bytes)
    }
}

impl From<Pixel> for [u8; 4] {
    fn from(pixel: Pixel) -> Self {
        pixel.to_bytes()
    }
}

impl fmt::Debug for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pixel(#{:08x})", self.0)
    }
}
