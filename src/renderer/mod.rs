mod buffer;
mod canvas;
mod pixel;

pub use buffer::PixelBuffer;
pub use canvas::Canvas;
pub use pixel::Pixel;
