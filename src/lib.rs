//! Software sprite compositor.
//!
//! Sprites and sprite sheet cells are alpha-blended onto a canvas made of
//! packed RGBA pixels (`0xRRGGBBAA`). Images come in through an
//! [`input::ImageLoader`] and finished frames go out through an
//! [`encoder::FrameSink`].

pub mod encoder;
pub mod error;
pub mod input;
pub mod renderer;
pub mod scene;
pub mod sprite;

pub use error::EngineError;
pub use renderer::{Canvas, Pixel, PixelBuffer};
pub use sprite::{CellRect, Position, Sprite, SpriteSheet};
