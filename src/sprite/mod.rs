//! Drawable images with a position in canvas space.

mod sheet;

pub use sheet::{CellRect, SpriteSheet};

use std::path::Path;
use tracing::warn;

use crate::error::Result;
use crate::input::ImageLoader;
use crate::renderer::{Pixel, PixelBuffer};

/// Integer canvas-space coordinates. May be negative or off canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An image plus the place it is drawn at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sprite {
    buffer: PixelBuffer,
    position: Position,
    id: Option<u32>,
}

impl Sprite {
    pub fn from_buffer(buffer: PixelBuffer) -> Self {
        Self {
            buffer,
            position: Position::default(),
            id: None,
        }
    }

    pub fn solid(width: i32, height: i32, color: Pixel) -> Result<Self> {
        Ok(Self::from_buffer(PixelBuffer::filled(width, height, color)?))
    }

    pub fn try_load_from<L: ImageLoader + ?Sized>(loader: &L, path: &Path) -> Result<Self> {
        let buffer = loader.load(path)?.into_buffer()?;
        Ok(Self::from_buffer(buffer))
    }

    /// Load a sprite, falling back to an empty one when the image is unusable.
    ///
    /// Callers should check `width() == 0 || height() == 0` before relying on
    /// the content. The failure is logged, not returned.
    pub fn load_from<L: ImageLoader + ?Sized>(loader: &L, path: &Path) -> Self {
        match Self::try_load_from(loader, path) {
            Ok(sprite) => sprite,
            Err(e) => {
                warn!("{}", e);
                Self::default()
            }
        }
    }

    pub fn with_id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_position(mut self, x: i32, y: i32) -> Self {
        self.set_position(x, y);
        self
    }

    pub fn id(&self) -> Option<u32> {
        self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.position = Position::new(x, y);
    }

    pub fn set_x(&mut self, x: i32) {
        self.position.x = x;
    }

    pub fn set_y(&mut self, y: i32) {
        self.position.y = y;
    }

    pub fn increment_x(&mut self, dx: i32) {
        self.position.x = self.position.x.wrapping_add(dx);
    }

    pub fn increment_y(&mut self, dy: i32) {
        self.position.y = self.position.y.wrapping_add(dy);
    }

    pub fn width(&self) -> usize {
        self.buffer.width()
    }

    pub fn height(&self) -> usize {
        self.buffer.height()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Overwrite one pixel by linear index. Out-of-range indices are ignored.
    pub fn set_pixel(&mut self, index: usize, color: Pixel) {
        self.buffer.set_index(index, color);
    }
}
