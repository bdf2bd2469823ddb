use tracing::warn;

use super::{Pixel, PixelBuffer};
use crate::error::Result;
use crate::sprite::{CellRect, Sprite, SpriteSheet};

/// The compositing target.
///
/// A canvas owns one frame buffer and, optionally, a base image to restore
/// at the start of every frame. Its dimensions never change after
/// construction.
#[derive(Clone, Debug)]
pub struct Canvas {
    frame: PixelBuffer,
    base: Option<PixelBuffer>,
}

impl Canvas {
    pub fn new(width: i32, height: i32) -> Result<Self> {
        Ok(Self {
            frame: PixelBuffer::new(width, height)?,
            base: None,
        })
    }

    /// A canvas sized after `base`, starting out as a copy of it.
    pub fn with_base(base: PixelBuffer) -> Self {
        Self {
            frame: base.clone(),
            base: Some(base),
        }
    }

    pub fn width(&self) -> usize {
        self.frame.width()
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn base(&self) -> Option<&PixelBuffer> {
        self.base.as_ref()
    }

    /// Replace the frame with `base`, discarding anything composited so far.
    ///
    /// A base of a different size is copied over the overlapping region only;
    /// the canvas keeps its own dimensions.
    pub fn reset(&mut self, base: &PixelBuffer) {
        if base.width() == self.frame.width() && base.height() == self.frame.height() {
            self.frame.copy_from(base);
            return;
        }

        warn!(
            "Base image is {}x{}, canvas is {}x{}; copying the overlap only",
            base.width(),
            base.height(),
            self.frame.width(),
            self.frame.height()
        );
        self.frame.fill(Pixel::TRANSPARENT);
        let cols = base.width().min(self.frame.width());
        for y in 0..base.height().min(self.frame.height()) {
            self.frame.row_mut(y)[..cols].copy_from_slice(&base.row(y)[..cols]);
        }
    }

    /// Restore the stored base image, or clear to transparent black.
    pub fn reset_to_base(&mut self) {
        match self.base.take() {
            Some(base) => {
                self.reset(&base);
                self.base = Some(base);
            }
            None => self.frame.fill(Pixel::TRANSPARENT),
        }
    }

    /// Alpha-blend `rect` of `source` onto the frame with its top-left at
    /// `(dest_x, dest_y)`.
    ///
    /// Destination pixels outside the canvas are skipped, checked per axis
    /// rather than on the linear index `(dest_y + i) * width + (dest_x + j)`:
    /// a sprite hanging off the right edge is cut off, it does not wrap onto
    /// the next row. Source pixels
    /// outside `source` (a rect reaching past a truncated sheet edge) are
    /// skipped too.
    pub fn composite(&mut self, source: &PixelBuffer, rect: CellRect, dest_x: i32, dest_y: i32) {
        for i in 0..rect.height {
            let src_y = rect.y + i;
            let row = source.row(src_y);
            let dst_y = dest_y as i64 + i as i64;
            if dst_y < 0 || dst_y >= self.frame.height() as i64 {
                continue;
            }

            for j in 0..rect.width {
                let Some(&fg) = row.get(rect.x + j) else {
                    break;
                };
                let dst_x = dest_x as i64 + j as i64;
                if dst_x < 0 || dst_x >= self.frame.width() as i64 {
                    continue;
                }

                let idx = dst_y as usize * self.frame.width() + dst_x as usize;
                if let Some(bg) = self.frame.get_index(idx) {
                    self.frame.set_index(idx, fg.over(bg));
                }
            }
        }
    }

    /// Composite a whole sprite at its current position.
    pub fn draw(&mut self, sprite: &Sprite) {
        let rect = CellRect::full(sprite.width(), sprite.height());
        let pos = sprite.position();
        self.composite(sprite.buffer(), rect, pos.x, pos.y);
    }

    /// Composite one cell of a sheet at the sheet's position.
    ///
    /// An invalid cell draws nothing and is returned to the caller.
    pub fn draw_cell(&mut self, sheet: &SpriteSheet, row: i32, col: i32) -> Result<()> {
        let rect = sheet.cell_rect(row, col)?;
        let pos = sheet.sprite().position();
        self.composite(sheet.sprite().buffer(), rect, pos.x, pos.y);
        Ok(())
    }

    /// The composited frame, for handing to a presenter.
    pub fn frame(&self) -> &PixelBuffer {
        &self.frame
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Pixel) {
        self.frame.set(x, y, color);
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Pixel> {
        self.frame.get(x, y)
    }

    pub fn try_get_pixel(&self, x: i32, y: i32) -> Result<Pixel> {
        self.frame.try_get(x, y)
    }
}
