use crate::error::{EngineError, Result};
use crate::sprite::Sprite;

/// Source rectangle of one sheet cell, in buffer memory coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
    /// Linear index of the top-left pixel, `y * image_width + x`.
    pub offset: usize,
}

impl CellRect {
    /// The rectangle covering a whole `width * height` image.
    pub fn full(width: usize, height: usize) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
            offset: 0,
        }
    }
}

/// A sprite cut into a fixed grid of equally sized cells.
///
/// Cell size is the image size divided by the grid, truncated. Leftover
/// pixels on the right and bottom edges belong to no cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteSheet {
    sprite: Sprite,
    rows: u32,
    columns: u32,
    cell_width: usize,
    cell_height: usize,
}

impl SpriteSheet {
    pub fn new(sprite: Sprite, rows: i32, columns: i32) -> Result<Self> {
        if rows <= 0 || columns <= 0 {
            return Err(EngineError::InvalidGrid { rows, columns });
        }

        let cell_width = sprite.width() / columns as usize;
        let cell_height = sprite.height() / rows as usize;

        Ok(Self {
            sprite,
            rows: rows as u32,
            columns: columns as u32,
            cell_width,
            cell_height,
        })
    }

    /// Locate cell `(row, col)` in pixel memory.
    ///
    /// Images are stored bottom-up, so logical row 0 lives in the last
    /// physical row block: `physical_row = rows - 1 - row`. Columns are not
    /// flipped.
    pub fn cell_rect(&self, row: i32, col: i32) -> Result<CellRect> {
        if row < 0 || col < 0 || row as u32 >= self.rows || col as u32 >= self.columns {
            return Err(EngineError::IndexOutOfRange {
                row,
                col,
                rows: self.rows,
                columns: self.columns,
            });
        }

        let physical_row = (self.rows - 1 - row as u32) as usize;
        let x = col as usize * self.cell_width;
        let y = physical_row * self.cell_height;

        Ok(CellRect {
            x,
            y,
            width: self.cell_width,
            height: self.cell_height,
            offset: y * self.sprite.width() + x,
        })
    }

    /// Map a row-major cell number to `(row, col)`.
    pub fn cell_at(&self, index: usize) -> (i32, i32) {
        let index = index % self.cell_count().max(1);
        let columns = self.columns as usize;
        ((index / columns) as i32, (index % columns) as i32)
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn cell_width(&self) -> usize {
        self.cell_width
    }

    pub fn cell_height(&self) -> usize {
        self.cell_height
    }

    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    pub fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    pub fn sprite_mut(&mut self) -> &mut Sprite {
        &mut self.sprite
    }
}
