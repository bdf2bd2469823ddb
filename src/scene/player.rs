use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::{Scene, SpriteSpec};
use crate::encoder::FrameSink;
use crate::input::ImageLoader;
use crate::renderer::{Canvas, Pixel, PixelBuffer};
use crate::sprite::{Position, Sprite, SpriteSheet};

/// What an actor draws each frame.
#[derive(Debug, Clone)]
pub enum Drawable {
    Image(Sprite),
    Sheet {
        sheet: SpriteSheet,
        /// Cells cycled one per frame; empty means every cell in row-major order
        cells: Vec<(i32, i32)>,
    },
}

impl Drawable {
    fn sprite_mut(&mut self) -> &mut Sprite {
        match self {
            Drawable::Image(sprite) => sprite,
            Drawable::Sheet { sheet, .. } => sheet.sprite_mut(),
        }
    }

    fn sprite(&self) -> &Sprite {
        match self {
            Drawable::Image(sprite) => sprite,
            Drawable::Sheet { sheet, .. } => sheet.sprite(),
        }
    }
}

/// A named drawable with a constant per-frame velocity.
#[derive(Debug, Clone)]
pub struct Actor {
    pub name: String,
    pub drawable: Drawable,
    pub velocity: Position,
}

impl Actor {
    pub fn position(&self) -> Position {
        self.drawable.sprite().position()
    }

    /// Which sheet cell to show on frame `frame_index`.
    fn cell_for_frame(sheet: &SpriteSheet, cells: &[(i32, i32)], frame_index: usize) -> (i32, i32) {
        if cells.is_empty() {
            sheet.cell_at(frame_index)
        } else {
            cells[frame_index % cells.len()]
        }
    }
}

/// Runs a scene: reset, composite every actor in order, present, move.
pub struct ScenePlayer {
    canvas: Canvas,
    actors: Vec<Actor>,
    frames: u32,
    delay: u16,
    trail: bool,
    flip_on_load: bool,
    frame_index: usize,
}

impl ScenePlayer {
    pub fn new(canvas: Canvas, actors: Vec<Actor>) -> Self {
        Self {
            canvas,
            actors,
            frames: 1,
            delay: 10,
            trail: false,
            flip_on_load: true,
            frame_index: 0,
        }
    }

    /// Build the canvas and actors described by `scene`.
    ///
    /// Relative image paths resolve against `base_dir`. Images that fail to
    /// load become empty sprites; an invalid sheet grid is an error.
    pub fn from_scene<L: ImageLoader + ?Sized>(scene: &Scene, base_dir: &Path, loader: &L) -> Result<Self> {
        let background = scene.background.as_ref().map(|file| {
            let sprite = Sprite::load_from(loader, &resolve(base_dir, file));
            if sprite.is_empty() {
                warn!("Background '{}' is empty, using the background color only", file);
            }
            sprite
        });

        let (width, height) = match (&scene.canvas, &background) {
            (Some(size), _) => (size.width, size.height),
            (None, Some(bg)) if !bg.is_empty() => (bg.width() as i32, bg.height() as i32),
            _ => bail!("Scene '{}' needs a canvas size or a loadable background", scene.name),
        };

        let fill = scene.background_color.map(|c| c.0).unwrap_or(Pixel::TRANSPARENT);
        let base = PixelBuffer::filled(width, height, fill)
            .with_context(|| format!("Invalid canvas size for scene '{}'", scene.name))?;
        let mut canvas = Canvas::with_base(base);
        if let Some(bg) = &background {
            canvas.draw(bg);
        }
        let canvas = Canvas::with_base(canvas.frame().clone());

        let actors = scene
            .sprites
            .iter()
            .enumerate()
            .map(|(i, spec)| build_actor(spec, i, base_dir, loader))
            .collect::<Result<Vec<_>>>()?;

        info!(
            "Scene '{}': {}x{} canvas, {} sprites, {} frames",
            scene.name,
            width,
            height,
            actors.len(),
            scene.frames
        );

        let mut player = Self::new(canvas, actors);
        player.frames = scene.frames;
        player.delay = scene.delay;
        player.trail = scene.trail;
        player.flip_on_load = scene.flip_on_load;
        Ok(player)
    }

    pub fn set_frames(&mut self, frames: u32) {
        self.frames = frames;
    }

    pub fn set_delay(&mut self, delay: u16) {
        self.delay = delay;
    }

    pub fn set_trail(&mut self, trail: bool) {
        self.trail = trail;
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Whether frames are stored bottom-up and need flipping for display.
    pub fn flip_on_load(&self) -> bool {
        self.flip_on_load
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Composite the current frame and return it.
    ///
    /// The canvas is restored to its base first unless trails are on; the
    /// very first frame always starts clean.
    pub fn render_frame(&mut self) -> &PixelBuffer {
        if !self.trail || self.frame_index == 0 {
            self.canvas.reset_to_base();
        }

        for actor in &self.actors {
            match &actor.drawable {
                Drawable::Image(sprite) => self.canvas.draw(sprite),
                Drawable::Sheet { sheet, cells } => {
                    let (row, col) = Actor::cell_for_frame(sheet, cells, self.frame_index);
                    if let Err(e) = self.canvas.draw_cell(sheet, row, col) {
                        warn!("{}: {}", actor.name, e);
                    }
                }
            }
        }

        self.canvas.frame()
    }

    /// Move every actor by its velocity and step to the next frame.
    pub fn advance(&mut self) {
        for actor in &mut self.actors {
            let velocity = actor.velocity;
            let sprite = actor.drawable.sprite_mut();
            sprite.increment_x(velocity.x);
            sprite.increment_y(velocity.y);
        }
        self.frame_index += 1;
    }

    /// Render every frame into `sink`. Returns the number of frames presented.
    pub fn play<S: FrameSink + ?Sized>(&mut self, sink: &mut S) -> Result<u32> {
        for n in 0..self.frames {
            let delay = self.delay;
            let frame = self.render_frame();
            sink.present(frame, delay)
                .with_context(|| format!("Failed to present frame {}", n))?;
            debug!("presented frame {}/{}", n + 1, self.frames);
            self.advance();
        }
        Ok(self.frames)
    }
}

fn resolve(base_dir: &Path, file: &str) -> PathBuf {
    let path = Path::new(file);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

fn build_actor<L: ImageLoader + ?Sized>(spec: &SpriteSpec, index: usize, base_dir: &Path, loader: &L) -> Result<Actor> {
    let name = if spec.name.is_empty() {
        format!("sprite{}", index)
    } else {
        spec.name.clone()
    };

    let mut sprite = match (&spec.file, &spec.solid) {
        (Some(file), _) => Sprite::load_from(loader, &resolve(base_dir, file)),
        (None, Some(solid)) => Sprite::solid(solid.width, solid.height, solid.color.0)
            .with_context(|| format!("Invalid solid sprite '{}'", name))?,
        (None, None) => bail!("Sprite '{}' needs either a file or a solid color", name),
    };

    for edit in &spec.pixels {
        sprite.set_pixel(edit.index, edit.color.0);
    }
    sprite.set_position(spec.position[0], spec.position[1]);
    if let Some(id) = spec.id {
        sprite = sprite.with_id(id);
    }

    let drawable = match spec.sheet {
        Some(grid) => Drawable::Sheet {
            sheet: SpriteSheet::new(sprite, grid.rows, grid.columns)
                .with_context(|| format!("Invalid sprite sheet '{}'", name))?,
            cells: spec.cells.iter().map(|c| (c[0], c[1])).collect(),
        },
        None => Drawable::Image(sprite),
    };

    Ok(Actor {
        name,
        drawable,
        velocity: Position::new(spec.velocity[0], spec.velocity[1]),
    })
}
