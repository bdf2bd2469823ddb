use anyhow::{Context, Result};
use image::RgbaImage;
use std::path::{Path, PathBuf};

use super::FrameSink;
use crate::renderer::PixelBuffer;

/// Writes every frame as its own PNG: `out.png` becomes `out_0000.png`,
/// `out_0001.png`, ...
pub struct PngSequence {
    dir: PathBuf,
    stem: String,
    flip_vertical: bool,
    written: Vec<PathBuf>,
}

impl PngSequence {
    pub fn new(path: &Path, flip_vertical: bool) -> Self {
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("frame")
            .to_string();

        Self {
            dir,
            stem,
            flip_vertical,
            written: Vec::new(),
        }
    }

    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}_{:04}.png", self.stem, index))
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl FrameSink for PngSequence {
    fn present(&mut self, frame: &PixelBuffer, _delay_centiseconds: u16) -> Result<()> {
        let path = self.frame_path(self.written.len());
        let image = RgbaImage::from_raw(
            frame.width() as u32,
            frame.height() as u32,
            frame.to_rgba_bytes(self.flip_vertical),
        )
        .context("Frame buffer does not match its dimensions")?;

        image
            .save(&path)
            .with_context(|| format!("Failed to write frame: {}", path.display()))?;
        self.written.push(path);
        Ok(())
    }

    fn finish(self) -> Result<()> {
        Ok(())
    }
}
