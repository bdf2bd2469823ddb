mod gif_encoder;
mod png_encoder;

pub use gif_encoder::GifEncoder;
pub use png_encoder::PngSequence;

use anyhow::Result;
use std::path::Path;

use crate::renderer::PixelBuffer;

/// Receives composited frames for display or storage.
pub trait FrameSink {
    fn present(&mut self, frame: &PixelBuffer, delay_centiseconds: u16) -> Result<()>;

    fn finish(self) -> Result<()>
    where
        Self: Sized;
}

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Gif,
    Png,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "gif" => Some(OutputFormat::Gif),
                "png" => Some(OutputFormat::Png),
                _ => None,
            })
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Gif => "gif",
            OutputFormat::Png => "png",
        }
    }
}

/// Wrapper enum for different encoder types
pub enum EncoderWrapper {
    Gif(GifEncoder),
    Png(PngSequence),
}

impl EncoderWrapper {
    pub fn new(
        path: &Path,
        width: usize,
        height: usize,
        format: OutputFormat,
        loop_count: u16,
        flip_vertical: bool,
    ) -> Result<Self> {
        match format {
            OutputFormat::Gif => Ok(EncoderWrapper::Gif(GifEncoder::new(
                path,
                width,
                height,
                loop_count,
                flip_vertical,
            )?)),
            OutputFormat::Png => Ok(EncoderWrapper::Png(PngSequence::new(path, flip_vertical))),
        }
    }
}

impl FrameSink for EncoderWrapper {
    fn present(&mut self, frame: &PixelBuffer, delay_centiseconds: u16) -> Result<()> {
        match self {
            EncoderWrapper::Gif(encoder) => encoder.present(frame, delay_centiseconds),
            EncoderWrapper::Png(encoder) => encoder.present(frame, delay_centiseconds),
        }
    }

    fn finish(self) -> Result<()> {
        match self {
            EncoderWrapper::Gif(encoder) => encoder.finish(),
            EncoderWrapper::Png(encoder) => encoder.finish(),
        }
    }
}

/// Keeps every presented frame in memory.
#[derive(Debug, Default)]
pub struct FrameCollector {
    pub frames: Vec<(PixelBuffer, u16)>,
}

impl FrameSink for FrameCollector {
    fn present(&mut self, frame: &PixelBuffer, delay_centiseconds: u16) -> Result<()> {
        self.frames.push((frame.clone(), delay_centiseconds));
        Ok(())
    }

    fn finish(self) -> Result<()> {
        Ok(())
    }
}
