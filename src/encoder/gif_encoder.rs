use anyhow::{bail, Context, Result};
use gif::{Encoder, Frame, Repeat};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use super::FrameSink;
use crate::renderer::PixelBuffer;

/// Quantizer speed handed to `gif::Frame::from_rgba_speed` (1 = best, 30 = fastest).
const QUANTIZE_SPEED: i32 = 10;

pub struct GifEncoder {
    encoder: Encoder<BufWriter<File>>,
    width: u16,
    height: u16,
    flip_vertical: bool,
    previous_frame: Option<Vec<u8>>,
}

impl GifEncoder {
    pub fn new(path: &Path, width: usize, height: usize, loop_count: u16, flip_vertical: bool) -> Result<Self> {
        if width == 0 || height == 0 || width > u16::MAX as usize || height > u16::MAX as usize {
            bail!("GIF frames must be between 1x1 and 65535x65535, got {}x{}", width, height);
        }

        let file = File::create(path)
            .with_context(|| format!("Failed to create GIF: {}", path.display()))?;
        let writer = BufWriter::new(file);

        let mut encoder = Encoder::new(writer, width as u16, height as u16, &[])?;

        // Set loop count (0 = infinite)
        encoder.set_repeat(if loop_count == 0 {
            Repeat::Infinite
        } else {
            Repeat::Finite(loop_count)
        })?;

        Ok(Self {
            encoder,
            width: width as u16,
            height: height as u16,
            flip_vertical,
            previous_frame: None,
        })
    }

    /// Flatten a frame to opaque RGBA bytes in display row order.
    fn frame_bytes(&self, frame: &PixelBuffer) -> Vec<u8> {
        let mut data = frame.to_rgba_bytes(self.flip_vertical);
        for px in data.chunks_exact_mut(4) {
            px[3] = 255;
        }
        data
    }

    fn compute_diff(&self, prev: &[u8], curr: &[u8]) -> (u16, u16, u16, u16, Vec<u8>) {
        // Find bounding box of changes
        let width = self.width as usize;
        let height = self.height as usize;

        let mut min_x = width;
        let mut min_y = height;
        let mut max_x = 0;
        let mut max_y = 0;
        let mut has_changes = false;

        for y in 0..height {
            for x in 0..width {
                let idx = (y * width + x) * 4;
                if prev[idx..idx + 4] != curr[idx..idx + 4] {
                    has_changes = true;
                    min_x = min_x.min(x);
                    min_y = min_y.min(y);
                    max_x = max_x.max(x);
                    max_y = max_y.max(y);
                }
            }
        }

        if !has_changes {
            // No changes - return a tiny 1x1 frame
            return (0, 0, 1, 1, curr[..4].to_vec());
        }

        let diff_width = max_x - min_x + 1;
        let diff_height = max_y - min_y + 1;
        let mut frame_data = Vec::with_capacity(diff_width * diff_height * 4);

        for y in min_y..=max_y {
            let start = (y * width + min_x) * 4;
            frame_data.extend_from_slice(&curr[start..start + diff_width * 4]);
        }

        (
            min_x as u16,
            min_y as u16,
            diff_width as u16,
            diff_height as u16,
            frame_data,
        )
    }
}

impl FrameSink for GifEncoder {
    fn present(&mut self, frame: &PixelBuffer, delay_centiseconds: u16) -> Result<()> {
        if frame.width() != self.width as usize || frame.height() != self.height as usize {
            bail!(
                "Frame is {}x{} but the GIF is {}x{}",
                frame.width(),
                frame.height(),
                self.width,
                self.height
            );
        }

        let data = self.frame_bytes(frame);

        let (left, top, width, height, mut frame_data) = match &self.previous_frame {
            Some(prev) => self.compute_diff(prev, &data),
            None => (0, 0, self.width, self.height, data.clone()),
        };

        let mut gif_frame = Frame::from_rgba_speed(width, height, &mut frame_data, QUANTIZE_SPEED);
        gif_frame.delay = delay_centiseconds;
        gif_frame.left = left;
        gif_frame.top = top;
        gif_frame.dispose = gif::DisposalMethod::Keep;

        self.encoder.write_frame(&gif_frame)?;
        self.previous_frame = Some(data);

        Ok(())
    }

    fn finish(self) -> Result<()> {
        // Encoder writes the trailer when dropped
        drop(self.encoder);
        Ok(())
    }
}
