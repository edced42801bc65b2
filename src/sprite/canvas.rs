//! Sprite sheet canvas
//!
//! Tiles are stacked top to bottom at a fixed pitch. The canvas is sized
//! once and never grows, so the tile count must be known up front.

use std::path::Path;

use super::buffer::{PixelBuffer, PixelFormat};
use super::codec;
use crate::error::{ExportError, Result};

/// A vertical strip of fixed-pitch tile slots
#[derive(Debug)]
pub struct SpriteCanvas {
    tile_pitch: u32,
    tile_count: u32,
    buffer: PixelBuffer,
}

impl SpriteCanvas {
    /// Allocate a zeroed canvas holding `tile_count` slots
    ///
    /// Fails if the sheet would not fit in memory.
    pub fn acquire(
        tile_width: u32,
        tile_pitch: u32,
        tile_count: u32,
        format: PixelFormat,
    ) -> Result<Self> {
        let buffer = tile_pitch
            .checked_mul(tile_count)
            .and_then(|height| PixelBuffer::try_zeroed(tile_width, height, format))
            .ok_or_else(|| {
                ExportError::encode(
                    "<canvas>",
                    format!(
                        "{} tiles of {}x{} exceed the sprite sheet size limit",
                        tile_count, tile_width, tile_pitch
                    ),
                )
            })?;
        Ok(Self {
            tile_pitch,
            tile_count,
            buffer,
        })
    }

    /// Number of slots
    pub fn tile_count(&self) -> u32 {
        self.tile_count
    }

    /// Canvas width in pixels
    pub fn width(&self) -> u32 {
        self.buffer.width
    }

    /// Canvas height in pixels
    pub fn height(&self) -> u32 {
        self.buffer.height
    }

    /// The pixels accumulated so far
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Copy `image` into slot `slot`
    ///
    /// The slot always starts at `slot * pitch`, whatever the tile's own
    /// height. A taller tile spills into the next slot and gets overdrawn.
    /// Tiles in another pixel format are converted to the canvas format.
    pub fn blit(&mut self, image: &PixelBuffer, slot: u32) -> Result<()> {
        if image.height != self.tile_pitch {
            log::warn!(
                "Tile height {} differs from pitch {} (slot {})",
                image.height,
                self.tile_pitch,
                slot
            );
        }
        let y_offset = slot.saturating_mul(self.tile_pitch);
        if image.format != self.buffer.format {
            let converted = image.to_format(self.buffer.format)?;
            return converted.blit_into(&mut self.buffer, y_offset);
        }
        image.blit_into(&mut self.buffer, y_offset)
    }

    /// Encode the sheet to `path` and release the canvas
    pub fn flush(self, path: &Path) -> Result<()> {
        codec::encode_to_file(&self.buffer, path)?;
        log::info!(
            "Flushed {}-tile sprite sheet to {}",
            self.tile_count,
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExportError;
    use crate::sprite::codec::decode_png_file;
    use tempfile::TempDir;

    #[test]
    fn test_acquire_dimensions() {
        let canvas = SpriteCanvas::acquire(16, 16, 3, PixelFormat::Rgba8).unwrap();
        assert_eq!(canvas.width(), 16);
        assert_eq!(canvas.height(), 48);
        assert_eq!(canvas.tile_count(), 3);
        assert!(canvas.buffer().data.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_slot_offsets_use_pitch() {
        let mut canvas = SpriteCanvas::acquire(2, 4, 3, PixelFormat::Rgba8).unwrap();
        // A 2px tall tile still lands at slot * 4
        let tile = PixelBuffer::solid(2, 2, [9, 9, 9, 9]);
        canvas.blit(&tile, 2).unwrap();

        let buffer = canvas.buffer();
        for y in 0..8 {
            assert!(buffer.row(y).unwrap().iter().all(|&b| b == 0), "row {}", y);
        }
        assert_eq!(buffer.row(8).unwrap(), &[9; 8]);
        assert_eq!(buffer.row(9).unwrap(), &[9; 8]);
        assert!(buffer.row(10).unwrap().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_slot_past_end_is_rejected() {
        let mut canvas = SpriteCanvas::acquire(16, 16, 2, PixelFormat::Rgba8).unwrap();
        let tile = PixelBuffer::solid(16, 16, [1, 2, 3, 4]);
        assert!(canvas.blit(&tile, 1).is_ok());
        assert!(matches!(
            canvas.blit(&tile, 2),
            Err(ExportError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn test_oversized_canvas_is_an_error() {
        assert!(matches!(
            SpriteCanvas::acquire(16, 1 << 31, 2, PixelFormat::Rgba8),
            Err(ExportError::Encode { .. })
        ));
        assert!(SpriteCanvas::acquire(u32::MAX, 16, 1, PixelFormat::Rgba8).is_err());
    }

    #[test]
    fn test_rgba_tile_converted_to_rgb_canvas() {
        let mut canvas = SpriteCanvas::acquire(2, 2, 1, PixelFormat::Rgb8).unwrap();
        canvas.blit(&PixelBuffer::solid(2, 2, [7, 8, 9, 255]), 0).unwrap();

        let buffer = canvas.buffer();
        assert_eq!(buffer.stride, 6);
        assert_eq!(buffer.row(1).unwrap(), &[7, 8, 9, 7, 8, 9]);
    }

    #[test]
    fn test_flush_writes_stacked_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("_sprites").join("A.png");

        let mut canvas = SpriteCanvas::acquire(16, 16, 2, PixelFormat::Rgba8).unwrap();
        canvas.blit(&PixelBuffer::solid(16, 16, [255, 0, 0, 255]), 0).unwrap();
        canvas.blit(&PixelBuffer::solid(16, 16, [0, 0, 255, 255]), 1).unwrap();
        canvas.flush(&path).unwrap();

        let sheet = decode_png_file(&path).unwrap();
        assert_eq!((sheet.width, sheet.height), (16, 32));
        assert_eq!(&sheet.row(0).unwrap()[..4], &[255, 0, 0, 255]);
        assert_eq!(&sheet.row(31).unwrap()[..4], &[0, 0, 255, 255]);
    }
}
