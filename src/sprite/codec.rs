//! PNG encoding and decoding
//!
//! The only place the exporter touches the file system for image data.

use std::fs::{self, File};
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;

use image::codecs::png::PngEncoder;
use image::ImageEncoder;

use super::buffer::PixelBuffer;
use crate::error::{ExportError, Result};

/// Encode a buffer as PNG bytes
pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    write_png(buffer, Cursor::new(&mut bytes), Path::new("<memory>"))?;
    Ok(bytes)
}

/// Encode a buffer and write it to `path`, creating parent directories
///
/// Existing files are truncated. Directory creation is idempotent, so many
/// calls may share the same parent.
pub fn encode_to_file(buffer: &PixelBuffer, path: &Path) -> Result<()> {
    // Validate before touching the disk so a bad buffer leaves no empty file
    buffer
        .check_layout()
        .map_err(|reason| ExportError::encode(path, reason))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ExportError::io(parent, e))?;
    }

    let file = File::create(path).map_err(|e| ExportError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write_png(buffer, &mut writer, path)?;
    writer.flush().map_err(|e| ExportError::io(path, e))?;

    log::debug!("Wrote {}x{} PNG to {}", buffer.width, buffer.height, path.display());
    Ok(())
}

/// Read a PNG file back into an RGBA buffer
pub fn decode_png_file(path: &Path) -> Result<PixelBuffer> {
    let image = image::open(path).map_err(|e| match e {
        image::ImageError::IoError(io) => ExportError::io(path, io),
        other => ExportError::encode(path, other.to_string()),
    })?;
    Ok(PixelBuffer::from_rgba(image.to_rgba8()))
}

fn write_png<W: Write>(buffer: &PixelBuffer, writer: W, path: &Path) -> Result<()> {
    buffer
        .check_layout()
        .map_err(|reason| ExportError::encode(path, reason))?;

    let pixels = buffer.packed_rows();
    PngEncoder::new(writer)
        .write_image(&pixels, buffer.width, buffer.height, buffer.format.color_type())
        .map_err(|e| match e {
            image::ImageError::IoError(io) => ExportError::io(path, io),
            other => ExportError::encode(path, other.to_string()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::buffer::PixelFormat;
    use tempfile::TempDir;

    #[test]
    fn test_png_signature() {
        let bytes = encode_png(&PixelBuffer::solid(4, 4, [0, 128, 255, 200])).unwrap();
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let buffer = PixelBuffer::solid(16, 16, [10, 20, 30, 40]);
        assert_eq!(encode_png(&buffer).unwrap(), encode_png(&buffer).unwrap());
    }

    #[test]
    fn test_file_round_trip_preserves_alpha() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a").join("b").join("tile.png");

        let mut buffer = PixelBuffer::solid(3, 2, [200, 100, 50, 25]);
        buffer.data[0..4].copy_from_slice(&[0, 0, 0, 0]);
        encode_to_file(&buffer, &path).unwrap();

        let decoded = decode_png_file(&path).unwrap();
        assert_eq!(decoded, buffer);
    }

    #[test]
    fn test_padded_stride_is_packed_on_encode() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("padded.png");
        let buffer = PixelBuffer {
            width: 1,
            height: 2,
            stride: 8,
            format: PixelFormat::Rgba8,
            data: vec![1, 2, 3, 4, 9, 9, 9, 9, 5, 6, 7, 8, 9, 9, 9, 9],
        };

        encode_to_file(&buffer, &path).unwrap();

        let decoded = decode_png_file(&path).unwrap();
        assert_eq!(decoded.data, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_malformed_buffer_is_encode_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.png");
        let buffer = PixelBuffer {
            width: 4,
            height: 4,
            stride: 16,
            format: PixelFormat::Rgba8,
            data: vec![0; 10],
        };

        let err = encode_to_file(&buffer, &path).unwrap_err();
        assert!(matches!(err, ExportError::Encode { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_overwrite_and_shared_parent() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("shared").join("one.png");
        let second = dir.path().join("shared").join("two.png");

        encode_to_file(&PixelBuffer::solid(2, 2, [1, 1, 1, 1]), &first).unwrap();
        encode_to_file(&PixelBuffer::solid(2, 2, [2, 2, 2, 2]), &second).unwrap();
        encode_to_file(&PixelBuffer::solid(2, 2, [3, 3, 3, 3]), &first).unwrap();

        assert_eq!(decode_png_file(&first).unwrap().data, vec![3; 16]);
        assert_eq!(decode_png_file(&second).unwrap().data, vec![2; 16]);
    }
}
