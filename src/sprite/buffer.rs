//! Raw pixel buffers
//!
//! The unit every other part of the exporter works on: a byte buffer plus
//! the geometry needed to walk it row by row.

use image::{DynamicImage, ExtendedColorType, GrayAlphaImage, GrayImage, RgbImage, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::{ExportError, Result};

/// Pixel layout of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PixelFormat {
    /// 8-bit luminance
    Gray8,
    /// 8-bit luminance plus alpha
    GrayAlpha8,
    /// 24-bit colour, no alpha
    Rgb8,
    /// 32-bit colour with alpha
    #[default]
    Rgba8,
}

impl PixelFormat {
    /// Bits used by one pixel
    pub fn bits_per_pixel(&self) -> u32 {
        match self {
            PixelFormat::Gray8 => 8,
            PixelFormat::GrayAlpha8 => 16,
            PixelFormat::Rgb8 => 24,
            PixelFormat::Rgba8 => 32,
        }
    }

    /// Bytes used by one pixel
    pub fn bytes_per_pixel(&self) -> u32 {
        self.bits_per_pixel() / 8
    }

    /// Colour type handed to the PNG encoder
    pub fn color_type(&self) -> ExtendedColorType {
        match self {
            PixelFormat::Gray8 => ExtendedColorType::L8,
            PixelFormat::GrayAlpha8 => ExtendedColorType::La8,
            PixelFormat::Rgb8 => ExtendedColorType::Rgb8,
            PixelFormat::Rgba8 => ExtendedColorType::Rgba8,
        }
    }
}

/// Largest buffer a canvas may allocate (1 GiB)
pub const MAX_BUFFER_BYTES: usize = 1 << 30;

/// A bitmap: `height` rows of `stride` bytes each
///
/// Invariants (see [`PixelBuffer::check_layout`]):
/// `data.len() == stride * height` and `stride >= ceil(width * bpp / 8)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Bytes between the starts of consecutive rows
    pub stride: u32,
    /// Layout of each pixel
    pub format: PixelFormat,
    /// Raw pixel bytes
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocate a fully transparent buffer with packed rows
    pub fn zeroed(width: u32, height: u32, format: PixelFormat) -> Self {
        let stride = packed_stride(width, format);
        Self {
            width,
            height,
            stride,
            format,
            data: vec![0; stride as usize * height as usize],
        }
    }

    /// Allocate a transparent buffer, or `None` if its size overflows
    /// or exceeds [`MAX_BUFFER_BYTES`]
    pub fn try_zeroed(width: u32, height: u32, format: PixelFormat) -> Option<Self> {
        let stride = width.checked_mul(format.bits_per_pixel())?.div_ceil(8);
        let len = (stride as usize).checked_mul(height as usize)?;
        if len > MAX_BUFFER_BYTES {
            return None;
        }
        Some(Self {
            width,
            height,
            stride,
            format,
            data: vec![0; len],
        })
    }

    /// Wrap pixels copied out of a source image
    ///
    /// The source is assumed to have no row padding, so the stride is
    /// `width * bpp / 8`.
    pub fn from_source(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Result<Self> {
        let buffer = Self {
            width,
            height,
            stride: packed_stride(width, format),
            format,
            data,
        };
        buffer
            .check_layout()
            .map_err(|reason| ExportError::encode("<source>", reason))?;
        Ok(buffer)
    }

    /// Take ownership of a decoded RGBA image
    pub fn from_rgba(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            stride: packed_stride(width, PixelFormat::Rgba8),
            format: PixelFormat::Rgba8,
            data: image.into_raw(),
        }
    }

    /// A buffer filled with one colour
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut buffer = Self::zeroed(width, height, PixelFormat::Rgba8);
        for pixel in buffer.data.chunks_exact_mut(4) {
            pixel.copy_from_slice(&rgba);
        }
        buffer
    }

    /// Same pixels in another format
    ///
    /// Goes through the `image` crate's colour conversions: dropping alpha
    /// discards it, gray is computed from luminance.
    pub fn to_format(&self, format: PixelFormat) -> Result<PixelBuffer> {
        if self.format == format {
            return Ok(self.clone());
        }
        self.check_layout()
            .map_err(|reason| ExportError::encode("<tile>", reason))?;

        let (width, height) = (self.width, self.height);
        let pixels = self.packed_rows();
        let bad = || ExportError::encode("<tile>", "pixel data does not match its size");
        let image = match self.format {
            PixelFormat::Gray8 => {
                DynamicImage::ImageLuma8(GrayImage::from_raw(width, height, pixels).ok_or_else(bad)?)
            }
            PixelFormat::GrayAlpha8 => {
                DynamicImage::ImageLumaA8(GrayAlphaImage::from_raw(width, height, pixels).ok_or_else(bad)?)
            }
            PixelFormat::Rgb8 => {
                DynamicImage::ImageRgb8(RgbImage::from_raw(width, height, pixels).ok_or_else(bad)?)
            }
            PixelFormat::Rgba8 => {
                DynamicImage::ImageRgba8(RgbaImage::from_raw(width, height, pixels).ok_or_else(bad)?)
            }
        };

        let data = match format {
            PixelFormat::Gray8 => image.to_luma8().into_raw(),
            PixelFormat::GrayAlpha8 => image.to_luma_alpha8().into_raw(),
            PixelFormat::Rgb8 => image.to_rgb8().into_raw(),
            PixelFormat::Rgba8 => image.to_rgba8().into_raw(),
        };
        Ok(PixelBuffer {
            width,
            height,
            stride: packed_stride(width, format),
            format,
            data,
        })
    }

    /// Bytes of actual pixel data in one row (excludes stride padding)
    pub fn row_bytes(&self) -> usize {
        (self.width as usize * self.format.bits_per_pixel() as usize).div_ceil(8)
    }

    /// Verify the stride/size invariants
    pub fn check_layout(&self) -> std::result::Result<(), String> {
        if (self.stride as usize) < self.row_bytes() {
            return Err(format!(
                "stride {} is shorter than a {}px row ({} bytes)",
                self.stride,
                self.width,
                self.row_bytes()
            ));
        }
        let expected = self.stride as usize * self.height as usize;
        if self.data.len() != expected {
            return Err(format!(
                "buffer holds {} bytes, expected {} ({} rows of {})",
                self.data.len(),
                expected,
                self.height,
                self.stride
            ));
        }
        Ok(())
    }

    /// Pixel bytes of row `y`, without padding
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.stride as usize;
        self.data.get(start..start + self.row_bytes())
    }

    /// All rows concatenated with stride padding removed
    pub fn packed_rows(&self) -> Vec<u8> {
        let row_bytes = self.row_bytes();
        if self.stride as usize == row_bytes {
            return self.data.clone();
        }
        let mut packed = Vec::with_capacity(row_bytes * self.height as usize);
        for row in self.data.chunks(self.stride as usize).take(self.height as usize) {
            packed.extend_from_slice(&row[..row_bytes]);
        }
        packed
    }

    /// Copy this bitmap into `dest`, top edge at row `y_offset`
    ///
    /// Rows are copied one at a time so the two buffers may use different
    /// strides.
    pub fn blit_into(&self, dest: &mut PixelBuffer, y_offset: u32) -> Result<()> {
        let overflows = y_offset
            .checked_add(self.height)
            .map_or(true, |bottom| bottom > dest.height);

        if self.width != dest.width || self.format != dest.format || overflows {
            return Err(ExportError::SizeMismatch {
                width: self.width,
                height: self.height,
                dest_width: dest.width,
                dest_height: dest.height,
                y_offset,
            });
        }

        self.check_layout()
            .map_err(|reason| ExportError::encode("<tile>", reason))?;
        dest.check_layout()
            .map_err(|reason| ExportError::encode("<canvas>", reason))?;

        let row_bytes = self.row_bytes();
        let src_stride = self.stride as usize;
        let dst_stride = dest.stride as usize;

        for y in 0..self.height as usize {
            let src = y * src_stride;
            let dst = (y_offset as usize + y) * dst_stride;
            dest.data[dst..dst + row_bytes].copy_from_slice(&self.data[src..src + row_bytes]);
        }

        Ok(())
    }
}

/// Row length in bytes with no padding
/// Row length without padding, saturating at `u32::MAX` so oversized
/// widths fail `check_layout` instead of wrapping
fn packed_stride(width: u32, format: PixelFormat) -> u32 {
    let bytes = (u64::from(width) * u64::from(format.bits_per_pixel())).div_ceil(8);
    u32::try_from(bytes).unwrap_or(u32::MAX)
}
