//! Pixel buffers, PNG codec and sprite canvases
//!
//! Everything here is in-memory except `codec`, which owns all image I/O.

pub mod buffer;
pub mod canvas;
pub mod codec;

pub use buffer::{PixelBuffer, PixelFormat};
pub use canvas::SpriteCanvas;
pub use codec::{decode_png_file, encode_png, encode_to_file};
