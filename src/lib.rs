//! Glyph Exporter - dump icon catalogs to PNG files and sprite sheets
//!
//! Every image in a catalog is written as its own PNG, and images are
//! stacked top to bottom into one sprite sheet per group.

pub mod config;
pub mod error;
pub mod export;
pub mod source;
pub mod sprite;

// Re-export commonly used types
pub use config::ExportConfig;
pub use error::{ExportError, ExportFailure, Result};
pub use export::{export, ExportReport};
pub use source::{DirectorySource, GlyphCatalog, ImageCatalog, ImageSource, PlaceholderSource};
pub use sprite::{PixelBuffer, PixelFormat, SpriteCanvas};
