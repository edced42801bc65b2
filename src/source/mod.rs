//! Image sources
//!
//! The exporter never produces pixels itself. It pulls them from a flat
//! catalog of named images and a two-level glyph catalog.

pub mod directory;
pub mod placeholder;

pub use directory::{DirectorySource, GlyphManifest};
pub use placeholder::PlaceholderSource;

use crate::sprite::PixelBuffer;

/// Flat catalog of named images
pub trait ImageCatalog {
    /// Every cataloged name
    fn names(&self) -> Vec<String>;

    /// Pixels for a name, or `None` if the name has no bitmap
    fn image(&self, name: &str) -> Option<PixelBuffer>;
}

/// Two-level glyph catalog over closed enumerations
pub trait GlyphCatalog {
    /// Outer enumeration values
    fn groups(&self) -> Vec<String>;

    /// Inner enumeration values
    fn items(&self) -> Vec<String>;

    /// Pixels for one cell, or `None` if absent
    fn glyph(&self, group: &str, item: &str) -> Option<PixelBuffer>;
}

/// Anything that can feed both export passes
pub trait ImageSource: ImageCatalog + GlyphCatalog {}

impl<T: ImageCatalog + GlyphCatalog> ImageSource for T {}
