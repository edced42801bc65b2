//! Built-in placeholder catalog
//!
//! A closed, statically declared catalog of well-known icon names and the
//! standard glyph taxonomy. Pixels are solid colours derived from the name,
//! so every run produces the same bytes.

use super::{GlyphCatalog, ImageCatalog};
use crate::sprite::PixelBuffer;

/// Well-known image names (flat catalog)
pub const KNOWN_IMAGES: &[&str] = &[
    "AbstractClass",
    "Add",
    "AddClass",
    "AddItem",
    "Application",
    "Assembly",
    "Bookmark",
    "Breakpoint",
    "BuildSelection",
    "BuildSolution",
    "Cancel",
    "Class",
    "Cloud",
    "Copy",
    "Cut",
    "Delete",
    "Document",
    "Enumeration",
    "Event",
    "Field",
    "Folder",
    "FolderOpened",
    "Interface",
    "Method",
    "Namespace",
    "Paste",
    "Property",
    "Redo",
    "Refresh",
    "Save",
    "SaveAll",
    "Search",
    "Settings",
    "Structure",
    "Undo",
    "Warning",
];

/// Outer glyph enumeration
pub const GLYPH_GROUPS: &[&str] = &[
    "GlyphGroupClass",
    "GlyphGroupConstant",
    "GlyphGroupDelegate",
    "GlyphGroupEnum",
    "GlyphGroupEnumMember",
    "GlyphGroupEvent",
    "GlyphGroupField",
    "GlyphGroupInterface",
    "GlyphGroupMethod",
    "GlyphGroupModule",
    "GlyphGroupNamespace",
    "GlyphGroupOperator",
    "GlyphGroupProperty",
    "GlyphGroupStruct",
    "GlyphGroupVariable",
    "GlyphGroupError",
    "GlyphKeyword",
    "GlyphReference",
];

/// Inner glyph enumeration
pub const GLYPH_ITEMS: &[&str] = &[
    "GlyphItemPublic",
    "GlyphItemInternal",
    "GlyphItemFriend",
    "GlyphItemProtected",
    "GlyphItemPrivate",
    "GlyphItemShortcut",
    "TotalGlyphItems",
];

/// Groups with a single glyph, drawn only for the public item
const UNSCOPED_GROUPS: &[&str] = &["GlyphGroupError", "GlyphKeyword", "GlyphReference"];

/// Sentinel item with no artwork
const SENTINEL_ITEM: &str = "TotalGlyphItems";

/// Deterministic solid-colour catalog
#[derive(Debug, Clone)]
pub struct PlaceholderSource {
    /// Width and height of every tile
    pub tile_size: u32,
}

impl PlaceholderSource {
    pub fn new(tile_size: u32) -> Self {
        Self { tile_size }
    }

    fn tile(&self, key: &str) -> PixelBuffer {
        let [r, g, b] = color_for(key);
        PixelBuffer::solid(self.tile_size, self.tile_size, [r, g, b, 255])
    }
}

impl Default for PlaceholderSource {
    fn default() -> Self {
        Self::new(16)
    }
}

impl ImageCatalog for PlaceholderSource {
    fn names(&self) -> Vec<String> {
        KNOWN_IMAGES.iter().map(|s| s.to_string()).collect()
    }

    fn image(&self, name: &str) -> Option<PixelBuffer> {
        KNOWN_IMAGES.contains(&name).then(|| self.tile(name))
    }
}

impl GlyphCatalog for PlaceholderSource {
    fn groups(&self) -> Vec<String> {
        GLYPH_GROUPS.iter().map(|s| s.to_string()).collect()
    }

    fn items(&self) -> Vec<String> {
        GLYPH_ITEMS.iter().map(|s| s.to_string()).collect()
    }

    fn glyph(&self, group: &str, item: &str) -> Option<PixelBuffer> {
        if !GLYPH_GROUPS.contains(&group) || !GLYPH_ITEMS.contains(&item) || item == SENTINEL_ITEM {
            return None;
        }
        if UNSCOPED_GROUPS.contains(&group) && item != GLYPH_ITEMS[0] {
            return None;
        }
        Some(self.tile(&format!("{}/{}", group, item)))
    }
}

/// Stable colour for a name (FNV-1a)
fn color_for(key: &str) -> [u8; 3] {
    let mut hash: u32 = 0x811c_9dc5;
    for byte in key.bytes() {
        hash ^= byte as u32;
        hash = hash.wrapping_mul(0x0100_0193);
    }
    let [r, g, b, _] = hash.to_le_bytes();
    [r, g, b]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_known_image_present() {
        let source = PlaceholderSource::default();
        for name in source.names() {
            let image = source.image(&name).unwrap();
            assert_eq!((image.width, image.height), (16, 16));
        }
        assert!(source.image("NotACatalogName").is_none());
    }

    #[test]
    fn test_tiles_are_deterministic() {
        let a = PlaceholderSource::new(8);
        let b = PlaceholderSource::new(8);
        assert_eq!(a.image("Add"), b.image("Add"));
        assert_ne!(a.image("Add"), a.image("Copy"));
    }

    #[test]
    fn test_absent_glyphs() {
        let source = PlaceholderSource::default();
        assert!(source.glyph("GlyphGroupClass", "GlyphItemPrivate").is_some());
        assert!(source.glyph("GlyphGroupClass", "TotalGlyphItems").is_none());
        assert!(source.glyph("GlyphKeyword", "GlyphItemPublic").is_some());
        assert!(source.glyph("GlyphKeyword", "GlyphItemPrivate").is_none());
        assert!(source.glyph("Nope", "GlyphItemPublic").is_none());
    }
}
