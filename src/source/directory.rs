//! Catalogs read from a folder of PNGs
//!
//! Layout:
//! - `<root>/images/<name>.png` for the flat catalog
//! - `<root>/glyphs/catalog.ron` declaring the two enumerations
//! - `<root>/glyphs/<group>/<item>.png` for each glyph

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{GlyphCatalog, ImageCatalog};
use crate::error::{ExportError, Result};
use crate::export::is_plain_name;
use crate::sprite::{decode_png_file, PixelBuffer};

/// Glyph enumerations declared in `catalog.ron`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphManifest {
    pub groups: Vec<String>,
    pub items: Vec<String>,
}

impl GlyphManifest {
    /// Load from a RON file
    ///
    /// Every group and item must be a plain file name.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ExportError::io(path, e))?;
        let manifest: GlyphManifest =
            ron::from_str(&content).map_err(|e| ExportError::config(path, e.to_string()))?;
        let mut names = manifest.groups.iter().chain(&manifest.items);
        if let Some(bad) = names.find(|name| !is_plain_name(name)) {
            return Err(ExportError::config(path, format!("{:?} is not a plain file name", bad)));
        }
        Ok(manifest)
    }

    /// Write as pretty RON
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ExportError::config(path, e.to_string()))?;
        fs::write(path, text).map_err(|e| ExportError::io(path, e))
    }
}

/// Image source backed by files on disk
#[derive(Debug, Clone)]
pub struct DirectorySource {
    images_dir: PathBuf,
    glyphs_dir: PathBuf,
    names: Vec<String>,
    manifest: GlyphManifest,
}

impl DirectorySource {
    /// Manifest file name inside the glyphs folder
    pub const MANIFEST: &'static str = "catalog.ron";

    /// Scan a source folder
    ///
    /// Missing `images/` or `glyphs/catalog.ron` just yields an empty
    /// catalog for that pass.
    pub fn open(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(ExportError::io(
                root,
                std::io::Error::new(std::io::ErrorKind::NotFound, "source folder not found"),
            ));
        }

        let images_dir = root.join("images");
        let glyphs_dir = root.join("glyphs");

        let names = if images_dir.is_dir() {
            scan_png_stems(&images_dir)?
        } else {
            log::warn!("No images folder in {}", root.display());
            Vec::new()
        };

        let manifest_path = glyphs_dir.join(Self::MANIFEST);
        let manifest = if manifest_path.exists() {
            GlyphManifest::load(&manifest_path)?
        } else {
            log::warn!("No glyph catalog at {}", manifest_path.display());
            GlyphManifest::default()
        };

        log::info!(
            "Source {}: {} images, {}x{} glyph taxonomy",
            root.display(),
            names.len(),
            manifest.groups.len(),
            manifest.items.len()
        );

        Ok(Self {
            images_dir,
            glyphs_dir,
            names,
            manifest,
        })
    }

    /// The glyph enumerations in use
    pub fn manifest(&self) -> &GlyphManifest {
        &self.manifest
    }
}

impl ImageCatalog for DirectorySource {
    fn names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn image(&self, name: &str) -> Option<PixelBuffer> {
        load_optional(&self.images_dir.join(format!("{}.png", name)))
    }
}

impl GlyphCatalog for DirectorySource {
    fn groups(&self) -> Vec<String> {
        self.manifest.groups.clone()
    }

    fn items(&self) -> Vec<String> {
        self.manifest.items.clone()
    }

    fn glyph(&self, group: &str, item: &str) -> Option<PixelBuffer> {
        load_optional(&self.glyphs_dir.join(group).join(format!("{}.png", item)))
    }
}

/// Decode a PNG, treating any failure as "no pixels"
fn load_optional(path: &Path) -> Option<PixelBuffer> {
    if !path.is_file() {
        return None;
    }
    match decode_png_file(path) {
        Ok(buffer) => Some(buffer),
        Err(e) => {
            log::warn!("Skipping unreadable image {}: {}", path.display(), e);
            None
        }
    }
}

/// File stems of every `.png` directly inside `dir`
fn scan_png_stems(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| ExportError::io(dir, e))? {
        let path = entry.map_err(|e| ExportError::io(dir, e))?.path();
        let is_png = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
        if !is_png || !path.is_file() {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            names.push(stem.to_string());
        }
    }
    names.sort();
    Ok(names)
}
