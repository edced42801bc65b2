//! Export configuration
//!
//! Read from a RON file, falling back to defaults when the file is missing
//! or broken.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ExportError, Result};
use crate::export::is_plain_name;
use crate::sprite::PixelFormat;

/// Upper bound for `tile_width` and `tile_pitch`
pub const MAX_TILE_SIZE: u32 = 1024;

/// Settings for one export run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Width of every tile and of every sprite sheet
    pub tile_width: u32,
    /// Vertical distance between sprite sheet slots
    pub tile_pitch: u32,
    /// Pixel format of sprite sheets
    pub pixel_format: PixelFormat,
    /// Folder under the root for the flat catalog
    pub images_dir: String,
    /// Folder under the root for the glyph catalog
    pub glyphs_dir: String,
    /// Folder (inside each of the above) holding sprite sheets
    pub sprites_dir: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            tile_width: 16,
            tile_pitch: 16,
            pixel_format: PixelFormat::Rgba8,
            images_dir: "images".to_string(),
            glyphs_dir: "glyphs".to_string(),
            sprites_dir: "_sprites".to_string(),
        }
    }
}

impl ExportConfig {
    /// Default config file location
    pub fn default_path() -> PathBuf {
        use directories::ProjectDirs;

        if let Some(proj_dirs) = ProjectDirs::from("com", "glyph-exporter", "GlyphExporter") {
            proj_dirs.config_dir().join("config.ron")
        } else {
            PathBuf::from("./glyph-exporter.ron")
        }
    }

    /// Load from a RON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ExportError::io(path, e))?;
        let config: ExportConfig =
            ron::from_str(&content).map_err(|e| ExportError::config(path, e.to_string()))?;
        config
            .validate()
            .map_err(|reason| ExportError::config(path, reason))?;
        Ok(config)
    }

    /// Load from a RON file, or use defaults if that fails
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Write as pretty RON, creating the parent folder
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ExportError::io(parent, e))?;
        }
        let text = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ExportError::config(path, e.to_string()))?;
        fs::write(path, text).map_err(|e| ExportError::io(path, e))?;
        log::info!("Config written to {}", path.display());
        Ok(())
    }

    /// Check tile sizes and folder names
    pub fn validate(&self) -> std::result::Result<(), String> {
        for (field, value) in [("tile_width", self.tile_width), ("tile_pitch", self.tile_pitch)] {
            if value == 0 || value > MAX_TILE_SIZE {
                return Err(format!("{} must be between 1 and {}, got {}", field, MAX_TILE_SIZE, value));
            }
        }
        for dir in [&self.images_dir, &self.glyphs_dir, &self.sprites_dir] {
            if !is_plain_name(dir) {
                return Err(format!("folder name {:?} must be a single path component", dir));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ExportConfig::default();
        assert_eq!(config.tile_width, 16);
        assert_eq!(config.tile_pitch, 16);
        assert_eq!(config.sprites_dir, "_sprites");
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.ron");
        let config = ExportConfig {
            tile_width: 32,
            tile_pitch: 32,
            ..Default::default()
        };

        config.save(&path).unwrap();
        assert_eq!(ExportConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ron");
        fs::write(&path, "(tile_pitch: 20)").unwrap();

        let config = ExportConfig::load(&path).unwrap();
        assert_eq!(config.tile_pitch, 20);
        assert_eq!(config.tile_width, 16);
        assert_eq!(config.images_dir, "images");
    }

    #[test]
    fn test_zero_pitch_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ron");
        fs::write(&path, "(tile_pitch: 0)").unwrap();

        assert!(matches!(ExportConfig::load(&path), Err(ExportError::Config { .. })));
        assert_eq!(ExportConfig::load_or_default(&path), ExportConfig::default());
    }

    #[test]
    fn test_oversized_tiles_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ron");
        fs::write(&path, "(tile_pitch: 2048)").unwrap();

        assert!(matches!(ExportConfig::load(&path), Err(ExportError::Config { .. })));

        let config = ExportConfig {
            tile_width: MAX_TILE_SIZE,
            tile_pitch: MAX_TILE_SIZE,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_nested_folder_rejected() {
        let config = ExportConfig {
            sprites_dir: "../out".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ExportConfig {
            images_dir: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = TempDir::new().unwrap();
        let config = ExportConfig::load_or_default(&dir.path().join("absent.ron"));
        assert_eq!(config, ExportConfig::default());
    }
}
