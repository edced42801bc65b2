//! Export pipeline
//!
//! Walks both catalogs in order, writing every image as its own PNG and
//! stacking it into its group's sprite sheet. A sheet is flushed when the
//! next image belongs to a different group, or when the catalog runs out.

use std::mem;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::grouping::{is_plain_name, leading_char, CrossProduct, GroupKey, PrefixPlan};
use crate::config::ExportConfig;
use crate::error::{ExportError, ExportFailure, Result};
use crate::source::{GlyphCatalog, ImageCatalog, ImageSource};
use crate::sprite::{encode_to_file, PixelBuffer, SpriteCanvas};

/// Outcome of a completed export
#[derive(Debug, Default)]
pub struct ExportReport {
    /// Every PNG written, tiles and sheets
    pub files_written: usize,
    /// Individual flat-catalog PNGs
    pub images_written: usize,
    /// Individual glyph PNGs
    pub glyphs_written: usize,
    /// Sprite sheets written
    pub sheets_written: usize,
    /// Non-fatal problems, in the order they happened
    pub skipped: Vec<ExportError>,
}

impl ExportReport {
    /// Serializable view of the report
    pub fn summary(&self) -> ExportSummary {
        ExportSummary {
            files_written: self.files_written,
            images_written: self.images_written,
            glyphs_written: self.glyphs_written,
            sheets_written: self.sheets_written,
            skipped: self.skipped.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// Report summary for machine-readable output
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub files_written: usize,
    pub images_written: usize,
    pub glyphs_written: usize,
    pub sheets_written: usize,
    pub skipped: Vec<String>,
}

/// A sprite sheet being filled
#[derive(Debug)]
struct OpenSheet {
    key: GroupKey,
    path: PathBuf,
    /// `None` once a tile failed to fit; the sheet is then dropped on flush
    canvas: Option<SpriteCanvas>,
    next_slot: u32,
}

/// Where a pass is in its catalog
#[derive(Debug)]
enum SheetState {
    /// No sheet open yet
    Idle,
    /// Tiles are going into this sheet
    Accumulating(OpenSheet),
    /// Catalog exhausted, last sheet flushed
    Done,
}

/// Drives both export passes
pub struct Exporter<'a> {
    config: &'a ExportConfig,
    state: SheetState,
    report: ExportReport,
}

impl<'a> Exporter<'a> {
    pub fn new(config: &'a ExportConfig) -> Self {
        Self {
            config,
            state: SheetState::Idle,
            report: ExportReport::default(),
        }
    }

    /// Work done so far
    pub fn report(&self) -> &ExportReport {
        &self.report
    }

    pub fn into_report(self) -> ExportReport {
        self.report
    }

    /// Run the image pass then the glyph pass under `root`
    pub fn run<S: ImageSource + ?Sized>(&mut self, root: &Path, source: &S) -> Result<()> {
        self.export_images(source, &root.join(&self.config.images_dir))?;
        self.export_glyphs(source, &root.join(&self.config.glyphs_dir))?;
        log::info!(
            "Export finished: {} files ({} sheets), {} skipped",
            self.report.files_written,
            self.report.sheets_written,
            self.report.skipped.len()
        );
        Ok(())
    }

    /// Flat catalog, one sheet per leading character
    ///
    /// A sheet opens on the first image that actually has pixels, so a
    /// letter whose images are all missing produces no sheet.
    pub fn export_images<C: ImageCatalog + ?Sized>(&mut self, catalog: &C, folder: &Path) -> Result<()> {
        let plan = PrefixPlan::new(catalog.names());
        check_names(plan.names().iter())?;
        let sprites = folder.join(&self.config.sprites_dir);
        log::info!(
            "Exporting {} images in {} groups to {}",
            plan.names().len(),
            plan.group_count(),
            folder.display()
        );

        self.state = SheetState::Idle;
        for name in plan.names() {
            let Some(image) = catalog.image(name) else {
                self.skip_missing(name.clone());
                continue;
            };

            self.write_tile(&image, &folder.join(format!("{}.png", name)))?;
            self.report.images_written += 1;

            let Some(letter) = leading_char(name) else {
                continue;
            };
            let key = GroupKey::Prefix(letter);
            if !self.is_open(&key) {
                let path = sprites.join(format!("{}.png", key.sheet_name()));
                self.begin(key, plan.tile_count(letter), path)?;
            }
            self.place(&image, None)?;
        }
        self.finish()
    }

    /// Two-level catalog, one sheet per group with a slot per item
    ///
    /// Every group gets a sheet. Absent items leave their slot blank and
    /// never shift the items after them.
    pub fn export_glyphs<C: GlyphCatalog + ?Sized>(&mut self, catalog: &C, folder: &Path) -> Result<()> {
        let cross = CrossProduct::new(catalog.groups(), catalog.items());
        check_names(cross.groups().iter().chain(cross.items()))?;
        let sprites = folder.join(&self.config.sprites_dir);
        log::info!(
            "Exporting {} glyph groups x {} items to {}",
            cross.groups().len(),
            cross.items().len(),
            folder.display()
        );

        self.state = SheetState::Idle;
        for group in cross.groups() {
            if cross.tile_count() == 0 {
                log::warn!("Glyph group {} has no items, no sheet written", group);
                continue;
            }
            for (slot, item) in cross.slots() {
                let key = cross.key_of(group, item);
                if !self.is_open(&key) {
                    let path = sprites.join(format!("{}.png", key.sheet_name()));
                    self.begin(key, cross.tile_count(), path)?;
                }

                let Some(glyph) = catalog.glyph(group, item) else {
                    self.skip_missing(format!("{}/{}", group, item));
                    continue;
                };

                self.write_tile(&glyph, &folder.join(group).join(format!("{}.png", item)))?;
                self.report.glyphs_written += 1;
                self.place(&glyph, Some(slot))?;
            }
        }
        self.finish()
    }

    fn is_open(&self, key: &GroupKey) -> bool {
        matches!(&self.state, SheetState::Accumulating(sheet) if sheet.key.same_sheet(key))
    }

    /// Close the open sheet (if any) and open a fresh one
    fn begin(&mut self, key: GroupKey, tile_count: u32, path: PathBuf) -> Result<()> {
        self.flush_open()?;
        log::debug!("Opening {}-tile sheet {}", tile_count, path.display());

        let canvas = SpriteCanvas::acquire(
            self.config.tile_width,
            self.config.tile_pitch,
            tile_count,
            self.config.pixel_format,
        )?;
        self.state = SheetState::Accumulating(OpenSheet {
            key,
            path,
            canvas: Some(canvas),
            next_slot: 0,
        });
        Ok(())
    }

    /// Blit into the open sheet, at `slot` or the next free one
    fn place(&mut self, image: &PixelBuffer, slot: Option<u32>) -> Result<()> {
        let SheetState::Accumulating(sheet) = &mut self.state else {
            return Ok(());
        };

        let slot = slot.unwrap_or(sheet.next_slot);
        sheet.next_slot = slot + 1;

        let Some(canvas) = sheet.canvas.as_mut() else {
            return Ok(());
        };
        match canvas.blit(image, slot) {
            Ok(()) => Ok(()),
            Err(e) if !e.is_fatal() => {
                log::warn!("Abandoning sheet {}: {}", sheet.path.display(), e);
                sheet.canvas = None;
                self.report.skipped.push(e);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Catalog exhausted
    fn finish(&mut self) -> Result<()> {
        self.flush_open()?;
        self.state = SheetState::Done;
        Ok(())
    }

    fn flush_open(&mut self) -> Result<()> {
        let SheetState::Accumulating(sheet) = mem::replace(&mut self.state, SheetState::Idle) else {
            return Ok(());
        };

        match sheet.canvas {
            Some(canvas) => {
                canvas.flush(&sheet.path)?;
                self.report.files_written += 1;
                self.report.sheets_written += 1;
            }
            None => log::warn!("Sheet {} not written", sheet.path.display()),
        }
        Ok(())
    }

    fn write_tile(&mut self, image: &PixelBuffer, path: &Path) -> Result<()> {
        encode_to_file(image, path)?;
        self.report.files_written += 1;
        Ok(())
    }

    fn skip_missing(&mut self, name: String) {
        log::warn!("No pixel data for {}, skipping", name);
        self.report.skipped.push(ExportError::MissingPixelData(name));
    }
}

/// Catalog names become file and folder names, so each must stay a single
/// path component
fn check_names<'n>(names: impl Iterator<Item = &'n String>) -> Result<()> {
    for name in names {
        if !is_plain_name(name) {
            return Err(ExportError::config(
                "<catalog>",
                format!("name {:?} is not a plain file name", name),
            ));
        }
    }
    Ok(())
}

/// Export both catalogs of `source` under `root`
///
/// `root` must already exist. On a fatal error the files written so far
/// stay on disk and their count is returned with the error.
pub fn export<S: ImageSource + ?Sized>(
    root: &Path,
    source: &S,
    config: &ExportConfig,
) -> std::result::Result<ExportReport, ExportFailure> {
    if !root.is_dir() {
        return Err(ExportFailure {
            error: ExportError::InvalidRoot(root.to_path_buf()),
            files_written: 0,
        });
    }
    if let Err(reason) = config.validate() {
        return Err(ExportFailure {
            error: ExportError::config("<config>", reason),
            files_written: 0,
        });
    }

    let mut exporter = Exporter::new(config);
    match exporter.run(root, source) {
        Ok(()) => Ok(exporter.into_report()),
        Err(error) => {
            log::error!("Export failed: {}", error);
            Err(ExportFailure {
                error,
                files_written: exporter.report().files_written,
            })
        }
    }
}
