//! Sprite sheet export
//!
//! `grouping` decides which sheet each image goes to and how big it is;
//! `orchestrator` runs the passes and writes the files.

pub mod grouping;
pub mod orchestrator;

pub use grouping::{is_plain_name, CrossProduct, GroupKey, PrefixPlan};
pub use orchestrator::{export, ExportReport, ExportSummary, Exporter};
