//! Preset export extraction for Promptdeck.
//!
//! This crate turns third-party preset export files into the derived
//! fragment tree:
//! - resolves the prompt ordering from the export's order section
//!   (maximum scope id wins, last occurrence on ties),
//! - partitions fragments at the prefix boundary marker,
//! - drops records with no identifier or no usable content,
//! - writes one record per body fragment plus one merged prefix record
//!   per preset.
//!
//! # Example
//!
//! ```no_run
//! use promptdeck_extract::Extractor;
//!
//! let extractor = Extractor::new("data/presets", "data/presets/extracted");
//! let summary = extractor.extract_all().unwrap();
//! println!("extracted {} fragments", summary.fragment_count);
//! ```

pub mod error;
pub mod export;
pub mod extractor;

pub use error::{ExtractError, Result};
pub use export::{resolve_order, ExportFile, OrderEntry, RawPrompt};
pub use extractor::{ExtractSummary, Extractor, PREFIX_BOUNDARY};
