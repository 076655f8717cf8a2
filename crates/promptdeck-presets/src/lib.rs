//! Preset repository for Promptdeck.
//!
//! This crate owns the in-memory presets loaded from the derived fragment
//! tree and every mutation applied to them: preset creation, user-fragment
//! add/delete, and reload with extraction fallback.
//!
//! # Example
//!
//! ```no_run
//! use promptdeck_presets::PresetStore;
//!
//! let mut store = PresetStore::new("data/presets", "data/presets/extracted");
//! store.load().unwrap();
//!
//! for name in store.preset_names() {
//!     println!("{}: {} fragments", name, store.fragments(&name).len());
//! }
//! ```

pub mod error;
pub mod store;

pub use error::{PresetError, Result};
pub use store::PresetStore;
