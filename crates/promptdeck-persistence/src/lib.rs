//! Persistence layer for Promptdeck.
//!
//! This crate provides the file-backed stores behind the preset system:
//! the derived fragment tree, the per-preset group documents and the
//! optional activation snapshots. Records are plain per-file JSON
//! documents; there is no lock file and no transaction spanning multiple
//! records, so a crash between a memory update and a file write is
//! reconciled by the next full reload.
//!
//! # Example
//!
//! ```no_run
//! use promptdeck_persistence::FragmentStore;
//! use promptdeck_models::Fragment;
//!
//! let store = FragmentStore::new("/home/user/.promptdeck/presets/extracted");
//!
//! let fragment = Fragment::user("My Style", "Write tersely.");
//! store.save_fragment("default", &fragment).unwrap();
//!
//! let records = store.read_fragments("default").unwrap();
//! assert_eq!(records.len(), 1);
//! ```

pub mod error;
pub mod fragment_store;
pub mod group_store;
pub mod json;
pub mod snapshot_store;

pub use error::{PersistenceError, Result};
pub use fragment_store::{FragmentStore, PREFIX_FILE};
pub use group_store::{GroupMap, GroupStore};
pub use snapshot_store::SnapshotStore;
