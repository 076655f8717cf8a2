//! Named fragment-group registry for Promptdeck.
//!
//! Groups are saved selections of body-fragment positions, persisted one
//! document per preset beside the raw sources so re-extraction cannot
//! erase them.
//!
//! # Example
//!
//! ```no_run
//! use promptdeck_groups::GroupRegistry;
//! use promptdeck_persistence::GroupStore;
//!
//! let mut registry = GroupRegistry::new(GroupStore::new("data/presets"));
//! registry.load("demo");
//! registry.create("writing", &[0, 2], 5).unwrap();
//! ```

pub mod error;
pub mod registry;

pub use error::{GroupError, Result};
pub use registry::GroupRegistry;
