//! Active-fragment tracking for Promptdeck.
//!
//! This crate maintains the ordered, duplicate-free set of fragments
//! currently injected into outbound requests, scoped to the selected
//! preset, with an optional durable snapshot that survives restarts.
//!
//! # Example
//!
//! ```no_run
//! use promptdeck_activation::ActivationTracker;
//! use promptdeck_models::Fragment;
//!
//! let mut tracker = ActivationTracker::new();
//! tracker.switch("demo");
//!
//! let body = vec![Fragment::extracted("Rules", "the rules", "rules")];
//! let newly = tracker.activate(&body, &[0]);
//! assert_eq!(newly.len(), 1);
//! ```

pub mod error;
pub mod tracker;

pub use error::{ActivationError, Result};
pub use tracker::ActivationTracker;
