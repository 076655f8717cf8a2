//! Core data models for Promptdeck.
//!
//! This crate provides the fundamental data types used throughout the
//! Promptdeck system: prompt fragments, presets, activation records and
//! the typed identifiers that membership tests are based on.

pub mod fragment;
pub mod ids;
pub mod preset;
pub mod slug;

// Re-export main types
pub use fragment::{ActivationRecord, Fragment};
pub use ids::{FragmentKey, PendingToken};
pub use preset::Preset;
pub use slug::slugify;
