//! Component orchestration for Promptdeck.
//!
//! This crate composes the preset store, activation tracker and group
//! registry behind the single management surface consumed by a command
//! layer, and exposes the one mutation point applied to outbound model
//! requests.
//!
//! # Example
//!
//! ```no_run
//! use promptdeck_orchestrator::{Orchestrator, OutboundRequest};
//!
//! let mut orchestrator = Orchestrator::new().unwrap();
//! orchestrator.activate_fragment(0).unwrap();
//!
//! let mut request = OutboundRequest::new("You are helpful.", "hello");
//! orchestrator.apply_to_request(&mut request);
//! ```

pub mod error;
pub mod orchestrator;
pub mod pending;

pub use error::{OrchestratorError, Result};
pub use orchestrator::{
    FragmentEntry, GroupEntry, Orchestrator, OutboundRequest, RefreshStats,
};
pub use pending::{GroupEditMode, PendingKind, PendingRegistry};
