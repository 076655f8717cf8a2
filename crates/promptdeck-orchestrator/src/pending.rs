//! Two-phase pending-input operations.
//!
//! Multi-turn creation flows (collecting a new fragment's content, a
//! group's index list) are modeled as an explicit begin/complete pair
//! instead of a blocking wait: `begin` issues a correlation token with a
//! deadline, `complete` consumes the token with the collected input. A
//! token past its deadline fails and the pending operation is abandoned
//! with no partial commit.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use promptdeck_models::PendingToken;

use crate::error::{OrchestratorError, Result};

/// Which group mutation a pending index list belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupEditMode {
    Create,
    Update,
}

/// What a pending token is waiting for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingKind {
    /// Waiting for the content of a new fragment.
    FragmentContent { name: String },
    /// Waiting for the index list of a group create/update.
    GroupIndices { group: String, mode: GroupEditMode },
}

#[derive(Debug)]
struct PendingOp {
    kind: PendingKind,
    deadline: DateTime<Utc>,
}

/// Registry of outstanding pending-input operations.
///
/// Expired entries are purged lazily; there is no timer.
pub struct PendingRegistry {
    ops: HashMap<PendingToken, PendingOp>,
    ttl: Duration,
}

impl PendingRegistry {
    /// Creates a registry with the default 60-second deadline.
    pub fn new() -> Self {
        Self::with_ttl(Duration::seconds(60))
    }

    /// Creates a registry with a custom deadline duration.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ops: HashMap::new(),
            ttl,
        }
    }

    /// Begins a pending operation and returns its correlation token.
    pub fn begin(&mut self, kind: PendingKind) -> PendingToken {
        self.purge_expired();
        let token = PendingToken::new();
        self.ops.insert(
            token.clone(),
            PendingOp {
                kind,
                deadline: Utc::now() + self.ttl,
            },
        );
        token
    }

    /// Completes a pending operation, consuming the token.
    ///
    /// Fails with `PendingNotFound` for an unknown token and
    /// `PendingExpired` for one past its deadline; either way the token is
    /// gone afterwards.
    pub fn complete(&mut self, token: &PendingToken) -> Result<PendingKind> {
        let op = self
            .ops
            .remove(token)
            .ok_or(OrchestratorError::PendingNotFound)?;
        if Utc::now() > op.deadline {
            return Err(OrchestratorError::PendingExpired);
        }
        Ok(op.kind)
    }

    /// Number of outstanding (possibly expired, not yet purged) entries.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns true if no operation is pending.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    fn purge_expired(&mut self) {
        let now = Utc::now();
        self.ops.retain(|_, op| op.deadline >= now);
    }
}

impl Default for PendingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_and_complete() {
        let mut pending = PendingRegistry::new();

        let token = pending.begin(PendingKind::FragmentContent {
            name: "Style".to_string(),
        });
        let kind = pending.complete(&token).unwrap();

        assert_eq!(
            kind,
            PendingKind::FragmentContent {
                name: "Style".to_string()
            }
        );
        assert!(pending.is_empty());
    }

    #[test]
    fn test_token_is_single_use() {
        let mut pending = PendingRegistry::new();

        let token = pending.begin(PendingKind::FragmentContent {
            name: "Style".to_string(),
        });
        pending.complete(&token).unwrap();

        assert!(matches!(
            pending.complete(&token),
            Err(OrchestratorError::PendingNotFound)
        ));
    }

    #[test]
    fn test_unknown_token() {
        let mut pending = PendingRegistry::new();
        assert!(matches!(
            pending.complete(&PendingToken::new()),
            Err(OrchestratorError::PendingNotFound)
        ));
    }

    #[test]
    fn test_expired_token() {
        let mut pending = PendingRegistry::with_ttl(Duration::milliseconds(-1));

        let token = pending.begin(PendingKind::GroupIndices {
            group: "g".to_string(),
            mode: GroupEditMode::Create,
        });

        assert!(matches!(
            pending.complete(&token),
            Err(OrchestratorError::PendingExpired)
        ));
        // The operation is abandoned entirely.
        assert!(pending.is_empty());
    }

    #[test]
    fn test_begin_purges_expired_entries() {
        let mut pending = PendingRegistry::with_ttl(Duration::milliseconds(-1));
        pending.begin(PendingKind::FragmentContent {
            name: "a".to_string(),
        });
        assert_eq!(pending.len(), 1);

        pending.begin(PendingKind::FragmentContent {
            name: "b".to_string(),
        });
        // The first (expired) entry was purged; only the new one remains.
        assert_eq!(pending.len(), 1);
    }
}
