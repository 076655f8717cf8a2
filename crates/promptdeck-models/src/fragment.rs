//! Prompt fragment types for Promptdeck.
//!
//! Fragments are the atomic units of prompt text: extracted from preset
//! export files or authored by the user, and selected into the active set
//! for injection into outbound requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::ids::FragmentKey;
use crate::slug::slugify;

/// Deserializes `content` leniently: strings pass through, any other JSON
/// value is stringified rather than rejected.
fn coerce_content<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

/// One named block of prompt text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// Opaque in-memory key, assigned when the fragment is loaded or
    /// created. Membership tests use this key; it is never persisted, and
    /// every load assigns a fresh one.
    #[serde(skip)]
    pub key: FragmentKey,

    /// Display name of the fragment.
    pub name: String,

    /// Prompt text.
    #[serde(deserialize_with = "coerce_content")]
    pub content: String,

    /// Whether this record belongs to the merged prefix block.
    #[serde(default)]
    pub is_prefix: bool,

    /// Identifier from the extraction source, unique within one export
    /// file. User-created fragments synthesize one from the name.
    #[serde(default)]
    pub identifier: String,

    /// True for fragments authored through the management surface rather
    /// than extracted from an export file.
    #[serde(default)]
    pub user_created: bool,

    /// When the fragment was created (user-created fragments only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// On-disk file stem the record was written under, recorded at write
    /// time so deletion targets the exact file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl Fragment {
    /// Creates a fragment extracted from an export file.
    pub fn extracted(
        name: impl Into<String>,
        content: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let slug = slugify(&name);
        Self {
            key: FragmentKey::new(),
            name,
            content: content.into(),
            is_prefix: false,
            identifier: identifier.into(),
            user_created: false,
            created_at: None,
            slug: Some(slug),
        }
    }

    /// Creates a user-authored fragment.
    ///
    /// The identifier and slug are both derived from the name and carry a
    /// `user_` tag so extracted and user records never collide on disk.
    pub fn user(name: impl Into<String>, content: impl Into<String>) -> Self {
        let name = name.into();
        let identifier = format!("user_{}", name.to_lowercase().replace(' ', "_"));
        let slug = format!("user_{}", slugify(&name));
        Self {
            key: FragmentKey::new(),
            name,
            content: content.into(),
            is_prefix: false,
            identifier,
            user_created: true,
            created_at: Some(Utc::now()),
            slug: Some(slug),
        }
    }

    /// Creates the merged prefix record for a preset.
    pub fn prefix_block(content: impl Into<String>) -> Self {
        Self {
            key: FragmentKey::new(),
            name: "System Prompt Prefix".to_string(),
            content: content.into(),
            is_prefix: true,
            identifier: String::new(),
            user_created: false,
            created_at: None,
            slug: None,
        }
    }

    /// Returns true if the fragment has no usable prompt text.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// One row of the durable activation snapshot: a display name and whether
/// the fragment was active. Re-association after reload is by name only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivationRecord {
    pub name: String,
    pub active: bool,
}

impl ActivationRecord {
    pub fn new(name: impl Into<String>, active: bool) -> Self {
        Self {
            name: name.into(),
            active,
        }
    }
}
