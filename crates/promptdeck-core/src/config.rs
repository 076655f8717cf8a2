//! Shared configuration for Promptdeck.
//!
//! Provides functions to locate Promptdeck's data directory and the
//! preset file locations used across the system.
//!
//! # Storage Structure
//!
//! All application data is stored under `~/.promptdeck/`:
//!
//! ```text
//! ~/.promptdeck/
//! └── presets/              # Raw export files + group/activation documents
//!     ├── MyPreset.json
//!     ├── MyPreset_groups.json
//!     ├── MyPreset_activation.json
//!     └── extracted/        # Derived fragment tree
//!         └── MyPreset/
//! ```
//!
//! # Environment Variables
//!
//! - `PROMPTDECK_DATA_DIR`: Override the base data directory

use std::path::PathBuf;
use std::sync::OnceLock;

/// Environment variable for a custom data directory.
pub const DATA_DIR_ENV: &str = "PROMPTDECK_DATA_DIR";

/// Default data directory name under home.
const DEFAULT_DATA_DIR: &str = ".promptdeck";

// Subdirectory names
const PRESETS_SUBDIR: &str = "presets";
const EXTRACTED_SUBDIR: &str = "extracted";

// Static cache for lazy initialization
static DATA_DIR_CACHE: OnceLock<PathBuf> = OnceLock::new();

/// Get the Promptdeck data directory.
///
/// The data directory is determined by:
/// 1. `PROMPTDECK_DATA_DIR` environment variable if set
/// 2. `~/.promptdeck` if home directory is available
/// 3. `.promptdeck` in current directory as fallback
pub fn data_dir() -> PathBuf {
    DATA_DIR_CACHE
        .get_or_init(|| {
            std::env::var(DATA_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    dirs::home_dir()
                        .map(|h| h.join(DEFAULT_DATA_DIR))
                        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
                })
        })
        .clone()
}

/// Get the raw preset sources directory.
///
/// Holds the third-party export files plus the per-preset group and
/// activation documents.
pub fn presets_dir() -> PathBuf {
    data_dir().join(PRESETS_SUBDIR)
}

/// Get the derived fragment tree directory.
pub fn extracted_dir() -> PathBuf {
    presets_dir().join(EXTRACTED_SUBDIR)
}

/// Ensure the data directory and all subdirectories exist.
///
/// # Errors
/// Returns an error if any directory cannot be created.
pub fn ensure_all_dirs() -> std::io::Result<()> {
    std::fs::create_dir_all(presets_dir())?;
    std::fs::create_dir_all(extracted_dir())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // These functions read environment variables which can't be isolated
    // in parallel test execution, so the tests verify the path tails
    // rather than full paths.

    #[test]
    fn test_data_dir_tail() {
        let dir = data_dir();
        assert!(dir.is_absolute() || dir.ends_with(".promptdeck"));
    }

    #[test]
    fn test_presets_dir_tail() {
        let dir = presets_dir();
        assert!(dir.ends_with("presets"));
    }

    #[test]
    fn test_extracted_dir_tail() {
        let dir = extracted_dir();
        assert!(dir.ends_with("presets/extracted"));
    }
}
