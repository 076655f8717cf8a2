//! Extraction of preset export files into the derived fragment tree.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use promptdeck_models::Fragment;
use promptdeck_persistence::FragmentStore;
use tracing::{debug, error, info, warn};

use crate::error::{ExtractError, Result};
use crate::export::{resolve_order, ExportFile, RawPrompt};

/// Identifier that marks the prefix boundary: everything ordered strictly
/// before the first occurrence belongs to the merged prefix block, the
/// marker itself and everything after belongs to the body.
pub const PREFIX_BOUNDARY: &str = "personaDescription";

/// Counts returned by a full extraction run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    /// Presets that yielded at least one body fragment.
    pub preset_count: usize,
    /// Body fragments written across all presets.
    pub fragment_count: usize,
}

/// Extracts prompt fragments from third-party export files.
///
/// Each `*.json` file in the sources directory becomes one preset named
/// after the file stem; its fragments land in the derived tree as one
/// record per body fragment plus one merged prefix record.
pub struct Extractor {
    sources_dir: PathBuf,
    store: FragmentStore,
}

impl Extractor {
    /// Creates a new Extractor reading from `sources_dir` and writing the
    /// derived tree under `output_dir`.
    pub fn new(sources_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            sources_dir: sources_dir.into(),
            store: FragmentStore::new(output_dir),
        }
    }

    /// Extracts every export file in the sources directory.
    ///
    /// An unreadable or unparseable file is skipped with an error log and
    /// its siblings are still processed. A missing or empty sources
    /// directory is not an error; the summary is simply zero.
    pub fn extract_all(&self) -> Result<ExtractSummary> {
        if !self.sources_dir.exists() {
            warn!(path = %self.sources_dir.display(), "sources directory does not exist");
            return Ok(ExtractSummary::default());
        }

        let mut files = Vec::new();
        let entries =
            fs::read_dir(&self.sources_dir).map_err(|source| ExtractError::Io {
                path: self.sources_dir.clone(),
                source,
            })?;
        for entry in entries {
            let entry = entry.map_err(|source| ExtractError::Io {
                path: self.sources_dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();

        let mut summary = ExtractSummary::default();
        for path in files {
            let preset = match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) => stem.to_string(),
                None => continue,
            };

            match self.extract_file(&path) {
                Ok((body, prefix)) => {
                    if body.is_empty() {
                        info!(file = %path.display(), "no usable fragments in export file");
                        continue;
                    }

                    for fragment in &body {
                        self.store.save_fragment(&preset, fragment)?;
                    }
                    if !prefix.is_empty() {
                        let merged = merge_prefix(&prefix);
                        self.store
                            .save_prefix(&preset, &Fragment::prefix_block(merged))?;
                    }

                    info!(
                        preset = %preset,
                        fragments = body.len(),
                        prefix_fragments = prefix.len(),
                        "extracted preset"
                    );
                    summary.preset_count += 1;
                    summary.fragment_count += body.len();
                }
                Err(e) => {
                    error!(file = %path.display(), error = %e, "skipping export file");
                }
            }
        }

        Ok(summary)
    }

    /// Extracts one export file into `(body, prefix)` fragment lists, both
    /// in final order.
    pub fn extract_file(&self, path: &Path) -> Result<(Vec<Fragment>, Vec<Fragment>)> {
        let data = fs::read_to_string(path).map_err(|source| ExtractError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let export: ExportFile =
            serde_json::from_str(&data).map_err(|source| ExtractError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let prompts: Vec<RawPrompt> = export
            .prompts
            .iter()
            .filter_map(RawPrompt::from_value)
            .collect();

        let order: Vec<String> = resolve_order(&export.prompt_order)
            .into_iter()
            .map(|entry| entry.identifier)
            .collect();
        if order.is_empty() {
            debug!(file = %path.display(), "no usable order section, keeping file order");
        }

        let ordered = sequence(&prompts, &order);

        let boundary = ordered
            .iter()
            .position(|p| p.identifier == PREFIX_BOUNDARY);

        let mut body = Vec::new();
        let mut prefix = Vec::new();
        for (i, prompt) in ordered.iter().enumerate() {
            let (Some(name), Some(content)) = (&prompt.name, &prompt.content) else {
                warn!(identifier = %prompt.identifier, "prompt record missing name or content");
                continue;
            };
            if content.trim().is_empty() {
                continue;
            }

            let mut fragment = Fragment::extracted(name, content, &prompt.identifier);
            match boundary {
                Some(b) if i < b => {
                    fragment.is_prefix = true;
                    debug!(name = %name, "marking fragment as prefix");
                    prefix.push(fragment);
                }
                _ => body.push(fragment),
            }
        }

        Ok((body, prefix))
    }
}

/// Builds the full ordered sequence: prompts named by the chosen order
/// first (in that order), then prompts omitted from the order in file
/// order. With no order, file order is kept as-is.
///
/// When an identifier occurs more than once in the prompt list, the last
/// record wins the ordered slot.
fn sequence(prompts: &[RawPrompt], order: &[String]) -> Vec<RawPrompt> {
    if order.is_empty() {
        return prompts.to_vec();
    }

    let mut by_identifier: HashMap<&str, &RawPrompt> = HashMap::new();
    for prompt in prompts {
        by_identifier.insert(prompt.identifier.as_str(), prompt);
    }
    let ordered_ids: HashSet<&str> = order.iter().map(String::as_str).collect();

    let mut result = Vec::new();
    for identifier in order {
        if let Some(prompt) = by_identifier.get(identifier.as_str()) {
            result.push((*prompt).clone());
        }
    }
    for prompt in prompts {
        if !ordered_ids.contains(prompt.identifier.as_str()) {
            result.push(prompt.clone());
        }
    }

    result
}

/// Merges prefix fragments into one block: each fragment's trimmed content
/// preceded by a provenance header, blocks separated by a blank line.
fn merge_prefix(fragments: &[Fragment]) -> String {
    let blocks: Vec<String> = fragments
        .iter()
        .map(|f| {
            format!(
                "<!-- {} (identifier: {}) -->\n{}",
                f.name,
                f.identifier,
                f.content.trim()
            )
        })
        .collect();
    blocks.join("\n\n").trim().to_string()
}
