//! Display-name sanitization for on-disk record names.

/// Converts a fragment display name into a filesystem-safe slug.
///
/// Alphanumeric characters, spaces, underscores and dashes are kept;
/// everything else becomes an underscore. The result is trimmed and
/// spaces are collapsed into underscores, so `"My: Prompt"` becomes
/// `"My__Prompt"` and `" Writing Style "` becomes `"Writing_Style"`.
pub fn slugify(name: &str) -> String {
    let safe: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == ' ' || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    safe.trim().replace(' ', "_")
}
