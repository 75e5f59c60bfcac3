//! Registry of publication styles.
//!
//! Populated once at startup and shared read-only afterwards, so lookups
//! need no locking.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::builtin::builtin_styles;
use crate::error::StyleError;
use crate::style::{StyleDefinition, StyleSource, StyleSummary};
use crate::validate::validate_document;

/// Registered style with its origin.
#[derive(Debug)]
struct Entry {
    style: Arc<StyleDefinition>,
    source: StyleSource,
}

/// Ordered set of styles keyed by style key.
///
/// Listing order is registration order. Re-registering a key replaces the
/// definition in place, keeping its original position.
#[derive(Debug, Default)]
pub struct StyleRegistry {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl StyleRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in styles (IEEE, Nature, APA).
    pub fn builtin() -> Result<Self, StyleError> {
        let mut registry = Self::new();
        for style in builtin_styles()? {
            registry.register(style, StyleSource::Builtin);
        }
        Ok(registry)
    }

    /// Register a style, replacing any previous definition with the same key.
    pub fn register(&mut self, style: StyleDefinition, source: StyleSource) {
        let key = style.key.clone();
        let entry = Entry {
            style: Arc::new(style),
            source,
        };

        if let Some(&position) = self.index.get(&key) {
            tracing::warn!(key = %key, ?source, "Style registered twice, replacing previous definition");
            self.entries[position] = entry;
        } else {
            tracing::debug!(key = %key, ?source, "Registered style");
            self.index.insert(key, self.entries.len());
            self.entries.push(entry);
        }
    }

    /// Register every `*.json` style document in `dir`.
    ///
    /// Files are loaded in file-name order and keyed by file stem. Documents
    /// that fail to parse or validate are skipped with a warning. A missing
    /// directory registers nothing.
    ///
    /// Returns the number of styles registered.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, StyleError> {
        let read_dir = match std::fs::read_dir(dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(dir = %dir.display(), "Custom styles directory does not exist");
                return Ok(0);
            }
            Err(e) => {
                return Err(StyleError::Io {
                    path: dir.to_path_buf(),
                    source: e,
                });
            }
        };

        let mut paths: Vec<_> = read_dir
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            match load_style_file(&path) {
                Ok(style) => {
                    self.register(style, StyleSource::Custom);
                    loaded += 1;
                }
                Err(reason) => {
                    tracing::warn!(path = %path.display(), reason = %reason, "Skipping custom style");
                }
            }
        }

        tracing::info!(dir = %dir.display(), count = loaded, "Loaded custom styles");
        Ok(loaded)
    }

    /// Summaries of all styles in registration order.
    pub fn list(&self) -> Vec<StyleSummary> {
        self.entries
            .iter()
            .map(|entry| StyleSummary {
                key: entry.style.key.clone(),
                name: entry.style.name.clone(),
                description: entry.style.description.clone(),
                source: entry.source,
            })
            .collect()
    }

    /// Look up a style by key.
    pub fn get(&self, key: &str) -> Result<Arc<StyleDefinition>, StyleError> {
        self.index
            .get(key)
            .map(|&position| Arc::clone(&self.entries[position].style))
            .ok_or_else(|| StyleError::NotFound(key.to_owned()))
    }

    /// Check whether a key is registered.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Number of registered styles.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no styles are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read, validate and parse a custom style document.
fn load_style_file(path: &Path) -> Result<StyleDefinition, String> {
    let key = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .ok_or("file name is not a valid style key")?
        .to_owned();

    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let document: serde_json::Value = serde_json::from_str(&content).map_err(|e| e.to_string())?;

    let report = validate_document(&document);
    if !report.valid {
        return Err(report.errors.join("; "));
    }

    let mut style: StyleDefinition =
        serde_json::from_value(document).map_err(|e| e.to_string())?;
    style.key = key;
    Ok(style)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const LAB_REPORT: &str = r#"{
        "name": "Lab Report",
        "typography": {"font_family": "Arial", "font_size": "11pt", "line_spacing": 1.15},
        "layout": {"column_count": 1, "page_size": "a4"},
        "citation": {"format": "author_year"}
    }"#;

    fn keys(registry: &StyleRegistry) -> Vec<String> {
        registry.list().into_iter().map(|s| s.key).collect()
    }

    #[test]
    fn test_builtin_registration_order() {
        let registry = StyleRegistry::builtin().unwrap();
        assert_eq!(keys(&registry), vec!["ieee", "nature", "apa"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_get_round_trips_key() {
        let registry = StyleRegistry::builtin().unwrap();
        for summary in registry.list() {
            let style = registry.get(&summary.key).unwrap();
            assert_eq!(style.key, summary.key);
        }
    }

    #[test]
    fn test_get_unknown_is_not_found() {
        let registry = StyleRegistry::builtin().unwrap();
        let err = registry.get("chicago").unwrap_err();
        assert!(matches!(err, StyleError::NotFound(ref key) if key == "chicago"));
        assert!(!registry.contains("chicago"));
        assert!(registry.contains("apa"));
    }

    #[test]
    fn test_duplicate_registration_replaces_in_place() {
        let mut registry = StyleRegistry::builtin().unwrap();
        let mut nature = (*registry.get("nature").unwrap()).clone();
        nature.name = "Nature (house)".to_owned();
        nature.layout.column_count = 2;

        registry.register(nature, StyleSource::Custom);

        assert_eq!(keys(&registry), vec!["ieee", "nature", "apa"]);
        let replaced = registry.get("nature").unwrap();
        assert_eq!(replaced.name, "Nature (house)");
        assert_eq!(replaced.layout.column_count, 2);
        assert_eq!(registry.list()[1].source, StyleSource::Custom);
    }

    #[test]
    fn test_load_dir_sorted_and_keyed_by_stem() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("lab.json"), LAB_REPORT).unwrap();
        std::fs::write(dir.path().join("acm.json"), LAB_REPORT).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut registry = StyleRegistry::builtin().unwrap();
        let loaded = registry.load_dir(dir.path()).unwrap();

        assert_eq!(loaded, 2);
        assert_eq!(keys(&registry), vec!["ieee", "nature", "apa", "acm", "lab"]);
        assert_eq!(registry.get("lab").unwrap().key, "lab");
        assert_eq!(registry.list()[4].source, StyleSource::Custom);
    }

    #[test]
    fn test_load_dir_skips_invalid_documents() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        std::fs::write(dir.path().join("bare.json"), r#"{"name": "Bare"}"#).unwrap();
        std::fs::write(dir.path().join("lab.json"), LAB_REPORT).unwrap();

        let mut registry = StyleRegistry::new();
        let loaded = registry.load_dir(dir.path()).unwrap();

        assert_eq!(loaded, 1);
        assert_eq!(keys(&registry), vec!["lab"]);
    }

    #[test]
    fn test_load_dir_can_override_builtin() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ieee.json"), LAB_REPORT).unwrap();

        let mut registry = StyleRegistry::builtin().unwrap();
        registry.load_dir(dir.path()).unwrap();

        assert_eq!(keys(&registry), vec!["ieee", "nature", "apa"]);
        assert_eq!(registry.get("ieee").unwrap().name, "Lab Report");
    }

    #[test]
    fn test_load_missing_dir_is_empty() {
        let mut registry = StyleRegistry::new();
        let loaded = registry
            .load_dir(Path::new("/nonexistent/pubstyle/styles"))
            .unwrap();
        assert_eq!(loaded, 0);
        assert!(registry.is_empty());
    }
}
