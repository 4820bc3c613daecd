use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data_models::{DetectionResult, Post, PostId};

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write output file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// `[text, language code, confidence]` for one post.
pub type ResultEntry = (String, String, f64);

/// Detection results keyed by post id, kept sorted by id.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct ResultSet {
    entries: BTreeMap<PostId, ResultEntry>,
}

impl ResultSet {
    pub fn new() -> ResultSet {
        ResultSet::default()
    }

    pub fn record(&mut self, post: Post, detection: DetectionResult) {
        self.entries.insert(
            post.id,
            (post.text, detection.language_code, detection.confidence),
        );
    }

    pub fn get(&self, id: &PostId) -> Option<&ResultEntry> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compact JSON, as sent in the HTTP response.
    pub fn to_json(&self) -> Result<String, WriteError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Indented JSON (three spaces), as stored in the output file.
    pub fn to_pretty_json(&self) -> Result<Vec<u8>, WriteError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"   ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        Ok(buf)
    }

    /// Writes the set to `path`, replacing whatever was there.
    pub async fn write_to(&self, path: impl AsRef<Path>) -> Result<(), WriteError> {
        let path = path.as_ref();
        let bytes = self.to_pretty_json()?;
        tokio::fs::write(path, bytes)
            .await
            .map_err(|source| WriteError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        log::info!("wrote {} results to {}", self.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(code: &str, confidence: f64) -> DetectionResult {
        DetectionResult {
            language_code: code.to_string(),
            confidence,
        }
    }

    #[test]
    fn test_single_entry_json() {
        let mut results = ResultSet::new();
        results.record(Post::new("1", "hello"), detection("en", 0.9));
        assert_eq!(results.to_json().unwrap(), r#"{"1":["hello","en",0.9]}"#);
    }

    #[test]
    fn test_keys_are_sorted_numerically() {
        let mut results = ResultSet::new();
        results.record(Post::new("30", "c"), detection("en", 1.0));
        results.record(Post::new("4", "a"), detection("fr", 0.5));
        results.record(Post::new("200", "b"), detection("de", 0.25));
        assert_eq!(
            results.to_json().unwrap(),
            r#"{"4":["a","fr",0.5],"30":["c","en",1.0],"200":["b","de",0.25]}"#
        );
    }

    #[test]
    fn test_non_ascii_is_kept_literal() {
        let mut results = ResultSet::new();
        results.record(Post::new("1", "grüße 日本"), detection("de", 0.7));
        let json = results.to_json().unwrap();
        assert!(json.contains("grüße 日本"));
        let pretty = String::from_utf8(results.to_pretty_json().unwrap()).unwrap();
        assert!(pretty.contains("grüße 日本"));
    }

    #[test]
    fn test_pretty_json_uses_three_space_indent() {
        let mut results = ResultSet::new();
        results.record(Post::new("1", "hello"), detection("en", 0.9));
        let pretty = String::from_utf8(results.to_pretty_json().unwrap()).unwrap();
        assert!(pretty.starts_with("{\n   \"1\": [\n      \"hello\","));
    }

    #[test]
    fn test_duplicate_id_keeps_latest() {
        let mut results = ResultSet::new();
        results.record(Post::new("1", "old"), detection("en", 0.1));
        results.record(Post::new("1", "new"), detection("es", 0.2));
        assert_eq!(results.len(), 1);
        assert_eq!(
            results.get(&PostId::from("1")),
            Some(&("new".to_string(), "es".to_string(), 0.2))
        );
    }

    #[test]
    fn test_empty_set_is_empty_object() {
        let results = ResultSet::new();
        assert!(results.is_empty());
        assert_eq!(results.to_json().unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_write_to_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        std::fs::write(&path, "previous content that is much longer than the output").unwrap();

        let mut results = ResultSet::new();
        results.record(Post::new("1", "hello"), detection("en", 0.9));
        results.write_to(&path).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: ResultSet = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, results);
    }

    #[tokio::test]
    async fn test_write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.json");
        let err = ResultSet::new().write_to(&path).await.unwrap_err();
        assert!(matches!(err, WriteError::Io { .. }));
        assert!(err.to_string().contains("out.json"));
    }
}
