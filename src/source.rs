//! Source acquisition and input-format dispatch.
//!
//! A topic source is a single document: a local file or a remote URL, in
//! JSON or YAML. This module fetches the bytes, parses them into one common
//! in-memory representation (`serde_json::Value`; YAML is transcoded into
//! it), and classifies the top-level shape into a closed union so the rest
//! of the pipeline never branches on raw structure:
//!
//! - [`InputShape::TopicList`]: a flat array of topic objects
//! - [`InputShape::SingleTopic`]: one topic object, treated as a one-element list
//! - [`InputShape::DocumentTree`]: a hierarchical document (root object
//!   tagged `"type": "document"`), lowered by [`crate::tree`]
//!
//! ## Format selection
//!
//! The parser is chosen by file extension (`.yaml`/`.yml` → YAML, anything
//! else → JSON) unless forced with `--format`. Remote sources are fetched
//! with a plain blocking GET; any non-success status is fatal, there are
//! no retries.

use serde_json::Value;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("fetch error for {url}: {source}")]
    Fetch {
        url: String,
        source: reqwest::Error,
    },
    #[error("HTTP {status} fetching {url}")]
    HttpStatus { url: String, status: u16 },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
    #[error("source must be a list of topics, a single topic, or a document tree")]
    InvalidShape,
}

/// Input serialization format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SourceFormat {
    Json,
    Yaml,
}

impl SourceFormat {
    /// Detect the format from a path or URL extension. JSON is the fallback
    /// for unknown or missing extensions.
    pub fn detect(source: &str) -> Self {
        // Query strings on URLs would confuse Path::extension
        let trimmed = source.split(['?', '#']).next().unwrap_or(source);
        match Path::new(trimmed).extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// Top-level shape of a parsed source, decided by [`classify`].
#[derive(Debug)]
pub enum InputShape {
    TopicList(Vec<Value>),
    SingleTopic(Value),
    DocumentTree(Value),
}

/// Read a source into a string. `http://` and `https://` sources are
/// fetched over the network; everything else is a local path.
pub fn fetch(source: &str) -> Result<String, LoadError> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let response = reqwest::blocking::get(source).map_err(|e| LoadError::Fetch {
            url: source.to_string(),
            source: e,
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::HttpStatus {
                url: source.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().map_err(|e| LoadError::Fetch {
            url: source.to_string(),
            source: e,
        })
    } else {
        std::fs::read_to_string(source).map_err(|e| LoadError::Io {
            path: source.to_string(),
            source: e,
        })
    }
}

/// Parse raw text in the given format into a common `Value`.
pub fn parse(raw: &str, format: SourceFormat) -> Result<Value, LoadError> {
    match format {
        SourceFormat::Json => Ok(serde_json::from_str(raw)?),
        SourceFormat::Yaml => Ok(serde_yaml_ng::from_str(raw)?),
    }
}

/// Classify a parsed value into the closed [`InputShape`] union.
///
/// A document tree is an object whose `type` field is `"document"`; any
/// other object is a single topic; an array is a topic list. Everything
/// else is a shape error.
pub fn classify(value: Value) -> Result<InputShape, LoadError> {
    match value {
        Value::Array(entries) => Ok(InputShape::TopicList(entries)),
        Value::Object(ref map) => {
            if map.get("type").and_then(Value::as_str) == Some("document") {
                Ok(InputShape::DocumentTree(value))
            } else {
                Ok(InputShape::SingleTopic(value))
            }
        }
        _ => Err(LoadError::InvalidShape),
    }
}

/// Fetch, parse, and classify a source in one step.
pub fn load(source: &str, format: Option<SourceFormat>) -> Result<InputShape, LoadError> {
    let format = format.unwrap_or_else(|| SourceFormat::detect(source));
    let raw = fetch(source)?;
    let value = parse(&raw, format)?;
    classify(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // =========================================================================
    // SourceFormat::detect() tests
    // =========================================================================

    #[test]
    fn detect_yaml_extensions() {
        assert_eq!(SourceFormat::detect("topics.yaml"), SourceFormat::Yaml);
        assert_eq!(SourceFormat::detect("topics.yml"), SourceFormat::Yaml);
        assert_eq!(SourceFormat::detect("dir/TOPICS.YAML"), SourceFormat::Yaml);
    }

    #[test]
    fn detect_defaults_to_json() {
        assert_eq!(SourceFormat::detect("topics.json"), SourceFormat::Json);
        assert_eq!(SourceFormat::detect("topics.txt"), SourceFormat::Json);
        assert_eq!(SourceFormat::detect("topics"), SourceFormat::Json);
    }

    #[test]
    fn detect_ignores_url_query() {
        assert_eq!(
            SourceFormat::detect("https://example.org/faq.yaml?v=2"),
            SourceFormat::Yaml
        );
    }

    // =========================================================================
    // parse() tests
    // =========================================================================

    #[test]
    fn parse_json_list() {
        let value = parse(r#"[{"title":"A"}]"#, SourceFormat::Json).unwrap();
        assert!(value.is_array());
    }

    #[test]
    fn parse_yaml_list() {
        let value = parse("- title: A\n  content: hi\n", SourceFormat::Yaml).unwrap();
        assert_eq!(value[0]["title"], json!("A"));
    }

    #[test]
    fn parse_invalid_json_is_error() {
        assert!(matches!(
            parse("{not json", SourceFormat::Json),
            Err(LoadError::Json(_))
        ));
    }

    // =========================================================================
    // classify() tests
    // =========================================================================

    #[test]
    fn classify_array_is_topic_list() {
        let shape = classify(json!([{"title": "A"}, {"title": "B"}])).unwrap();
        assert!(matches!(shape, InputShape::TopicList(entries) if entries.len() == 2));
    }

    #[test]
    fn classify_object_is_single_topic() {
        let shape = classify(json!({"title": "A"})).unwrap();
        assert!(matches!(shape, InputShape::SingleTopic(_)));
    }

    #[test]
    fn classify_tagged_root_is_tree() {
        let shape = classify(json!({"type": "document", "children": []})).unwrap();
        assert!(matches!(shape, InputShape::DocumentTree(_)));
    }

    #[test]
    fn classify_scalar_is_shape_error() {
        assert!(matches!(classify(json!(42)), Err(LoadError::InvalidShape)));
        assert!(matches!(
            classify(json!("text")),
            Err(LoadError::InvalidShape)
        ));
    }

    // =========================================================================
    // fetch() tests (local only; network fetches are not exercised here)
    // =========================================================================

    #[test]
    fn fetch_local_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("topics.json");
        std::fs::write(&path, r#"[{"title":"A"}]"#).unwrap();
        assert_eq!(fetch(path.to_str().unwrap()).unwrap(), r#"[{"title":"A"}]"#);
    }

    #[test]
    fn fetch_missing_file_is_io_error() {
        assert!(matches!(
            fetch("/no/such/file.json"),
            Err(LoadError::Io { .. })
        ));
    }
}
