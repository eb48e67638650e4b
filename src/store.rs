//! Topic store and entry validation.
//!
//! The store is built exactly once per run (server startup or static
//! generation) from a single classified source, and is read-only from then
//! on. Request handling and generation both borrow it; nothing mutates it
//! and nothing persists it.
//!
//! ## Validation
//!
//! An entry survives validation when it is structurally an object with a
//! non-empty title. Everything else is silently dropped and counted, so a
//! half-broken source still serves the topics it does have; the skip count
//! surfaces in `check` output and in the startup log, not as an error.
//!
//! ## Category precedence
//!
//! A topic's category is derived at load time, first match wins:
//!
//! 1. an explicit `category` field;
//! 2. the last element of a `path` array (the most specific segment; a
//!    one-element path contributes its single element);
//! 3. absent.
//!
//! Empty and whitespace-only values count as absent at every step, so an
//! uncategorized topic has exactly one representation (`None`) on both
//! rendering surfaces; the payload never carries a `"category": ""`.
//!
//! Tree input gets its category assigned during flattening (parent section
//! title) and goes through the same title validation here.

use crate::source::InputShape;
use crate::text::{normalize, slugify};
use crate::tree;
use serde::Serialize;
use serde_json::Value;

/// A validated content item.
#[derive(Debug, Clone, Serialize)]
pub struct Topic {
    /// Non-empty display title, also the slug source.
    pub title: String,
    /// Trusted HTML fragment, inserted verbatim into output.
    pub content: String,
    /// Derived grouping label, see module docs for precedence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Raw categorizing path; every segment is searchable.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<String>,
    /// Anchor slug derived from the title via [`crate::text::slugify`].
    pub slug: String,
    /// Pre-normalized search fields, computed once at load time.
    pub norm: Norm,
}

/// Normalized search text for one topic.
///
/// Computed by [`crate::text::normalize`] at load time and embedded as-is
/// in the static-site payload, so the client program matches against the
/// exact strings the server does and only ever normalizes the query.
/// Fields are kept separate so a query cannot match across a field
/// boundary.
#[derive(Debug, Clone, Serialize)]
pub struct Norm {
    pub title: String,
    pub content: String,
    /// Normalized category and path segments, one entry per term.
    pub terms: Vec<String>,
}

impl Topic {
    /// Build a topic from validated parts, deriving slug and normalized
    /// search fields.
    pub fn new(
        title: String,
        content: String,
        category: Option<String>,
        path: Vec<String>,
    ) -> Self {
        // Canonical form for "no category" is None, never "".
        let category = category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        let mut terms: Vec<String> = Vec::with_capacity(path.len() + 1);
        if let Some(cat) = &category {
            terms.push(normalize(cat));
        }
        for segment in &path {
            let norm_segment = normalize(segment);
            if !terms.contains(&norm_segment) {
                terms.push(norm_segment);
            }
        }
        Self {
            slug: slugify(&title),
            norm: Norm {
                title: normalize(&title),
                content: normalize(&content),
                terms,
            },
            title,
            content,
            category,
            path,
        }
    }
}

/// Ordered, immutable collection of validated topics.
#[derive(Debug)]
pub struct TopicStore {
    topics: Vec<Topic>,
    skipped: usize,
}

impl TopicStore {
    /// Build the store from a classified source.
    ///
    /// `depth` only applies to document-tree input and overrides the
    /// auto-detected flattening depth.
    pub fn load(shape: InputShape, depth: Option<usize>) -> Self {
        let mut topics = Vec::new();
        let mut skipped = 0usize;

        match shape {
            InputShape::TopicList(entries) => {
                for entry in &entries {
                    match validate_entry(entry) {
                        Some(topic) => topics.push(topic),
                        None => skipped += 1,
                    }
                }
            }
            InputShape::SingleTopic(entry) => match validate_entry(&entry) {
                Some(topic) => topics.push(topic),
                None => skipped += 1,
            },
            InputShape::DocumentTree(root) => {
                for section in tree::flatten(&root, depth) {
                    let title = section.title.trim();
                    if title.is_empty() {
                        skipped += 1;
                        continue;
                    }
                    topics.push(Topic::new(
                        title.to_string(),
                        section.content,
                        section.category,
                        section.path,
                    ));
                }
            }
        }

        Self { topics, skipped }
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// Count of entries dropped during validation.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    #[cfg(test)]
    pub fn from_topics(topics: Vec<Topic>) -> Self {
        Self { topics, skipped: 0 }
    }
}

/// Validate one raw entry into a [`Topic`]. `None` means the entry is
/// dropped (not an object, or missing/empty title).
fn validate_entry(entry: &Value) -> Option<Topic> {
    let map = entry.as_object()?;
    let title = map.get("title")?.as_str()?.trim();
    if title.is_empty() {
        return None;
    }

    let content = map
        .get("content")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let path: Vec<String> = map
        .get("path")
        .and_then(Value::as_array)
        .map(|segments| {
            segments
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    // Explicit category wins over the path-derived one; blank values fall
    // through to the next step.
    let category = map
        .get("category")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .or_else(|| path.last().cloned());

    Some(Topic::new(title.to_string(), content, category, path))
}
