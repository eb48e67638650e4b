//! Substring search over the topic store.
//!
//! Deliberately minimal: no tokenization, no ranking, no fuzz. A topic
//! matches when the sanitized, normalized query is a substring of its
//! normalized title, content, or any category/path term. Results keep
//! store order: search is a stable filter, nothing more. The embedded
//! client program implements the identical predicate over the same
//! pre-normalized fields.

use crate::store::Topic;
use crate::text::{normalize, sanitize_query};

/// Filter topics matching the query, in store order.
///
/// The query is sanitized and normalized here; callers pass the raw user
/// input. An empty or whitespace-only query yields an empty result, never
/// an error; the server suppresses the results panel for it, the client
/// shows an empty list.
pub fn search<'a>(query: &str, topics: &'a [Topic]) -> Vec<&'a Topic> {
    let needle = normalize(&sanitize_query(query));
    if needle.is_empty() {
        return Vec::new();
    }
    topics
        .iter()
        .filter(|t| {
            t.norm.title.contains(&needle)
                || t.norm.content.contains(&needle)
                || t.norm.terms.iter().any(|term| term.contains(&needle))
        })
        .collect()
}
