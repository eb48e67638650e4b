//! Category index derivation.
//!
//! Categories are not stored anywhere; they are recomputed from the topic
//! store whenever a view needs them, so counts can never drift from the
//! topics themselves.
//!
//! ## Flat mode
//!
//! When **no** topic in the store carries a category, navigation by
//! category is meaningless: the index collapses to a single pseudo-category
//! (the configurable "all topics" label) whose count is the whole store.
//! Both rendering surfaces run this detection before showing the grid or
//! computing counts, and both skip the grid entirely in that case.
//!
//! In mixed mode, topics lacking a category form their own default group
//! keyed by the empty string (which sorts first); they are never merged
//! into a populated category. The renderer gives that group a localized
//! display label.

use crate::store::Topic;
use std::collections::BTreeMap;

/// A category label with its topic count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Grouping key. Empty string is the default group for uncategorized
    /// topics in mixed mode; in flat mode the single entry carries the
    /// pseudo-category label instead.
    pub name: String,
    pub count: usize,
}

/// True when no topic in the store has a category.
pub fn flat_mode(topics: &[Topic]) -> bool {
    topics.iter().all(|t| t.category.is_none())
}

/// Derive the ordered category set.
///
/// Sorted lexicographically by name; each count is the exact number of
/// topics whose derived category equals that name. `all_label` names the
/// pseudo-category used in flat mode.
pub fn categories(topics: &[Topic], all_label: &str) -> Vec<Category> {
    if flat_mode(topics) {
        return vec![Category {
            name: all_label.to_string(),
            count: topics.len(),
        }];
    }

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for topic in topics {
        *counts
            .entry(topic.category.as_deref().unwrap_or(""))
            .or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(name, count)| Category {
            name: name.to_string(),
            count,
        })
        .collect()
}

/// Topics whose derived category equals `name` (empty string selects the
/// default group), in store order.
pub fn topics_in<'a>(topics: &'a [Topic], name: &str) -> Vec<&'a Topic> {
    topics
        .iter()
        .filter(|t| t.category.as_deref().unwrap_or("") == name)
        .collect()
}
