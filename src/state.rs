//! Render state resolution.
//!
//! Every view (an HTTP request on the server, a navigation event in the
//! embedded client) is resolved from scratch into one of three states.
//! Nothing is persisted between views; the state machine is a pure function
//! of (query, category, store).
//!
//! ## Transition rules
//!
//! - a non-empty sanitized query always wins over a selected category;
//! - clearing the query falls back to whichever category is selected;
//! - selecting "home" clears both and shows the grid;
//! - flat mode (no topic has a category) skips the grid entirely and
//!   collapses to listing every topic under the implicit universal
//!   pseudo-category.
//!
//! `CategoryDetail` and `SearchResults` carry distinct localized
//! empty-state messages downstream; the renderers must never conflate
//! them.

use crate::index::{self, Category};
use crate::search;
use crate::store::Topic;
use crate::text::sanitize_query;

/// The resolved view for one request or navigation event.
#[derive(Debug)]
pub enum View<'a> {
    /// Home: one tile per category.
    CategoriesGrid { categories: Vec<Category> },
    /// Topics of one selected category.
    CategoryDetail {
        /// Display name. The empty string is the default group of
        /// uncategorized topics in mixed mode.
        name: String,
        /// True when flat mode collapsed the grid into this listing; the
        /// name is then the universal pseudo-category label.
        implicit: bool,
        topics: Vec<&'a Topic>,
    },
    /// Search results for a sanitized query.
    SearchResults {
        /// Sanitized query, safe to echo back into the page.
        query: String,
        topics: Vec<&'a Topic>,
    },
}

/// Resolve the view for the given request parameters.
///
/// `query` and `category` are the raw request values (absent parameter =
/// `None`); `all_label` is the pseudo-category label for flat mode.
pub fn resolve<'a>(
    topics: &'a [Topic],
    query: Option<&str>,
    category: Option<&str>,
    all_label: &str,
) -> View<'a> {
    if let Some(raw) = query {
        let sanitized = sanitize_query(raw);
        if !sanitized.is_empty() {
            return View::SearchResults {
                topics: search::search(raw, topics),
                query: sanitized,
            };
        }
    }

    if let Some(name) = category {
        return View::CategoryDetail {
            name: name.to_string(),
            implicit: false,
            topics: index::topics_in(topics, name),
        };
    }

    if index::flat_mode(topics) {
        return View::CategoryDetail {
            name: all_label.to_string(),
            implicit: true,
            topics: topics.iter().collect(),
        };
    }

    View::CategoriesGrid {
        categories: index::categories(topics, all_label),
    }
}
