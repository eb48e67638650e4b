//! UI locales and language negotiation.
//!
//! Two locales are supported: English and French. Every user-visible
//! string the core rendering needs lives in a [`Strings`] table so the
//! server templates and the embedded client program (which receives the
//! table as JSON at generation time) always say the same thing, in
//! particular the two empty-state messages, which the state machine
//! keeps distinct.
//!
//! Server mode picks the language from the request's `Accept-Language`
//! header, falling back to the configured default. Static generation uses
//! the configured default only.

use serde::Serialize;

/// Supported UI languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    En,
    Fr,
}

impl Lang {
    /// Pick the first supported language from an `Accept-Language` header.
    ///
    /// Quality weights are ignored; entries are taken in written order,
    /// which is how every mainstream browser orders them anyway. Returns
    /// `None` when no entry matches a supported language.
    pub fn from_accept_language(header: &str) -> Option<Self> {
        for entry in header.split(',') {
            let tag = entry.split(';').next().unwrap_or("").trim();
            let primary = tag.split('-').next().unwrap_or("");
            match primary.to_ascii_lowercase().as_str() {
                "en" => return Some(Self::En),
                "fr" => return Some(Self::Fr),
                _ => {}
            }
        }
        None
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fr => "fr",
        }
    }
}

/// Localized UI strings, one table per language.
#[derive(Debug, Serialize)]
pub struct Strings {
    pub home: &'static str,
    pub categories_heading: &'static str,
    pub search_placeholder: &'static str,
    pub search_button: &'static str,
    pub results_for: &'static str,
    /// Empty state for a category listing. Distinct from `empty_search`.
    pub empty_category: &'static str,
    /// Empty state for search results. Distinct from `empty_category`.
    pub empty_search: &'static str,
    /// Pseudo-category label used in flat mode (config can override).
    pub all_topics: &'static str,
    /// Display label for the default group of uncategorized topics.
    pub uncategorized: &'static str,
    pub topic_one: &'static str,
    pub topic_many: &'static str,
    pub not_found_title: &'static str,
    pub not_found_body: &'static str,
}

const EN: Strings = Strings {
    home: "Home",
    categories_heading: "Categories",
    search_placeholder: "Search topics…",
    search_button: "Search",
    results_for: "Results for",
    empty_category: "This category has no topics yet.",
    empty_search: "No topics match your search.",
    all_topics: "All topics",
    uncategorized: "Uncategorized",
    topic_one: "topic",
    topic_many: "topics",
    not_found_title: "Page not found",
    not_found_body: "The page you requested does not exist.",
};

const FR: Strings = Strings {
    home: "Accueil",
    categories_heading: "Catégories",
    search_placeholder: "Rechercher un sujet…",
    search_button: "Rechercher",
    results_for: "Résultats pour",
    empty_category: "Cette catégorie ne contient aucun sujet.",
    empty_search: "Aucun sujet ne correspond à votre recherche.",
    all_topics: "Tous les sujets",
    uncategorized: "Sans catégorie",
    topic_one: "sujet",
    topic_many: "sujets",
    not_found_title: "Page introuvable",
    not_found_body: "La page demandée n'existe pas.",
};

/// Strings table for a language.
pub fn strings(lang: Lang) -> &'static Strings {
    match lang {
        Lang::En => &EN,
        Lang::Fr => &FR,
    }
}

/// Pluralized topic count, e.g. "1 topic" / "3 sujets".
pub fn topic_count(lang: Lang, count: usize) -> String {
    let s = strings(lang);
    let noun = if count == 1 { s.topic_one } else { s.topic_many };
    format!("{count} {noun}")
}
