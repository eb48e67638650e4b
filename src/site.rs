//! Static-site generation.
//!
//! Emits a single self-contained HTML document: inline styles, the whole
//! topic store as a JSON payload, and an embedded browsing program that
//! reimplements the normalize/search/category/state pipeline against that
//! payload. One file, no server, works from `file://`.
//!
//! ## Parity by construction
//!
//! The embedded program (`static/app.js`) carries `__PLACEHOLDER__` tokens
//! that are substituted here with JSON rendered from the server's own
//! constants: the diacritics table, the punctuation set, the localized
//! strings, and the pseudo-category label. The payload additionally ships the
//! pre-normalized search fields and slugs computed by [`crate::text`], so
//! the client only ever normalizes the query. What remains hand-ported
//! (the matching predicate, the state machine) is pinned by the
//! conformance tests in `tests/parity.rs`.
//!
//! ## No-script fallback
//!
//! The document body contains a `<noscript>` region rendering every topic
//! as a static section grouped by category, so the content is readable
//! without script execution; search and navigation just stay inert.

use crate::config::SiteConfig;
use crate::index;
use crate::locale::{self, Lang};
use crate::render::{self, RenderContext};
use crate::store::TopicStore;
use crate::text;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Embedded browsing program, placeholders substituted at generation time.
const APP_JS: &str = include_str!("../static/app.js");

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Generate the site and write it to `output`.
pub fn generate(store: &TopicStore, config: &SiteConfig, output: &Path) -> Result<(), SiteError> {
    let html = render_site(store, config)?;
    fs::write(output, html)?;
    println!("Site generated at {}", output.display());
    Ok(())
}

/// Render the complete single-file site. Pure with respect to the
/// filesystem; `generate` adds the write.
pub fn render_site(store: &TopicStore, config: &SiteConfig) -> Result<String, SiteError> {
    let lang = config.language;
    let ctx = RenderContext::new(config, lang);
    let s = locale::strings(lang);
    let all_label = config.all_label(lang);

    let payload = embed_json(&serde_json::to_string(
        &serde_json::json!({ "topics": store.topics() }),
    )?);
    let program = instantiate_program(lang, all_label)?;

    let doc = html! {
        (DOCTYPE)
        html lang=(lang.code()) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (config.title) }
                style { (PreEscaped(render::CSS)) }
                @if !config.custom_css.is_empty() {
                    link rel="stylesheet" href=(config.custom_css);
                }
            }
            body {
                header.site-header {
                    h1 { a #home href="#" { (config.title) } }
                    @if !config.tagline.is_empty() {
                        p.tagline { (config.tagline) }
                    }
                    div.search-form {
                        input #search type="search"
                            placeholder=(s.search_placeholder)
                            aria-label=(s.search_placeholder);
                    }
                }
                main #content {
                    div #app {}
                    noscript { (noscript_fallback(store, all_label, s.uncategorized)) }
                }
                (render::footer(&ctx))
                script #topical-data type="application/json" { (PreEscaped(payload)) }
                script { (PreEscaped(program)) }
            }
        }
    };
    Ok(doc.into_string())
}

/// Substitute the program's placeholders with JSON built from the same
/// constants the server uses.
fn instantiate_program(lang: Lang, all_label: &str) -> Result<String, SiteError> {
    let diacritics: serde_json::Map<String, serde_json::Value> = text::DIACRITICS
        .iter()
        .map(|(from, to)| (from.to_string(), serde_json::Value::from(*to)))
        .collect();
    let punctuation: Vec<String> = text::PUNCTUATION.iter().map(char::to_string).collect();

    Ok(APP_JS
        .replace(
            "__DIACRITICS__",
            &serde_json::to_string(&diacritics)?,
        )
        .replace("__PUNCTUATION__", &serde_json::to_string(&punctuation)?)
        .replace("__STRINGS__", &serde_json::to_string(locale::strings(lang))?)
        .replace("__ALL_LABEL__", &serde_json::to_string(all_label)?))
}

/// Escape `</` so topic content can never terminate the payload's script
/// element. `<\/` is a valid JSON escape for the same two characters.
fn embed_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

/// Static rendering of every topic, grouped by category, for clients
/// without script execution.
fn noscript_fallback(store: &TopicStore, all_label: &str, uncategorized: &str) -> Markup {
    let topics = store.topics();
    let groups = index::categories(topics, all_label);
    let flat = index::flat_mode(topics);
    html! {
        @for group in &groups {
            section.category-detail {
                h2 {
                    @if group.name.is_empty() { (uncategorized) } @else { (group.name) }
                }
                div.topic-list {
                    @for topic in topics {
                        @if flat || topic.category.as_deref().unwrap_or("") == group.name {
                            article.topic id=(topic.slug) {
                                h3 { (topic.title) }
                                div.topic-body { (PreEscaped(topic.content.as_str())) }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Topic;

    fn store_with(topics: Vec<Topic>) -> TopicStore {
        TopicStore::from_topics(topics)
    }

    fn topic(title: &str, category: Option<&str>) -> Topic {
        Topic::new(
            title.to_string(),
            format!("<p>{title} body</p>"),
            category.map(str::to_string),
            Vec::new(),
        )
    }

    #[test]
    fn site_is_single_document_with_payload_and_program() {
        let store = store_with(vec![topic("Alpha", Some("Cat1"))]);
        let config = SiteConfig::default();
        let html = render_site(&store, &config).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"id="topical-data""#));
        assert!(html.contains(r#""norm""#));
        // All placeholders substituted.
        assert!(!html.contains("__DIACRITICS__"));
        assert!(!html.contains("__PUNCTUATION__"));
        assert!(!html.contains("__STRINGS__"));
        assert!(!html.contains("__ALL_LABEL__"));
    }

    #[test]
    fn custom_css_adds_stylesheet_link() {
        let store = store_with(vec![topic("A", None)]);
        let config = SiteConfig {
            custom_css: "extra.css".to_string(),
            ..SiteConfig::default()
        };
        let html = render_site(&store, &config).unwrap();
        assert!(html.contains(r#"link rel="stylesheet" href="extra.css""#));
    }

    #[test]
    fn no_custom_css_means_no_link() {
        let store = store_with(vec![topic("A", None)]);
        let config = SiteConfig::default();
        let html = render_site(&store, &config).unwrap();
        assert!(!html.contains("rel=\"stylesheet\""));
    }

    #[test]
    fn noscript_renders_all_topics_grouped() {
        let store = store_with(vec![
            topic("Alpha", Some("Cat1")),
            topic("Beta", Some("Cat2")),
        ]);
        let config = SiteConfig::default();
        let html = render_site(&store, &config).unwrap();
        let noscript_start = html.find("<noscript>").unwrap();
        let noscript_end = html.find("</noscript>").unwrap();
        let noscript = &html[noscript_start..noscript_end];
        assert!(noscript.contains("Alpha"));
        assert!(noscript.contains("Beta"));
        assert!(noscript.contains("Cat1"));
        assert!(noscript.contains("Cat2"));
    }

    #[test]
    fn noscript_flat_mode_single_group() {
        let store = store_with(vec![topic("One", None), topic("Two", None)]);
        let config = SiteConfig::default();
        let html = render_site(&store, &config).unwrap();
        let noscript_start = html.find("<noscript>").unwrap();
        let noscript_end = html.find("</noscript>").unwrap();
        let noscript = &html[noscript_start..noscript_end];
        assert!(noscript.contains("All topics"));
        assert!(noscript.contains("One"));
        assert!(noscript.contains("Two"));
    }

    #[test]
    fn payload_cannot_break_out_of_script_element() {
        let store = store_with(vec![Topic::new(
            "Sneaky".to_string(),
            "<p>end</p></script><script>alert(1)</script>".to_string(),
            None,
            Vec::new(),
        )]);
        let config = SiteConfig::default();
        let html = render_site(&store, &config).unwrap();
        let payload_start = html.find(r#"id="topical-data""#).unwrap();
        let payload = &html[payload_start..];
        let inner_end = payload.find("</script>").unwrap();
        let inner = &payload[..inner_end];
        // The content's closing tag was escaped, so the first real
        // terminator belongs to the payload element itself.
        assert!(inner.contains("<\\/script>"));
    }

    #[test]
    fn french_site_embeds_french_strings() {
        let store = store_with(vec![topic("A", None)]);
        let config = SiteConfig {
            language: Lang::Fr,
            ..SiteConfig::default()
        };
        let html = render_site(&store, &config).unwrap();
        assert!(html.contains("Aucun sujet ne correspond"));
        assert!(html.contains(r#"lang="fr""#));
    }

    #[test]
    fn generate_writes_output_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let out = dir.path().join("site.html");
        let store = store_with(vec![topic("A", None)]);
        let config = SiteConfig::default();
        generate(&store, &config, &out).unwrap();
        let written = std::fs::read_to_string(&out).unwrap();
        assert!(written.contains("topical-data"));
    }
}
