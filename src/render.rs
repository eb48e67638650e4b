//! Server-side HTML rendering.
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating:
//! type-safe templates, automatic XSS escaping, zero runtime template
//! files. Topic bodies and the configured footer are the only verbatim
//! (`PreEscaped`) insertions; both are trusted author input.
//!
//! ## The content region and fragment responses
//!
//! Every full page wraps its variable region between the marker comments
//! [`CONTENT_BEGIN`] and [`CONTENT_END`]. A request carrying the
//! `X-Fragment: true` header gets only that inner region
//! ([`extract_fragment`] excises it from the rendered document), so a
//! client can swap the content area without re-fetching the chrome. The
//! markers are part of the rendering contract; the embedded client
//! program targets the same region by element id.
//!
//! ## Parity
//!
//! The view rendering here and the embedded client program must agree on
//! state selection, item order, counts, and empty-state wording for any
//! (query, category, topic-set) input. Anything rendered from a [`View`]
//! therefore goes through the same [`crate::state::resolve`] the client
//! mirrors.

use crate::config::SiteConfig;
use crate::index::Category;
use crate::locale::{self, Lang, Strings};
use crate::state::View;
use crate::store::Topic;
use maud::{DOCTYPE, Markup, PreEscaped, html};

/// Base stylesheet, embedded at compile time.
pub const CSS: &str = include_str!("../static/style.css");

/// Start marker of the content region in rendered documents.
pub const CONTENT_BEGIN: &str = "<!-- topical:content -->";
/// End marker of the content region.
pub const CONTENT_END: &str = "<!-- /topical:content -->";

/// Everything a render call needs, threaded explicitly; there is no
/// process-wide template or language state.
pub struct RenderContext<'a> {
    pub config: &'a SiteConfig,
    pub lang: Lang,
}

impl<'a> RenderContext<'a> {
    pub fn new(config: &'a SiteConfig, lang: Lang) -> Self {
        Self { config, lang }
    }

    fn strings(&self) -> &'static Strings {
        locale::strings(self.lang)
    }

    fn base(&self) -> &str {
        &self.config.base_path
    }
}

/// Render a full page for a resolved view.
///
/// `query_echo` is the sanitized query redisplayed in the search box;
/// `selected_category` keeps the category selection across searches via a
/// hidden input, so clearing the query falls back to the category.
pub fn page(
    ctx: &RenderContext,
    view: &View,
    query_echo: &str,
    selected_category: Option<&str>,
) -> Markup {
    let content = render_view(ctx, view);
    document(ctx, &ctx.config.title, query_echo, selected_category, content)
}

/// Render the localized 404 page.
pub fn not_found_page(ctx: &RenderContext) -> Markup {
    let s = ctx.strings();
    let content = html! {
        section.error-view {
            h2 { (s.not_found_title) }
            p { (s.not_found_body) }
            p { a href={ (ctx.base()) "/" } { (s.home) } }
        }
    };
    document(ctx, s.not_found_title, "", None, content)
}

/// Excise the content region from a rendered document.
///
/// Returns `None` when the markers are missing, which means the document
/// was not produced by [`page`]; callers fall back to the full document.
pub fn extract_fragment(document: &str) -> Option<&str> {
    let start = document.find(CONTENT_BEGIN)? + CONTENT_BEGIN.len();
    let end = document[start..].find(CONTENT_END)? + start;
    Some(document[start..end].trim())
}

/// Base document structure shared by every server-rendered page.
fn document(
    ctx: &RenderContext,
    title: &str,
    query_echo: &str,
    selected_category: Option<&str>,
    content: Markup,
) -> Markup {
    let s = ctx.strings();
    html! {
        (DOCTYPE)
        html lang=(ctx.lang.code()) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(CSS)) }
            }
            body {
                header.site-header {
                    h1 { a href={ (ctx.base()) "/" } { (ctx.config.title) } }
                    @if !ctx.config.tagline.is_empty() {
                        p.tagline { (ctx.config.tagline) }
                    }
                    form.search-form method="get" action={ (ctx.base()) "/" } {
                        input type="search" name="q" value=(query_echo)
                            placeholder=(s.search_placeholder) aria-label=(s.search_placeholder);
                        @if let Some(cat) = selected_category {
                            input type="hidden" name="category" value=(cat);
                        }
                        button type="submit" { (s.search_button) }
                    }
                }
                main #content {
                    (PreEscaped(CONTENT_BEGIN))
                    (content)
                    (PreEscaped(CONTENT_END))
                }
                (footer(ctx))
            }
        }
    }
}

/// Shared footer: configured markup (verbatim) plus the attribution link.
/// Also used by the static-site shell.
pub(crate) fn footer(ctx: &RenderContext) -> Markup {
    let attribution = &ctx.config.attribution;
    html! {
        footer.site-footer {
            @if !ctx.config.footer.is_empty() {
                div.footer-custom { (PreEscaped(ctx.config.footer.as_str())) }
            }
            @if !attribution.label.is_empty() {
                p.attribution {
                    a href=(attribution.url) rel="noopener" { (attribution.label) }
                }
            }
        }
    }
}

/// Render the inner content region for a resolved view.
pub fn render_view(ctx: &RenderContext, view: &View) -> Markup {
    let s = ctx.strings();
    match view {
        View::CategoriesGrid { categories } => category_grid(ctx, categories),
        View::CategoryDetail {
            name,
            implicit,
            topics,
        } => {
            let display = display_category(s, name, *implicit);
            html! {
                section.category-detail {
                    h2 { (display) }
                    @if !implicit {
                        p.back-link { a href={ (ctx.base()) "/" } { (s.home) } }
                    }
                    @if topics.is_empty() {
                        p.empty-state { (s.empty_category) }
                    } @else {
                        (topic_list(topics))
                    }
                }
            }
        }
        View::SearchResults { query, topics } => html! {
            section.search-results {
                h2 { (s.results_for) " “" (query) "”" }
                p.result-count { (locale::topic_count(ctx.lang, topics.len())) }
                @if topics.is_empty() {
                    p.empty-state { (s.empty_search) }
                } @else {
                    (topic_list(topics))
                }
            }
        },
    }
}

fn category_grid(ctx: &RenderContext, categories: &[Category]) -> Markup {
    let s = ctx.strings();
    html! {
        section.category-grid {
            h2 { (s.categories_heading) }
            ul.grid {
                @for category in categories {
                    li.category-card {
                        a href={ (ctx.base()) "/?category=" (urlencoding::encode(&category.name)) } {
                            span.category-name {
                                (display_category(s, &category.name, false))
                            }
                            span.category-count {
                                (locale::topic_count(ctx.lang, category.count))
                            }
                        }
                    }
                }
            }
        }
    }
}

/// One topic as an anchored section. Content is trusted HTML, verbatim.
fn topic_list(topics: &[&Topic]) -> Markup {
    html! {
        div.topic-list {
            @for topic in topics {
                article.topic id=(topic.slug) {
                    h3 { a href={ "#" (topic.slug) } { (topic.title) } }
                    div.topic-body { (PreEscaped(topic.content.as_str())) }
                }
            }
        }
    }
}

/// Display name for a category: the default group (empty name) gets the
/// localized label; the implicit flat-mode listing keeps its pseudo-label.
fn display_category<'s>(s: &'s Strings, name: &'s str, _implicit: bool) -> &'s str {
    if name.is_empty() { s.uncategorized } else { name }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::state::resolve;
    use crate::store::Topic;

    fn topic(title: &str, category: Option<&str>) -> Topic {
        Topic::new(
            title.to_string(),
            format!("<p>{title} body</p>"),
            category.map(str::to_string),
            Vec::new(),
        )
    }

    fn ctx_with(config: &SiteConfig) -> RenderContext<'_> {
        RenderContext::new(config, Lang::En)
    }

    // =========================================================================
    // Document structure tests
    // =========================================================================

    #[test]
    fn page_includes_doctype_and_markers() {
        let config = SiteConfig::default();
        let ctx = ctx_with(&config);
        let topics = vec![topic("A", Some("Cat"))];
        let view = resolve(&topics, None, None, "All");
        let html = page(&ctx, &view, "", None).into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(CONTENT_BEGIN));
        assert!(html.contains(CONTENT_END));
    }

    #[test]
    fn page_echoes_sanitized_query_in_search_box() {
        let config = SiteConfig::default();
        let ctx = ctx_with(&config);
        let topics = vec![topic("A", Some("Cat"))];
        let view = resolve(&topics, Some("hello"), None, "All");
        let html = page(&ctx, &view, "hello", None).into_string();
        assert!(html.contains(r#"value="hello""#));
    }

    #[test]
    fn page_keeps_category_selection_in_hidden_input() {
        let config = SiteConfig::default();
        let ctx = ctx_with(&config);
        let topics = vec![topic("A", Some("Cat"))];
        let view = resolve(&topics, Some("x"), Some("Cat"), "All");
        let html = page(&ctx, &view, "x", Some("Cat")).into_string();
        assert!(html.contains(r#"type="hidden" name="category" value="Cat""#));
    }

    #[test]
    fn base_path_prefixes_links() {
        let config = SiteConfig {
            base_path: "/faq".to_string(),
            ..SiteConfig::default()
        };
        let ctx = ctx_with(&config);
        let topics = vec![topic("A", Some("Cat"))];
        let view = resolve(&topics, None, None, "All");
        let html = page(&ctx, &view, "", None).into_string();
        assert!(html.contains(r#"href="/faq/?category=Cat""#));
        assert!(html.contains(r#"action="/faq/""#));
    }

    #[test]
    fn footer_and_attribution_rendered() {
        let config = SiteConfig {
            footer: "<b>custom</b>".to_string(),
            attribution: crate::config::Attribution {
                label: "Data source".to_string(),
                url: "https://example.org/data".to_string(),
            },
            ..SiteConfig::default()
        };
        let ctx = ctx_with(&config);
        let topics = vec![topic("A", Some("Cat"))];
        let view = resolve(&topics, None, None, "All");
        let html = page(&ctx, &view, "", None).into_string();
        // Footer markup is verbatim, attribution is a link.
        assert!(html.contains("<b>custom</b>"));
        assert!(html.contains(r#"href="https://example.org/data""#));
        assert!(html.contains("Data source"));
    }

    // =========================================================================
    // View rendering tests
    // =========================================================================

    #[test]
    fn grid_shows_categories_with_counts() {
        let config = SiteConfig::default();
        let ctx = ctx_with(&config);
        let topics = vec![
            topic("A", Some("Cat1")),
            topic("B", Some("Cat1")),
            topic("C", Some("Cat2")),
        ];
        let view = resolve(&topics, None, None, "All");
        let html = render_view(&ctx, &view).into_string();
        assert!(html.contains("Cat1"));
        assert!(html.contains("2 topics"));
        assert!(html.contains("1 topic"));
    }

    #[test]
    fn detail_lists_topics_with_anchors() {
        let config = SiteConfig::default();
        let ctx = ctx_with(&config);
        let topics = vec![topic("Crème Brûlée", Some("Cat1"))];
        let view = resolve(&topics, None, Some("Cat1"), "All");
        let html = render_view(&ctx, &view).into_string();
        assert!(html.contains(r#"id="creme-brulee""#));
        assert!(html.contains(r##"href="#creme-brulee""##));
        // Topic body is verbatim HTML.
        assert!(html.contains("<p>Crème Brûlée body</p>"));
    }

    #[test]
    fn empty_category_uses_category_empty_state() {
        let config = SiteConfig::default();
        let ctx = ctx_with(&config);
        let topics = vec![topic("A", Some("Cat1"))];
        let view = resolve(&topics, None, Some("Nope"), "All");
        let html = render_view(&ctx, &view).into_string();
        let s = locale::strings(Lang::En);
        assert!(html.contains(s.empty_category));
        assert!(!html.contains(s.empty_search));
    }

    #[test]
    fn empty_search_uses_search_empty_state() {
        let config = SiteConfig::default();
        let ctx = ctx_with(&config);
        let topics = vec![topic("A", Some("Cat1"))];
        let view = resolve(&topics, Some("zebra"), None, "All");
        let html = render_view(&ctx, &view).into_string();
        let s = locale::strings(Lang::En);
        assert!(html.contains(s.empty_search));
        assert!(!html.contains(s.empty_category));
    }

    #[test]
    fn default_group_displays_localized_label() {
        let config = SiteConfig::default();
        let ctx = ctx_with(&config);
        let topics = vec![topic("A", Some("Real")), topic("B", None)];
        let view = resolve(&topics, None, None, "All");
        let html = render_view(&ctx, &view).into_string();
        assert!(html.contains("Uncategorized"));
    }

    #[test]
    fn french_locale_renders_french_strings() {
        let config = SiteConfig::default();
        let ctx = RenderContext::new(&config, Lang::Fr);
        let topics = vec![topic("A", Some("Cat1"))];
        let view = resolve(&topics, Some("zebra"), None, "All");
        let html = render_view(&ctx, &view).into_string();
        assert!(html.contains("Aucun sujet ne correspond à votre recherche."));
    }

    // =========================================================================
    // Fragment extraction tests
    // =========================================================================

    #[test]
    fn extract_fragment_returns_inner_region() {
        let config = SiteConfig::default();
        let ctx = ctx_with(&config);
        let topics = vec![topic("Alpha", Some("Cat1"))];
        let view = resolve(&topics, None, Some("Cat1"), "All");
        let full = page(&ctx, &view, "", Some("Cat1")).into_string();
        let fragment = extract_fragment(&full).unwrap();
        assert!(fragment.contains("Alpha"));
        assert!(!fragment.contains("<!DOCTYPE html>"));
        assert!(!fragment.contains("site-header"));
    }

    #[test]
    fn extract_fragment_without_markers_is_none() {
        assert!(extract_fragment("<html><body>plain</body></html>").is_none());
    }

    #[test]
    fn not_found_page_is_localized() {
        let config = SiteConfig::default();
        let ctx = RenderContext::new(&config, Lang::Fr);
        let html = not_found_page(&ctx).into_string();
        assert!(html.contains("Page introuvable"));
    }

    #[test]
    fn maud_escapes_untrusted_interpolation() {
        let config = SiteConfig::default();
        let ctx = ctx_with(&config);
        let topics = vec![topic("A", Some("<script>x</script>"))];
        let view = resolve(&topics, None, None, "All");
        let html = render_view(&ctx, &view).into_string();
        assert!(!html.contains("<script>x</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
