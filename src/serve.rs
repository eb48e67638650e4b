//! Live HTTP server.
//!
//! A lightweight `tiny_http` server rendering views on request. The topic
//! store is built once at startup and is read-only afterwards; each request
//! is an independent normalize → resolve → render computation over borrowed
//! data, so the sequential accept loop needs no locking and no shared
//! mutable state. A slow client simply holds its one connection.
//!
//! ## Routes
//!
//! - `GET /`: full page, or only the content region when the request
//!   carries `X-Fragment: true`. Query parameters: `q`, `category`.
//! - `GET /robots.txt`: allow-everything policy.
//! - anything else: localized 404 view.
//!
//! The response language comes from `Accept-Language`, falling back to the
//! configured default.

use crate::config::SiteConfig;
use crate::locale::Lang;
use crate::render::{self, RenderContext};
use crate::state;
use crate::store::TopicStore;
use std::net::{IpAddr, SocketAddr};
use thiserror::Error;
use tiny_http::{Header, Request, Response, Server, StatusCode};

/// Try binding to the port, retry with incremented port if in use.
const MAX_PORT_RETRIES: u16 = 10;

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("failed to bind after {attempts} attempts (ports {first}-{last}): {message}")]
    Bind {
        attempts: u16,
        first: u16,
        last: u16,
        message: String,
    },
    #[error("invalid interface address: {0}")]
    Interface(#[from] std::net::AddrParseError),
}

/// Bind and serve until the process is terminated.
pub fn serve(
    store: &TopicStore,
    config: &SiteConfig,
    interface: &str,
    port: u16,
) -> Result<(), ServeError> {
    let interface: IpAddr = interface.parse()?;
    let (server, addr) = try_bind_port(interface, port, MAX_PORT_RETRIES)?;
    tracing::info!(%addr, topics = store.len(), "serving");

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, store, config) {
            tracing::warn!("request error: {e}");
        }
    }
    Ok(())
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(
    interface: IpAddr,
    base_port: u16,
    max_retries: u16,
) -> Result<(Server, SocketAddr), ServeError> {
    let mut last_error = String::new();
    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);
        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    tracing::info!("port {base_port} in use, using {port} instead");
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = e.to_string(),
        }
    }
    Err(ServeError::Bind {
        attempts: max_retries,
        first: base_port,
        last: base_port.saturating_add(max_retries - 1),
        message: last_error,
    })
}

// ============================================================================
// Request Handling
// ============================================================================

fn handle_request(
    request: Request,
    store: &TopicStore,
    config: &SiteConfig,
) -> std::io::Result<()> {
    let url = request.url().to_string();
    let (path, query_string) = split_url(&url);
    let path = strip_base(path, &config.base_path);

    let lang = negotiate_language(&request, config);
    let ctx = RenderContext::new(config, lang);

    match path {
        Some("/") | Some("") => {
            let params = parse_query(query_string);
            let all_label = config.all_label(lang);
            let view = state::resolve(
                store.topics(),
                params.q.as_deref(),
                params.category.as_deref(),
                all_label,
            );
            let query_echo = match &view {
                state::View::SearchResults { query, .. } => query.clone(),
                _ => String::new(),
            };
            let full = render::page(&ctx, &view, &query_echo, params.category.as_deref())
                .into_string();

            tracing::info!(path = request.url(), lang = lang.code(), "GET");
            if wants_fragment(&request) {
                let fragment = render::extract_fragment(&full).unwrap_or(&full).to_string();
                respond_html(request, fragment, 200)
            } else {
                respond_html(request, full, 200)
            }
        }
        Some("/robots.txt") => {
            let response = Response::from_string("User-agent: *\nDisallow:\n").with_header(
                Header::from_bytes("Content-Type", "text/plain; charset=utf-8").unwrap(),
            );
            request.respond(response)
        }
        _ => {
            tracing::info!(path = request.url(), "404");
            respond_html(request, render::not_found_page(&ctx).into_string(), 404)
        }
    }
}

fn respond_html(request: Request, body: String, status: u16) -> std::io::Result<()> {
    let response = Response::from_string(body)
        .with_status_code(StatusCode(status))
        .with_header(Header::from_bytes("Content-Type", "text/html; charset=utf-8").unwrap());
    request.respond(response)
}

/// Split a request URL into path and optional query string.
fn split_url(url: &str) -> (&str, Option<&str>) {
    match url.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (url, None),
    }
}

/// Strip the configured base path. `None` means the request is outside the
/// deployment prefix and gets a 404.
fn strip_base<'a>(path: &'a str, base: &str) -> Option<&'a str> {
    if base.is_empty() {
        return Some(path);
    }
    if path == base {
        return Some("/");
    }
    path.strip_prefix(base)
        .filter(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Decoded `q` / `category` request parameters.
#[derive(Debug, Default, PartialEq)]
pub struct QueryParams {
    pub q: Option<String>,
    pub category: Option<String>,
}

/// Parse the query string, keeping only the parameters the state machine
/// knows. A parameter that fails percent-decoding is logged and treated as
/// absent; the request itself is never aborted over it.
pub fn parse_query(query_string: Option<&str>) -> QueryParams {
    let mut params = QueryParams::default();
    let Some(query_string) = query_string else {
        return params;
    };
    for pair in query_string.split('&') {
        let (key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
        if key != "q" && key != "category" {
            continue;
        }
        // Forms encode spaces as '+' in GET query strings.
        let plus_decoded = raw_value.replace('+', " ");
        let value = match urlencoding::decode(&plus_decoded) {
            Ok(v) => v.into_owned(),
            Err(e) => {
                tracing::warn!("dropping malformed query parameter {key}: {e}");
                continue;
            }
        };
        match key {
            "q" => params.q = Some(value),
            "category" => params.category = Some(value),
            _ => unreachable!(),
        }
    }
    params
}

fn negotiate_language(request: &Request, config: &SiteConfig) -> Lang {
    request
        .headers()
        .iter()
        .find(|h| h.field.equiv("Accept-Language"))
        .and_then(|h| Lang::from_accept_language(h.value.as_str()))
        .unwrap_or(config.language)
}

fn wants_fragment(request: &Request) -> bool {
    fragment_enabled(
        request
            .headers()
            .iter()
            .find(|h| h.field.equiv("X-Fragment"))
            .map(|h| h.value.as_str()),
    )
}

/// `X-Fragment` header values that select a fragment response: "true" in
/// any case, or "1". Anything else, including an absent header, gets the
/// full document.
fn fragment_enabled(value: Option<&str>) -> bool {
    matches!(value, Some(v) if v.eq_ignore_ascii_case("true") || v == "1")
}
