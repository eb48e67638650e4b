//! # Topical
//!
//! A minimal topic browser. One JSON/YAML source of titled HTML snippets
//! ("topics") becomes either a live site or a single self-contained HTML
//! file, with the same navigation, search, and behavior in both.
//!
//! # Architecture: One Store, Two Surfaces
//!
//! Everything is built around a topic store loaded exactly once per run:
//!
//! ```text
//! source (file/URL, JSON/YAML/tree) → TopicStore → ┬─ serve  (per-request rendering)
//!                                                  └─ build  (single-file static site)
//! ```
//!
//! The store is immutable after loading. Server mode resolves each request
//! into a view and renders it with maud; build mode embeds the store as a
//! JSON payload plus a client-side program that reimplements the same
//! resolution pipeline in the visitor's browser.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`text`] | Normalization, query sanitization, slugs: the shared tables both surfaces fold with |
//! | [`source`] | Fetching (file or HTTP), JSON/YAML parsing, input-shape classification |
//! | [`tree`] | Document-tree lowering into flat topics at a target depth |
//! | [`store`] | Validated, ordered, immutable topic collection |
//! | [`index`] | Category derivation, counts, flat-mode detection |
//! | [`search`] | Substring search (stable filter, no ranking) |
//! | [`state`] | The grid / category / search-results state machine |
//! | [`locale`] | English/French UI strings, `Accept-Language` negotiation |
//! | [`render`] | Server-side maud templates, content-region fragment contract |
//! | [`serve`] | tiny_http request loop |
//! | [`site`] | Single-file static-site generation with embedded program |
//! | [`config`] | `config.toml` loading and validation |
//!
//! # Design Decisions
//!
//! ## Dual Rendering Without Drift
//!
//! The server and the embedded client program must behave identically for
//! the same (query, category, topic-set) input. Three mechanisms keep them
//! honest: the client receives pre-normalized search text computed by the
//! server-side normalizer; its folding tables and UI strings are stamped
//! from the Rust constants at generation time; and `tests/parity.rs` pins
//! the hand-ported parts against the generated output.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/): compile-time
//! checked templates, auto-escaped interpolation, no runtime template
//! files. Topic bodies are the deliberate exception: they are trusted
//! author HTML and pass through verbatim on both surfaces.
//!
//! ## Explicit Configuration Threading
//!
//! There is no global config or language cell. `main` loads one
//! `SiteConfig`, and every render call takes a `RenderContext` carrying
//! the config and the negotiated language, so initialization order can
//! never bite.

pub mod config;
pub mod index;
pub mod locale;
pub mod render;
pub mod search;
pub mod serve;
pub mod site;
pub mod source;
pub mod state;
pub mod store;
pub mod text;
pub mod tree;
