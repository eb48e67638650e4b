//! Text normalization, query sanitization, and slug derivation.
//!
//! Everything that turns user- or author-supplied text into a comparable or
//! linkable form lives here, because the exact same transformations run in
//! two places: in this process (server rendering, static generation) and in
//! the browsing program embedded in generated sites. The embedded copy is
//! stamped from the constants in this module at generation time (see
//! [`crate::site`]), so the folding tables below are the single source of
//! truth for both surfaces.
//!
//! ## Pipeline
//!
//! [`normalize`] applies, in order:
//!
//! 1. HTML markup stripping and decoding of a fixed entity set
//! 2. lower-casing
//! 3. Latin diacritic folding via a closed table ([`DIACRITICS`])
//! 4. punctuation → space ([`PUNCTUATION`]), whitespace collapse, trim
//!
//! Titles and categories are markup-free by convention, but running them
//! through the full pipeline is harmless and keeps one code path.
//!
//! [`sanitize_query`] is a separate, mandatory first step for user-typed
//! search text: it removes the characters that could smuggle markup into a
//! page that echoes the query back (the search box value, the results
//! heading). Indexed fields are trusted input and are never sanitized.
//!
//! Both [`normalize`] and [`slugify`] are idempotent.

/// Closed diacritic folding table, lowercase input → ASCII replacement.
///
/// The table is deliberately finite: search parity between the server and
/// the embedded client program requires both to fold exactly the same
/// characters, so this list is injected verbatim into generated sites.
/// Do not swap it for a general-purpose transliteration crate.
pub const DIACRITICS: &[(char, &str)] = &[
    ('à', "a"),
    ('á', "a"),
    ('â', "a"),
    ('ã', "a"),
    ('ä', "a"),
    ('å', "a"),
    ('æ', "ae"),
    ('ç', "c"),
    ('è', "e"),
    ('é', "e"),
    ('ê', "e"),
    ('ë', "e"),
    ('ì', "i"),
    ('í', "i"),
    ('î', "i"),
    ('ï', "i"),
    ('ñ', "n"),
    ('ò', "o"),
    ('ó', "o"),
    ('ô', "o"),
    ('õ', "o"),
    ('ö', "o"),
    ('ø', "o"),
    ('œ', "oe"),
    ('ù', "u"),
    ('ú', "u"),
    ('û', "u"),
    ('ü', "u"),
    ('ý', "y"),
    ('ÿ', "y"),
];

/// Fixed punctuation set mapped to a single space during normalization.
pub const PUNCTUATION: &[char] = &[
    '.', ',', ';', ':', '!', '?', '¡', '¿', '(', ')', '[', ']', '{', '}', '<',
    '>', '"', '\'', '`', '´', '‘', '’', '“', '”', '«', '»', '/', '\\', '|',
    '@', '#', '$', '%', '^', '&', '*', '_', '+', '=', '~', '-',
];

/// Named entities decoded during markup stripping. Closed set.
const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&amp;", "&"),
    ("&quot;", "\""),
    ("&apos;", "'"),
];

/// Strip HTML tags and decode the fixed entity set.
///
/// Tag stripping is a flat scan: everything from `<` to the matching `>` is
/// dropped, an unterminated `<` drops the rest of the string. Content bodies
/// are trusted HTML fragments, not arbitrary documents, so this is enough.
pub fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    let mut decoded = out;
    for (entity, replacement) in ENTITIES {
        if decoded.contains(entity) {
            decoded = decoded.replace(entity, replacement);
        }
    }
    decoded
}

/// Normalize text for search comparison.
///
/// Idempotent: `normalize(normalize(t)) == normalize(t)`.
pub fn normalize(text: &str) -> String {
    let stripped = strip_markup(text);
    let mut folded = String::with_capacity(stripped.len());
    for c in stripped.to_lowercase().chars() {
        match DIACRITICS.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => folded.push_str(to),
            None if PUNCTUATION.contains(&c) => folded.push(' '),
            None => folded.push(c),
        }
    }
    collapse_whitespace(&folded)
}

/// Sanitize a user-typed query before it is normalized or echoed back.
///
/// Removes angle brackets, quotes, backslash and backtick so a query can
/// never inject markup into the page that redisplays it. Always paired with
/// [`normalize`] for matching; the sanitized (un-normalized) form is what
/// gets echoed into the search box.
pub fn sanitize_query(query: &str) -> String {
    query
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '"' | '\'' | '\\' | '`'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Derive a URL-fragment slug from a topic title.
///
/// Lower-cases, folds diacritics through the same table as [`normalize`],
/// collapses every non-alphanumeric run to a single hyphen, and trims
/// leading/trailing hyphens. Idempotent, and identical in the embedded
/// client program: anchors generated on either surface must agree.
pub fn slugify(title: &str) -> String {
    let mut folded = String::with_capacity(title.len());
    for c in title.to_lowercase().chars() {
        match DIACRITICS.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => folded.push_str(to),
            None => folded.push(c),
        }
    }

    let mut slug = String::with_capacity(folded.len());
    let mut prev_hyphen = true; // suppresses a leading hyphen
    for c in folded.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            prev_hyphen = false;
        } else if !prev_hyphen {
            slug.push('-');
            prev_hyphen = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
