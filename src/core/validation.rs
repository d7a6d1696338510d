//! # Input Validation
//!
//! Checks and sanitizers applied to user input before it reaches the
//! backend, plus the link validators the CLI uses before printing a dial or
//! directions link.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;

/// Maximum length of a sanitized search query, in characters.
pub const MAX_SEARCH_QUERY_LEN: usize = 200;

/// Default maximum length for [`sanitize_input`].
pub const DEFAULT_INPUT_MAX_LEN: usize = 100;

/// Maximum email length (RFC 5321).
const MAX_EMAIL_LEN: usize = 254;

/// Hosts image URLs may point at by default.
pub const DEFAULT_IMAGE_DOMAINS: &[&str] = &["supabase.co", "supabase.in"];

static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("valid uuid regex")
});

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[\d\s\-()]{7,20}$").expect("valid phone regex"));

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

fn is_markup_char(c: char) -> bool {
    matches!(c, '<' | '>' | '\'' | '"')
}

/// Trims, caps at `max_len` characters and strips `<>'"`.
pub fn sanitize_input(input: &str, max_len: usize) -> String {
    input
        .trim()
        .chars()
        .take(max_len)
        .filter(|c| !is_markup_char(*c))
        .collect()
}

/// Prepares a search query for a `LIKE` pattern.
///
/// Trims, caps at 200 characters, backslash-escapes `%`, `_` and `\`, and
/// strips `<>'"`. `*` is dropped: PostgREST reads it as `%` inside `ilike`
/// values and has no escape for it.
pub fn sanitize_search_query(query: &str) -> String {
    let mut out = String::new();
    for c in query.trim().chars().take(MAX_SEARCH_QUERY_LEN) {
        match c {
            '%' | '_' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '*' => {}
            c if is_markup_char(c) => {}
            c => out.push(c),
        }
    }
    out
}

/// Number of characters a search query actually searches for.
pub fn search_query_len(query: &str) -> usize {
    sanitize_input(query, MAX_SEARCH_QUERY_LEN)
        .chars()
        .filter(|c| *c != '*')
        .count()
}

/// Canonical 8-4-4-4-12 hexadecimal identifier, any case.
pub fn is_valid_uuid(value: &str) -> bool {
    UUID_RE.is_match(value)
}

/// Digits with optional leading `+`, spaces, hyphens and parentheses; 7–20 chars.
pub fn is_valid_phone_number(phone: &str) -> bool {
    !phone.is_empty() && PHONE_RE.is_match(phone)
}

/// Absolute URL with an `http` or `https` scheme.
pub fn is_valid_http_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }
    Url::parse(url).is_ok_and(|parsed| matches!(parsed.scheme(), "http" | "https"))
}

/// `tel:` link carrying a valid phone number.
pub fn is_valid_tel_url(tel_url: &str) -> bool {
    tel_url
        .strip_prefix("tel:")
        .is_some_and(is_valid_phone_number)
}

pub fn is_valid_email(email: &str) -> bool {
    !email.is_empty() && email.len() <= MAX_EMAIL_LEN && EMAIL_RE.is_match(email)
}

pub fn is_valid_coordinates(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude)
}

/// Valid http(s) URL whose host contains one of `allowed_domains`.
pub fn is_valid_image_url(url: &str, allowed_domains: &[&str]) -> bool {
    if !is_valid_http_url(url) {
        return false;
    }
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .is_some_and(|host| allowed_domains.iter().any(|d| host.contains(d)))
}
