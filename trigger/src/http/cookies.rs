//! `Set-Cookie` parsing
//!
//! The dashboard hands the CSRF token and the session identifier back
//! as cookies. A folded `Set-Cookie` field may carry several cookies
//! joined by commas, and attribute values (`Expires`) contain commas of
//! their own, so entries are split by a separator-aware scanner and
//! cookies are matched by name, never by position.

use reqwest::header::{HeaderMap, SET_COOKIE};

/// One parsed `Set-Cookie` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub attributes: Vec<String>,
}

/// Parse a single `Set-Cookie` entry into name, value and attributes.
///
/// The value never includes attribute suffixes such as `Path`,
/// `Domain`, `Expires` or `Secure`.
pub fn parse_set_cookie(entry: &str) -> Option<Cookie> {
    let mut segments = entry.split(';');
    let pair = segments.next()?;
    let (name, value) = pair.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some(Cookie {
        name: name.to_string(),
        value: value.trim().to_string(),
        attributes: segments
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    })
}

/// Split a folded `Set-Cookie` header into individual cookie entries.
///
/// A comma separates two cookies only when it is followed by a `name=`
/// prefix before the next `;` or `,`; the comma inside
/// `Expires=Mon, 01 Jan 2029 00:00:00 GMT` stays put.
pub fn split_set_cookie(header: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut start = 0;
    for (idx, ch) in header.char_indices() {
        if ch == ',' && starts_new_cookie(&header[idx + 1..]) {
            entries.push(header[start..idx].trim());
            start = idx + 1;
        }
    }
    entries.push(header[start..].trim());
    entries.retain(|e| !e.is_empty());
    entries
}

// A cookie entry must open with a `name=` token; text with whitespace
// or a `;`/`,` terminator before any `=` is attribute content.
fn starts_new_cookie(rest: &str) -> bool {
    let rest = rest.trim_start();
    for (idx, ch) in rest.char_indices() {
        match ch {
            '=' => return idx > 0,
            ';' | ',' => return false,
            c if c.is_whitespace() => return false,
            _ => {}
        }
    }
    false
}

/// Find a cookie by exact name across every `Set-Cookie` value of a response.
pub fn find_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    for value in headers.get_all(SET_COOKIE) {
        let Ok(value) = value.to_str() else { continue };
        for entry in split_set_cookie(value) {
            if let Some(cookie) = parse_set_cookie(entry) {
                if cookie.name == name {
                    return Some(cookie.value);
                }
            }
        }
    }
    None
}
