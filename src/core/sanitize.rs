// src/core/sanitize.rs
use super::html::strip_tags;

pub const NBSP: char = '\u{a0}';

/// Decode the handful of entities the sites emit. `&nbsp;` becomes U+00A0 so
/// callers can decide between treating it as space or dropping it.
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&nbsp;", "\u{a0}")
        .replace("&#160;", "\u{a0}")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

/// Collapse whitespace runs (NBSP included) into single spaces and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

/// Remove non-breaking spaces outright, then trim. Report cells use NBSP as padding.
pub fn strip_nbsp(s: &str) -> String {
    s.replace(NBSP, "").trim().to_string()
}

/// Visible text of an HTML fragment: tags dropped, entities decoded, whitespace collapsed.
pub fn html_to_text(fragment: &str) -> String {
    normalize_ws(&decode_entities(&strip_tags(fragment)))
}

/// Text of a table cell with NBSP padding removed.
pub fn cell_text(fragment: &str) -> String {
    strip_nbsp(&normalize_ws_keep_nbsp(&decode_entities(&strip_tags(fragment))))
}

fn normalize_ws_keep_nbsp(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() && ch != NBSP {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}
