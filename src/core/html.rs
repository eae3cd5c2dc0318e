// src/core/html.rs
// Case-insensitive tag-block scanning over raw markup.
// No DOM: each helper works on string slices and byte offsets, which is enough
// for the handful of tables and spans the sites render. Nested blocks of the
// same tag are not balanced; the first closing tag ends the block.

/// ASCII-only lowercasing. Non-ASCII chars pass through untouched, so byte
/// offsets found in the lowered copy are valid in the original.
pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

/// Byte span `(start, end)` of the next `<tag ...>...</tag>` block at or after `from`.
/// `tag` is a bare name (`"td"`); `<tdx>` or `<thead>` do not match `"td"`/`"th"`.
pub fn next_block(s: &str, tag: &str, from: usize) -> Option<(usize, usize)> {
    let lc = to_lower(s);
    next_block_in(s, &lc, &to_lower(tag), from)
}

fn next_block_in(s: &str, lc: &str, tag: &str, from: usize) -> Option<(usize, usize)> {
    let open = format!("<{tag}");
    let close = format!("</{tag}");
    let mut at = from;
    loop {
        let start = lc.get(at..)?.find(&open)? + at;
        let after_name = start + open.len();
        // Reject longer tag names sharing the prefix.
        match lc.as_bytes().get(after_name) {
            Some(b) if b.is_ascii_alphanumeric() => {
                at = after_name;
                continue;
            }
            None => return None,
            _ => {}
        }
        let open_end = s[start..].find('>')? + start + 1;
        let close_at = lc[open_end..].find(&close)? + open_end;
        let end = lc[close_at..].find('>').map(|i| close_at + i + 1).unwrap_or(s.len());
        return Some((start, end));
    }
}

/// All `<tag>` blocks in document order.
pub fn blocks<'a>(s: &'a str, tag: &str) -> Vec<&'a str> {
    let lc = to_lower(s);
    let tag = to_lower(tag);
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some((b, e)) = next_block_in(s, &lc, &tag, pos) {
        out.push(&s[b..e]);
        pos = e;
    }
    out
}

/// Every `<tag>` block, including ones that start inside an earlier block.
/// Each block still ends at the first closing tag after its start.
pub fn nested_blocks<'a>(s: &'a str, tag: &str) -> Vec<&'a str> {
    let lc = to_lower(s);
    let tag = to_lower(tag);
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some((b, e)) = next_block_in(s, &lc, &tag, pos) {
        out.push(&s[b..e]);
        pos = b + 1;
    }
    out
}

/// First `<tag>` block whose opening tag carries `attr="value"` (exact, case-sensitive value).
pub fn find_block_with_attr<'a>(s: &'a str, tag: &str, attr: &str, value: &str) -> Option<&'a str> {
    blocks(s, tag)
        .into_iter()
        .find(|b| attr_value(open_tag(b), attr).as_deref() == Some(value))
}

/// The opening tag of a block, `<td class="x">` for `<td class="x">..</td>`.
pub fn open_tag(block: &str) -> &str {
    match block.find('>') {
        Some(i) => &block[..=i],
        None => block,
    }
}

/// Value of `name` inside an opening tag. Handles double, single and unquoted values.
pub fn attr_value(open_tag: &str, name: &str) -> Option<String> {
    let lc = to_lower(open_tag);
    let name = to_lower(name);
    let bytes = lc.as_bytes();
    let mut from = 0usize;

    while let Some(rel) = lc[from..].find(&name) {
        let at = from + rel;
        from = at + name.len();

        // Must be a whole attribute name: preceded by whitespace.
        if at == 0 || !bytes[at - 1].is_ascii_whitespace() {
            continue;
        }
        let rest = lc[from..].trim_start();
        if !rest.starts_with('=') {
            continue;
        }
        let eq = lc.len() - rest.len();
        let value_start = eq + 1 + (lc[eq + 1..].len() - lc[eq + 1..].trim_start().len());
        let raw = &open_tag[value_start..];

        return Some(match raw.chars().next() {
            Some(q @ ('"' | '\'')) => raw[1..].split(q).next().unwrap_or("").to_string(),
            _ => raw
                .split(|c: char| c.is_whitespace() || c == '>' || c == '/')
                .next()
                .unwrap_or("")
                .to_string(),
        });
    }
    None
}

/// Markup between the opening and closing tag of a block (may still contain tags).
pub fn inner(block: &str) -> &str {
    let Some(open_end) = block.find('>') else { return "" };
    match block.rfind("</") {
        Some(close) if close > open_end => &block[open_end + 1..close],
        _ => &block[open_end + 1..],
    }
}

/// Inner markup of the first `<tag>` block, if any.
pub fn first_inner<'a>(s: &'a str, tag: &str) -> Option<&'a str> {
    next_block(s, tag, 0).map(|(b, e)| inner(&s[b..e]))
}

/// Drop every `<...>` tag, keeping text only. Entities are left alone.
pub fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_skip_longer_tag_names() {
        let html = "<table><thead><tr><th>A</th></tr></thead><tr><td>1</td><td>2</td></tr></table>";
        let rows = blocks(html, "tr");
        assert_eq!(rows.len(), 2);
        let cells: Vec<&str> = blocks(rows[1], "td").into_iter().map(inner).collect();
        assert_eq!(cells, vec!["1", "2"]);
        // "<th" must not match "<thead"
        assert_eq!(blocks(html, "th").len(), 1);
    }

    #[test]
    fn blocks_are_case_insensitive() {
        let html = "<TR><TD>x</TD></TR>";
        assert_eq!(blocks(html, "td").into_iter().map(inner).collect::<Vec<_>>(), vec!["x"]);
    }

    #[test]
    fn attr_value_quoting_styles() {
        assert_eq!(attr_value(r#"<td title="Cals column">"#, "title").as_deref(), Some("Cals column"));
        assert_eq!(attr_value("<td title='Fat column'>", "title").as_deref(), Some("Fat column"));
        assert_eq!(attr_value("<table class=report>", "class").as_deref(), Some("report"));
        assert_eq!(attr_value(r#"<span data-title="true">"#, "title"), None);
        assert_eq!(attr_value(r#"<span data-title="true">"#, "data-title").as_deref(), Some("true"));
    }

    #[test]
    fn find_block_by_attribute() {
        let html = r#"<table class="nav"><tr><td>n</td></tr></table><table class="report"><tr><td>r</td></tr></table>"#;
        let t = find_block_with_attr(html, "table", "class", "report").unwrap();
        assert!(t.contains(">r<"));
    }

    #[test]
    fn nested_blocks_include_inner_starts() {
        let html = "<div class='outer'><div class='food'>a</div></div><div>b</div>";
        let found = nested_blocks(html, "div");
        assert_eq!(found.len(), 3);
        assert_eq!(inner(found[1]), "a");
        assert_eq!(inner(found[2]), "b");
        // `blocks` resumes after each block and never sees the inner start
        assert_eq!(blocks(html, "div").len(), 2);
    }

    #[test]
    fn nested_blocks_scale_linearly_with_block_count() {
        let html = "<span>x</span>".repeat(50_000);
        let found = nested_blocks(&html, "span");
        assert_eq!(found.len(), 50_000);
        assert!(found.iter().all(|b| inner(b) == "x"));
    }

    #[test]
    fn strip_tags_keeps_text() {
        assert_eq!(strip_tags("<b>Tonic</b> <i>water</i>"), "Tonic water");
        assert_eq!(first_inner("<p><a href='/x'>link</a></p>", "a"), Some("link"));
    }
}
