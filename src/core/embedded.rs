// src/core/embedded.rs
// Pages ship their data as inline script assignments (`var initialFoodGridPM = {...};`).
// We locate the assignment and parse exactly one JSON value after the `=`.

use serde_json::Value;

use crate::error::{FoodError, Result};

/// Parse the JSON assigned to `name` somewhere in `page`.
/// Fails with `MalformedResponse` when no such assignment exists or the value does not parse.
pub fn extract_embedded_json(page: &str, name: &str) -> Result<Value> {
    let rhs = find_assignment(page, name)
        .ok_or_else(|| FoodError::malformed(format!("page has no `{name} = ...` assignment")))?;

    let mut stream = serde_json::Deserializer::from_str(rhs).into_iter::<Value>();
    match stream.next() {
        Some(Ok(v)) => Ok(v),
        Some(Err(e)) => Err(FoodError::malformed(format!("`{name}` is not valid JSON: {e}"))),
        None => Err(FoodError::malformed(format!("`{name}` has an empty right-hand side"))),
    }
}

/// Text right after `name =` (leading whitespace trimmed). Skips comparisons (`==`)
/// and longer identifiers that merely end with `name`.
fn find_assignment<'a>(page: &'a str, name: &str) -> Option<&'a str> {
    let mut from = 0usize;
    while let Some(rel) = page[from..].find(name) {
        let at = from + rel;
        from = at + name.len();

        let ident_before = page[..at]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$');
        if ident_before {
            continue;
        }
        let rest = page[from..].trim_start();
        if let Some(after_eq) = rest.strip_prefix('=') {
            if !after_eq.starts_with('=') {
                return Some(after_eq.trim_start());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_object_followed_by_semicolon() {
        let page = "<script>\n  var initialFoodGridPM = {\"parentBeanId\": 7, \"beanEntries\": []};\n  init(initialFoodGridPM);\n</script>";
        let v = extract_embedded_json(page, "initialFoodGridPM").unwrap();
        assert_eq!(v["parentBeanId"], 7);
    }

    #[test]
    fn skips_usages_before_the_assignment() {
        let page = "if (x == measurementsPM) {}\nmeasurementsPM = [{\"measurementId\": 40}];";
        let v = extract_embedded_json(page, "measurementsPM").unwrap();
        assert_eq!(v[0]["measurementId"], 40);
    }

    #[test]
    fn ignores_longer_identifiers() {
        let page = "var oldmeasurementsPM = [1]; var measurementsPM = [2];";
        assert_eq!(extract_embedded_json(page, "measurementsPM").unwrap()[0], 2);
    }

    #[test]
    fn missing_assignment_is_malformed() {
        let err = extract_embedded_json("<html></html>", "initialFoodGridPM").unwrap_err();
        assert!(matches!(err, FoodError::MalformedResponse(_)));
    }
}
