//! JSON output formatting.

use serde::Serialize;
use sqlscope_core::SqlContext;

/// One result tagged with the input it came from.
#[derive(Debug, Serialize)]
struct NamedResult<'a, T> {
    name: &'a str,
    result: &'a T,
}

/// Format a result as JSON.
///
/// If `compact` is true, outputs minified JSON without whitespace.
pub fn format_json<T: Serialize>(result: &T, compact: bool) -> String {
    if compact {
        serde_json::to_string(result).expect("serialization cannot fail")
    } else {
        serde_json::to_string_pretty(result).expect("serialization cannot fail")
    }
}

/// Format results for several inputs as a JSON array of `{ name, result }` objects.
///
/// A single input is written as its bare result.
pub fn format_named_json<T: Serialize>(results: &[(String, T)], compact: bool) -> String {
    if let [(_, result)] = results {
        return format_json(result, compact);
    }

    let named: Vec<NamedResult<'_, T>> = results
        .iter()
        .map(|(name, result)| NamedResult { name, result })
        .collect();
    format_json(&named, compact)
}

/// The JSON schema of [`SqlContext`].
pub fn json_schema(compact: bool) -> String {
    format_json(&schemars::schema_for!(SqlContext), compact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlscope_core::analyze_context;

    #[test]
    fn test_json_pretty() {
        let context = analyze_context("SELECT * FROM users WHERE ", 26);
        let json = format_json(&context, false);
        assert!(json.contains('\n'));
        assert!(json.contains("\"clause\": \"where\""));
    }

    #[test]
    fn test_json_compact() {
        let context = analyze_context("SELECT * FROM users", 7);
        let json = format_json(&context, true);
        assert!(!json.starts_with("{\n"));
    }

    #[test]
    fn test_named_json_single_and_multiple() {
        let single = vec![("a.sql".to_string(), 1)];
        assert_eq!(format_named_json(&single, true), "1");

        let many = vec![("a.sql".to_string(), 1), ("b.sql".to_string(), 2)];
        assert_eq!(
            format_named_json(&many, true),
            r#"[{"name":"a.sql","result":1},{"name":"b.sql","result":2}]"#
        );
    }

    #[test]
    fn test_json_schema_names_fields() {
        let schema = json_schema(true);
        assert!(schema.contains("rawQualifiedPrefixLength"));
        assert!(schema.contains("quoteContext"));
    }
}
