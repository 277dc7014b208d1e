pub mod encoding;

use encoding::{context_to_utf16, utf16_to_utf8_offset, Encoding};
use serde::{Deserialize, Serialize};
use sqlscope_core::{analyze_context, segment_for_request, SegmentRequest};
use wasm_bindgen::prelude::*;

/// Context request as sent by editor hosts.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WasmContextRequest {
    sql: String,
    #[serde(default)]
    cursor_offset: usize,
    #[serde(default)]
    encoding: Encoding,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_json(message: String) -> String {
    serde_json::to_string(&ErrorResponse { error: message })
        .unwrap_or_else(|_| r#"{"error":"Failed to serialize error result"}"#.to_string())
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|e| error_json(format!("Failed to serialize result: {e}")))
}

/// Install the panic hook so Rust panics show up in the browser console.
#[wasm_bindgen]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Route `tracing` spans from the core into the browser console.
#[cfg(feature = "tracing")]
#[wasm_bindgen]
pub fn enable_tracing() {
    tracing_wasm::set_as_global_default();
}

/// Completion context at a cursor - accepts a JSON request, returns JSON.
///
/// Request: `{ "sql": ..., "cursorOffset": n, "encoding": "utf8" | "utf16" }`.
/// With `utf16`, the cursor and every offset in the response are UTF-16 code
/// units. Never throws: failures come back as `{ "error": ... }`.
#[wasm_bindgen]
pub fn analyze_context_json(request_json: &str) -> String {
    let request: WasmContextRequest = match serde_json::from_str(request_json) {
        Ok(req) => req,
        Err(e) => return error_json(format!("Invalid request format: {e}")),
    };

    match request.encoding {
        Encoding::Utf8 => to_json(&analyze_context(&request.sql, request.cursor_offset)),
        Encoding::Utf16 => {
            let cursor = utf16_to_utf8_offset(&request.sql, request.cursor_offset)
                .unwrap_or(request.sql.len());
            let mut context = analyze_context(&request.sql, cursor);
            context_to_utf16(&request.sql, cursor, &mut context);
            to_json(&context)
        }
    }
}

/// Split SQL into statements - accepts a JSON request, returns JSON.
///
/// Request: `{ "sql": ..., "expectedCount": n }`. When `expectedCount` is
/// present the result is padded or truncated to exactly that many entries.
#[wasm_bindgen]
pub fn segment_statements_json(request_json: &str) -> String {
    match serde_json::from_str::<SegmentRequest>(request_json) {
        Ok(request) => to_json(&segment_for_request(&request)),
        Err(e) => error_json(format!("Invalid request format: {e}")),
    }
}

/// Get version information
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn parse(json: &str) -> Value {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_analyze_context_json_simple() {
        let request = r#"{"sql": "SELECT * FROM users WHERE ", "cursorOffset": 26}"#;
        let parsed = parse(&analyze_context_json(request));
        assert_eq!(parsed["clause"], "where");
        assert_eq!(parsed["tables"][0]["name"], "users");
        assert_eq!(parsed["tables"][0]["kind"], "table");
    }

    #[test]
    fn test_analyze_context_json_cursor_past_end_is_clamped() {
        let request = r#"{"sql": "SELECT * FROM ", "cursorOffset": 999}"#;
        let parsed = parse(&analyze_context_json(request));
        assert_eq!(parsed["clause"], "from");
    }

    #[test]
    fn test_analyze_context_json_utf16_cursor() {
        // 'é' is 2 UTF-8 bytes but one UTF-16 unit
        let sql = "SELECT 'é' AS x, t.na FROM t";
        let utf16_cursor = "SELECT 'é' AS x, t.na".encode_utf16().count();
        let request = serde_json::json!({
            "sql": sql,
            "cursorOffset": utf16_cursor,
            "encoding": "utf16",
        });
        let parsed = parse(&analyze_context_json(&request.to_string()));
        assert_eq!(parsed["prefix"], "na");
        assert_eq!(parsed["dotPrefix"], "t");
        assert_eq!(parsed["rawQualifiedPrefixLength"], 4);
        assert_eq!(parsed["statementSpan"]["end"], sql.encode_utf16().count());
    }

    #[test]
    fn test_analyze_context_json_invalid_request() {
        let parsed = parse(&analyze_context_json(r#"{"cursorOffset": 1}"#));
        assert!(parsed["error"].as_str().unwrap().contains("Invalid request"));

        let parsed = parse(&analyze_context_json("not json"));
        assert!(parsed["error"].is_string());
    }

    #[test]
    fn test_segment_statements_json_pads() {
        let request = r#"{"sql": "SELECT 1; SELECT 2", "expectedCount": 3}"#;
        let parsed = parse(&segment_statements_json(request));
        assert_eq!(
            parsed["statements"],
            serde_json::json!(["SELECT 1", "SELECT 2", "Statement 3"])
        );
        assert_eq!(parsed["foundCount"], 2);
        assert_eq!(parsed["reconciled"], true);
    }

    #[test]
    fn test_segment_statements_json_without_count() {
        let parsed = parse(&segment_statements_json(r#"{"sql": "SELECT ';'; SELECT 2"}"#));
        assert_eq!(parsed["statements"].as_array().unwrap().len(), 2);
        assert_eq!(parsed["reconciled"], false);
    }

    #[test]
    fn test_segment_statements_json_invalid_request() {
        let parsed = parse(&segment_statements_json(r#"{"expectedCount": "two"}"#));
        assert!(parsed["error"].is_string());
    }

    #[test]
    fn test_get_version() {
        assert!(!get_version().is_empty());
    }
}
