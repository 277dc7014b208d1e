//! UTF-8 ↔ UTF-16 offset conversion at the WASM boundary.
//!
//! Editors running in JavaScript count offsets in UTF-16 code units while the
//! analyzer works on UTF-8 byte offsets. Requests may declare which unit their
//! cursor uses; responses are converted back to the same unit.

use serde::{Deserialize, Serialize};
use sqlscope_core::{Span, SqlContext};

/// Unit used for offsets in requests and responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// UTF-8 byte offsets
    #[default]
    Utf8,
    /// UTF-16 code units (Monaco, CodeMirror, DOM selections)
    Utf16,
}

/// Convert a UTF-16 code unit offset to a UTF-8 byte offset.
///
/// An offset that falls inside a surrogate pair maps to the start of that
/// character. Offsets past the end are an error.
pub fn utf16_to_utf8_offset(sql: &str, utf16_offset: usize) -> Result<usize, String> {
    let mut utf16_count = 0;
    let mut byte_offset = 0;

    for ch in sql.chars() {
        if utf16_count >= utf16_offset {
            return Ok(byte_offset);
        }
        utf16_count += ch.len_utf16();
        if utf16_count > utf16_offset {
            return Ok(byte_offset);
        }
        byte_offset += ch.len_utf8();
    }

    if utf16_count == utf16_offset {
        return Ok(byte_offset);
    }

    Err(format!(
        "UTF-16 offset {utf16_offset} exceeds string length (max: {utf16_count})"
    ))
}

/// Convert a UTF-8 byte offset to a UTF-16 code unit offset.
///
/// Fails if the offset is past the end or not on a character boundary.
pub fn utf8_to_utf16_offset(sql: &str, utf8_offset: usize) -> Result<usize, String> {
    let Some(prefix) = sql.get(..utf8_offset) else {
        return Err(if utf8_offset > sql.len() {
            format!(
                "UTF-8 offset {utf8_offset} exceeds string length {}",
                sql.len()
            )
        } else {
            format!("UTF-8 offset {utf8_offset} does not land on a character boundary")
        });
    };
    Ok(prefix.encode_utf16().count())
}

/// Mirror of the analyzer's cursor normalization: clamp, then step back to a
/// character boundary.
pub(crate) fn normalize_cursor(sql: &str, cursor: usize) -> usize {
    let mut cursor = cursor.min(sql.len());
    while !sql.is_char_boundary(cursor) {
        cursor -= 1;
    }
    cursor
}

fn span_to_utf16(sql: &str, span: &mut Span) {
    if let Ok(start) = utf8_to_utf16_offset(sql, span.start) {
        span.start = start;
    }
    if let Ok(end) = utf8_to_utf16_offset(sql, span.end) {
        span.end = end;
    }
}

/// Rewrite every offset in `context` from UTF-8 bytes to UTF-16 code units.
///
/// `cursor` is the UTF-8 cursor the context was computed for. Offsets that do
/// not convert are left unchanged.
pub fn context_to_utf16(sql: &str, cursor: usize, context: &mut SqlContext) {
    let cursor = normalize_cursor(sql, cursor);

    let raw_start = cursor.saturating_sub(context.raw_qualified_prefix_length);
    if let Some(raw) = sql.get(raw_start..cursor) {
        context.raw_qualified_prefix_length = raw.encode_utf16().count();
    }

    span_to_utf16(sql, &mut context.statement_span);
    span_to_utf16(sql, &mut context.scope_span);

    if let Some(quote) = context.quote_context.as_mut() {
        if let Ok(start) = utf8_to_utf16_offset(sql, quote.quote_start) {
            quote.quote_start = start;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlscope_core::analyze_context;

    #[test]
    fn test_utf16_to_utf8_ascii_only() {
        let sql = "SELECT * FROM users";
        assert_eq!(utf16_to_utf8_offset(sql, 0).unwrap(), 0);
        assert_eq!(utf16_to_utf8_offset(sql, 7).unwrap(), 7);
        assert_eq!(utf16_to_utf8_offset(sql, 19).unwrap(), 19);
    }

    #[test]
    fn test_utf16_to_utf8_multibyte() {
        // '日' is 3 UTF-8 bytes, 1 UTF-16 code unit
        let sql = "SELECT '日本語'";
        assert_eq!(utf16_to_utf8_offset(sql, 8).unwrap(), 8);
        assert_eq!(utf16_to_utf8_offset(sql, 9).unwrap(), 11);
        assert_eq!(utf16_to_utf8_offset(sql, 10).unwrap(), 14);
    }

    #[test]
    fn test_utf16_to_utf8_emoji() {
        // surrogate pair: 4 UTF-8 bytes, 2 UTF-16 code units
        let sql = "SELECT '😀'";
        assert_eq!(utf16_to_utf8_offset(sql, 10).unwrap(), 12);
        assert_eq!(utf16_to_utf8_offset(sql, 11).unwrap(), 13);
        // inside the pair
        assert_eq!(utf16_to_utf8_offset(sql, 9).unwrap(), 8);
    }

    #[test]
    fn test_utf16_to_utf8_out_of_bounds() {
        assert!(utf16_to_utf8_offset("SELECT", 100).is_err());
    }

    #[test]
    fn test_utf8_to_utf16_multibyte() {
        let sql = "SELECT '日本語'";
        assert_eq!(utf8_to_utf16_offset(sql, 8).unwrap(), 8);
        assert_eq!(utf8_to_utf16_offset(sql, 11).unwrap(), 9);
        assert_eq!(utf8_to_utf16_offset(sql, 14).unwrap(), 10);
    }

    #[test]
    fn test_utf8_to_utf16_invalid_boundary() {
        let sql = "日";
        assert!(utf8_to_utf16_offset(sql, 1).is_err());
        assert!(utf8_to_utf16_offset(sql, 2).is_err());
        assert!(utf8_to_utf16_offset(sql, 3).is_ok());
        assert!(utf8_to_utf16_offset(sql, 4).is_err());
    }

    #[test]
    fn test_context_offsets_converted() {
        let sql = "SELECT '日本'; SELECT * FROM './é/";
        let cursor = sql.len();
        let mut context = analyze_context(sql, cursor);
        let utf8_quote_start = context.quote_context.as_ref().unwrap().quote_start;
        assert_eq!(utf8_quote_start, 31);

        context_to_utf16(sql, cursor, &mut context);

        // '日本' is 6 bytes but 2 code units
        assert_eq!(context.quote_context.as_ref().unwrap().quote_start, 27);
        assert_eq!(context.statement_span.end, sql.encode_utf16().count());
    }

    #[test]
    fn test_raw_prefix_length_converted() {
        let sql = "SELECT é.na";
        let cursor = sql.len();
        let mut context = analyze_context(sql, cursor);
        assert_eq!(context.raw_qualified_prefix_length, 5);

        context_to_utf16(sql, cursor, &mut context);
        assert_eq!(context.raw_qualified_prefix_length, 4);
    }
}
