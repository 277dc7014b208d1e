use crate::scanner::dollar_tag_len;
use crate::types::QuoteContext;

/// Detects whether `cursor` sits inside an unterminated `'` or `"` quote.
///
/// Scans `text[..cursor]` forward. Doubled quotes are escapes unless the second
/// quote is past the cursor, and `\"` is honored inside double quotes. Comments
/// and dollar-quoted bodies are skipped while outside quotes. `quote_start` is
/// local to `text`.
pub(crate) fn detect_quote(text: &str, cursor: usize) -> Option<QuoteContext> {
    let end = cursor.min(text.len());
    let bytes = &text.as_bytes()[..end];
    let mut open: Option<(u8, usize)> = None;
    let mut index = 0;

    while index < end {
        let byte = bytes[index];
        match open {
            None => match byte {
                b'-' if bytes.get(index + 1) == Some(&b'-') => {
                    index = find_from(bytes, index + 2, b"\n").unwrap_or(end);
                    continue;
                }
                b'/' if bytes.get(index + 1) == Some(&b'*') => {
                    index = find_from(bytes, index + 2, b"*/").map_or(end, |close| close + 2);
                    continue;
                }
                b'$' => {
                    if let Some(len) = dollar_tag_len(bytes, index) {
                        let tag = &bytes[index..index + len];
                        index = find_from(bytes, index + len, tag).map_or(end, |close| close + len);
                        continue;
                    }
                }
                b'\'' | b'"' => open = Some((byte, index)),
                _ => {}
            },
            Some((quote, _)) => {
                if quote == b'"' && byte == b'\\' && bytes.get(index + 1) == Some(&b'"') {
                    index += 2;
                    continue;
                }
                if byte == quote {
                    if bytes.get(index + 1) == Some(&quote) {
                        index += 2;
                        continue;
                    }
                    open = None;
                }
            }
        }
        index += 1;
    }

    let (quote, start) = open?;
    Some(QuoteContext {
        in_quote: true,
        quote_char: quote as char,
        quote_start: start,
        path_prefix: text.get(start + 1..end).unwrap_or_default().to_string(),
    })
}

fn find_from(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|position| position + from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote_at(sql: &str) -> Option<QuoteContext> {
        let cursor = sql.find('|').unwrap();
        let sql = sql.replacen('|', "", 1);
        detect_quote(&sql, cursor)
    }

    #[test]
    fn test_open_single_quote() {
        let quote = quote_at("SELECT * FROM './data/|'").unwrap();
        assert!(quote.in_quote);
        assert_eq!(quote.quote_char, '\'');
        assert_eq!(quote.quote_start, 14);
        assert_eq!(quote.path_prefix, "./data/");
    }

    #[test]
    fn test_open_double_quote() {
        let quote = quote_at("SELECT \"My Co|").unwrap();
        assert_eq!(quote.quote_char, '"');
        assert_eq!(quote.path_prefix, "My Co");
    }

    #[test]
    fn test_closed_quotes() {
        assert!(quote_at("SELECT 'a' |").is_none());
        assert!(quote_at("SELECT 'it''s' |").is_none());
        assert!(quote_at("SELECT |").is_none());
    }

    #[test]
    fn test_doubled_quote_straddling_cursor() {
        assert!(quote_at("SELECT 'it'|'s'").is_none());

        let quote = quote_at("SELECT 'it''|s'").unwrap();
        assert_eq!(quote.path_prefix, "it''");
    }

    #[test]
    fn test_backslash_escape_in_double_quotes() {
        let quote = quote_at(r#"SELECT "a\"b|"#).unwrap();
        assert_eq!(quote.path_prefix, r#"a\"b"#);
    }

    #[test]
    fn test_quotes_in_comments_ignored() {
        assert!(quote_at("SELECT 1 -- don't\n, |").is_none());
        assert!(quote_at("SELECT /* it's */ |").is_none());
        assert!(quote_at("SELECT $$ it's $$, |").is_none());
    }

    #[test]
    fn test_quote_opened_after_comment() {
        let quote = quote_at("-- note\nSELECT * FROM 'fi|").unwrap();
        assert_eq!(quote.path_prefix, "fi");
    }
}
