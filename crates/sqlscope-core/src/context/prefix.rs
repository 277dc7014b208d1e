use crate::lexer::unquote;

/// The partially typed, possibly qualified identifier before the cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct QualifiedPrefix {
    pub prefix: String,
    /// Quote-stripped qualifier segments, outermost first.
    pub qualifiers: Vec<String>,
    /// Bytes covered by qualifiers, dots and prefix as typed.
    pub raw_length: usize,
}

impl QualifiedPrefix {
    pub fn is_after_dot(&self) -> bool {
        !self.qualifiers.is_empty()
    }

    pub fn dot_prefix(&self) -> Option<String> {
        self.is_after_dot().then(|| self.qualifiers.join("."))
    }

    pub fn full(&self) -> String {
        match self.dot_prefix() {
            Some(chain) => format!("{chain}.{}", self.prefix),
            None => self.prefix.clone(),
        }
    }
}

fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'$' || byte >= 0x80
}

/// Reads the qualified prefix ending at the end of `before_cursor`.
///
/// Accepts `prefix`, `seg.prefix`, `seg.seg.prefix` and so on, where each
/// segment is a bare identifier or a `'...'` / `"..."` quoted one.
pub(crate) fn extract_prefix(before_cursor: &str) -> QualifiedPrefix {
    let bytes = before_cursor.as_bytes();
    let mut start = bytes.len();
    while start > 0 && is_word_byte(bytes[start - 1]) {
        start -= 1;
    }
    let prefix = before_cursor[start..].to_string();

    let mut qualifiers = Vec::new();
    while start > 0 && bytes[start - 1] == b'.' {
        let Some((segment_start, segment)) = segment_before(before_cursor, start - 1) else {
            break;
        };
        qualifiers.push(segment);
        start = segment_start;
    }
    qualifiers.reverse();

    QualifiedPrefix {
        prefix,
        qualifiers,
        raw_length: before_cursor.len() - start,
    }
}

/// Reads one qualifier segment ending right before the dot at `dot`.
fn segment_before(text: &str, dot: usize) -> Option<(usize, String)> {
    let bytes = text.as_bytes();
    let last = *bytes.get(dot.checked_sub(1)?)?;

    if last == b'"' || last == b'\'' {
        let mut index = dot - 1;
        loop {
            let open = bytes[..index].iter().rposition(|b| *b == last)?;
            if open > 0 && bytes[open - 1] == last {
                index = open - 1;
                continue;
            }
            let name = unquote(&text[open..dot]);
            return (!name.is_empty()).then_some((open, name));
        }
    }

    let mut start = dot;
    while start > 0 && is_word_byte(bytes[start - 1]) {
        start -= 1;
    }
    if start == dot || bytes[start].is_ascii_digit() {
        return None;
    }
    Some((start, text[start..dot].to_string()))
}
