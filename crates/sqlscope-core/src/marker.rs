//! Cursor marker helpers for fixtures and command-line input.

use crate::error::MarkerError;

/// The character that marks the cursor position in annotated SQL.
pub const CURSOR_MARKER: char = '|';

/// Removes the single [`CURSOR_MARKER`] from `text`.
///
/// Returns the SQL without the marker and the marker's byte offset.
pub fn strip_cursor_marker(text: &str) -> Result<(String, usize), MarkerError> {
    let mut positions = text.match_indices(CURSOR_MARKER).map(|(offset, _)| offset);
    let offset = positions
        .next()
        .ok_or(MarkerError::Missing(CURSOR_MARKER))?;

    let extra = positions.count();
    if extra > 0 {
        return Err(MarkerError::Multiple {
            marker: CURSOR_MARKER,
            count: extra + 1,
        });
    }

    let mut sql = String::with_capacity(text.len() - CURSOR_MARKER.len_utf8());
    sql.push_str(&text[..offset]);
    sql.push_str(&text[offset + CURSOR_MARKER.len_utf8()..]);
    Ok((sql, offset))
}
