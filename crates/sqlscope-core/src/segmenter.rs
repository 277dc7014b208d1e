//! Statement segmentation.
//!
//! Splits a buffer at live semicolons and reconciles the result with the
//! statement count reported by the database engine, so result sets can be
//! labelled with the statement that produced them.

use std::borrow::Cow;
use std::fmt;

use crate::lexer::tokenize;
use crate::scanner::Scanner;
use crate::types::{SegmentRequest, SegmentResult, Span, StatementBounds};

#[cfg(feature = "tracing")]
use tracing::{debug, info_span};

/// Raw byte ranges between live semicolons, untrimmed.
///
/// Always returns at least one range; the last one runs to end of input.
/// The semicolons themselves are excluded.
pub fn statement_ranges(sql: &str) -> Vec<Span> {
    let mut ranges = Vec::new();
    let mut start = 0;

    for scanned in Scanner::new(sql) {
        if scanned.byte == b';' && scanned.region.is_code() {
            ranges.push(Span::new(start, scanned.offset));
            start = scanned.offset + 1;
        }
    }
    ranges.push(Span::new(start, sql.len()));

    ranges
}

/// Splits `sql` into trimmed statements, dropping empty and comment-only ones.
pub fn split_statements(sql: &str) -> Vec<StatementBounds> {
    statement_ranges(sql)
        .into_iter()
        .filter_map(|range| trim_range(sql, range))
        .collect()
}

fn trim_range(sql: &str, range: Span) -> Option<StatementBounds> {
    let raw = sql.get(range.start..range.end)?;
    let trimmed = raw.trim();
    if tokenize(trimmed).is_empty() {
        return None;
    }

    let start = range.start + (raw.len() - raw.trim_start().len());
    Some(StatementBounds::from_span(
        sql,
        Span::new(start, start + trimmed.len()),
    ))
}

/// One slot of a reconciled statement list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Parsed(StatementBounds),
    /// No textual statement exists for this zero-based slot.
    Placeholder { index: usize },
}

impl Segment {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }

    /// Statement text, or `Statement N` (1-based) for a placeholder.
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Self::Parsed(bounds) => Cow::Borrowed(bounds.text.as_str()),
            Self::Placeholder { index } => Cow::Owned(format!("Statement {}", index + 1)),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// Pads or truncates `found` to exactly `expected_count` slots.
pub fn reconcile(found: Vec<StatementBounds>, expected_count: usize) -> Vec<Segment> {
    #[cfg(feature = "tracing")]
    {
        if found.len() < expected_count {
            debug!(
                found = found.len(),
                expected = expected_count,
                "padding statements with placeholders"
            );
        } else if found.len() > expected_count {
            debug!(
                found = found.len(),
                expected = expected_count,
                "truncating statements"
            );
        }
    }

    let mut segments: Vec<Segment> = found
        .into_iter()
        .take(expected_count)
        .map(Segment::Parsed)
        .collect();
    let parsed = segments.len();
    segments.extend((parsed..expected_count).map(|index| Segment::Placeholder { index }));

    segments
}

/// Splits `sql` and reconciles the result with the engine's statement count.
pub fn segment_statements(sql: &str, expected_count: usize) -> Vec<String> {
    #[cfg(feature = "tracing")]
    let _span = info_span!("segment_statements", sql_len = sql.len(), expected_count).entered();

    reconcile(split_statements(sql), expected_count)
        .iter()
        .map(|segment| segment.text().into_owned())
        .collect()
}

/// Serves a [`SegmentRequest`]. Without an expected count the textual split is returned as is.
pub fn segment_for_request(request: &SegmentRequest) -> SegmentResult {
    let found = split_statements(&request.sql);
    let found_count = found.len();

    let statements = match request.expected_count {
        Some(expected) => reconcile(found, expected)
            .iter()
            .map(|segment| segment.text().into_owned())
            .collect(),
        None => found.into_iter().map(|bounds| bounds.text).collect(),
    };

    SegmentResult {
        statements,
        found_count,
        reconciled: request
            .expected_count
            .is_some_and(|expected| expected != found_count),
    }
}
