//! Common types shared between request and response.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A byte range in the source SQL string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    /// Byte offset from start of SQL string (inclusive)
    pub start: usize,
    /// Byte offset from start of SQL string (exclusive)
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if `offset` lies inside the span, counting the end position.
    pub fn touches(&self, offset: usize) -> bool {
        offset >= self.start && offset <= self.end
    }

    /// Shifts both ends by `base`, turning a statement-local span into an absolute one.
    pub fn offset_by(self, base: usize) -> Self {
        Self::new(self.start + base, self.end + base)
    }
}

/// A half-open slice of the original buffer together with its text.
///
/// Produced by the segmenter and the scope resolver; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatementBounds {
    pub text: String,
    pub start_offset: usize,
    pub end_offset: usize,
}

impl StatementBounds {
    /// Builds bounds for `sql[span]`. The span must lie on character boundaries.
    pub fn from_span(sql: &str, span: Span) -> Self {
        Self {
            text: sql.get(span.start..span.end).unwrap_or_default().to_string(),
            start_offset: span.start,
            end_offset: span.end,
        }
    }

    pub fn span(&self) -> Span {
        Span::new(self.start_offset, self.end_offset)
    }
}
