use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A request for the completion context at a cursor position.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContextRequest {
    /// The SQL buffer (UTF-8 string, multi-statement supported)
    pub sql: String,

    /// Byte offset of the cursor in the SQL string. Out-of-range values are clamped.
    #[serde(default)]
    pub cursor_offset: usize,
}

/// A request to split SQL into executable statements.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SegmentRequest {
    /// The SQL buffer to split
    pub sql: String,

    /// Statement count reported by the database engine.
    ///
    /// When absent, the textual split is returned without padding or truncation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SegmentResult {
    /// Statement texts, index-aligned with the engine's results when a count was given.
    pub statements: Vec<String>,
    /// How many statements the textual splitter found before reconciliation.
    pub found_count: usize,
    /// True if padding or truncation was applied.
    pub reconciled: bool,
}
