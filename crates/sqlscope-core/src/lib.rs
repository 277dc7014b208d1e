pub mod context;
pub mod error;
pub mod lexer;
pub mod marker;
pub mod scanner;
pub mod scope;
pub mod segmenter;
pub mod types;

// Re-export main types and functions
pub use context::{analyze_context, context_for_request};
pub use error::MarkerError;
pub use marker::{strip_cursor_marker, CURSOR_MARKER};
pub use scope::{find_innermost_query, find_statement_at, ScopeTree};
pub use segmenter::{
    reconcile, segment_for_request, segment_statements, split_statements, Segment,
};

pub use types::{
    Clause, ContextRequest, CteReference, QuoteContext, SegmentRequest, SegmentResult, Span,
    SqlContext, StatementBounds, TableKind, TableReference,
};
