//! Error types.
//!
//! Analysis itself never fails: degenerate input produces an empty or partial
//! [`crate::SqlContext`]. Errors only come from helpers that validate caller
//! input, such as cursor-marker stripping.

use thiserror::Error;

/// Errors from [`crate::marker::strip_cursor_marker`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkerError {
    /// The text contains no cursor marker.
    #[error("no cursor marker '{0}' found in input")]
    Missing(char),

    /// The text contains more than one cursor marker.
    #[error("expected exactly one cursor marker '{marker}', found {count}")]
    Multiple { marker: char, count: usize },
}
