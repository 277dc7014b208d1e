//! Types for the SQL context API.
//!
//! This module defines the request and response types shared by the core
//! engine, the CLI, and the WASM bindings. Everything serializes with
//! camelCase field names so editor hosts can consume it directly.

mod common;
mod context;
mod request;

pub use common::{Span, StatementBounds};
pub use context::{Clause, CteReference, QuoteContext, SqlContext, TableKind, TableReference};
pub use request::{ContextRequest, SegmentRequest, SegmentResult};
