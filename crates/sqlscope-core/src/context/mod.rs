//! Cursor context extraction.
//!
//! [`analyze_context`] locates the statement and innermost query around the
//! cursor, then runs independent passes over that token range: CTE
//! declarations, clause, visible relations, qualified prefix and open quote.

mod clause;
mod ctes;
mod prefix;
mod quote;
mod tables;

use crate::lexer::tokenize;
use crate::scope::{find_statement_at, tokens_in, ScopeTree};
use crate::types::{ContextRequest, SqlContext};

#[cfg(feature = "tracing")]
use tracing::{debug, info_span};

/// Analyzes `sql` at the byte offset `cursor_offset`.
///
/// Never fails. The cursor is clamped to the buffer and moved back to the
/// nearest character boundary; blank input yields [`SqlContext::empty`].
pub fn analyze_context(sql: &str, cursor_offset: usize) -> SqlContext {
    #[cfg(feature = "tracing")]
    let _span = info_span!("analyze_context", sql_len = sql.len(), cursor_offset).entered();

    if sql.trim().is_empty() {
        return SqlContext::empty();
    }

    let cursor = floor_char_boundary(sql, cursor_offset.min(sql.len()));
    let (statement_index, statement) = find_statement_at(sql, cursor);
    let base = statement.start_offset;
    let text = statement.text.as_str();
    let local_cursor = cursor - base;

    let tokens = tokenize(text);
    let tree = ScopeTree::build(&tokens, text.len());
    let scope = tree
        .get(tree.innermost(local_cursor))
        .unwrap_or_else(|| tree.root());
    let scope_tokens = tokens_in(&tokens, scope.span);

    #[cfg(feature = "tracing")]
    debug!(
        statement_index,
        scope_start = scope.span.start + base,
        scope_end = scope.span.end + base,
        scope_depth = scope.depth,
        "resolved cursor scope"
    );

    let qualified = prefix::extract_prefix(&text[..local_cursor]);
    let quote_context = quote::detect_quote(text, local_cursor).map(|mut quote| {
        quote.quote_start += base;
        quote
    });

    SqlContext {
        clause: clause::detect_clause(scope_tokens, local_cursor),
        tables: tables::extract_references(text, scope_tokens, local_cursor),
        ctes: ctes::extract_ctes(&tokens),
        is_after_dot: qualified.is_after_dot(),
        dot_prefix: qualified.dot_prefix(),
        full_qualified_prefix: qualified.full(),
        raw_qualified_prefix_length: qualified.raw_length,
        prefix: qualified.prefix,
        quote_context,
        statement_index,
        statement_span: statement.span(),
        scope_span: scope.span.offset_by(base),
    }
}

/// Serves a [`ContextRequest`].
pub fn context_for_request(request: &ContextRequest) -> SqlContext {
    analyze_context(&request.sql, request.cursor_offset)
}

fn floor_char_boundary(sql: &str, mut offset: usize) -> usize {
    while !sql.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
