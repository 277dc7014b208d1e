//! Statement and query-scope resolution.
//!
//! [`ScopeTree`] is built in one pass over the token stream with an explicit
//! depth counter and a stack of open query nodes. Spans are relative to the
//! tokenized text.

use crate::lexer::{tokenize, Token, TokenKind};
use crate::segmenter::statement_ranges;
use crate::types::{Span, StatementBounds};

const SET_OPERATORS: &[&str] = &["UNION", "INTERSECT", "EXCEPT"];

/// Finds the statement containing `cursor`, returning its index and untrimmed bounds.
///
/// A cursor directly after a `;` belongs to the following statement. Cursors
/// past the end resolve to the last statement.
pub fn find_statement_at(sql: &str, cursor: usize) -> (usize, StatementBounds) {
    let ranges = statement_ranges(sql);
    let index = ranges
        .iter()
        .position(|range| cursor <= range.end)
        .unwrap_or(ranges.len() - 1);
    (index, StatementBounds::from_span(sql, ranges[index]))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub span: Span,
    /// Paren depth of the opening `SELECT`.
    pub depth: usize,
    pub parent: Option<usize>,
}

/// Query scopes of one statement. Node 0 is always the whole statement.
#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl ScopeTree {
    pub fn build(tokens: &[Token<'_>], len: usize) -> Self {
        let mut scopes = vec![Scope {
            span: Span::new(0, len),
            depth: 0,
            parent: None,
        }];
        let mut open: Vec<usize> = Vec::new();
        let mut depth = 0usize;

        for token in tokens {
            match token.kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen if depth > 0 => {
                    close_scopes(&mut scopes, &mut open, depth, token.span.start);
                    depth -= 1;
                }
                TokenKind::Word if token.is_keyword("SELECT") => {
                    close_scopes(&mut scopes, &mut open, depth, token.span.start);
                    let parent = open.last().copied().unwrap_or(0);
                    scopes.push(Scope {
                        span: Span::new(token.span.start, len),
                        depth,
                        parent: Some(parent),
                    });
                    open.push(scopes.len() - 1);
                }
                TokenKind::Word if token.is_any_keyword(SET_OPERATORS) => {
                    close_scopes(&mut scopes, &mut open, depth, token.span.start);
                }
                _ => {}
            }
        }

        Self { scopes }
    }

    pub fn root(&self) -> &Scope {
        &self.scopes[0]
    }

    pub fn get(&self, index: usize) -> Option<&Scope> {
        self.scopes.get(index)
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scope> {
        self.scopes.iter()
    }

    pub fn children(&self, index: usize) -> impl Iterator<Item = (usize, &Scope)> {
        self.scopes
            .iter()
            .enumerate()
            .filter(move |(_, scope)| scope.parent == Some(index))
    }

    /// Index of the deepest query scope touching `cursor`; ties go to the later start.
    /// Falls back to the statement root.
    pub fn innermost(&self, cursor: usize) -> usize {
        self.scopes
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, scope)| scope.span.touches(cursor))
            .max_by_key(|(_, scope)| (scope.depth, scope.span.start))
            .map(|(index, _)| index)
            .unwrap_or(0)
    }
}

/// Closes every open scope at `depth` or deeper, ending it at `end`.
fn close_scopes(scopes: &mut [Scope], open: &mut Vec<usize>, depth: usize, end: usize) {
    while let Some(&top) = open.last() {
        if scopes[top].depth < depth {
            break;
        }
        scopes[top].span.end = end;
        open.pop();
    }
}

/// Returns the innermost query of `statement` that contains `cursor` (both statement-local).
pub fn find_innermost_query(statement: &str, cursor: usize) -> StatementBounds {
    let tokens = tokenize(statement);
    let tree = ScopeTree::build(&tokens, statement.len());
    let scope = &tree.scopes[tree.innermost(cursor)];
    StatementBounds::from_span(statement, scope.span)
}

/// The tokens fully inside `span`.
pub(crate) fn tokens_in<'t, 'a>(tokens: &'t [Token<'a>], span: Span) -> &'t [Token<'a>] {
    let start = tokens.partition_point(|token| token.span.start < span.start);
    let end = tokens.partition_point(|token| token.span.end <= span.end);
    &tokens[start..end.max(start)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marked(sql: &str) -> (String, usize) {
        let cursor = sql.find('|').unwrap();
        (sql.replacen('|', "", 1), cursor)
    }

    #[test]
    fn test_find_statement_at_boundaries() {
        let sql = "SELECT 1; SELECT 2";
        assert_eq!(find_statement_at(sql, 0).0, 0);
        assert_eq!(find_statement_at(sql, 8).0, 0);
        assert_eq!(find_statement_at(sql, 9).0, 1);
        assert_eq!(find_statement_at(sql, 100).0, 1);
        assert_eq!(find_statement_at(sql, 12).1.text, " SELECT 2");
    }

    #[test]
    fn test_statement_split_ignores_quoted_semicolons() {
        let sql = "SELECT ';' FROM t; SELECT 2";
        assert_eq!(find_statement_at(sql, 14).0, 0);
    }

    #[test]
    fn test_tree_nesting() {
        let sql = "SELECT * FROM (SELECT a FROM (SELECT b FROM t) x) y";
        let tokens = tokenize(sql);
        let tree = ScopeTree::build(&tokens, sql.len());

        assert_eq!(tree.len(), 4);
        let depths: Vec<usize> = tree.iter().skip(1).map(|scope| scope.depth).collect();
        assert_eq!(depths, vec![0, 1, 2]);
        assert_eq!(tree.get(2).unwrap().parent, Some(1));
        assert_eq!(tree.get(3).unwrap().parent, Some(2));
        assert_eq!(tree.children(1).count(), 1);
        assert_eq!(
            &sql[tree.get(3).unwrap().span.start..tree.get(3).unwrap().span.end],
            "SELECT b FROM t"
        );
    }

    #[test]
    fn test_innermost_query_inside_subquery() {
        let (sql, cursor) = marked("SELECT * FROM (SELECT | FROM inner_t) s");
        let bounds = find_innermost_query(&sql, cursor);
        assert_eq!(bounds.text, "SELECT  FROM inner_t");
    }

    #[test]
    fn test_innermost_query_outside_subquery() {
        let (sql, cursor) = marked("SELECT * FROM (SELECT a FROM inner_t) s WHERE |");
        let bounds = find_innermost_query(&sql, cursor);
        assert_eq!(bounds.start_offset, 0);
        assert_eq!(bounds.end_offset, sql.len());
    }

    #[test]
    fn test_set_operations_split_scopes() {
        let (sql, cursor) = marked("SELECT a FROM t1 UNION ALL SELECT | FROM t2");
        let bounds = find_innermost_query(&sql, cursor);
        assert_eq!(bounds.text, "SELECT  FROM t2");
    }

    #[test]
    fn test_no_select_falls_back_to_statement() {
        let (sql, cursor) = marked("UPDATE t SET a = |");
        let bounds = find_innermost_query(&sql, cursor);
        assert_eq!(bounds.text, sql);
    }

    #[test]
    fn test_unbalanced_parens_do_not_panic() {
        let sql = ")) SELECT ((( SELECT";
        let tokens = tokenize(sql);
        let tree = ScopeTree::build(&tokens, sql.len());
        assert_eq!(tree.len(), 3);
        assert!(tree.innermost(sql.len()) > 0);
    }

    #[test]
    fn test_tokens_in_span() {
        let sql = "SELECT a FROM t";
        let tokens = tokenize(sql);
        let inner = tokens_in(&tokens, Span::new(7, 15));
        let texts: Vec<&str> = inner.iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["a", "FROM", "t"]);
    }
}
