use crate::lexer::{Token, TokenKind};
use crate::types::CteReference;

/// Collects the CTE names declared by a leading `WITH [RECURSIVE]` header.
///
/// The header ends at the first top-level `SELECT`. Names come back in
/// declaration order with quotes removed.
pub(crate) fn extract_ctes(tokens: &[Token<'_>]) -> Vec<CteReference> {
    let mut ctes = Vec::new();
    if !tokens.first().is_some_and(|token| token.is_keyword("WITH")) {
        return ctes;
    }

    let mut index = 1;
    if tokens.get(index).is_some_and(|token| token.is_keyword("RECURSIVE")) {
        index += 1;
    }

    let mut depth = 0usize;
    while let Some(token) = tokens.get(index) {
        match token.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => depth = depth.saturating_sub(1),
            TokenKind::Word if depth == 0 && token.is_keyword("SELECT") => break,
            TokenKind::Word if depth == 0 && token.is_keyword("AS") => {
                if body_follows(tokens, index) {
                    if let Some(name) = cte_name_before(tokens, index) {
                        ctes.push(CteReference { name });
                    }
                }
            }
            _ => {}
        }
        index += 1;
    }

    ctes
}

/// `AS [NOT] [MATERIALIZED] (`
fn body_follows(tokens: &[Token<'_>], as_index: usize) -> bool {
    let mut index = as_index + 1;
    if tokens.get(index).is_some_and(|token| token.is_keyword("NOT")) {
        index += 1;
    }
    if tokens
        .get(index)
        .is_some_and(|token| token.is_keyword("MATERIALIZED"))
    {
        index += 1;
    }
    tokens
        .get(index)
        .is_some_and(|token| token.kind == TokenKind::LParen)
}

/// The name before `AS`, skipping back over an optional column list.
fn cte_name_before(tokens: &[Token<'_>], as_index: usize) -> Option<String> {
    let mut index = as_index.checked_sub(1)?;

    if tokens[index].kind == TokenKind::RParen {
        let mut depth = 0usize;
        loop {
            match tokens[index].kind {
                TokenKind::RParen => depth += 1,
                TokenKind::LParen => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
            index = index.checked_sub(1)?;
        }
        index = index.checked_sub(1)?;
    }

    let token = &tokens[index];
    matches!(token.kind, TokenKind::Word | TokenKind::QuotedIdent).then(|| token.unquoted())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn names(sql: &str) -> Vec<String> {
        extract_ctes(&tokenize(sql))
            .into_iter()
            .map(|cte| cte.name)
            .collect()
    }

    #[test]
    fn test_ctes_in_declaration_order() {
        assert_eq!(
            names("WITH a AS (SELECT 1), b AS (SELECT * FROM a) SELECT * FROM b"),
            vec!["a", "b"]
        );
    }

    #[test]
    fn test_recursive_columns_and_materialized() {
        let sql = r#"WITH RECURSIVE "Tree" (id, parent) AS NOT MATERIALIZED (SELECT 1, 2),
            leaves AS MATERIALIZED (SELECT 3) SELECT * FROM leaves"#;
        assert_eq!(names(sql), vec!["Tree", "leaves"]);
    }

    #[test]
    fn test_nested_as_is_ignored() {
        let sql = "WITH a AS (SELECT x AS y, CAST(z AS INT) FROM t) SELECT 1 AS one";
        assert_eq!(names(sql), vec!["a"]);
    }

    #[test]
    fn test_no_with_header() {
        assert!(names("SELECT 1 AS (x)").is_empty());
        assert!(names("").is_empty());
    }

    #[test]
    fn test_incomplete_header() {
        assert_eq!(names("WITH a AS (SELECT 1), b AS ("), vec!["a", "b"]);
    }
}
