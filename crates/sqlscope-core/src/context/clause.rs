use crate::lexer::{Token, TokenKind};
use crate::types::Clause;

struct ClausePattern {
    words: &'static [&'static str],
    clause: Clause,
}

/// Most specific first. `SET` only counts inside an `UPDATE`.
const CLAUSE_PATTERNS: &[ClausePattern] = &[
    ClausePattern {
        words: &["INSERT", "INTO"],
        clause: Clause::InsertInto,
    },
    ClausePattern {
        words: &["SET"],
        clause: Clause::Set,
    },
    ClausePattern {
        words: &["UPDATE"],
        clause: Clause::Update,
    },
    ClausePattern {
        words: &["ORDER", "BY"],
        clause: Clause::OrderBy,
    },
    ClausePattern {
        words: &["GROUP", "BY"],
        clause: Clause::GroupBy,
    },
    ClausePattern {
        words: &["HAVING"],
        clause: Clause::Having,
    },
    ClausePattern {
        words: &["WHERE"],
        clause: Clause::Where,
    },
    ClausePattern {
        words: &["ON"],
        clause: Clause::On,
    },
    ClausePattern {
        words: &["JOIN"],
        clause: Clause::Join,
    },
    ClausePattern {
        words: &["FROM"],
        clause: Clause::From,
    },
    ClausePattern {
        words: &["SELECT"],
        clause: Clause::Select,
    },
];

/// Keywords that end the previous clause without starting one we report.
const TERMINATORS: &[&str] = &[
    "LIMIT",
    "OFFSET",
    "FETCH",
    "RETURNING",
    "UNION",
    "INTERSECT",
    "EXCEPT",
    "WINDOW",
    "QUALIFY",
    "WITH",
];

/// Finds the clause governing `cursor` by walking backward from it.
///
/// Keywords inside a closed paren group are skipped, as is a word the
/// cursor is still typing.
pub(crate) fn detect_clause(tokens: &[Token<'_>], cursor: usize) -> Clause {
    let end = tokens.partition_point(|token| precedes_cursor(token, cursor));
    let before = &tokens[..end];
    let mut depth = 0isize;

    for index in (0..before.len()).rev() {
        let token = &before[index];
        match token.kind {
            TokenKind::RParen => depth += 1,
            TokenKind::LParen => depth -= 1,
            TokenKind::Word if depth <= 0 => {
                if token.is_any_keyword(TERMINATORS) {
                    return Clause::Unknown;
                }
                if let Some(clause) = match_pattern(before, index) {
                    return clause;
                }
            }
            _ => {}
        }
    }

    Clause::Unknown
}

fn precedes_cursor(token: &Token<'_>, cursor: usize) -> bool {
    if token.span.end < cursor {
        return true;
    }
    token.span.end == cursor
        && matches!(
            token.kind,
            TokenKind::LParen
                | TokenKind::RParen
                | TokenKind::Comma
                | TokenKind::Period
                | TokenKind::Operator
                | TokenKind::String
                | TokenKind::QuotedIdent
        )
}

fn match_pattern(tokens: &[Token<'_>], last: usize) -> Option<Clause> {
    CLAUSE_PATTERNS
        .iter()
        .find(|pattern| {
            let Some(first) = (last + 1).checked_sub(pattern.words.len()) else {
                return false;
            };
            let words_match = pattern
                .words
                .iter()
                .zip(&tokens[first..=last])
                .all(|(word, token)| token.is_keyword(word));
            words_match
                && (pattern.clause != Clause::Set
                    || tokens[..first].iter().any(|token| token.is_keyword("UPDATE")))
        })
        .map(|pattern| pattern.clause)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn clause_at(sql: &str) -> Clause {
        let cursor = sql.find('|').unwrap();
        let sql = sql.replacen('|', "", 1);
        detect_clause(&tokenize(&sql), cursor)
    }

    #[test]
    fn test_basic_clauses() {
        assert_eq!(clause_at("SELECT | FROM t"), Clause::Select);
        assert_eq!(clause_at("SELECT a FROM |"), Clause::From);
        assert_eq!(clause_at("SELECT a FROM t WHERE |"), Clause::Where);
        assert_eq!(clause_at("SELECT a FROM t GROUP BY |"), Clause::GroupBy);
        assert_eq!(clause_at("SELECT a FROM t GROUP BY a HAVING |"), Clause::Having);
        assert_eq!(clause_at("SELECT a FROM t ORDER BY |"), Clause::OrderBy);
        assert_eq!(clause_at("SELECT a FROM t LEFT JOIN |"), Clause::Join);
        assert_eq!(clause_at("SELECT a FROM t JOIN u ON |"), Clause::On);
    }

    #[test]
    fn test_dml_clauses() {
        assert_eq!(clause_at("INSERT INTO |"), Clause::InsertInto);
        assert_eq!(clause_at("UPDATE |"), Clause::Update);
        assert_eq!(clause_at("UPDATE t SET |"), Clause::Set);
        assert_eq!(clause_at("UPDATE t SET a = 1 WHERE |"), Clause::Where);
    }

    #[test]
    fn test_keyword_being_typed_is_ignored() {
        assert_eq!(clause_at("SELECT a FROM t WHE|"), Clause::From);
        assert_eq!(clause_at("SELECT a FROM|"), Clause::Select);
    }

    #[test]
    fn test_closed_paren_groups_are_skipped() {
        assert_eq!(
            clause_at("SELECT a FROM t WHERE x IN (SELECT b FROM u) AND |"),
            Clause::Where
        );
        assert_eq!(
            clause_at("SELECT count(*) OVER (PARTITION BY a ORDER BY b), | FROM t"),
            Clause::Select
        );
    }

    #[test]
    fn test_open_paren_is_transparent() {
        assert_eq!(clause_at("SELECT a FROM t WHERE (x = |"), Clause::Where);
    }

    #[test]
    fn test_terminators() {
        assert_eq!(clause_at("SELECT a FROM t LIMIT |"), Clause::Unknown);
        assert_eq!(clause_at("SELECT a FROM t UNION |"), Clause::Unknown);
        assert_eq!(clause_at("|SELECT 1"), Clause::Unknown);
    }

    #[test]
    fn test_values_list_stays_in_insert_clause() {
        assert_eq!(clause_at("INSERT INTO t (a, b) VALUES (|"), Clause::InsertInto);
        assert_eq!(clause_at("INSERT INTO t VALUES (1, |"), Clause::InsertInto);
    }

    #[test]
    fn test_set_without_update_is_not_set_clause() {
        assert_eq!(clause_at("SELECT a FROM t WHERE x SET |"), Clause::Where);
    }
}
