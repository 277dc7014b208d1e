use std::sync::OnceLock;

use regex::Regex;

use crate::lexer::{Token, TokenKind};
use crate::types::TableReference;

/// Words that can never be an alias or start a relation name.
const RESERVED: &[&str] = &[
    "ALL", "AND", "ANTI", "AS", "ASOF", "BY", "CROSS", "DELETE", "EXCEPT", "FETCH", "FOR", "FROM",
    "FULL", "GROUP", "HAVING", "INNER", "INSERT", "INTERSECT", "INTO", "JOIN", "LATERAL", "LEFT",
    "LIMIT", "NATURAL", "NOT", "OFFSET", "ON", "OR", "ORDER", "OUTER", "PIVOT", "POSITIONAL",
    "QUALIFY", "RETURNING", "RIGHT", "SELECT", "SEMI", "SET", "TABLESAMPLE", "UNION", "UNPIVOT",
    "UPDATE", "USING", "VALUES", "WHERE", "WINDOW", "WITH",
];

/// Keywords that end a FROM list.
const FROM_TERMINATORS: &[&str] = &[
    "WHERE", "GROUP", "ORDER", "HAVING", "LIMIT", "OFFSET", "QUALIFY", "WINDOW", "SET", "UNION",
    "INTERSECT", "EXCEPT", "VALUES", "RETURNING", "SELECT",
];

fn is_reserved(token: &Token<'_>) -> bool {
    token.is_any_keyword(RESERVED)
}

/// True for quoted names that look like a file path or URL rather than a table.
fn looks_like_file(name: &str) -> bool {
    static FILE_PATTERN: OnceLock<Regex> = OnceLock::new();
    FILE_PATTERN
        .get_or_init(|| {
            Regex::new(r"[/\\]|^[A-Za-z][A-Za-z0-9+.\-]*://|\.[A-Za-z0-9]{2,}$")
                .expect("Invalid regex pattern")
        })
        .is_match(name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    /// FROM, JOIN or a FROM-list comma: table functions are allowed.
    Source,
    /// UPDATE or INSERT INTO: the target is a plain name.
    Target,
}

/// Collects the relations introduced at the top level of `tokens`.
///
/// `tokens` are the scope's tokens and `text` the statement they were lexed from;
/// both use the same local offsets, as does `cursor`.
pub(crate) fn extract_references(
    text: &str,
    tokens: &[Token<'_>],
    cursor: usize,
) -> Vec<TableReference> {
    let mut references: Vec<TableReference> = Vec::new();
    let mut in_from_clause = false;
    let mut expecting: Option<Trigger> = None;
    let mut subquery_count = 0usize;
    let mut index = 0;

    while index < tokens.len() {
        if let Some(trigger) = expecting.take() {
            let parsed =
                parse_relation(text, tokens, index, cursor, trigger, &mut subquery_count);
            if let Some(parsed) = parsed {
                if let Some(reference) = parsed.reference {
                    if !references.contains(&reference) {
                        references.push(reference);
                    }
                }
                index = parsed.next;
                continue;
            }
        }

        let token = &tokens[index];
        match token.kind {
            TokenKind::LParen => {
                index = skip_group(tokens, index);
                continue;
            }
            TokenKind::Comma if in_from_clause => expecting = Some(Trigger::Source),
            TokenKind::Word => {
                if token.is_any_keyword(&["FROM", "JOIN"]) {
                    in_from_clause = true;
                    expecting = Some(Trigger::Source);
                } else if token.is_keyword("UPDATE") {
                    expecting = Some(Trigger::Target);
                } else if token.is_keyword("INTO")
                    && index > 0
                    && tokens[index - 1].is_keyword("INSERT")
                {
                    expecting = Some(Trigger::Target);
                } else if token.is_any_keyword(FROM_TERMINATORS) {
                    in_from_clause = false;
                }
            }
            _ => {}
        }
        index += 1;
    }

    references
}

struct ParsedRelation {
    reference: Option<TableReference>,
    next: usize,
}

/// Parses one relation starting at `start`, or returns `None` if there is none there.
fn parse_relation(
    text: &str,
    tokens: &[Token<'_>],
    start: usize,
    cursor: usize,
    trigger: Trigger,
    subquery_count: &mut usize,
) -> Option<ParsedRelation> {
    let mut index = start;
    if trigger == Trigger::Source && tokens[index].is_keyword("LATERAL") {
        index += 1;
    }
    let first = tokens.get(index)?;

    if first.kind == TokenKind::LParen {
        let close = matching_paren(tokens, index);
        let is_query = tokens
            .get(index + 1)
            .is_some_and(|token| token.is_any_keyword(&["SELECT", "WITH"]));
        let after = close.map_or(tokens.len(), |close| close + 1);
        let (alias, next) = parse_alias(tokens, after);

        if !is_query || trigger == Trigger::Target {
            return Some(ParsedRelation {
                reference: None,
                next,
            });
        }

        *subquery_count += 1;
        let body_end = close.map_or(text.len(), |close| tokens[close].span.start);
        let body = text.get(first.span.end..body_end).unwrap_or_default().trim();
        let name = alias
            .clone()
            .unwrap_or_else(|| format!("subquery_{subquery_count}"));
        return Some(ParsedRelation {
            reference: Some(TableReference::subquery(name, alias, body)),
            next,
        });
    }

    let (segments, after_chain, dangling) = parse_table_name(tokens, index)?;
    let last = segments[segments.len() - 1];

    if trigger == Trigger::Source
        && !dangling
        && tokens
            .get(after_chain)
            .is_some_and(|token| token.kind == TokenKind::LParen)
    {
        let Some(close) = matching_paren(tokens, after_chain) else {
            return Some(ParsedRelation {
                reference: None,
                next: tokens.len(),
            });
        };
        let (alias, next) = parse_alias(tokens, close + 1);
        let call = text
            .get(first.span.start..tokens[close].span.end)
            .unwrap_or_default();
        return Some(ParsedRelation {
            reference: Some(TableReference::function(call, alias)),
            next,
        });
    }

    let (alias, next) = if dangling {
        (None, after_chain)
    } else {
        parse_alias(tokens, after_chain)
    };

    let being_typed = first.span.start < cursor && cursor <= last.span.end;
    if dangling || being_typed {
        return Some(ParsedRelation {
            reference: None,
            next,
        });
    }

    let reference = if segments.len() == 1 && first.kind != TokenKind::Word {
        let name = first.unquoted();
        if looks_like_file(&name) {
            TableReference::file(name, alias)
        } else {
            TableReference::table(name, alias)
        }
    } else {
        let name: Vec<String> = segments.iter().map(|segment| segment.unquoted()).collect();
        TableReference::table(name.join("."), alias)
    };

    Some(ParsedRelation {
        reference: Some(reference),
        next,
    })
}

/// Reads a dotted name chain. Returns the segments, the index after the chain,
/// and whether the chain ends in a dangling `.`.
fn parse_table_name<'t, 'a>(
    tokens: &'t [Token<'a>],
    start: usize,
) -> Option<(Vec<&'t Token<'a>>, usize, bool)> {
    let first = tokens.get(start)?;
    if !first.is_name() || is_reserved(first) {
        return None;
    }

    let mut segments = vec![first];
    let mut index = start + 1;
    while tokens
        .get(index)
        .is_some_and(|token| token.kind == TokenKind::Period)
    {
        match tokens.get(index + 1) {
            Some(next) if next.is_name() => {
                segments.push(next);
                index += 2;
            }
            _ => return Some((segments, index + 1, true)),
        }
    }

    Some((segments, index, false))
}

/// Reads `[AS] alias [(columns)]` starting at `start`.
fn parse_alias(tokens: &[Token<'_>], start: usize) -> (Option<String>, usize) {
    let mut index = start;
    if tokens.get(index).is_some_and(|token| token.is_keyword("AS")) {
        index += 1;
    }

    let alias = match tokens.get(index) {
        Some(token) if token.kind == TokenKind::QuotedIdent => Some(token.unquoted()),
        Some(token) if token.kind == TokenKind::Word && !is_reserved(token) => {
            Some(token.text.to_string())
        }
        _ => None,
    };
    if alias.is_none() {
        return (None, index);
    }
    index += 1;

    if tokens
        .get(index)
        .is_some_and(|token| token.kind == TokenKind::LParen)
    {
        index = skip_group(tokens, index);
    }

    (alias, index)
}

/// Index of the `)` matching the `(` at `open`, if the group is closed.
fn matching_paren(tokens: &[Token<'_>], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate().skip(open) {
        match token.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => {
                depth -= 1;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }
    None
}

fn skip_group(tokens: &[Token<'_>], open: usize) -> usize {
    matching_paren(tokens, open).map_or(tokens.len(), |close| close + 1)
}
