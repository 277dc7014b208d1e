//! Flat tokenizer over the scanner.
//!
//! Tokens carry statement-local spans and borrow their text from the input.
//! Quoted constructs become single tokens, so passes that work on tokens never
//! see a keyword or semicolon that lives inside a string.

use crate::scanner::{is_identifier_byte, Region, ScannedByte, Scanner};
use crate::types::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Word,
    QuotedIdent,
    String,
    DollarString,
    Number,
    LParen,
    RParen,
    Comma,
    Period,
    SemiColon,
    Operator,
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub span: Span,
}

impl Token<'_> {
    /// Case-insensitive keyword check. Only bare words can be keywords.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Word && self.text.eq_ignore_ascii_case(keyword)
    }

    pub fn is_any_keyword(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|keyword| self.is_keyword(keyword))
    }

    /// Words and quoted names; anything that can be one link of a dotted chain.
    pub fn is_name(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Word | TokenKind::QuotedIdent | TokenKind::String
        )
    }

    /// The identifier this token names, with surrounding quotes removed.
    pub fn unquoted(&self) -> String {
        unquote(self.text)
    }
}

/// Tokenizes `sql`, dropping comments.
pub fn tokenize(sql: &str) -> Vec<Token<'_>> {
    let mut tokens = tokenize_with_comments(sql);
    tokens.retain(|token| token.kind != TokenKind::Comment);
    tokens
}

/// Tokenizes `sql`, keeping comment tokens.
pub fn tokenize_with_comments(sql: &str) -> Vec<Token<'_>> {
    let scanned: Vec<ScannedByte> = Scanner::new(sql).collect();
    let mut tokens = Vec::new();
    let mut index = 0;

    while index < scanned.len() {
        let first = scanned[index];
        let start = index;

        let kind = match first.region {
            Region::Code if first.byte.is_ascii_whitespace() => {
                index += 1;
                continue;
            }
            Region::Code if is_identifier_byte(first.byte) => {
                while scanned
                    .get(index)
                    .is_some_and(|b| b.region.is_code() && is_identifier_byte(b.byte))
                {
                    index += 1;
                }
                if first.byte.is_ascii_digit() {
                    TokenKind::Number
                } else {
                    TokenKind::Word
                }
            }
            Region::Code => {
                index += 1;
                match first.byte {
                    b'(' => TokenKind::LParen,
                    b')' => TokenKind::RParen,
                    b',' => TokenKind::Comma,
                    b'.' => TokenKind::Period,
                    b';' => TokenKind::SemiColon,
                    _ => TokenKind::Operator,
                }
            }
            region => {
                index += 1;
                while scanned
                    .get(index)
                    .is_some_and(|b| b.region == region && !b.opens)
                {
                    index += 1;
                }
                match region {
                    Region::SingleQuoted => TokenKind::String,
                    Region::DoubleQuoted => TokenKind::QuotedIdent,
                    Region::DollarQuoted => TokenKind::DollarString,
                    _ => TokenKind::Comment,
                }
            }
        };

        let span = Span::new(scanned[start].offset, scanned[index - 1].offset + 1);
        tokens.push(Token {
            kind,
            text: sql.get(span.start..span.end).unwrap_or_default(),
            span,
        });
    }

    tokens
}

/// Strips one layer of `'` or `"` quoting and undoubles escaped quotes.
///
/// Unterminated input keeps everything after the opening quote.
pub fn unquote(text: &str) -> String {
    let Some(quote) = text.chars().next().filter(|c| *c == '\'' || *c == '"') else {
        return text.to_string();
    };
    let inner = &text[1..];
    let inner = if !inner.is_empty() && inner.ends_with(quote) {
        &inner[..inner.len() - 1]
    } else {
        inner
    };
    let doubled: String = [quote, quote].iter().collect();
    inner.replace(&doubled, &quote.to_string())
}
