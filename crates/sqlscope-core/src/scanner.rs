//! Single-pass lexical scanner.
//!
//! Classifies every byte of a SQL buffer as live code, quoted text, or comment.
//! All higher passes (tokenizer, segmenter, scope tree) consume this state
//! machine instead of re-deriving quote and comment state on their own.
//!
//! Delimiters are ASCII, so scanning bytes is safe for UTF-8 input: a
//! continuation byte can never be mistaken for a quote or comment marker.

/// Lexical state between two bytes.
///
/// Exactly one state holds at any position. Comment markers inside quotes and
/// quote characters inside comments are not honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState<'a> {
    Code,
    SingleQuote,
    DoubleQuote,
    /// Inside `$tag$ ... $tag$`. `tag` includes both dollar signs.
    DollarQuote {
        tag: &'a str,
    },
    LineComment,
    BlockComment,
}

impl ScanState<'_> {
    /// True if the scan ended inside an unterminated quote or comment.
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Code)
    }
}

/// Classification of a single byte. Delimiters belong to the region they open or close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Code,
    SingleQuoted,
    DoubleQuoted,
    DollarQuoted,
    LineComment,
    BlockComment,
}

impl Region {
    pub fn is_code(self) -> bool {
        matches!(self, Self::Code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannedByte {
    pub offset: usize,
    pub byte: u8,
    pub region: Region,
    /// True on the first byte of a quote or comment opener.
    pub opens: bool,
}

/// One recognised unit: a plain byte or a multi-byte delimiter.
struct Step<'a> {
    region: Region,
    opens: bool,
    len: usize,
    next: ScanState<'a>,
}

impl<'a> Step<'a> {
    fn single(region: Region, next: ScanState<'a>) -> Self {
        Self {
            region,
            opens: false,
            len: 1,
            next,
        }
    }
}

/// Byte iterator that tracks [`ScanState`].
///
/// Never fails. An unterminated construct at end of input leaves
/// [`Scanner::state`] open, meaning the rest of the buffer is inside it.
pub struct Scanner<'a> {
    sql: &'a str,
    pos: usize,
    state: ScanState<'a>,
    run_end: usize,
    run_region: Region,
    after_run: ScanState<'a>,
}

impl<'a> Scanner<'a> {
    pub fn new(sql: &'a str) -> Self {
        Self {
            sql,
            pos: 0,
            state: ScanState::Code,
            run_end: 0,
            run_region: Region::Code,
            after_run: ScanState::Code,
        }
    }

    /// The state after the bytes consumed so far.
    pub fn state(&self) -> ScanState<'a> {
        if self.pos < self.run_end {
            self.after_run
        } else {
            self.state
        }
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.sql.as_bytes().get(offset).copied()
    }

    fn step_code(&self, offset: usize, byte: u8) -> Step<'a> {
        let next = self.peek(offset + 1);
        match (byte, next) {
            (b'-', Some(b'-')) => Step {
                region: Region::LineComment,
                opens: true,
                len: 2,
                next: ScanState::LineComment,
            },
            (b'/', Some(b'*')) => Step {
                region: Region::BlockComment,
                opens: true,
                len: 2,
                next: ScanState::BlockComment,
            },
            (b'\'', _) => Step {
                region: Region::SingleQuoted,
                opens: true,
                len: 1,
                next: ScanState::SingleQuote,
            },
            (b'"', _) => Step {
                region: Region::DoubleQuoted,
                opens: true,
                len: 1,
                next: ScanState::DoubleQuote,
            },
            (b'$', _) => match dollar_tag_len(self.sql.as_bytes(), offset) {
                Some(len) => Step {
                    region: Region::DollarQuoted,
                    opens: true,
                    len,
                    next: ScanState::DollarQuote {
                        tag: &self.sql[offset..offset + len],
                    },
                },
                None => Step::single(Region::Code, ScanState::Code),
            },
            _ => Step::single(Region::Code, ScanState::Code),
        }
    }

    fn step_quoted(
        &self,
        offset: usize,
        byte: u8,
        quote: u8,
        region: Region,
        state: ScanState<'a>,
    ) -> Step<'a> {
        if byte != quote {
            return Step::single(region, state);
        }
        if self.peek(offset + 1) == Some(quote) {
            // Doubled quote is an escaped literal, not a terminator.
            return Step {
                region,
                opens: false,
                len: 2,
                next: state,
            };
        }
        Step::single(region, ScanState::Code)
    }

    fn step(&self, offset: usize, byte: u8) -> Step<'a> {
        match self.state {
            ScanState::Code => self.step_code(offset, byte),
            ScanState::SingleQuote => {
                self.step_quoted(offset, byte, b'\'', Region::SingleQuoted, self.state)
            }
            ScanState::DoubleQuote => {
                self.step_quoted(offset, byte, b'"', Region::DoubleQuoted, self.state)
            }
            ScanState::DollarQuote { tag } => {
                if self.sql.as_bytes()[offset..].starts_with(tag.as_bytes()) {
                    Step {
                        region: Region::DollarQuoted,
                        opens: false,
                        len: tag.len(),
                        next: ScanState::Code,
                    }
                } else {
                    Step::single(Region::DollarQuoted, self.state)
                }
            }
            ScanState::LineComment => {
                if byte == b'\n' {
                    Step::single(Region::Code, ScanState::Code)
                } else {
                    Step::single(Region::LineComment, self.state)
                }
            }
            ScanState::BlockComment => {
                if byte == b'*' && self.peek(offset + 1) == Some(b'/') {
                    Step {
                        region: Region::BlockComment,
                        opens: false,
                        len: 2,
                        next: ScanState::Code,
                    }
                } else {
                    Step::single(Region::BlockComment, self.state)
                }
            }
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = ScannedByte;

    fn next(&mut self) -> Option<Self::Item> {
        let offset = self.pos;
        let byte = self.peek(offset)?;
        self.pos += 1;

        if offset < self.run_end {
            if self.pos == self.run_end {
                self.state = self.after_run;
            }
            return Some(ScannedByte {
                offset,
                byte,
                region: self.run_region,
                opens: false,
            });
        }

        let step = self.step(offset, byte);
        if step.len > 1 {
            self.run_end = offset + step.len;
            self.run_region = step.region;
            self.after_run = step.next;
        } else {
            self.state = step.next;
        }

        Some(ScannedByte {
            offset,
            byte,
            region: step.region,
            opens: step.opens,
        })
    }
}

/// Bytes that may appear in an unquoted identifier. Non-ASCII bytes are
/// accepted so UTF-8 letters stay inside words.
pub(crate) fn is_identifier_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'$' || byte >= 0x80
}

/// Length of a dollar-quote opener (`$$` or `$tag$`) starting at `offset`.
///
/// Returns `None` for positional parameters like `$1` and for a `$` that
/// continues an identifier such as `price$`.
pub(crate) fn dollar_tag_len(bytes: &[u8], offset: usize) -> Option<usize> {
    if bytes.get(offset) != Some(&b'$') {
        return None;
    }
    if offset > 0 && is_identifier_byte(bytes[offset - 1]) {
        return None;
    }

    let mut end = offset + 1;
    match bytes.get(end) {
        Some(b'$') => return Some(2),
        Some(b) if b.is_ascii_alphabetic() || *b == b'_' => {}
        _ => return None,
    }
    while bytes
        .get(end)
        .is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'_')
    {
        end += 1;
    }

    (bytes.get(end) == Some(&b'$')).then_some(end + 1 - offset)
}
