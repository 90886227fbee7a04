use std::sync::Arc;

use crate::{
    error::{Error, ErrorKind},
    syntax::ast::{PerlClass, PerlKind},
};

/// A single token scanned from a pattern, along with the codepoint offset at
/// which it starts.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) offset: usize,
}

/// The kind of a scanned token.
///
/// `Caret`, `Dash` and `CloseClass` are only ever produced while the lexer
/// is inside a bracketed class; outside of one, `^`, `-` and `]` scan as
/// ordinary literals. Symmetrically, quantifiers, groups and `.` lose their
/// special meaning inside a class.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum TokenKind {
    /// An ordinary character, or an escaped metacharacter/control escape.
    Literal(char),
    /// The `.` metacharacter.
    Dot,
    /// A shorthand class escape, e.g., `\d`.
    Perl(PerlClass),
    /// `(` together with its header: plain, `(?:`, or `(?<name>`.
    OpenGroup(GroupHeader),
    /// `)`.
    CloseGroup,
    /// `|`.
    Pipe,
    /// `*`.
    Star,
    /// `+`.
    Plus,
    /// `?`.
    Question,
    /// A complete `{…}` repetition bound. `max` is `None` for the open-ended
    /// form `{n,}`.
    Bounds { min: u32, max: Option<u32> },
    /// `[`.
    OpenClass,
    /// `]`, inside a class.
    CloseClass,
    /// `-`, inside a class.
    Dash,
    /// `^`, inside a class.
    Caret,
    /// End of the pattern.
    Eof,
}

/// The header of a group token: how the group was opened.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum GroupHeader {
    /// `(` — a capturing group.
    Capture,
    /// `(?:` — a non-capturing group. The historical misspelling `(:?` is
    /// accepted as well.
    NonCapture,
    /// `(?<name>` — a named capturing group.
    NamedCapture(Arc<str>),
}

/// A scanner over the codepoints of a pattern.
///
/// The lexer tracks whether it is inside a bracketed class, since that flips
/// which characters are metacharacters. Escape sequences are resolved here,
/// so the parser never sees a backslash.
#[derive(Debug)]
pub(crate) struct Lexer {
    chars: Vec<char>,
    pos: usize,
    in_class: bool,
}

impl Lexer {
    pub(crate) fn new(pattern: &str) -> Lexer {
        Lexer { chars: pattern.chars().collect(), pos: 0, in_class: false }
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek_at(&self, lookahead: usize) -> Option<char> {
        self.chars.get(self.pos + lookahead).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    /// Scan the next token.
    pub(crate) fn next_token(&mut self) -> Result<Token, Error> {
        let offset = self.pos;
        let ch = match self.bump() {
            None => return Ok(Token { kind: TokenKind::Eof, offset }),
            Some(ch) => ch,
        };
        let kind = if self.in_class {
            match ch {
                ']' => {
                    self.in_class = false;
                    TokenKind::CloseClass
                }
                '^' => TokenKind::Caret,
                '-' => TokenKind::Dash,
                '\\' => self.lex_escape(offset)?,
                ch => TokenKind::Literal(ch),
            }
        } else {
            match ch {
                '(' => TokenKind::OpenGroup(self.lex_group_header(offset)?),
                ')' => TokenKind::CloseGroup,
                '|' => TokenKind::Pipe,
                '*' => TokenKind::Star,
                '+' => TokenKind::Plus,
                '?' => TokenKind::Question,
                '.' => TokenKind::Dot,
                '[' => {
                    self.in_class = true;
                    TokenKind::OpenClass
                }
                '{' => self.lex_bounds(offset)?,
                '\\' => self.lex_escape(offset)?,
                ch => TokenKind::Literal(ch),
            }
        };
        Ok(Token { kind, offset })
    }

    /// Scan the remainder of an escape sequence. `offset` points at the
    /// backslash, which has already been consumed.
    fn lex_escape(&mut self, offset: usize) -> Result<TokenKind, Error> {
        let ch = match self.bump() {
            None => {
                return Err(Error::new(ErrorKind::TrailingBackslash, offset))
            }
            Some(ch) => ch,
        };
        let kind = match ch {
            'd' | 'D' | 'w' | 'W' | 's' | 'S' => {
                let kind = match ch.to_ascii_lowercase() {
                    'd' => PerlKind::Digit,
                    'w' => PerlKind::Word,
                    _ => PerlKind::Space,
                };
                let negated = ch.is_ascii_uppercase();
                TokenKind::Perl(PerlClass { kind, negated })
            }
            'n' => TokenKind::Literal('\n'),
            'r' => TokenKind::Literal('\r'),
            't' => TokenKind::Literal('\t'),
            'f' => TokenKind::Literal('\x0C'),
            'v' => TokenKind::Literal('\x0B'),
            ch if ch.is_ascii_alphanumeric() => {
                return Err(Error::new(ErrorKind::InvalidEscape, offset))
            }
            ch => TokenKind::Literal(ch),
        };
        Ok(kind)
    }

    /// Scan a group header. `offset` points at the `(`, which has already
    /// been consumed.
    fn lex_group_header(
        &mut self,
        offset: usize,
    ) -> Result<GroupHeader, Error> {
        match (self.peek(), self.peek_at(1)) {
            (Some('?'), Some(':')) | (Some(':'), Some('?')) => {
                self.pos += 2;
                Ok(GroupHeader::NonCapture)
            }
            (Some('?'), Some('<')) => {
                self.pos += 2;
                let name = self.lex_group_name(offset)?;
                Ok(GroupHeader::NamedCapture(name))
            }
            (Some('?'), None) => {
                Err(Error::new(ErrorKind::UnterminatedGroup, offset))
            }
            (Some('?'), Some(_)) => {
                // Some other (? construct, e.g., look-around. Unsupported.
                Err(Error::new(ErrorKind::UnexpectedChar, self.pos + 1))
            }
            _ => Ok(GroupHeader::Capture),
        }
    }

    /// Scan the `name>` part of a `(?<name>` header. `offset` points at the
    /// `(` of the group.
    ///
    /// A name matches `[A-Za-z_][A-Za-z0-9_]*`.
    fn lex_group_name(&mut self, offset: usize) -> Result<Arc<str>, Error> {
        let mut name = String::new();
        loop {
            let at = self.pos;
            match self.bump() {
                None => {
                    return Err(Error::new(
                        ErrorKind::UnterminatedGroup,
                        offset,
                    ))
                }
                Some('>') if !name.is_empty() => break,
                Some(ch)
                    if ch == '_'
                        || ch.is_ascii_alphabetic()
                        || (!name.is_empty() && ch.is_ascii_digit()) =>
                {
                    name.push(ch)
                }
                Some(_) => {
                    return Err(Error::new(ErrorKind::UnexpectedChar, at))
                }
            }
        }
        Ok(Arc::from(name))
    }

    /// Scan a `{…}` repetition bound. `offset` points at the `{`, which has
    /// already been consumed.
    ///
    /// A `{` that does not introduce syntactically valid bounds scans as a
    /// literal `{` instead. Syntactically valid bounds that are out of
    /// order (`{3,2}`) fail with `BadQuantifier`.
    fn lex_bounds(&mut self, offset: usize) -> Result<TokenKind, Error> {
        let mut pos = self.pos;
        let min = match self.scan_number(&mut pos) {
            None => return Ok(TokenKind::Literal('{')),
            Some(digits) => digits,
        };
        let max = match self.chars.get(pos).copied() {
            Some('}') => {
                pos += 1;
                Some(min.clone())
            }
            Some(',') => {
                pos += 1;
                match self.chars.get(pos).copied() {
                    Some('}') => {
                        pos += 1;
                        None
                    }
                    _ => match self.scan_number(&mut pos) {
                        None => return Ok(TokenKind::Literal('{')),
                        Some(digits) => {
                            if self.chars.get(pos).copied() != Some('}') {
                                return Ok(TokenKind::Literal('{'));
                            }
                            pos += 1;
                            Some(digits)
                        }
                    },
                }
            }
            _ => return Ok(TokenKind::Literal('{')),
        };
        let min: u32 = min
            .parse()
            .map_err(|_| Error::new(ErrorKind::BadQuantifier, offset))?;
        let max: Option<u32> = match max {
            None => None,
            Some(digits) => Some(digits.parse().map_err(|_| {
                Error::new(ErrorKind::BadQuantifier, offset)
            })?),
        };
        if let Some(max) = max {
            if min > max {
                return Err(Error::new(ErrorKind::BadQuantifier, offset));
            }
        }
        self.pos = pos;
        Ok(TokenKind::Bounds { min, max })
    }

    /// Scan a run of ASCII digits starting at `*pos`, advancing `*pos` past
    /// them. Returns `None` when there are no digits.
    fn scan_number(&self, pos: &mut usize) -> Option<String> {
        let mut digits = String::new();
        while let Some(ch) = self.chars.get(*pos).copied() {
            if !ch.is_ascii_digit() {
                break;
            }
            digits.push(ch);
            *pos += 1;
        }
        if digits.is_empty() {
            None
        } else {
            Some(digits)
        }
    }
}
