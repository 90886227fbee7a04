use std::sync::Arc;

use crate::{
    error::{Error, ErrorKind},
    syntax::{
        ast::{Ast, Class, ClassItem, Group, GroupKind, Repetition},
        lexer::{GroupHeader, Lexer, Token, TokenKind},
    },
};

/// The result of parsing a pattern: the AST along with the names of all
/// capturing groups in index order.
///
/// `capture_names[0]` is always `None` and stands for the implicit
/// whole-match group; entry `i` holds the name of group `i`, if it has one.
#[derive(Clone, Debug)]
pub(crate) struct ParsedPattern {
    pub(crate) ast: Ast,
    pub(crate) capture_names: Vec<Option<Arc<str>>>,
}

/// Parse a pattern into its AST.
pub(crate) fn parse(pattern: &str) -> Result<ParsedPattern, Error> {
    Parser::new(pattern)?.parse()
}

/// A recursive descent parser over the token stream.
///
/// Precedence, lowest to highest: alternation, concatenation,
/// quantification, atom. The parser keeps a single token of lookahead.
struct Parser {
    lexer: Lexer,
    tok: Token,
    capture_names: Vec<Option<Arc<str>>>,
}

impl Parser {
    fn new(pattern: &str) -> Result<Parser, Error> {
        let mut lexer = Lexer::new(pattern);
        let tok = lexer.next_token()?;
        Ok(Parser { lexer, tok, capture_names: vec![None] })
    }

    fn parse(mut self) -> Result<ParsedPattern, Error> {
        let ast = self.parse_alternate()?;
        match self.tok.kind {
            TokenKind::Eof => {
                Ok(ParsedPattern { ast, capture_names: self.capture_names })
            }
            // parse_alternate only stops early on an unmatched `)`.
            _ => Err(Error::new(ErrorKind::UnexpectedChar, self.tok.offset)),
        }
    }

    /// Advance to the next token.
    fn bump(&mut self) -> Result<(), Error> {
        self.tok = self.lexer.next_token()?;
        Ok(())
    }

    fn parse_alternate(&mut self) -> Result<Ast, Error> {
        let lhs = self.parse_concat()?;
        if self.tok.kind != TokenKind::Pipe {
            return Ok(lhs);
        }
        self.bump()?;
        let rhs = self.parse_alternate()?;
        Ok(Ast::Alternate(Box::new(lhs), Box::new(rhs)))
    }

    fn parse_concat(&mut self) -> Result<Ast, Error> {
        let lhs = self.parse_repeat()?;
        match self.tok.kind {
            TokenKind::Pipe | TokenKind::CloseGroup | TokenKind::Eof => {
                Ok(lhs)
            }
            _ => {
                let rhs = self.parse_concat()?;
                Ok(Ast::Concat(Box::new(lhs), Box::new(rhs)))
            }
        }
    }

    /// Parse an atom along with an optional postfix quantifier.
    fn parse_repeat(&mut self) -> Result<Ast, Error> {
        let ast = self.parse_atom()?;
        let (min, max) = match self.tok.kind {
            TokenKind::Star => (0, None),
            TokenKind::Plus => (1, None),
            TokenKind::Question => (0, Some(1)),
            TokenKind::Bounds { min, max } => (min, max),
            _ => return Ok(ast),
        };
        self.bump()?;
        Ok(Ast::Repeat(Box::new(Repetition { ast, min, max })))
    }

    fn parse_atom(&mut self) -> Result<Ast, Error> {
        let offset = self.tok.offset;
        let ast = match self.tok.kind.clone() {
            TokenKind::Literal(ch) => Ast::Literal(ch),
            TokenKind::Dot => Ast::Any,
            TokenKind::Perl(perl) => Ast::Perl(perl),
            TokenKind::OpenClass => return self.parse_class(offset),
            TokenKind::OpenGroup(header) => {
                return self.parse_group(header, offset)
            }
            // An empty expression, e.g., the right hand side of `a|` or the
            // inside of `()`.
            TokenKind::Pipe | TokenKind::CloseGroup | TokenKind::Eof => {
                return Ok(Ast::Empty)
            }
            TokenKind::Star
            | TokenKind::Plus
            | TokenKind::Question
            | TokenKind::Bounds { .. } => {
                return Err(Error::new(ErrorKind::NothingToRepeat, offset))
            }
            // The lexer only produces these inside a class.
            TokenKind::CloseClass | TokenKind::Dash | TokenKind::Caret => {
                return Err(Error::new(ErrorKind::UnexpectedChar, offset))
            }
        };
        self.bump()?;
        Ok(ast)
    }

    /// Parse a group body. The opening token has not yet been bumped and
    /// `offset` points at its `(`.
    fn parse_group(
        &mut self,
        header: GroupHeader,
        offset: usize,
    ) -> Result<Ast, Error> {
        self.bump()?;
        // Assign capture indices before descending so that they follow the
        // order of opening parentheses.
        let kind = match header {
            GroupHeader::Capture => GroupKind::Capture {
                index: self.add_capture(None, offset)?,
                name: None,
            },
            GroupHeader::NamedCapture(name) => GroupKind::Capture {
                index: self.add_capture(Some(Arc::clone(&name)), offset)?,
                name: Some(name),
            },
            GroupHeader::NonCapture => GroupKind::NonCapture,
        };
        let ast = self.parse_alternate()?;
        if self.tok.kind != TokenKind::CloseGroup {
            return Err(Error::new(ErrorKind::UnterminatedGroup, offset));
        }
        self.bump()?;
        Ok(Ast::Group(Box::new(Group { kind, ast })))
    }

    /// Record a new capturing group and return its index.
    fn add_capture(
        &mut self,
        name: Option<Arc<str>>,
        offset: usize,
    ) -> Result<u32, Error> {
        if let Some(ref name) = name {
            let duplicate = self
                .capture_names
                .iter()
                .flatten()
                .any(|existing| existing == name);
            if duplicate {
                return Err(Error::new(
                    ErrorKind::DuplicateGroupName,
                    offset,
                ));
            }
        }
        let index = self.capture_names.len() as u32;
        self.capture_names.push(name);
        Ok(index)
    }

    /// Parse a bracketed class body. The `[` token has not yet been bumped
    /// and `offset` points at it.
    fn parse_class(&mut self, offset: usize) -> Result<Ast, Error> {
        self.bump()?;
        let negated = if self.tok.kind == TokenKind::Caret {
            self.bump()?;
            true
        } else {
            false
        };
        let mut items = vec![];
        loop {
            match self.tok.kind.clone() {
                TokenKind::Eof => {
                    return Err(Error::new(
                        ErrorKind::UnterminatedClass,
                        offset,
                    ))
                }
                TokenKind::CloseClass => break,
                TokenKind::Literal(ch) => {
                    let member_offset = self.tok.offset;
                    self.bump()?;
                    self.parse_class_member(
                        &mut items,
                        ch,
                        member_offset,
                        offset,
                    )?;
                }
                // A `^` after the first position is an ordinary member, as
                // is a `-` that does not continue a range.
                TokenKind::Caret => {
                    let member_offset = self.tok.offset;
                    self.bump()?;
                    self.parse_class_member(
                        &mut items,
                        '^',
                        member_offset,
                        offset,
                    )?;
                }
                TokenKind::Dash => {
                    self.bump()?;
                    items.push(ClassItem::Literal('-'));
                }
                TokenKind::Perl(perl) => {
                    self.bump()?;
                    items.push(ClassItem::Perl(perl));
                }
                // The lexer scans everything else inside a class as one of
                // the kinds above.
                _ => {
                    return Err(Error::new(
                        ErrorKind::UnexpectedChar,
                        self.tok.offset,
                    ))
                }
            }
        }
        if items.is_empty() {
            return Err(Error::new(ErrorKind::EmptyClass, offset));
        }
        self.bump()?;
        Ok(Ast::Class(Class { negated, items }))
    }

    /// Parse the remainder of a class member whose first character `start`
    /// has already been consumed: either a plain member, or a `start-end`
    /// range when a dash follows.
    ///
    /// `member_offset` points at `start` and is used for range errors;
    /// `class_offset` points at the class's `[`.
    fn parse_class_member(
        &mut self,
        items: &mut Vec<ClassItem>,
        start: char,
        member_offset: usize,
        class_offset: usize,
    ) -> Result<(), Error> {
        if self.tok.kind != TokenKind::Dash {
            items.push(ClassItem::Literal(start));
            return Ok(());
        }
        self.bump()?;
        let end = match self.tok.kind.clone() {
            // `[a-]`: the dash is a literal member.
            TokenKind::CloseClass => {
                items.push(ClassItem::Literal(start));
                items.push(ClassItem::Literal('-'));
                return Ok(());
            }
            TokenKind::Literal(end) => end,
            // `^` and `-` are plain characters as range endpoints.
            TokenKind::Caret => '^',
            TokenKind::Dash => '-',
            // A shorthand cannot bound a range.
            TokenKind::Perl(_) => {
                return Err(Error::new(ErrorKind::BadRange, member_offset))
            }
            TokenKind::Eof => {
                return Err(Error::new(
                    ErrorKind::UnterminatedClass,
                    class_offset,
                ))
            }
            _ => {
                return Err(Error::new(
                    ErrorKind::UnexpectedChar,
                    self.tok.offset,
                ))
            }
        };
        self.bump()?;
        if start > end {
            return Err(Error::new(ErrorKind::BadRange, member_offset));
        }
        items.push(ClassItem::Range(start, end));
        Ok(())
    }
}
