/*!
The abstract syntax of a regex pattern.

The parser produces this tree and the Thompson compiler consumes it exactly
once. The character class model ([`Class`], [`ClassItem`], [`PerlClass`]) is
shared with the compiled NFA, where it reappears inside symbol transitions:
a class is a *predicate over codepoints* and its meaning does not change
between the two representations.
*/

use std::sync::Arc;

/// A single node in the abstract syntax of a regex pattern.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Ast {
    /// The empty pattern. Matches the empty string.
    Empty,
    /// A single literal codepoint.
    Literal(char),
    /// The `.` metacharacter. Matches any single codepoint, including
    /// newline.
    Any,
    /// A shorthand class, e.g., `\d` or `\W`.
    Perl(PerlClass),
    /// A bracketed character class, e.g., `[a-z_]` or `[^0-9]`.
    Class(Class),
    /// A concatenation of two expressions.
    Concat(Box<Ast>, Box<Ast>),
    /// An alternation between two expressions, lowest precedence.
    Alternate(Box<Ast>, Box<Ast>),
    /// A repetition of an expression, e.g., `a*` or `a{2,5}`.
    Repeat(Box<Repetition>),
    /// A group, capturing or not.
    Group(Box<Group>),
}

/// A repeated sub-expression along with its bounds.
///
/// The surface quantifiers are all lowered to a `(min, max)` pair:
/// `*` is `(0, None)`, `+` is `(1, None)`, `?` is `(0, Some(1))`, `{n}` is
/// `(n, Some(n))`, `{n,}` is `(n, None)` and `{n,m}` is `(n, Some(m))`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Repetition {
    /// The expression being repeated.
    pub ast: Ast,
    /// The minimum number of repetitions.
    pub min: u32,
    /// The maximum number of repetitions, or `None` when unbounded.
    pub max: Option<u32>,
}

/// A parenthesized sub-expression.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Group {
    /// Whether this group captures, and under which index/name.
    pub kind: GroupKind,
    /// The expression inside the parentheses.
    pub ast: Ast,
}

/// The kind of a group.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GroupKind {
    /// `(…)` or `(?<name>…)`. Indices are assigned `1, 2, …` in the order
    /// the opening parenthesis appears in the pattern. Index `0` is reserved
    /// for the implicit whole-match group and never appears in the AST.
    Capture {
        /// The capture group index.
        index: u32,
        /// The capture group name, for `(?<name>…)` groups.
        name: Option<Arc<str>>,
    },
    /// `(?:…)`. Groups the expression without capturing.
    NonCapture,
}

/// A bracketed character class.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Class {
    /// Whether the class is negated, i.e., `[^…]`.
    pub negated: bool,
    /// The members of the class, in pattern order. Never empty.
    pub items: Vec<ClassItem>,
}

impl Class {
    /// Returns true when this class accepts the given codepoint.
    pub fn matches(&self, ch: char) -> bool {
        let any = self.items.iter().any(|item| item.matches(ch));
        any != self.negated
    }
}

/// A single member of a bracketed character class.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ClassItem {
    /// A single literal codepoint.
    Literal(char),
    /// An inclusive codepoint range, e.g., `a-z`. The bounds are ordered.
    Range(char, char),
    /// A shorthand class member, e.g., `[\d_]`.
    Perl(PerlClass),
}

impl ClassItem {
    fn matches(&self, ch: char) -> bool {
        match *self {
            ClassItem::Literal(lit) => ch == lit,
            ClassItem::Range(lo, hi) => lo <= ch && ch <= hi,
            ClassItem::Perl(perl) => perl.matches(ch),
        }
    }
}

/// A shorthand character class, i.e., one of `\d \D \w \W \s \S`.
///
/// The positive sets are ASCII-defined: `\d` is `[0-9]`, `\w` is
/// `[A-Za-z0-9_]` and `\s` is `[ \t\n\r\f\v]`. The negated forms are the
/// complement over all of Unicode.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PerlClass {
    /// The base set.
    pub kind: PerlKind,
    /// Whether the set is complemented (the uppercase forms).
    pub negated: bool,
}

impl PerlClass {
    /// Returns true when this shorthand accepts the given codepoint.
    pub fn matches(&self, ch: char) -> bool {
        let positive = match self.kind {
            PerlKind::Digit => ch.is_ascii_digit(),
            PerlKind::Word => ch.is_ascii_alphanumeric() || ch == '_',
            PerlKind::Space => {
                matches!(ch, ' ' | '\t' | '\n' | '\r' | '\x0C' | '\x0B')
            }
        };
        positive != self.negated
    }
}

/// The base set of a shorthand class.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PerlKind {
    /// `\d` (or `\D` when negated).
    Digit,
    /// `\w` (or `\W`).
    Word,
    /// `\s` (or `\S`).
    Space,
}

impl core::fmt::Display for PerlClass {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let letter = match (self.kind, self.negated) {
            (PerlKind::Digit, false) => 'd',
            (PerlKind::Digit, true) => 'D',
            (PerlKind::Word, false) => 'w',
            (PerlKind::Word, true) => 'W',
            (PerlKind::Space, false) => 's',
            (PerlKind::Space, true) => 'S',
        };
        write!(f, "\\{}", letter)
    }
}

impl core::fmt::Display for Class {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "[")?;
        if self.negated {
            write!(f, "^")?;
        }
        for item in &self.items {
            match *item {
                ClassItem::Literal(ch) => {
                    write!(f, "{}", ch.escape_debug())?
                }
                ClassItem::Range(lo, hi) => {
                    write!(f, "{}-{}", lo.escape_debug(), hi.escape_debug())?
                }
                ClassItem::Perl(perl) => write!(f, "{}", perl)?,
            }
        }
        write!(f, "]")
    }
}
