use thiserror::Error;

/// An error that occurred while compiling a regex pattern.
///
/// An error carries the [`ErrorKind`] describing what went wrong along with
/// the zero-based codepoint offset in the pattern where the problem was
/// detected. When compilation fails, no partial regex is ever returned.
///
/// There are generally two things one can do with this error: obtain a human
/// readable message via its `std::fmt::Display` impl, or inspect
/// [`kind`](Error::kind) and [`offset`](Error::offset) programmatically (for
/// example, to underline the offending position in a pattern editor).
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("regex compile error at offset {offset}: {kind}")]
pub struct Error {
    kind: ErrorKind,
    offset: usize,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, offset: usize) -> Error {
        Error { kind, offset }
    }

    pub(crate) fn too_many_states(limit: usize) -> Error {
        Error { kind: ErrorKind::TooManyStates { limit }, offset: 0 }
    }

    /// Return the kind of this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Return the zero-based codepoint offset in the pattern at which this
    /// error was detected.
    ///
    /// For errors about a delimited construct (an unterminated group or
    /// class, a duplicate group name), the offset points at the construct's
    /// opening delimiter. For [`ErrorKind::TooManyStates`] the offset is
    /// always `0`, since the pattern as a whole is at fault.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// The kind of error that can occur while compiling a regex pattern.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A character was found somewhere it isn't allowed, e.g., an unmatched
    /// `)` or a malformed `(?…` group header.
    #[error("unexpected character")]
    UnexpectedChar,
    /// A group was opened with `(` but never closed.
    #[error("unterminated group")]
    UnterminatedGroup,
    /// A character class was opened with `[` but never closed.
    #[error("unterminated character class")]
    UnterminatedClass,
    /// A character class has no members, e.g., `[]` or `[^]`.
    #[error("empty character class")]
    EmptyClass,
    /// A character class range is invalid: its bounds are out of order
    /// (`[z-a]`) or an endpoint is not a single character (`[a-\d]`).
    #[error("invalid character class range")]
    BadRange,
    /// Repetition bounds are invalid, e.g., `a{3,2}`.
    #[error("invalid repetition bounds")]
    BadQuantifier,
    /// The same capture group name was used more than once.
    #[error("duplicate capture group name")]
    DuplicateGroupName,
    /// A backslash escape that this engine does not recognize.
    #[error("invalid escape sequence")]
    InvalidEscape,
    /// The pattern ends with a bare `\`.
    #[error("dangling backslash")]
    TrailingBackslash,
    /// A repetition operator with no expression in front of it, e.g., `*ab`
    /// or `a**`.
    #[error("repetition operator missing an expression to repeat")]
    NothingToRepeat,
    /// Compiling the pattern would produce an NFA with more states than the
    /// configured limit permits.
    #[error("compiled NFA would exceed the limit of {limit} states")]
    TooManyStates {
        /// The configured limit on NFA states.
        limit: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_offset_and_kind() {
        let err = Error::new(ErrorKind::UnterminatedClass, 4);
        assert_eq!(
            "regex compile error at offset 4: unterminated character class",
            err.to_string(),
        );
        assert_eq!(&ErrorKind::UnterminatedClass, err.kind());
        assert_eq!(4, err.offset());
    }
}
