/*!
Parsing of regex pattern strings into an abstract syntax tree.

This module is split in the usual way: a lexer scans the pattern into
tokens (resolving escapes and tracking whether it is inside a bracketed
class), and a recursive descent parser assembles those tokens into the
[`Ast`](ast::Ast) consumed by the Thompson compiler. Capture group indices
and names are assigned here, in the order of opening parentheses.
*/

pub mod ast;
mod lexer;
mod parser;

pub(crate) use self::parser::{parse, ParsedPattern};
