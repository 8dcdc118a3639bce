//! # Python Syntax
//!
//! Just enough of the Python grammar to catalog a module without executing it.
//!
//! The [`Lexer`] turns source text into tokens the way CPython's tokenizer does
//! (including INDENT/DEDENT and implicit line joining inside brackets), and
//! [`parse_module`] walks the module scope to collect function and class
//! definitions together with their parameter lists and docstrings.
//!
//! Anything the tokenizer rejects, and any malformed `def`/`class` header, is a
//! [`SyntaxError`]. Expressions are never evaluated or fully parsed.

mod error;
mod lexer;
mod literal;
mod parser;
mod token;

pub use error::SyntaxError;
pub use lexer::Lexer;
pub use literal::decode_string;
pub use parser::{parse_module, Definition, DefinitionKind, ParsedModule};
pub use token::{StringLiteral, Token, TokenKind};
