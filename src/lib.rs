//! # Introduction
//!
//! A syntax-analysis front end for Jack, a small class-based language. One
//! class definition goes in as a token sequence; a concrete parse tree that
//! mirrors the grammar comes out.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Tokens → Parser → ParseTree
//! ```
//!
//! 1. [`parser::lexer`] — turns source text into [`Token`]s. Optional: any
//!    hand-built token list works just as well.
//! 2. [`parser::parse`] — the recursive-descent [`Parser`]. Parsing is
//!    fail-fast: the first grammar violation aborts with a [`ParseError`] and
//!    no tree is returned.
//! 3. [`parser::tree`] — the owned [`ParseTree`] and its text/JSON rendering.
//!
//! ```
//! use jack_parser::{parse_tokens, Token};
//!
//! let tree = parse_tokens(vec![
//!     Token::keyword("class"),
//!     Token::identifier("Main"),
//!     Token::symbol("{"),
//!     Token::symbol("}"),
//! ])
//! .unwrap();
//! assert_eq!(tree.label(), "class");
//! assert_eq!(tree.children().len(), 4);
//! ```

pub mod error;
pub mod parser;

pub use error::{Error, Result};
pub use parser::{
    LexError, Lexer, ParseError, ParseTree, Parser, Position, Token, TokenKind, DEFAULT_MAX_DEPTH,
};

/// Parse a token sequence holding exactly one class.
pub fn parse_tokens(tokens: Vec<Token>) -> std::result::Result<ParseTree, ParseError> {
    Parser::new(tokens).parse_program()
}

/// Tokenize and parse Jack source holding exactly one class.
pub fn parse_source(source: &str) -> Result<ParseTree> {
    let tree = Parser::from_source(source)?.parse_program()?;
    Ok(tree)
}
