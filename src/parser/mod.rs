//! Jack class parser
//!
//! This module turns a token sequence into a concrete [`ParseTree`]:
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`cursor`]: Forward-only position over the tokens, with one token of lookahead
//! - [`parse`]: The [`Parser`] entry points and error type
//! - [`tree`]: Parse tree nodes and rendering
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent, one method per grammar rule. Every rule
//! consumes its tokens through the cursor and returns the subtree it built;
//! subtrees are attached to their parent in grammar order.

pub mod cursor;
mod declarations;
mod expressions;
pub mod lexer;
pub mod parse;
mod statements;
pub mod tree;

pub use expressions::{BINARY_OPERATORS, KEYWORD_CONSTANTS, UNARY_OPERATORS};
pub use lexer::{LexError, Lexer, SourceLocation, Token, TokenKind};
pub use parse::{ParseError, Parser, Position, DEFAULT_MAX_DEPTH};
pub use tree::ParseTree;
