//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, helper methods, and the program/class entry points.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, `program` and `class` rules
//! - `declarations`: class variables, subroutines, parameters, local variables
//! - `statements`: `let`, `if`, `while`, `do`, `return`
//! - `expressions`: expressions, terms and expression lists
//!
//! Every rule returns `Result<ParseTree, ParseError>`. The first violation is
//! propagated with `?` straight out of [`Parser::parse_program`]; nodes built so
//! far are dropped along the way and never reach the caller.
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared cursor.

use crate::parser::cursor::Cursor;
use crate::parser::lexer::{LexError, Lexer, SourceLocation, Token, TokenKind};
use crate::parser::tree::ParseTree;
use std::fmt;
use thiserror::Error;

/// Where in the token stream an error was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Index of the offending token (or the sequence length at end of input).
    pub index: usize,
    pub location: Option<SourceLocation>,
}

impl Position {
    pub fn new(index: usize, location: Option<SourceLocation>) -> Self {
        Self { index, location }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "token {}", self.index)?;
        if let Some(location) = self.location {
            write!(f, " ({location})")?;
        }
        Ok(())
    }
}

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected {expected}, found {found} at {position}")]
    Unexpected {
        expected: String,
        found: String,
        position: Position,
    },

    /// The token sequence ran out while a rule still needed tokens.
    #[error("expected {expected}, found end of input at {position}")]
    UnexpectedEnd { expected: String, position: Position },

    /// Tokens remain after the class's closing brace.
    #[error("unexpected {found} after end of class at {position}")]
    TrailingTokens { found: String, position: Position },

    /// Expressions or blocks nest deeper than the parser's limit.
    #[error("nesting deeper than {limit} levels at {position}")]
    TooDeep { limit: usize, position: Position },
}

impl ParseError {
    pub fn position(&self) -> Position {
        match self {
            ParseError::Unexpected { position, .. }
            | ParseError::UnexpectedEnd { position, .. }
            | ParseError::TrailingTokens { position, .. }
            | ParseError::TooDeep { position, .. } => *position,
        }
    }
}

/// Primitive type keywords usable wherever a `type` is expected.
pub(crate) const PRIMITIVE_TYPES: [&str; 3] = ["int", "char", "boolean"];

/// Default bound on nested `statements`, `expression` and `term` rules.
///
/// Each parenthesized sub-expression costs two levels (expression + term) and
/// each nested block one, so the default allows 128 levels of parentheses.
/// Anything deeper is reported as [`ParseError::TooDeep`] instead of running
/// the thread out of stack.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Recursive descent parser for a single Jack class
pub struct Parser {
    pub(crate) cursor: Cursor,
    depth: usize,
    max_depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            cursor: Cursor::new(tokens),
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Replace the nesting limit (see [`DEFAULT_MAX_DEPTH`]).
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Tokenize `source` and build a parser over the result.
    pub fn from_source(source: &str) -> Result<Self, LexError> {
        let tokens = Lexer::new(source).tokenize()?;
        Ok(Self::new(tokens))
    }

    /// Index of the next unconsumed token.
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Parse the whole token sequence as exactly one class.
    ///
    /// A parser drives one parse: once this returns, the cursor has moved past
    /// the class and a second call fails.
    pub fn parse_program(&mut self) -> Result<ParseTree, ParseError> {
        let result = self.parse_program_inner();
        match &result {
            Ok(tree) => tracing::debug!(nodes = tree.node_count(), "parsed class"),
            Err(err) => tracing::debug!(%err, "parse failed"),
        }
        result
    }

    fn parse_program_inner(&mut self) -> Result<ParseTree, ParseError> {
        if !self.cursor.check(TokenKind::Keyword, "class") {
            return Err(self.cursor.mismatch("keyword 'class'"));
        }

        let class = self.parse_class()?;

        if let Some(extra) = self.cursor.current() {
            return Err(ParseError::TrailingTokens {
                found: extra.to_string(),
                position: self.cursor.here(),
            });
        }

        Ok(class)
    }

    /// class: 'class' className '{' (classVarDec | subroutine)* '}'
    pub fn parse_class(&mut self) -> Result<ParseTree, ParseError> {
        self.enter("class");
        let mut node = ParseTree::nonterminal("class");

        node.add_child(self.expect_terminal(TokenKind::Keyword, "class")?);
        node.add_child(self.expect_kind_terminal(TokenKind::Identifier)?);
        node.add_child(self.expect_terminal(TokenKind::Symbol, "{")?);

        while !self.cursor.check(TokenKind::Symbol, "}") {
            if self.cursor.check_any(TokenKind::Keyword, &["static", "field"]) {
                node.add_child(self.parse_class_var_dec()?);
            } else if self
                .cursor
                .check_any(TokenKind::Keyword, &["constructor", "function", "method"])
            {
                node.add_child(self.parse_subroutine()?);
            } else {
                return Err(self.cursor.mismatch("class member or '}'"));
            }
        }

        node.add_child(self.expect_terminal(TokenKind::Symbol, "}")?);
        Ok(node)
    }

    // ===== Helper methods =====

    pub(crate) fn enter(&self, rule: &str) {
        tracing::trace!(
            rule,
            position = self.cursor.position(),
            depth = self.depth,
            "enter"
        );
    }

    /// Run a recursive rule one nesting level deeper, failing once the limit
    /// is passed.
    pub(crate) fn nested(
        &mut self,
        rule: impl FnOnce(&mut Self) -> Result<ParseTree, ParseError>,
    ) -> Result<ParseTree, ParseError> {
        if self.depth >= self.max_depth {
            return Err(ParseError::TooDeep {
                limit: self.max_depth,
                position: self.cursor.here(),
            });
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    /// Consume `kind`/`text` and return it as a leaf.
    pub(crate) fn expect_terminal(
        &mut self,
        kind: TokenKind,
        text: &str,
    ) -> Result<ParseTree, ParseError> {
        self.cursor.expect(kind, text).map(ParseTree::terminal)
    }

    /// Consume any token of `kind` and return it as a leaf.
    pub(crate) fn expect_kind_terminal(
        &mut self,
        kind: TokenKind,
    ) -> Result<ParseTree, ParseError> {
        self.cursor.expect_kind(kind).map(ParseTree::terminal)
    }

    /// Consume the current token unconditionally and return it as a leaf.
    /// Callers must already have checked that a token is present.
    pub(crate) fn take_terminal(&mut self, expected: &str) -> Result<ParseTree, ParseError> {
        let leaf = match self.cursor.current() {
            Some(token) => ParseTree::terminal(token),
            None => return Err(self.cursor.mismatch(expected)),
        };
        self.cursor.advance();
        Ok(leaf)
    }

    /// type: 'int' | 'char' | 'boolean' | className
    pub(crate) fn expect_type(&mut self) -> Result<ParseTree, ParseError> {
        if self.cursor.check_any(TokenKind::Keyword, &PRIMITIVE_TYPES)
            || self.cursor.check_kind(TokenKind::Identifier)
        {
            self.take_terminal("type")
        } else {
            Err(self.cursor.mismatch("type"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(spec: &[(TokenKind, &str)]) -> Vec<Token> {
        spec.iter().map(|(kind, text)| Token::new(*kind, *text)).collect()
    }

    #[test]
    fn test_parse_minimal_class() {
        let mut parser = Parser::new(tokens(&[
            (TokenKind::Keyword, "class"),
            (TokenKind::Identifier, "C"),
            (TokenKind::Symbol, "{"),
            (TokenKind::Symbol, "}"),
        ]));
        let tree = parser.parse_program().unwrap();

        assert_eq!(tree.label(), "class");
        assert_eq!(tree.children().len(), 4);
        assert!(tree.children().iter().all(ParseTree::is_terminal));
        assert_eq!(tree.terminal_values(), ["class", "C", "{", "}"]);
    }

    #[test]
    fn test_program_requires_class_keyword() {
        let mut parser = Parser::new(tokens(&[
            (TokenKind::Identifier, "C"),
            (TokenKind::Symbol, "{"),
            (TokenKind::Symbol, "}"),
        ]));
        let err = parser.parse_program().unwrap_err();
        assert_eq!(err.position().index, 0);
    }

    #[test]
    fn test_missing_closing_brace_is_end_of_input() {
        let mut parser = Parser::new(tokens(&[
            (TokenKind::Keyword, "class"),
            (TokenKind::Identifier, "C"),
            (TokenKind::Symbol, "{"),
        ]));
        let err = parser.parse_program().unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEnd { .. }));
        assert_eq!(err.position().index, 3);
    }

    #[test]
    fn test_unknown_member_is_rejected() {
        let mut parser = Parser::new(tokens(&[
            (TokenKind::Keyword, "class"),
            (TokenKind::Identifier, "C"),
            (TokenKind::Symbol, "{"),
            (TokenKind::Keyword, "var"),
            (TokenKind::Symbol, "}"),
        ]));
        let err = parser.parse_program().unwrap_err();
        assert_eq!(
            err.to_string(),
            "expected class member or '}', found keyword 'var' at token 3"
        );
    }

    #[test]
    fn test_trailing_tokens_are_rejected() {
        let mut parser = Parser::from_source("class A { } class B { }").unwrap();
        let err = parser.parse_program().unwrap_err();
        assert!(matches!(err, ParseError::TrailingTokens { .. }));
        assert_eq!(err.position().location, Some(SourceLocation::new(1, 13)));
    }

    #[test]
    fn test_parser_is_single_use() {
        let mut parser = Parser::from_source("class A { }").unwrap();
        assert!(parser.parse_program().is_ok());
        assert!(parser.parse_program().is_err());
    }
}
