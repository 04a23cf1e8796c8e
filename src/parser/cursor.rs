//! Read-only forward cursor over the token sequence
//!
//! The cursor only ever moves forward, one token at a time. Disambiguation that
//! needs more than the current token goes through [`Cursor::peek_next`], a
//! depth-1 lookahead that never advances.

use crate::parser::lexer::{Token, TokenKind};
use crate::parser::parse::{ParseError, Position};

pub struct Cursor {
    tokens: Vec<Token>,
    position: usize,
}

impl Cursor {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// The token at the present position, `None` once past the end.
    pub fn current(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    /// The token right after the current one.
    pub fn peek_next(&self) -> Option<&Token> {
        self.tokens.get(self.position + 1)
    }

    /// Move forward by one token. No-op at the end.
    pub fn advance(&mut self) {
        if !self.is_at_end() {
            self.position += 1;
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// Index of the current token in the sequence.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Index plus, when the lexer provided one, the source location of the
    /// current token.
    pub fn here(&self) -> Position {
        Position::new(self.position, self.current().and_then(Token::location))
    }

    pub fn check(&self, kind: TokenKind, text: &str) -> bool {
        self.current().is_some_and(|t| t.is(kind, text))
    }

    pub fn check_kind(&self, kind: TokenKind) -> bool {
        self.current().is_some_and(|t| t.kind() == kind)
    }

    /// True iff the current token has `kind` and one of the given texts.
    pub fn check_any(&self, kind: TokenKind, texts: &[&str]) -> bool {
        self.current()
            .is_some_and(|t| t.kind() == kind && texts.contains(&t.text()))
    }

    /// Consume the current token if it is `kind` with `text`.
    pub fn expect(&mut self, kind: TokenKind, text: &str) -> Result<&Token, ParseError> {
        if self.check(kind, text) {
            Ok(self.take())
        } else {
            Err(self.mismatch(format!("{kind} '{text}'")))
        }
    }

    /// Consume the current token if it is of `kind`, whatever its text.
    pub fn expect_kind(&mut self, kind: TokenKind) -> Result<&Token, ParseError> {
        if self.check_kind(kind) {
            Ok(self.take())
        } else {
            Err(self.mismatch(kind.to_string()))
        }
    }

    /// Build the error for "wanted `expected`, saw the current token".
    pub fn mismatch(&self, expected: impl Into<String>) -> ParseError {
        let expected = expected.into();
        match self.current() {
            Some(found) => ParseError::Unexpected {
                expected,
                found: found.to_string(),
                position: self.here(),
            },
            None => ParseError::UnexpectedEnd {
                expected,
                position: self.here(),
            },
        }
    }

    fn take(&mut self) -> &Token {
        let index = self.position;
        self.advance();
        &self.tokens[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor() -> Cursor {
        Cursor::new(vec![
            Token::identifier("x"),
            Token::symbol("["),
            Token::integer("0"),
        ])
    }

    #[test]
    fn test_peek_does_not_advance() {
        let c = cursor();
        assert!(c.peek_next().is_some_and(|t| t.is(TokenKind::Symbol, "[")));
        assert_eq!(c.position(), 0);
        assert!(c.check_kind(TokenKind::Identifier));
    }

    #[test]
    fn test_expect_advances_on_match() {
        let mut c = cursor();
        let token = c.expect_kind(TokenKind::Identifier).unwrap().clone();
        assert_eq!(token.text(), "x");
        assert_eq!(c.position(), 1);
    }

    #[test]
    fn test_expect_mismatch_leaves_position() {
        let mut c = cursor();
        let err = c.expect(TokenKind::Symbol, "(").unwrap_err();
        assert_eq!(c.position(), 0);
        assert_eq!(
            err.to_string(),
            "expected symbol '(', found identifier 'x' at token 0"
        );
    }

    #[test]
    fn test_advance_past_end_is_noop() {
        let mut c = cursor();
        for _ in 0..5 {
            c.advance();
        }
        assert!(c.is_at_end());
        assert_eq!(c.position(), 3);
        assert!(c.current().is_none());
        assert!(!c.check(TokenKind::Symbol, "["));
        assert!(matches!(
            c.expect_kind(TokenKind::Symbol),
            Err(ParseError::UnexpectedEnd { .. })
        ));
    }
}
