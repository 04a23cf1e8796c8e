//! Lexer (tokenizer) for Jack source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! The parser never looks at source text itself: any ordered token list works,
//! whether it comes from here or is assembled by hand.

use std::fmt;
use thiserror::Error;

/// Reserved words of the language. Anything else that looks like a word is an
/// identifier.
pub const KEYWORDS: [&str; 21] = [
    "class",
    "constructor",
    "function",
    "method",
    "field",
    "static",
    "var",
    "int",
    "char",
    "boolean",
    "void",
    "true",
    "false",
    "null",
    "this",
    "let",
    "do",
    "if",
    "else",
    "while",
    "return",
];

/// Single-character symbols.
pub const SYMBOLS: [char; 19] = [
    '{', '}', '(', ')', '[', ']', '.', ',', ';', '+', '-', '*', '/', '&', '|',
    '<', '>', '=', '~',
];

/// Largest value an integer constant may hold.
pub const MAX_INTEGER: u32 = 32767;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// The five lexical categories a token can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    Symbol,
    Identifier,
    IntegerConstant,
    StringConstant,
}

impl TokenKind {
    /// The label a terminal tree node carries for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Keyword => "keyword",
            TokenKind::Symbol => "symbol",
            TokenKind::Identifier => "identifier",
            TokenKind::IntegerConstant => "integerConstant",
            TokenKind::StringConstant => "stringConstant",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable terminal symbol.
///
/// Tokens produced by the [`Lexer`] carry a [`SourceLocation`]; tokens built by
/// hand usually don't, and error messages fall back to the token index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    text: String,
    location: Option<SourceLocation>,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            location: None,
        }
    }

    pub fn keyword(text: impl Into<String>) -> Self {
        Self::new(TokenKind::Keyword, text)
    }

    pub fn symbol(text: impl Into<String>) -> Self {
        Self::new(TokenKind::Symbol, text)
    }

    pub fn identifier(text: impl Into<String>) -> Self {
        Self::new(TokenKind::Identifier, text)
    }

    pub fn integer(text: impl Into<String>) -> Self {
        Self::new(TokenKind::IntegerConstant, text)
    }

    pub fn string(text: impl Into<String>) -> Self {
        Self::new(TokenKind::StringConstant, text)
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn location(&self) -> Option<SourceLocation> {
        self.location
    }

    /// True iff this token has the given kind and text.
    pub fn is(&self, kind: TokenKind, text: &str) -> bool {
        self.kind == kind && self.text == text
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.text)
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Lexer error at {location}: {message}")]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

/// Lexer for Jack source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments()?;

            if self.is_at_end() {
                break;
            }

            tokens.push(self.next_token()?);
        }

        tracing::trace!(count = tokens.len(), "tokenized source");
        Ok(tokens)
    }

    /// Get next token
    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let ch = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of file".to_string(),
            location: loc,
        })?;

        let token = match ch {
            '"' => self.string_constant(loc)?,
            '0'..='9' => self.integer_constant(ch, loc)?,
            'a'..='z' | 'A'..='Z' | '_' => self.identifier_or_keyword(ch),
            c if SYMBOLS.contains(&c) => Token::symbol(c.to_string()),
            _ => {
                return Err(LexError {
                    message: format!("Unexpected character: '{}'", ch),
                    location: loc,
                })
            }
        };

        Ok(token.with_location(loc))
    }

    /// Parse string constant; the opening quote is already consumed
    fn string_constant(&mut self, loc: SourceLocation) -> Result<Token, LexError> {
        let mut string = String::new();

        while let Some(ch) = self.peek() {
            match ch {
                '"' => {
                    self.advance(); // consume closing quote
                    return Ok(Token::string(string));
                }
                '\n' => break,
                _ => {
                    string.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError {
            message: "Unterminated string constant".to_string(),
            location: loc,
        })
    }

    /// Parse integer constant (decimal, 0..=32767)
    fn integer_constant(
        &mut self,
        first_digit: char,
        loc: SourceLocation,
    ) -> Result<Token, LexError> {
        let mut digits = String::new();
        digits.push(first_digit);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                digits.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        match digits.parse::<u32>() {
            Ok(value) if value <= MAX_INTEGER => Ok(Token::integer(digits)),
            _ => Err(LexError {
                message: format!(
                    "Integer constant out of range (0..={}): {}",
                    MAX_INTEGER, digits
                ),
                location: loc,
            }),
        }
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, first_char: char) -> Token {
        let mut word = String::new();
        word.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                word.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if KEYWORDS.contains(&word.as_str()) {
            Token::keyword(word)
        } else {
            Token::identifier(word)
        }
    }

    /// Skip whitespace and comments
    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(ch) if ch.is_whitespace() => {
                    self.advance();
                }
                Some('/') => {
                    if self.peek_ahead(1) == Some('/') {
                        self.skip_line_comment();
                    } else if self.peek_ahead(1) == Some('*') {
                        // Also covers `/** doc */` comments
                        self.skip_block_comment()?;
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Skip single-line comment (// ...)
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            self.advance();
            if ch == '\n' {
                break;
            }
        }
    }

    /// Skip multi-line comment (/* ... */)
    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start_loc = self.current_location();
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance(); // skip '*'
                self.advance(); // skip '/'
                return Ok(());
            }
            self.advance();
        }

        Err(LexError {
            message: "Unterminated block comment".to_string(),
            location: start_loc,
        })
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_and_texts(source: &str) -> Vec<(TokenKind, String)> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| (t.kind(), t.text().to_string()))
            .collect()
    }

    #[test]
    fn test_simple_tokens() {
        let tokens = Lexer::new("class Main { }").tokenize().unwrap();

        assert_eq!(tokens.len(), 4);
        assert!(tokens[0].is(TokenKind::Keyword, "class"));
        assert!(tokens[1].is(TokenKind::Identifier, "Main"));
        assert!(tokens[2].is(TokenKind::Symbol, "{"));
        assert!(tokens[3].is(TokenKind::Symbol, "}"));
    }

    #[test]
    fn test_symbols_are_single_characters() {
        let tokens = kinds_and_texts("a[i]=~x<y;");
        let texts: Vec<&str> = tokens.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(texts, ["a", "[", "i", "]", "=", "~", "x", "<", "y", ";"]);
    }

    #[test]
    fn test_comments() {
        let tokens =
            kinds_and_texts("var int x; // comment\n/** doc\n comment */ let x = 1;");

        assert_eq!(tokens[0], (TokenKind::Keyword, "var".to_string()));
        assert_eq!(tokens[3], (TokenKind::Symbol, ";".to_string()));
        assert_eq!(tokens[4], (TokenKind::Keyword, "let".to_string()));
        assert_eq!(tokens.len(), 9);
    }

    #[test]
    fn test_string_constant() {
        let tokens = kinds_and_texts(r#"do Output.printString("hello world");"#);
        assert!(tokens.contains(&(TokenKind::StringConstant, "hello world".to_string())));
    }

    #[test]
    fn test_unterminated_string() {
        let err = Lexer::new("\"abc\nlet").tokenize().unwrap_err();
        assert_eq!(err.location, SourceLocation::new(1, 1));
    }

    #[test]
    fn test_integer_range() {
        assert_eq!(
            kinds_and_texts("32767"),
            vec![(TokenKind::IntegerConstant, "32767".to_string())]
        );
        assert!(Lexer::new("32768").tokenize().is_err());
    }

    #[test]
    fn test_locations() {
        let tokens = Lexer::new("class\n  Foo").tokenize().unwrap();
        assert_eq!(tokens[0].location(), Some(SourceLocation::new(1, 1)));
        assert_eq!(tokens[1].location(), Some(SourceLocation::new(2, 3)));
    }

    #[test]
    fn test_unexpected_character() {
        let err = Lexer::new("let x = 1 % 2;").tokenize().unwrap_err();
        assert!(err.message.contains('%'));
    }
}
