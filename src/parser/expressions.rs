//! Expression parsing implementation
//!
//! # Grammar
//!
//! ```text
//! expression     ::= term (op term)*
//! term           ::= integerConstant | stringConstant | keywordConstant
//!                  | varName | varName '[' expression ']'
//!                  | subroutineCall | '(' expression ')' | unaryOp term
//! subroutineCall ::= subroutineName '(' expressionList ')'
//!                  | (className | varName) '.' subroutineName '(' expressionList ')'
//! expressionList ::= (expression (',' expression)*)?
//! op             ::= '+' | '-' | '*' | '/' | '&' | '|' | '<' | '>' | '='
//! unaryOp        ::= '-' | '~'
//! keywordConstant ::= 'true' | 'false' | 'null' | 'this'
//! ```
//!
//! Binary operators share a single precedence level and are recognized left to
//! right; the tree keeps them flat in an `expression` node.
//!
//! A term starting with an identifier is the only place where the current
//! token is not enough: the token after it picks array access, direct call,
//! qualified call, or plain variable. That token is inspected with
//! [`Cursor::peek_next`](crate::parser::cursor::Cursor::peek_next) before the
//! identifier is consumed, so nothing is ever rolled back.

use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};
use crate::parser::tree::ParseTree;

pub const BINARY_OPERATORS: [&str; 9] = ["+", "-", "*", "/", "&", "|", "<", ">", "="];
pub const UNARY_OPERATORS: [&str; 2] = ["-", "~"];
pub const KEYWORD_CONSTANTS: [&str; 4] = ["true", "false", "null", "this"];

/// What follows an identifier at the start of a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IdentifierTerm {
    ArrayAccess,
    Call,
    QualifiedCall,
    Variable,
}

impl Parser {
    /// expression: term (op term)*
    pub fn parse_expression(&mut self) -> Result<ParseTree, ParseError> {
        self.nested(Self::expression)
    }

    fn expression(&mut self) -> Result<ParseTree, ParseError> {
        self.enter("expression");
        let mut node = ParseTree::nonterminal("expression");

        node.add_child(self.parse_term()?);

        while self.cursor.check_any(TokenKind::Symbol, &BINARY_OPERATORS) {
            node.add_child(self.take_terminal("operator")?);
            node.add_child(self.parse_term()?);
        }

        Ok(node)
    }

    /// term: constant | varName | varName '[' expression ']' | subroutineCall
    /// | '(' expression ')' | unaryOp term
    pub fn parse_term(&mut self) -> Result<ParseTree, ParseError> {
        self.nested(Self::term)
    }

    fn term(&mut self) -> Result<ParseTree, ParseError> {
        self.enter("term");
        let mut node = ParseTree::nonterminal("term");

        if self.cursor.check_kind(TokenKind::IntegerConstant)
            || self.cursor.check_kind(TokenKind::StringConstant)
            || self.cursor.check_any(TokenKind::Keyword, &KEYWORD_CONSTANTS)
        {
            node.add_child(self.take_terminal("constant")?);
        } else if self.cursor.check(TokenKind::Symbol, "(") {
            node.add_child(self.take_terminal("'('")?);
            node.add_child(self.parse_expression()?);
            node.add_child(self.expect_terminal(TokenKind::Symbol, ")")?);
        } else if self.cursor.check_any(TokenKind::Symbol, &UNARY_OPERATORS) {
            node.add_child(self.take_terminal("unary operator")?);
            node.add_child(self.parse_term()?);
        } else if self.cursor.check_kind(TokenKind::Identifier) {
            self.parse_identifier_term(&mut node)?;
        } else {
            return Err(self.cursor.mismatch("term"));
        }

        Ok(node)
    }

    /// expressionList: (expression (',' expression)*)?
    ///
    /// Stops in front of the closing `)`, which belongs to the caller.
    pub fn parse_expression_list(&mut self) -> Result<ParseTree, ParseError> {
        self.enter("expressionList");
        let mut node = ParseTree::nonterminal("expressionList");

        if self.cursor.check(TokenKind::Symbol, ")") {
            return Ok(node);
        }

        loop {
            node.add_child(self.parse_expression()?);

            if !self.cursor.check(TokenKind::Symbol, ",") {
                break;
            }
            node.add_child(self.take_terminal("','")?);

            if self.cursor.check(TokenKind::Symbol, ")") {
                return Err(self.cursor.mismatch("expression after ','"));
            }
        }

        Ok(node)
    }

    /// Decide the identifier-led alternative from the token after the
    /// identifier, without consuming anything.
    fn classify_identifier_term(&self) -> IdentifierTerm {
        match self.cursor.peek_next() {
            Some(next) if next.is(TokenKind::Symbol, "[") => IdentifierTerm::ArrayAccess,
            Some(next) if next.is(TokenKind::Symbol, "(") => IdentifierTerm::Call,
            Some(next) if next.is(TokenKind::Symbol, ".") => IdentifierTerm::QualifiedCall,
            _ => IdentifierTerm::Variable,
        }
    }

    fn parse_identifier_term(&mut self, node: &mut ParseTree) -> Result<(), ParseError> {
        let shape = self.classify_identifier_term();
        node.add_child(self.expect_kind_terminal(TokenKind::Identifier)?);

        match shape {
            IdentifierTerm::Variable => {}
            IdentifierTerm::ArrayAccess => {
                node.add_child(self.expect_terminal(TokenKind::Symbol, "[")?);
                node.add_child(self.parse_expression()?);
                node.add_child(self.expect_terminal(TokenKind::Symbol, "]")?);
            }
            IdentifierTerm::Call => self.parse_call_arguments(node)?,
            IdentifierTerm::QualifiedCall => {
                node.add_child(self.expect_terminal(TokenKind::Symbol, ".")?);
                node.add_child(self.expect_kind_terminal(TokenKind::Identifier)?);
                self.parse_call_arguments(node)?;
            }
        }

        Ok(())
    }

    /// `'(' expressionList ')'`, appended flat onto `node`.
    fn parse_call_arguments(&mut self, node: &mut ParseTree) -> Result<(), ParseError> {
        node.add_child(self.expect_terminal(TokenKind::Symbol, "(")?);
        node.add_child(self.parse_expression_list()?);
        node.add_child(self.expect_terminal(TokenKind::Symbol, ")")?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::lexer::Token;
    use crate::parser::parse::{ParseError, Parser, DEFAULT_MAX_DEPTH};
    use crate::parser::tree::ParseTree;

    fn parenthesized(depth: usize) -> String {
        format!("{}x{}", "(".repeat(depth), ")".repeat(depth))
    }

    fn term(source: &str) -> (ParseTree, usize) {
        let mut parser = Parser::from_source(source).unwrap();
        let node = parser.parse_term().unwrap();
        (node, parser.position())
    }

    fn labels(node: &ParseTree) -> Vec<&str> {
        node.children().iter().map(|c| c.label()).collect()
    }

    #[test]
    fn test_constant_terms() {
        for (source, label) in [
            ("17", "integerConstant"),
            ("\"hi\"", "stringConstant"),
            ("true", "keyword"),
            ("null", "keyword"),
            ("this", "keyword"),
        ] {
            let (node, consumed) = term(source);
            assert_eq!(labels(&node), [label], "{source}");
            assert_eq!(consumed, 1);
        }
    }

    #[test]
    fn test_non_constant_keyword_is_not_a_term() {
        let err = Parser::from_source("int").unwrap().parse_term().unwrap_err();
        assert!(matches!(err, ParseError::Unexpected { .. }));
    }

    #[test]
    fn test_empty_string_constant_stays_terminal() {
        let (node, _) = term("\"\"");
        assert!(node.children()[0].is_terminal());
        assert_eq!(node.children()[0].value(), "");
    }

    #[test]
    fn test_bare_variable_consumes_only_identifier() {
        let (node, consumed) = term("x + 1");
        assert_eq!(node.terminal_values(), ["x"]);
        assert_eq!(consumed, 1);
    }

    #[test]
    fn test_array_access() {
        let (node, consumed) = term("a[i] = 3");
        assert_eq!(labels(&node), ["identifier", "symbol", "expression", "symbol"]);
        assert_eq!(consumed, 4);
    }

    #[test]
    fn test_direct_call() {
        let (node, consumed) = term("draw(x, y);");
        assert_eq!(
            labels(&node),
            ["identifier", "symbol", "expressionList", "symbol"]
        );
        assert_eq!(node.children()[2].children().len(), 3);
        assert_eq!(consumed, 6);
    }

    #[test]
    fn test_qualified_call() {
        let (node, consumed) = term("Math.max(a, b) * 2");
        assert_eq!(
            labels(&node),
            ["identifier", "symbol", "identifier", "symbol", "expressionList", "symbol"]
        );
        assert_eq!(consumed, 8);
    }

    #[test]
    fn test_identifier_at_end_of_input_is_variable() {
        let tokens = vec![Token::identifier("x")];
        let node = Parser::new(tokens).parse_term().unwrap();
        assert_eq!(node.terminal_values(), ["x"]);
    }

    #[test]
    fn test_parenthesized_and_unary() {
        let (node, _) = term("-(x)");
        assert_eq!(labels(&node), ["symbol", "term"]);
        let inner = &node.children()[1];
        assert_eq!(labels(inner), ["symbol", "expression", "symbol"]);

        let (node, _) = term("~~done");
        assert_eq!(node.terminal_values(), ["~", "~", "done"]);
    }

    #[test]
    fn test_expression_is_flat_left_to_right() {
        let node = Parser::from_source("1 + 2 * 3 < x")
            .unwrap()
            .parse_expression()
            .unwrap();
        assert_eq!(
            labels(&node),
            ["term", "symbol", "term", "symbol", "term", "symbol", "term"]
        );
        assert_eq!(node.terminal_values(), ["1", "+", "2", "*", "3", "<", "x"]);
    }

    #[test]
    fn test_expression_missing_operand() {
        let err = Parser::from_source("1 +")
            .unwrap()
            .parse_expression()
            .unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEnd { .. }));
    }

    #[test]
    fn test_expression_list() {
        let mut parser = Parser::from_source(")").unwrap();
        assert!(parser.parse_expression_list().unwrap().children().is_empty());
        assert_eq!(parser.position(), 0);

        let err = Parser::from_source("a, )")
            .unwrap()
            .parse_expression_list()
            .unwrap_err();
        assert!(err.to_string().starts_with("expected expression after ','"));
    }

    #[test]
    fn test_moderate_nesting_parses() {
        let node = Parser::from_source(&parenthesized(50))
            .unwrap()
            .parse_expression()
            .unwrap();
        assert_eq!(node.terminal_values().len(), 101);
    }

    #[test]
    fn test_deep_parentheses_are_rejected() {
        let err = Parser::from_source(&parenthesized(400))
            .unwrap()
            .parse_expression()
            .unwrap_err();
        match err {
            ParseError::TooDeep { limit, position } => {
                assert_eq!(limit, DEFAULT_MAX_DEPTH);
                // every '(' costs a term and an expression
                assert_eq!(position.index, DEFAULT_MAX_DEPTH / 2);
            }
            other => panic!("expected TooDeep, got {other:?}"),
        }

        let err = Parser::from_source(&parenthesized(3000))
            .unwrap()
            .parse_expression()
            .unwrap_err();
        assert!(matches!(err, ParseError::TooDeep { .. }));
    }

    #[test]
    fn test_deep_unary_chain_is_rejected() {
        let source = format!("{}x", "-".repeat(3000));
        let err = Parser::from_source(&source)
            .unwrap()
            .parse_expression()
            .unwrap_err();
        assert!(err.to_string().starts_with("nesting deeper than 256 levels"));
    }

    #[test]
    fn test_custom_max_depth() {
        let node = Parser::from_source("(x)")
            .unwrap()
            .with_max_depth(4)
            .parse_expression()
            .unwrap();
        assert_eq!(node.terminal_values(), ["(", "x", ")"]);

        let err = Parser::from_source("((x))")
            .unwrap()
            .with_max_depth(4)
            .parse_expression()
            .unwrap_err();
        assert!(matches!(err, ParseError::TooDeep { limit: 4, .. }));
        assert_eq!(err.position().index, 2);
    }
}
