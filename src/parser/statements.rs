//! Statement parsing implementation
//!
//! This module handles parsing of the five statement kinds:
//!
//! - `let x = e;` / `let a[i] = e;`
//! - `if (e) { ... }` with an optional `else { ... }`
//! - `while (e) { ... }`
//! - `do f(x);`
//! - `return;` / `return e;`
//!
//! # Grammar
//!
//! ```text
//! statements      ::= statement*
//! statement       ::= letStatement | ifStatement | whileStatement
//!                   | doStatement | returnStatement
//! letStatement    ::= 'let' varName ('[' expression ']')? '=' expression ';'
//! ifStatement     ::= 'if' '(' expression ')' '{' statements '}'
//!                     ('else' '{' statements '}')?
//! whileStatement  ::= 'while' '(' expression ')' '{' statements '}'
//! doStatement     ::= 'do' expression ';'
//! returnStatement ::= 'return' expression? ';'
//! ```

use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};
use crate::parser::tree::ParseTree;

impl Parser {
    /// statements: statement*
    ///
    /// Stops at the first non-keyword token (normally the enclosing `}`),
    /// which is left for the caller.
    pub fn parse_statements(&mut self) -> Result<ParseTree, ParseError> {
        self.nested(Self::statements)
    }

    fn statements(&mut self) -> Result<ParseTree, ParseError> {
        self.enter("statements");
        let mut node = ParseTree::nonterminal("statements");

        while self.cursor.check_kind(TokenKind::Keyword) {
            let statement = if self.cursor.check(TokenKind::Keyword, "let") {
                self.parse_let()?
            } else if self.cursor.check(TokenKind::Keyword, "if") {
                self.parse_if()?
            } else if self.cursor.check(TokenKind::Keyword, "while") {
                self.parse_while()?
            } else if self.cursor.check(TokenKind::Keyword, "do") {
                self.parse_do()?
            } else if self.cursor.check(TokenKind::Keyword, "return") {
                self.parse_return()?
            } else {
                return Err(self.cursor.mismatch("statement"));
            };
            node.add_child(statement);
        }

        Ok(node)
    }

    /// letStatement: 'let' varName ('[' expression ']')? '=' expression ';'
    pub fn parse_let(&mut self) -> Result<ParseTree, ParseError> {
        self.enter("letStatement");
        let mut node = ParseTree::nonterminal("letStatement");

        node.add_child(self.expect_terminal(TokenKind::Keyword, "let")?);
        node.add_child(self.expect_kind_terminal(TokenKind::Identifier)?);

        if self.cursor.check(TokenKind::Symbol, "[") {
            node.add_child(self.take_terminal("'['")?);
            node.add_child(self.parse_expression()?);
            node.add_child(self.expect_terminal(TokenKind::Symbol, "]")?);
        }

        node.add_child(self.expect_terminal(TokenKind::Symbol, "=")?);
        node.add_child(self.parse_expression()?);
        node.add_child(self.expect_terminal(TokenKind::Symbol, ";")?);

        Ok(node)
    }

    /// ifStatement: 'if' '(' expression ')' '{' statements '}'
    /// ('else' '{' statements '}')?
    pub fn parse_if(&mut self) -> Result<ParseTree, ParseError> {
        self.enter("ifStatement");
        let mut node = ParseTree::nonterminal("ifStatement");

        node.add_child(self.expect_terminal(TokenKind::Keyword, "if")?);
        self.parse_condition(&mut node)?;
        self.parse_block(&mut node)?;

        if self.cursor.check(TokenKind::Keyword, "else") {
            node.add_child(self.take_terminal("'else'")?);
            self.parse_block(&mut node)?;
        }

        Ok(node)
    }

    /// whileStatement: 'while' '(' expression ')' '{' statements '}'
    pub fn parse_while(&mut self) -> Result<ParseTree, ParseError> {
        self.enter("whileStatement");
        let mut node = ParseTree::nonterminal("whileStatement");

        node.add_child(self.expect_terminal(TokenKind::Keyword, "while")?);
        self.parse_condition(&mut node)?;
        self.parse_block(&mut node)?;

        Ok(node)
    }

    /// doStatement: 'do' expression ';'
    ///
    /// The grammar intends a subroutine call here; any expression is accepted.
    pub fn parse_do(&mut self) -> Result<ParseTree, ParseError> {
        self.enter("doStatement");
        let mut node = ParseTree::nonterminal("doStatement");

        node.add_child(self.expect_terminal(TokenKind::Keyword, "do")?);
        node.add_child(self.parse_expression()?);
        node.add_child(self.expect_terminal(TokenKind::Symbol, ";")?);

        Ok(node)
    }

    /// returnStatement: 'return' expression? ';'
    pub fn parse_return(&mut self) -> Result<ParseTree, ParseError> {
        self.enter("returnStatement");
        let mut node = ParseTree::nonterminal("returnStatement");

        node.add_child(self.expect_terminal(TokenKind::Keyword, "return")?);

        if !self.cursor.check(TokenKind::Symbol, ";") {
            node.add_child(self.parse_expression()?);
        }

        node.add_child(self.expect_terminal(TokenKind::Symbol, ";")?);

        Ok(node)
    }

    /// `'(' expression ')'`, appended flat onto `node`.
    fn parse_condition(&mut self, node: &mut ParseTree) -> Result<(), ParseError> {
        node.add_child(self.expect_terminal(TokenKind::Symbol, "(")?);
        node.add_child(self.parse_expression()?);
        node.add_child(self.expect_terminal(TokenKind::Symbol, ")")?);
        Ok(())
    }

    /// `'{' statements '}'`, appended flat onto `node`.
    fn parse_block(&mut self, node: &mut ParseTree) -> Result<(), ParseError> {
        node.add_child(self.expect_terminal(TokenKind::Symbol, "{")?);
        node.add_child(self.parse_statements()?);
        node.add_child(self.expect_terminal(TokenKind::Symbol, "}")?);
        Ok(())
    }
}
