//! Declaration parsing implementation
//!
//! This module handles parsing of class members and subroutine scaffolding:
//!
//! - Class variables: `static int x, y;` / `field Point p;`
//! - Subroutines: `method void draw(int x, int y) { ... }`
//! - Parameter lists and subroutine bodies
//! - Local variables: `var int i, j;`
//!
//! # Grammar
//!
//! ```text
//! classVarDec    ::= ('static' | 'field') type varName (',' varName)* ';'
//! subroutine     ::= ('constructor' | 'function' | 'method') returnType
//!                    subroutineName '(' parameterList ')' subroutineBody
//! parameterList  ::= ((type varName) (',' type varName)*)?
//! subroutineBody ::= '{' varDec* statements '}'
//! varDec         ::= 'var' type varName (',' varName)* ';'
//! type           ::= 'int' | 'char' | 'boolean' | className
//! ```
//!
//! A `subroutine` node always carries a `parameterList` child, empty when the
//! parentheses are.

use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};
use crate::parser::tree::ParseTree;

impl Parser {
    /// classVarDec: ('static' | 'field') type varName (',' varName)* ';'
    pub fn parse_class_var_dec(&mut self) -> Result<ParseTree, ParseError> {
        self.enter("classVarDec");
        let mut node = ParseTree::nonterminal("classVarDec");

        if !self.cursor.check_any(TokenKind::Keyword, &["static", "field"]) {
            return Err(self.cursor.mismatch("'static' or 'field'"));
        }
        node.add_child(self.take_terminal("'static' or 'field'")?);

        self.parse_variable_names(&mut node)?;
        Ok(node)
    }

    /// subroutine: ('constructor' | 'function' | 'method') returnType name
    /// '(' parameterList ')' subroutineBody
    pub fn parse_subroutine(&mut self) -> Result<ParseTree, ParseError> {
        self.enter("subroutine");
        let mut node = ParseTree::nonterminal("subroutine");

        if !self
            .cursor
            .check_any(TokenKind::Keyword, &["constructor", "function", "method"])
        {
            return Err(self.cursor.mismatch("'constructor', 'function' or 'method'"));
        }
        node.add_child(self.take_terminal("subroutine kind")?);

        // Return type: any keyword (`void` included) or a class name
        if self.cursor.check_kind(TokenKind::Keyword)
            || self.cursor.check_kind(TokenKind::Identifier)
        {
            node.add_child(self.take_terminal("return type")?);
        } else {
            return Err(self.cursor.mismatch("return type"));
        }

        node.add_child(self.expect_kind_terminal(TokenKind::Identifier)?);
        node.add_child(self.expect_terminal(TokenKind::Symbol, "(")?);
        node.add_child(self.parse_parameter_list()?);
        node.add_child(self.expect_terminal(TokenKind::Symbol, ")")?);
        node.add_child(self.parse_subroutine_body()?);

        Ok(node)
    }

    /// parameterList: ((type varName) (',' type varName)*)?
    ///
    /// Stops in front of the closing `)`, which belongs to the caller.
    pub fn parse_parameter_list(&mut self) -> Result<ParseTree, ParseError> {
        self.enter("parameterList");
        let mut node = ParseTree::nonterminal("parameterList");

        if self.cursor.check(TokenKind::Symbol, ")") {
            return Ok(node);
        }

        loop {
            node.add_child(self.expect_type()?);
            node.add_child(self.expect_kind_terminal(TokenKind::Identifier)?);

            if !self.cursor.check(TokenKind::Symbol, ",") {
                break;
            }
            node.add_child(self.take_terminal("','")?);

            if self.cursor.check(TokenKind::Symbol, ")") {
                return Err(self.cursor.mismatch("parameter after ','"));
            }
        }

        Ok(node)
    }

    /// subroutineBody: '{' varDec* statements '}'
    pub fn parse_subroutine_body(&mut self) -> Result<ParseTree, ParseError> {
        self.enter("subroutineBody");
        let mut node = ParseTree::nonterminal("subroutineBody");

        node.add_child(self.expect_terminal(TokenKind::Symbol, "{")?);

        while self.cursor.check(TokenKind::Keyword, "var") {
            node.add_child(self.parse_var_dec()?);
        }

        node.add_child(self.parse_statements()?);
        node.add_child(self.expect_terminal(TokenKind::Symbol, "}")?);

        Ok(node)
    }

    /// varDec: 'var' type varName (',' varName)* ';'
    pub fn parse_var_dec(&mut self) -> Result<ParseTree, ParseError> {
        self.enter("varDec");
        let mut node = ParseTree::nonterminal("varDec");

        node.add_child(self.expect_terminal(TokenKind::Keyword, "var")?);
        self.parse_variable_names(&mut node)?;

        Ok(node)
    }

    /// The `type varName (',' varName)* ';'` tail shared by class and local
    /// variable declarations. Leaves are appended flat onto `node`.
    fn parse_variable_names(&mut self, node: &mut ParseTree) -> Result<(), ParseError> {
        node.add_child(self.expect_type()?);
        node.add_child(self.expect_kind_terminal(TokenKind::Identifier)?);

        while self.cursor.check(TokenKind::Symbol, ",") {
            node.add_child(self.take_terminal("','")?);
            node.add_child(self.expect_kind_terminal(TokenKind::Identifier)?);
        }

        node.add_child(self.expect_terminal(TokenKind::Symbol, ";")?);
        Ok(())
    }
}
