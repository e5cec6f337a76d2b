//! Filter expression parsing.
//!
//! Precedence, loosest first:
//! - Logical: `||`, `&&`
//! - Comparison: `=`, `!=`, `<`, `<=`, `>`, `>=` (non-associative)
//! - Unary: `!`
//! - Primary: parenthesized expressions, `bound`, `EXISTS`, `NOT EXISTS`, terms

use super::Parser;
use crate::ast::*;
use crate::error::ParseResult;
use crate::lexer::TokenKind;

impl Parser {
    /// Parse an expression.
    pub(crate) fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_or()
    }

    /// The constraint after `FILTER`: a bracketed expression or a builtin.
    pub(crate) fn parse_constraint(&mut self) -> ParseResult<Expr> {
        match self.peek().kind {
            TokenKind::LParen | TokenKind::Bound | TokenKind::Exists | TokenKind::Not => {
                self.parse_primary()
            }
            _ => Err(self.unexpected("'(' or builtin call")),
        }
    }

    fn parse_or(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_and()?;

        while self.check(&TokenKind::OrOr) {
            self.advance();
            let right = self.parse_and()?;
            left = Expr::binary(BinaryOp::Or, left, right);
        }

        Ok(left)
    }

    fn parse_and(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_comparison()?;

        while self.check(&TokenKind::AndAnd) {
            self.advance();
            let right = self.parse_comparison()?;
            left = Expr::binary(BinaryOp::And, left, right);
        }

        Ok(left)
    }

    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        let left = self.parse_unary()?;

        let op = match self.peek().kind {
            TokenKind::Eq => BinaryOp::Eq,
            TokenKind::NotEq => BinaryOp::NotEq,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::LtEq => BinaryOp::LtEq,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::GtEq => BinaryOp::GtEq,
            _ => return Ok(left),
        };
        self.advance();
        let right = self.parse_unary()?;
        Ok(Expr::binary(op, left, right))
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        if self.check(&TokenKind::Bang) {
            self.advance();
            let expr = self.parse_unary()?;
            Ok(Expr::Unary(UnaryOp::Not, Box::new(expr)))
        } else {
            self.parse_primary()
        }
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        match self.peek().kind {
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::Bound => {
                self.advance();
                self.expect(&TokenKind::LParen)?;
                let var = self.expect_var()?;
                self.expect(&TokenKind::RParen)?;
                Ok(Expr::Bound(var))
            }
            TokenKind::Exists => {
                self.advance();
                Ok(Expr::Exists(self.parse_group()?))
            }
            TokenKind::Not => {
                self.advance();
                self.expect(&TokenKind::Exists)?;
                Ok(Expr::NotExists(self.parse_group()?))
            }
            _ => Ok(Expr::Term(self.parse_term()?)),
        }
    }
}
