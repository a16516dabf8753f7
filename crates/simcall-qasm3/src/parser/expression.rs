//! Expression parsing for QASM3.

use super::Parser;
use crate::ast::{BinOp, Expression, MathConstant, UnaryOp};
use crate::error::{ParseError, ParseResult};
use crate::lexer::Token;

impl Parser {
    /// Parse an expression.
    pub(super) fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.parse_binary_expr(0)
    }

    /// Parse binary expression with precedence climbing.
    fn parse_binary_expr(&mut self, min_prec: u8) -> ParseResult<Expression> {
        let mut left = self.parse_unary_expr()?;

        while let Some(op) = self.peek_binary_op() {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.advance(); // consume operator

            let right = self.parse_binary_expr(prec + 1)?;
            left = Expression::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// `-e` and `!e`.
    fn parse_unary_expr(&mut self) -> ParseResult<Expression> {
        let op = if self.consume(&Token::Minus) {
            UnaryOp::Neg
        } else if self.consume(&Token::Not) {
            UnaryOp::Not
        } else {
            return self.parse_primary_expr();
        };
        let operand = self.parse_unary_expr()?;
        Ok(Expression::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    /// Parse primary expression.
    fn parse_primary_expr(&mut self) -> ParseResult<Expression> {
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| ParseError::UnexpectedEnd("expression".into()))?;

        match token {
            Token::IntLiteral(v) => {
                self.advance();
                let v = i64::try_from(v).map_err(|_| ParseError::UnexpectedToken {
                    line: self.line(),
                    expected: "integer below 2^63".into(),
                    found: v.to_string(),
                })?;
                Ok(Expression::Int(v))
            }
            Token::FloatLiteral(v) => {
                self.advance();
                Ok(Expression::Float(v))
            }
            Token::Pi => {
                self.advance();
                Ok(Expression::Constant(MathConstant::Pi))
            }
            Token::Tau => {
                self.advance();
                Ok(Expression::Constant(MathConstant::Tau))
            }
            Token::Euler => {
                self.advance();
                Ok(Expression::Constant(MathConstant::Euler))
            }
            Token::True => {
                self.advance();
                Ok(Expression::Bool(true))
            }
            Token::False => {
                self.advance();
                Ok(Expression::Bool(false))
            }
            Token::Identifier(name) => {
                self.advance();
                if self.consume(&Token::LParen) {
                    let args = self.parse_expression_list()?;
                    self.expect(Token::RParen)?;
                    Ok(Expression::Call {
                        function: name,
                        args,
                    })
                } else if self.consume(&Token::LBracket) {
                    let index = self.parse_expression()?;
                    self.expect(Token::RBracket)?;
                    Ok(Expression::Index {
                        register: name,
                        index: Box::new(index),
                    })
                } else {
                    Ok(Expression::Ident(name))
                }
            }
            Token::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }
            _ => {
                self.advance();
                Err(self.unexpected("expression", &token))
            }
        }
    }

    /// Peek at binary operator.
    fn peek_binary_op(&self) -> Option<BinOp> {
        match self.peek()? {
            Token::Plus => Some(BinOp::Add),
            Token::Minus => Some(BinOp::Sub),
            Token::Star => Some(BinOp::Mul),
            Token::Slash => Some(BinOp::Div),
            Token::Percent => Some(BinOp::Mod),
            Token::Power => Some(BinOp::Pow),
            Token::EqEq => Some(BinOp::Eq),
            Token::NotEq => Some(BinOp::NotEq),
            Token::Lt => Some(BinOp::Lt),
            Token::LtEq => Some(BinOp::LtEq),
            Token::Gt => Some(BinOp::Gt),
            Token::GtEq => Some(BinOp::GtEq),
            Token::And => Some(BinOp::And),
            Token::Or => Some(BinOp::Or),
            Token::Ampersand => Some(BinOp::BitAnd),
            Token::Pipe => Some(BinOp::BitOr),
            Token::Caret => Some(BinOp::BitXor),
            Token::LShift => Some(BinOp::LShift),
            Token::RShift => Some(BinOp::RShift),
            _ => None,
        }
    }

    /// Parse a parenthesized argument list, without the parentheses.
    pub(super) fn parse_expression_list(&mut self) -> ParseResult<Vec<Expression>> {
        self.parse_expression_list_until(&Token::RParen)
    }

    /// Parse comma-separated expressions up to, not including, `close`.
    pub(super) fn parse_expression_list_until(
        &mut self,
        close: &Token,
    ) -> ParseResult<Vec<Expression>> {
        if self.check(close) {
            return Ok(vec![]);
        }
        let mut exprs = vec![self.parse_expression()?];
        while self.consume(&Token::Comma) {
            exprs.push(self.parse_expression()?);
        }
        Ok(exprs)
    }
}
