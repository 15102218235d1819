//! Recursive-descent parser for the restricted arithmetic grammar.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/' | '%') unary)*
//! unary   := ('+' | '-') unary | power
//! power   := primary ('**' unary)?
//! primary := NUMBER | '(' expr ')'
//! ```
//!
//! Unary minus binds looser than `**`, so `-2**2` is `-(2**2)`, and `**`
//! is right-associative.

use crate::calculator::ast::{BinaryOp, Expr, UnaryOp};
use crate::calculator::lexer::Token;
use crate::error::EvalError;

/// Maximum nesting of parentheses, signs and exponents.
const MAX_DEPTH: usize = 64;

/// Input size bound, independent of nesting.
const MAX_TOKENS: usize = 2048;

pub fn parse(tokens: &[Token]) -> Result<Expr, EvalError> {
    if tokens.is_empty() {
        return Err(EvalError::Syntax("empty expression".into()));
    }
    if tokens.len() > MAX_TOKENS {
        return Err(EvalError::TooLong);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.expr()?;

    match parser.peek() {
        None => Ok(expr),
        Some(tok) => Err(EvalError::Syntax(format!("unexpected `{}`", tok))),
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.peek();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn descend(&mut self) -> Result<(), EvalError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            Err(EvalError::TooDeep)
        } else {
            Ok(())
        }
    }

    fn ascend(&mut self) {
        self.depth -= 1;
    }

    fn expr(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.term()?;
            left = Expr::binary(op, left, right);
        }
    }

    fn term(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::Percent) => BinaryOp::Rem,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.unary()?;
            left = Expr::binary(op, left, right);
        }
    }

    fn unary(&mut self) -> Result<Expr, EvalError> {
        let op = match self.peek() {
            Some(Token::Plus) => UnaryOp::Plus,
            Some(Token::Minus) => UnaryOp::Minus,
            _ => return self.power(),
        };
        self.pos += 1;

        self.descend()?;
        let operand = self.unary()?;
        self.ascend();
        Ok(Expr::unary(op, operand))
    }

    fn power(&mut self) -> Result<Expr, EvalError> {
        let base = self.primary()?;
        if self.peek() != Some(Token::StarStar) {
            return Ok(base);
        }
        self.pos += 1;

        self.descend()?;
        let exponent = self.unary()?;
        self.ascend();
        Ok(Expr::binary(BinaryOp::Pow, base, exponent))
    }

    fn primary(&mut self) -> Result<Expr, EvalError> {
        match self.next() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::LParen) => {
                self.descend()?;
                let inner = self.expr()?;
                self.ascend();
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    Some(tok) => Err(EvalError::Syntax(format!("expected `)`, found `{}`", tok))),
                    None => Err(EvalError::Syntax("unclosed `(`".into())),
                }
            }
            Some(tok) => Err(EvalError::Syntax(format!("unexpected `{}`", tok))),
            None => Err(EvalError::Syntax("unexpected end of input".into())),
        }
    }
}
