use crate::expression::ast::{BinaryOp, Expr, UnaryOp, VarRef};
use crate::expression::error::ExprError;
use crate::expression::functions::Builtin;
use crate::expression::lexer::{Span, Token, TokenKind, lex};

const MAX_NESTING: usize = 200;

/// Parse an expression source string into an AST.
pub fn parse_expression(src: &str) -> Result<Expr, ExprError> {
    let src = src.trim();
    let tokens = lex(src)?;
    if matches!(tokens.first().map(|t| &t.kind), Some(TokenKind::Eof) | None) {
        return Err(ExprError::new(0, "empty expression"));
    }
    let mut p = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = p.parse_binary(0)?;
    p.expect(TokenKind::Eof)?;
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

fn binary_op(kind: &TokenKind) -> Option<BinaryOp> {
    Some(match kind {
        TokenKind::OrOr => BinaryOp::Or,
        TokenKind::AndAnd => BinaryOp::And,
        TokenKind::EqEq => BinaryOp::Eq,
        TokenKind::Ne => BinaryOp::Ne,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::Le => BinaryOp::Le,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::Ge => BinaryOp::Ge,
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Mod,
        _ => return None,
    })
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_kind_at(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| &t.kind)
    }

    fn bump(&mut self) -> Token {
        let t = self.tokens[self.pos].clone();
        // The trailing Eof is never consumed past.
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        t
    }

    fn span(&self) -> Span {
        self.peek().span
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), ExprError> {
        if self.peek().kind == kind {
            self.bump();
            Ok(())
        } else {
            Err(ExprError::new(
                self.span().start,
                format!("expected {kind:?}, found {:?}", self.peek().kind),
            ))
        }
    }

    fn consume(&mut self, kind: TokenKind) -> bool {
        if self.peek().kind == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn enter(&mut self) -> Result<(), ExprError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(ExprError::new(self.span().start, "expression nested too deeply"));
        }
        Ok(())
    }

    /// Precedence climbing; every operator is left-associative.
    fn parse_binary(&mut self, min_prec: u8) -> Result<Expr, ExprError> {
        self.enter()?;
        let mut lhs = self.parse_unary()?;
        while let Some(op) = binary_op(&self.peek().kind) {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.bump();
            let rhs = self.parse_binary(prec + 1)?;
            lhs = Expr::Binary {
                op,
                left: Box::new(lhs),
                right: Box::new(rhs),
            };
        }
        self.depth -= 1;
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, ExprError> {
        let op = match self.peek().kind {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Bang => Some(UnaryOp::Not),
            _ => None,
        };
        let Some(op) = op else {
            return self.parse_primary();
        };
        self.bump();
        self.enter()?;
        let operand = self.parse_unary()?;
        self.depth -= 1;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_primary(&mut self) -> Result<Expr, ExprError> {
        let t = self.bump();
        match t.kind {
            TokenKind::Number(v) => Ok(Expr::Literal(v)),
            TokenKind::Ident(name) => {
                if self.peek_kind_at(0) == Some(&TokenKind::LParen) {
                    let Some(func) = Builtin::from_name(&name) else {
                        return Err(ExprError::new(
                            t.span.start,
                            format!("unknown function '{name}'"),
                        ));
                    };
                    self.bump();
                    let args = self.parse_args()?;
                    return Ok(Expr::Call { func, args });
                }
                Ok(match name.as_str() {
                    "pi" => Expr::Literal(std::f64::consts::PI),
                    "true" => Expr::Literal(1.0),
                    "false" => Expr::Literal(0.0),
                    _ => Expr::Variable(VarRef::parse(&name)),
                })
            }
            TokenKind::LParen => {
                let e = self.parse_binary(0)?;
                self.expect(TokenKind::RParen)?;
                Ok(e)
            }
            other => Err(ExprError::new(
                t.span.start,
                format!("unexpected token {other:?}"),
            )),
        }
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>, ExprError> {
        let mut args = Vec::new();
        if self.consume(TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_binary(0)?);
            if self.consume(TokenKind::Comma) {
                continue;
            }
            self.expect(TokenKind::RParen)?;
            return Ok(args);
        }
    }
}
