use crate::eval::context::AnimationContext;
use crate::expression::ast::Expr;
use crate::expression::error::{EvalError, ExprError};
use crate::expression::eval::evaluate;
use crate::expression::parser::parse_expression;
use crate::scene::model::RawExpr;

/// An expression ready for per-frame evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum CompiledExpression {
    /// Bare numeric literal; never carries an AST.
    Constant(f64),
    /// Parsed expression with its source text.
    Ast {
        /// Source as authored.
        source: String,
        /// Parsed tree.
        ast: Expr,
    },
}

/// Compile a layer value. Numbers and numeric-literal strings take the constant fast path.
pub fn compile_expression(raw: &RawExpr) -> Result<CompiledExpression, ExprError> {
    match raw {
        RawExpr::Number(v) => Ok(CompiledExpression::Constant(*v)),
        RawExpr::Text(s) => compile_source(s),
    }
}

/// Compile expression source text.
pub fn compile_source(src: &str) -> Result<CompiledExpression, ExprError> {
    if let Some(v) = parse_numeric_literal(src) {
        return Ok(CompiledExpression::Constant(v));
    }
    let ast = parse_expression(src)?;
    Ok(CompiledExpression::Ast {
        source: src.to_owned(),
        ast,
    })
}

/// `[+-]?(digits[.digits?] | .digits)([eE][+-]?digits)?`, surrounding whitespace allowed.
///
/// `str::parse::<f64>` alone would also accept `inf`/`NaN`, which are names here.
fn parse_numeric_literal(src: &str) -> Option<f64> {
    let s = src.trim();
    let b = s.as_bytes();
    let mut i = 0;
    if i < b.len() && matches!(b[i], b'+' | b'-') {
        i += 1;
    }
    let int_start = i;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;
    if i < b.len() && b[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        digits += i - frac_start;
    }
    if digits == 0 {
        return None;
    }
    if i < b.len() && matches!(b[i], b'e' | b'E') {
        i += 1;
        if i < b.len() && matches!(b[i], b'+' | b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return None;
        }
    }
    if i != b.len() {
        return None;
    }
    s.parse().ok()
}

impl CompiledExpression {
    /// True for the constant fast path.
    pub fn is_constant(&self) -> bool {
        matches!(self, Self::Constant(_))
    }

    /// The constant, if this is one.
    pub fn constant_value(&self) -> Option<f64> {
        match self {
            Self::Constant(v) => Some(*v),
            Self::Ast { .. } => None,
        }
    }

    /// Parsed tree, unless constant.
    pub fn ast(&self) -> Option<&Expr> {
        match self {
            Self::Constant(_) => None,
            Self::Ast { ast, .. } => Some(ast),
        }
    }

    /// Original source text, unless constant.
    pub fn source(&self) -> Option<&str> {
        match self {
            Self::Constant(_) => None,
            Self::Ast { source, .. } => Some(source),
        }
    }

    /// Constant literal, or an AST that reads nothing and draws no randomness.
    pub fn is_constant_only(&self) -> bool {
        self.ast().is_none_or(Expr::is_constant_only)
    }

    /// Evaluate against `ctx`, surfacing errors.
    pub fn evaluate(&self, ctx: &mut AnimationContext) -> Result<f64, EvalError> {
        match self {
            Self::Constant(v) => Ok(*v),
            Self::Ast { ast, .. } => evaluate(ast, ctx),
        }
    }
}

/// Evaluate, substituting `default` for errors and non-finite results.
pub fn safe_evaluate(expr: &CompiledExpression, ctx: &mut AnimationContext, default: f64) -> f64 {
    match expr.evaluate(ctx) {
        Ok(v) if v.is_finite() => v,
        Ok(_) => default,
        Err(e) => {
            tracing::debug!(error = %e, source = expr.source().unwrap_or(""), "expression failed");
            default
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/compile.rs"]
mod tests;
