use crate::eval::context::AnimationContext;
use crate::expression::ast::{BinaryOp, Expr, UnaryOp, VarTarget};
use crate::expression::error::EvalError;
use crate::expression::functions::{Builtin, apply_pure, bool_to_f64, truthy};
use crate::foundation::math::seeded_random;
use smallvec::SmallVec;

const MAX_DEPTH: usize = 256;

/// Evaluate an AST against a context.
///
/// Division and modulo by zero yield `0`. `&&`/`||` short-circuit, as do the untaken
/// branches of `if`/`ifb`.
pub fn evaluate(expr: &Expr, ctx: &mut AnimationContext) -> Result<f64, EvalError> {
    eval_at(expr, ctx, 0)
}

fn eval_at(expr: &Expr, ctx: &mut AnimationContext, depth: usize) -> Result<f64, EvalError> {
    if depth > MAX_DEPTH {
        return Err(EvalError::TooDeep(MAX_DEPTH));
    }
    let d = depth + 1;
    match expr {
        Expr::Literal(v) => Ok(*v),
        Expr::Variable(v) => Ok(resolve(&v.target, &v.name, ctx)),
        Expr::Unary { op, operand } => {
            let x = eval_at(operand, ctx, d)?;
            Ok(match op {
                UnaryOp::Neg => -x,
                UnaryOp::Plus => x,
                UnaryOp::Not => bool_to_f64(!truthy(x)),
            })
        }
        Expr::Binary { .. } => eval_chain(expr, ctx, d),
        Expr::Call { func, args } if func.is_lazy() => {
            let v = eval_conditional(args, ctx, d)?;
            Ok(if *func == Builtin::Ifb {
                bool_to_f64(truthy(v))
            } else {
                v
            })
        }
        Expr::Call {
            func: Builtin::Random,
            args,
        } => {
            let seed = match args.as_slice() {
                [] => ctx.entity_state.id,
                [seed] => eval_at(seed, ctx, d)?,
                _ => {
                    return Err(EvalError::Arity {
                        func: "random",
                        expected: "0 or 1 arguments",
                        got: args.len(),
                    });
                }
            };
            Ok(*ctx
                .random_cache
                .entry(seed.to_bits())
                .or_insert_with(|| seeded_random(seed)))
        }
        Expr::Call { func, args } => {
            let mut vals: SmallVec<[f64; 4]> = SmallVec::with_capacity(args.len());
            for a in args {
                vals.push(eval_at(a, ctx, d)?);
            }
            apply_pure(*func, &vals)
        }
        Expr::Ternary {
            cond,
            then,
            otherwise,
        } => {
            if truthy(eval_at(cond, ctx, d)?) {
                eval_at(then, ctx, d)
            } else {
                eval_at(otherwise, ctx, d)
            }
        }
    }
}

/// Left-nested operator chains (`a + b + c ...`) are folded along their spine, so only
/// bracketed nesting counts toward the depth limit.
fn eval_chain(expr: &Expr, ctx: &mut AnimationContext, depth: usize) -> Result<f64, EvalError> {
    let mut spine: Vec<(BinaryOp, &Expr)> = Vec::new();
    let mut leftmost = expr;
    while let Expr::Binary { op, left, right } = leftmost {
        spine.push((*op, right.as_ref()));
        leftmost = left.as_ref();
    }
    let mut acc = eval_at(leftmost, ctx, depth)?;
    for (op, right) in spine.into_iter().rev() {
        acc = match op {
            BinaryOp::And if !truthy(acc) => 0.0,
            BinaryOp::Or if truthy(acc) => 1.0,
            BinaryOp::And | BinaryOp::Or => bool_to_f64(truthy(eval_at(right, ctx, depth)?)),
            _ => binary(op, acc, eval_at(right, ctx, depth)?),
        };
    }
    Ok(acc)
}

/// `if(c1, v1, c2, v2, ..., [default])`: first truthy condition wins.
fn eval_conditional(
    args: &[Expr],
    ctx: &mut AnimationContext,
    depth: usize,
) -> Result<f64, EvalError> {
    let mut pairs = args.chunks_exact(2);
    for pair in pairs.by_ref() {
        if truthy(eval_at(&pair[0], ctx, depth)?) {
            return eval_at(&pair[1], ctx, depth);
        }
    }
    match pairs.remainder() {
        [default] => eval_at(default, ctx, depth),
        _ => Ok(0.0),
    }
}

fn binary(op: BinaryOp, a: f64, b: f64) -> f64 {
    match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => {
            if b == 0.0 {
                0.0
            } else {
                a / b
            }
        }
        BinaryOp::Mod => {
            if b == 0.0 {
                0.0
            } else {
                a % b
            }
        }
        BinaryOp::Eq => bool_to_f64(a == b),
        BinaryOp::Ne => bool_to_f64(a != b),
        BinaryOp::Lt => bool_to_f64(a < b),
        BinaryOp::Le => bool_to_f64(a <= b),
        BinaryOp::Gt => bool_to_f64(a > b),
        BinaryOp::Ge => bool_to_f64(a >= b),
        // Short-circuit forms are handled before reaching here.
        BinaryOp::And => bool_to_f64(truthy(a) && truthy(b)),
        BinaryOp::Or => bool_to_f64(truthy(a) || truthy(b)),
    }
}

fn resolve(target: &VarTarget, name: &str, ctx: &mut AnimationContext) -> f64 {
    match target {
        VarTarget::Custom(n) => ctx.variable(n),
        VarTarget::Render(_) => 0.0,
        VarTarget::Bone { bone, property } => ctx.bone_value(bone, property).unwrap_or(0.0),
        VarTarget::State(n) => match ctx.entity_state.get(n) {
            Some(v) => v,
            None => {
                if ctx.note_unknown_name(name) {
                    tracing::warn!(name, "unknown name in expression, reading 0");
                }
                0.0
            }
        },
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/eval.rs"]
mod tests;
