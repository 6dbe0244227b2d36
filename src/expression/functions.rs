use crate::expression::error::EvalError;

/// Builtin function catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// `sin(x)`
    Sin,
    /// `cos(x)`
    Cos,
    /// `tan(x)`
    Tan,
    /// `asin(x)`
    Asin,
    /// `acos(x)`
    Acos,
    /// `atan(x)`
    Atan,
    /// `atan2(y, x)`
    Atan2,
    /// `torad(deg)`
    ToRad,
    /// `todeg(rad)`
    ToDeg,
    /// `min(a, ...)`
    Min,
    /// `max(a, ...)`
    Max,
    /// `clamp(x, lo, hi)`
    Clamp,
    /// `abs(x)`
    Abs,
    /// `floor(x)`
    Floor,
    /// `ceil(x)`
    Ceil,
    /// `round(x)`
    Round,
    /// `sqrt(x)`
    Sqrt,
    /// `pow(x, y)`
    Pow,
    /// `exp(x)`
    Exp,
    /// `log(x)`
    Log,
    /// `frac(x)`
    Frac,
    /// `fmod(x, y)`
    Fmod,
    /// `signum(x)`
    Signum,
    /// `lerp(a, b, t)`
    Lerp,
    /// `if(c1, v1, [c2, v2, ...], [default])`
    If,
    /// Boolean flavour of `if`.
    Ifb,
    /// `between(x, lo, hi)`
    Between,
    /// `equals(x, v1, ...)`
    Equals,
    /// `in(x, v1, ...)`
    In,
    /// `random([seed])`
    Random,
    /// `print(x, ...)`
    Print,
    /// `printb(x, ...)`
    PrintB,
}

const CATALOG: &[(&str, Builtin)] = &[
    ("sin", Builtin::Sin),
    ("cos", Builtin::Cos),
    ("tan", Builtin::Tan),
    ("asin", Builtin::Asin),
    ("acos", Builtin::Acos),
    ("atan", Builtin::Atan),
    ("atan2", Builtin::Atan2),
    ("torad", Builtin::ToRad),
    ("todeg", Builtin::ToDeg),
    ("min", Builtin::Min),
    ("max", Builtin::Max),
    ("clamp", Builtin::Clamp),
    ("abs", Builtin::Abs),
    ("floor", Builtin::Floor),
    ("ceil", Builtin::Ceil),
    ("round", Builtin::Round),
    ("sqrt", Builtin::Sqrt),
    ("pow", Builtin::Pow),
    ("exp", Builtin::Exp),
    ("log", Builtin::Log),
    ("frac", Builtin::Frac),
    ("fmod", Builtin::Fmod),
    ("signum", Builtin::Signum),
    ("lerp", Builtin::Lerp),
    ("if", Builtin::If),
    ("ifb", Builtin::Ifb),
    ("between", Builtin::Between),
    ("equals", Builtin::Equals),
    ("in", Builtin::In),
    ("random", Builtin::Random),
    ("print", Builtin::Print),
    ("printb", Builtin::PrintB),
];

impl Builtin {
    /// Look up a builtin by its expression name.
    pub fn from_name(name: &str) -> Option<Self> {
        CATALOG.iter().find(|(n, _)| *n == name).map(|(_, b)| *b)
    }

    /// Expression name of this builtin.
    pub fn name(self) -> &'static str {
        CATALOG
            .iter()
            .find(|(_, b)| *b == self)
            .map(|(n, _)| *n)
            .unwrap_or("?")
    }

    /// Builtins whose arguments are evaluated lazily by the evaluator.
    pub(crate) fn is_lazy(self) -> bool {
        matches!(self, Self::If | Self::Ifb)
    }
}

fn arity(func: Builtin, expected: &'static str, got: usize) -> EvalError {
    EvalError::Arity {
        func: func.name(),
        expected,
        got,
    }
}

fn exactly<const N: usize>(func: Builtin, args: &[f64]) -> Result<[f64; N], EvalError> {
    let expected = match N {
        1 => "1 argument",
        2 => "2 arguments",
        _ => "3 arguments",
    };
    <[f64; N]>::try_from(args).map_err(|_| arity(func, expected, args.len()))
}

/// Apply an eagerly-evaluated builtin. `random` and the conditional builtins are handled by
/// the evaluator because they need the context or lazy arguments.
pub(crate) fn apply_pure(func: Builtin, args: &[f64]) -> Result<f64, EvalError> {
    let v = match func {
        Builtin::Sin => exactly::<1>(func, args)?[0].sin(),
        Builtin::Cos => exactly::<1>(func, args)?[0].cos(),
        Builtin::Tan => exactly::<1>(func, args)?[0].tan(),
        Builtin::Asin => exactly::<1>(func, args)?[0].asin(),
        Builtin::Acos => exactly::<1>(func, args)?[0].acos(),
        Builtin::Atan => exactly::<1>(func, args)?[0].atan(),
        Builtin::Atan2 => {
            let [y, x] = exactly::<2>(func, args)?;
            y.atan2(x)
        }
        Builtin::ToRad => exactly::<1>(func, args)?[0].to_radians(),
        Builtin::ToDeg => exactly::<1>(func, args)?[0].to_degrees(),
        Builtin::Min | Builtin::Max => {
            let Some((&first, rest)) = args.split_first() else {
                return Err(arity(func, "at least 1 argument", 0));
            };
            rest.iter().fold(first, |acc, &x| {
                if func == Builtin::Min {
                    acc.min(x)
                } else {
                    acc.max(x)
                }
            })
        }
        Builtin::Clamp => {
            let [x, lo, hi] = exactly::<3>(func, args)?;
            // `f64::clamp` panics when lo > hi; authored content does that occasionally.
            x.max(lo).min(hi)
        }
        Builtin::Abs => exactly::<1>(func, args)?[0].abs(),
        Builtin::Floor => exactly::<1>(func, args)?[0].floor(),
        Builtin::Ceil => exactly::<1>(func, args)?[0].ceil(),
        Builtin::Round => (exactly::<1>(func, args)?[0] + 0.5).floor(),
        Builtin::Sqrt => exactly::<1>(func, args)?[0].sqrt(),
        Builtin::Pow => {
            let [x, y] = exactly::<2>(func, args)?;
            x.powf(y)
        }
        Builtin::Exp => exactly::<1>(func, args)?[0].exp(),
        Builtin::Log => exactly::<1>(func, args)?[0].ln(),
        Builtin::Frac => {
            let x = exactly::<1>(func, args)?[0];
            x - x.floor()
        }
        Builtin::Fmod => {
            let [x, y] = exactly::<2>(func, args)?;
            if y == 0.0 { 0.0 } else { x - y * (x / y).floor() }
        }
        Builtin::Signum => {
            let x = exactly::<1>(func, args)?[0];
            if x > 0.0 {
                1.0
            } else if x < 0.0 {
                -1.0
            } else {
                0.0
            }
        }
        Builtin::Lerp => {
            let [a, b, t] = exactly::<3>(func, args)?;
            a + (b - a) * t
        }
        Builtin::Between => {
            let [x, lo, hi] = exactly::<3>(func, args)?;
            bool_to_f64(x >= lo && x <= hi)
        }
        Builtin::Equals | Builtin::In => {
            let Some((&x, candidates)) = args.split_first() else {
                return Err(arity(func, "at least 1 argument", 0));
            };
            bool_to_f64(candidates.iter().any(|&c| c == x))
        }
        Builtin::Print | Builtin::PrintB => args.first().copied().unwrap_or(0.0),
        // Routed through the evaluator, never here.
        Builtin::If | Builtin::Ifb | Builtin::Random => 0.0,
    };
    Ok(v)
}

pub(crate) fn bool_to_f64(b: bool) -> f64 {
    if b { 1.0 } else { 0.0 }
}

pub(crate) fn truthy(v: f64) -> bool {
    v != 0.0 && !v.is_nan()
}

#[cfg(test)]
#[path = "../../tests/unit/expression/functions.rs"]
mod tests;
