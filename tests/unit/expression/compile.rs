use super::*;
use crate::eval::state::EntityState;

#[test]
fn numeric_strings_compile_to_constants() {
    for (src, want) in [
        ("0", 0.0),
        ("12", 12.0),
        ("-3.5", -3.5),
        (" 1e3 ", 1000.0),
        ("2.5E-1", 0.25),
        (".5", 0.5),
        ("+7", 7.0),
        ("4.", 4.0),
    ] {
        let c = compile_source(src).unwrap();
        assert_eq!(c, CompiledExpression::Constant(want), "{src}");
        assert!(c.ast().is_none());
    }
}

#[test]
fn raw_numbers_compile_to_constants() {
    let c = compile_expression(&RawExpr::Number(0.75)).unwrap();
    assert_eq!(c.constant_value(), Some(0.75));
}

#[test]
fn names_that_parse_as_floats_are_not_constants() {
    for src in ["inf", "NaN", "infinity", "1e", "-", "."] {
        assert!(parse_numeric_literal(src).is_none(), "{src}");
    }
}

#[test]
fn expressions_keep_source_and_ast() {
    let c = compile_source("sin(age) * 2").unwrap();
    assert_eq!(c.source(), Some("sin(age) * 2"));
    assert!(c.ast().is_some());
    assert!(!c.is_constant_only());
}

#[test]
fn folded_arithmetic_is_constant_only() {
    let c = compile_source("2 * 8 - 1").unwrap();
    assert!(!c.is_constant());
    assert!(c.is_constant_only());
    assert!(!compile_source("random(1)").unwrap().is_constant_only());
}

#[test]
fn safe_evaluate_replaces_non_finite_and_errors() {
    let mut ctx = AnimationContext::new(EntityState::default());
    let sqrt_neg = compile_source("sqrt(-1)").unwrap();
    assert_eq!(safe_evaluate(&sqrt_neg, &mut ctx, 3.0), 3.0);
    let bad_arity = compile_source("pow(2)").unwrap();
    assert_eq!(safe_evaluate(&bad_arity, &mut ctx, -1.0), -1.0);
    let log_zero = compile_source("log(0)").unwrap();
    assert_eq!(safe_evaluate(&log_zero, &mut ctx, 0.0), 0.0);
    let ok = compile_source("1 + 1").unwrap();
    assert_eq!(safe_evaluate(&ok, &mut ctx, 0.0), 2.0);
}

#[test]
fn malformed_source_is_a_parse_error() {
    assert!(compile_source("1 +").is_err());
    assert!(compile_source("foo(").is_err());
}
