use super::*;
use crate::eval::state::EntityState;
use crate::expression::parser::parse_expression;

fn eval_str(src: &str, ctx: &mut AnimationContext) -> Result<f64, EvalError> {
    evaluate(&parse_expression(src).unwrap(), ctx)
}

fn eval_default(src: &str) -> f64 {
    eval_str(src, &mut AnimationContext::default()).unwrap()
}

#[test]
fn arithmetic_follows_precedence() {
    assert_eq!(eval_default("1 + 2 * 3"), 7.0);
    assert_eq!(eval_default("(1 + 2) * 3"), 9.0);
    assert_eq!(eval_default("-2 * -3"), 6.0);
    assert_eq!(eval_default("7 % 4"), 3.0);
}

#[test]
fn division_and_modulo_by_zero_are_zero() {
    assert_eq!(eval_default("5/0"), 0.0);
    assert_eq!(eval_default("5%0"), 0.0);
    assert_eq!(eval_default("-5/0"), 0.0);
}

#[test]
fn comparisons_and_logic_yield_zero_or_one() {
    assert_eq!(eval_default("2 > 1"), 1.0);
    assert_eq!(eval_default("2 <= 1"), 0.0);
    assert_eq!(eval_default("3 == 3 && 1 != 2"), 1.0);
    assert_eq!(eval_default("!0"), 1.0);
    assert_eq!(eval_default("!5"), 0.0);
    assert_eq!(eval_default("0.5 || 0"), 1.0);
}

#[test]
fn logical_operators_short_circuit() {
    let mut ctx = AnimationContext::default();
    // `sin()` is an arity error if it ever runs.
    assert!(eval_str("sin()", &mut ctx).is_err());
    assert_eq!(eval_str("0 && sin()", &mut ctx).unwrap(), 0.0);
    assert_eq!(eval_str("1 || sin()", &mut ctx).unwrap(), 1.0);
    assert!(eval_str("1 && sin()", &mut ctx).is_err());
}

#[test]
fn if_pairs_scan_left_to_right() {
    assert_eq!(eval_default("if(false, 1, true, 2, 3)"), 2.0);
    assert_eq!(eval_default("if(false, 1, false, 2)"), 0.0);
    assert_eq!(eval_default("if(false, 1, false, 2, 9)"), 9.0);
    assert_eq!(eval_default("if(1, 4)"), 4.0);
    assert_eq!(eval_default("if()"), 0.0);
}

#[test]
fn if_does_not_evaluate_untaken_branches() {
    assert_eq!(eval_default("if(1, 5, sin(), 6)"), 5.0);
    assert_eq!(eval_default("if(0, sin(), 7)"), 7.0);
}

#[test]
fn ifb_coerces_to_boolean() {
    assert_eq!(eval_default("ifb(1, 5)"), 1.0);
    assert_eq!(eval_default("ifb(0, 5, 0)"), 0.0);
}

#[test]
fn variables_resolve_by_prefix() {
    let mut ctx = AnimationContext::new(EntityState {
        limb_swing: 2.5,
        is_hurt: true,
        ..EntityState::default()
    });
    ctx.variables.insert("phase".to_owned(), 4.0);
    ctx.set_bone_value("head", "rx", 0.25);
    ctx.set_bone_value("varb", "open", 1.0);

    assert_eq!(eval_str("var.phase", &mut ctx).unwrap(), 4.0);
    assert_eq!(eval_str("var.missing", &mut ctx).unwrap(), 0.0);
    assert_eq!(eval_str("render.shadow_size", &mut ctx).unwrap(), 0.0);
    assert_eq!(eval_str("head.rx", &mut ctx).unwrap(), 0.25);
    assert_eq!(eval_str("head.ry", &mut ctx).unwrap(), 0.0);
    assert_eq!(eval_str("ghost.rx", &mut ctx).unwrap(), 0.0);
    assert_eq!(eval_str("varb.open", &mut ctx).unwrap(), 1.0);
    assert_eq!(eval_str("limb_swing", &mut ctx).unwrap(), 2.5);
    assert_eq!(eval_str("is_hurt", &mut ctx).unwrap(), 1.0);
    assert_eq!(eval_str("not_a_field", &mut ctx).unwrap(), 0.0);
}

#[test]
fn random_is_cached_per_seed() {
    let mut ctx = AnimationContext::default();
    let a = eval_str("random(3)", &mut ctx).unwrap();
    let b = eval_str("random(3)", &mut ctx).unwrap();
    let c = eval_str("random(4)", &mut ctx).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!((0.0..1.0).contains(&a));
}

#[test]
fn random_defaults_to_entity_id() {
    let mut ctx = AnimationContext::new(EntityState {
        id: 17.0,
        ..EntityState::default()
    });
    let implicit = eval_str("random()", &mut ctx).unwrap();
    let explicit = eval_str("random(17)", &mut ctx).unwrap();
    assert_eq!(implicit, explicit);
}

#[test]
fn random_survives_until_cache_is_cleared() {
    let mut ctx = AnimationContext::default();
    let a = eval_str("random(11)", &mut ctx).unwrap();
    ctx.random_cache.insert(11f64.to_bits(), 0.5);
    assert_eq!(eval_str("random(11)", &mut ctx).unwrap(), 0.5);
    ctx.random_cache.clear();
    assert_eq!(eval_str("random(11)", &mut ctx).unwrap(), a);
}

#[test]
fn trig_and_conversions() {
    assert!((eval_default("torad(180)") - std::f64::consts::PI).abs() < 1e-12);
    assert!((eval_default("todeg(pi)") - 180.0).abs() < 1e-9);
    assert!((eval_default("atan2(1, 1)") - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
    assert_eq!(eval_default("lerp(2, 4, 0.5)"), 3.0);
}

#[test]
fn long_operator_chains_are_not_depth_limited() {
    let sum = vec!["1"; 300].join(" + ");
    assert_eq!(eval_default(&sum), 300.0);
    let mixed = format!("{} - 50 * 2", vec!["2"; 400].join(" + "));
    assert_eq!(eval_default(&mixed), 700.0);
    let all = vec!["1"; 300].join(" && ");
    assert_eq!(eval_default(&all), 1.0);
}

#[test]
fn chained_logic_still_short_circuits() {
    let mut ctx = AnimationContext::default();
    assert_eq!(eval_str("0 && random(1) || 0 && random(2)", &mut ctx).unwrap(), 0.0);
    assert!(ctx.random_cache.is_empty());
    assert_eq!(eval_str("0 || 1 || random(3)", &mut ctx).unwrap(), 1.0);
    assert!(ctx.random_cache.is_empty());
}
