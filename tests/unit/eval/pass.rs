use super::*;
use crate::compile::compiler::compile_layers;
use crate::eval::state::EntityState;
use crate::foundation::core::Axis;
use crate::scene::model::AnimationLayer;

fn run(layers: &[&[(&str, &str)]], ctx: &mut AnimationContext) -> PassOutput {
    let raw: Vec<AnimationLayer> = layers
        .iter()
        .map(|l| l.iter().map(|(k, v)| (*k, *v)).collect())
        .collect();
    let compiled = compile_layers(&raw);
    evaluate_pass(&compiled.layers, ctx)
}

#[test]
fn variables_flow_forward_only() {
    let mut ctx = AnimationContext::new(EntityState::default());
    let out = run(
        &[
            &[("a.tx", "var.later"), ("var.early", "3")],
            &[("b.tx", "var.early * 2"), ("var.later", "7")],
        ],
        &mut ctx,
    );
    assert_eq!(out.bones["a"].translate[Axis::X.index()], Some(0.0));
    assert_eq!(out.bones["b"].translate[Axis::X.index()], Some(6.0));
    assert_eq!(ctx.variable("later"), 7.0);
}

#[test]
fn bone_writes_are_readable_by_later_entries() {
    let mut ctx = AnimationContext::new(EntityState::default());
    let out = run(&[&[("head.rx", "0.5"), ("hat.rx", "head.rx + 1")]], &mut ctx);
    assert_eq!(out.written[&ChannelKey::new("hat", "rx")], 1.5);
    assert_eq!(ctx.bone_value("head", "rx"), Some(0.5));
}

#[test]
fn render_and_varb_writes_go_to_their_sinks() {
    let mut ctx = AnimationContext::new(EntityState::default());
    let out = run(
        &[&[("render.shadow", "0.25"), ("varb.flag", "5"), ("a.visible", "varb.flag")]],
        &mut ctx,
    );
    assert_eq!(out.render["shadow"], 0.25);
    assert_eq!(ctx.bone_value(VARB_BONE, "flag"), Some(1.0));
    assert_eq!(out.bones["a"].visible, Some(true));
    assert!(!out.bones.contains_key(VARB_BONE));
}

#[test]
fn failing_expressions_write_zero() {
    let mut ctx = AnimationContext::new(EntityState::default());
    let out = run(&[&[("a.sx", "sqrt(-1)"), ("a.sy", "pow(1)")]], &mut ctx);
    assert_eq!(out.bones["a"].scale, [Some(0.0), Some(0.0), None]);
}
