use super::*;
use crate::compile::compiler::compile_layers;
use crate::foundation::core::InvertAxis;
use crate::scene::model::AnimationLayer;
use crate::scene::skeleton::{Aabb, BaseTransform, BoneSpec};
use glam::DVec3;

fn add(s: &mut Skeleton, name: &str, parent: Option<&str>, pos: DVec3, rot: DVec3, invert: &str) {
    s.add_bone(BoneSpec {
        name: name.into(),
        parent: parent.map(Into::into),
        base: BaseTransform {
            position: pos,
            rotation: rot,
            ..BaseTransform::default()
        },
        invert_axis: InvertAxis::parse(invert),
        boxes: vec![Aabb::new(DVec3::splat(-0.1), DVec3::splat(0.1))],
        ..BoneSpec::default()
    })
    .unwrap();
}

fn rig() -> Skeleton {
    let mut s = Skeleton::new();
    add(&mut s, "body", None, DVec3::new(0.25, 0.75, 0.0), DVec3::ZERO, "");
    add(&mut s, "head", Some("body"), DVec3::ZERO, DVec3::new(0.25, 0.0, 0.0), "");
    add(&mut s, "arm", Some("body"), DVec3::new(0.5, 0.25, 0.0), DVec3::ZERO, "xy");
    s
}

fn run(s: &mut Skeleton, entries: &[(&str, &str)]) -> Normalized {
    let layer: AnimationLayer = entries.iter().map(|(k, v)| (*k, *v)).collect();
    let compiled = compile_layers(&[layer]);
    normalize(s, &compiled, &EntityState::default(), 16.0, true)
}

#[test]
fn local_absolute_with_inverted_axes() {
    let mut s = rig();
    run(&mut s, &[("arm.tx", "if(is_sneaking, -12, -8)")]);
    let cal = &s.get("arm").unwrap().calibration;
    assert!(cal.translation_absolute[0]);
    assert_eq!(cal.translation_space[0], AbsoluteSpace::Local);
    assert_eq!(cal.translation_offset_px[0], 0.0);
}

#[test]
fn entity_absolute_when_baseline_is_the_origin() {
    let mut s = rig();
    // body.x = 4 px, arm.x = 8 px, inverted: origin -12.
    run(&mut s, &[("arm.tx", "-12 + 0 * age")]);
    let cal = &s.get("arm").unwrap().calibration;
    assert!(cal.translation_absolute[0]);
    assert_eq!(cal.translation_space[0], AbsoluteSpace::Entity);
}

#[test]
fn rotation_point_y_on_root_bone() {
    let mut s = rig();
    run(&mut s, &[("body.ty", "36 + sin(age)")]);
    let cal = &s.get("body").unwrap().calibration;
    assert!(cal.translation_absolute[1]);
    assert_eq!(cal.cem_y_origin, Some(CEM_Y_ORIGIN_PX));
    assert_eq!(cal.translation_offset_px[1], 0.0);
}

#[test]
fn plain_additive_channels_store_their_baseline() {
    let mut s = rig();
    run(&mut s, &[("head.tx", "2 + sin(age)")]);
    let cal = &s.get("head").unwrap().calibration;
    assert!(!cal.translation_absolute[0]);
    assert_eq!(cal.translation_offset_px[0], 2.0);
}

#[test]
fn pose_dependence_blocks_offsets_transitively() {
    let mut s = rig();
    let n = run(
        &mut s,
        &[
            ("body.tx", "limb_speed * 10 + 1"),
            ("var.sway", "body.tx"),
            ("head.tx", "var.sway + 1"),
        ],
    );
    assert!(n.excluded.contains(&ChannelKey::new("body", "tx")));
    assert!(n.excluded.contains(&ChannelKey::new("var", "sway")));
    assert!(n.excluded.contains(&ChannelKey::new("head", "tx")));
    assert_eq!(s.get("body").unwrap().calibration.translation_offset_px[0], 0.0);
    assert_eq!(s.get("head").unwrap().calibration.translation_offset_px[0], 0.0);
}

#[test]
fn rotation_matching_rest_is_absolute_and_copies_follow() {
    let mut s = rig();
    run(&mut s, &[("head.rx", "0.25 + sin(age)"), ("arm.rx", "head.rx")]);
    let head = &s.get("head").unwrap().calibration;
    assert!(head.rotation_absolute[0]);
    assert_eq!(head.rotation_offset[0], 0.0);
    let arm = &s.get("arm").unwrap().calibration;
    assert!(arm.rotation_absolute[0]);
    // head evaluates to 0.25 at rest; arm (rest 0, inverted X) must land on 0.
    assert!((arm.rotation_offset[0] - 0.25).abs() < 1e-12);
}

#[test]
fn reload_clears_previous_calibration() {
    let mut s = rig();
    run(&mut s, &[("head.tx", "2 + sin(age)")]);
    run(&mut s, &[("body.rx", "0")]);
    assert_eq!(s.get("head").unwrap().calibration, Calibration::default());
}
