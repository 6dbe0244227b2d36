use super::*;
use crate::compile::compiler::compile_layers;
use crate::foundation::core::InvertAxis;
use crate::scene::model::AnimationLayer;
use crate::scene::skeleton::{Aabb, BaseTransform, BoneSpec};
use glam::DVec3;

fn skeleton() -> Skeleton {
    let mut s = Skeleton::new();
    let cube = vec![Aabb::new(DVec3::splat(-0.25), DVec3::splat(0.25))];
    s.add_bone(BoneSpec {
        name: "body".into(),
        base: BaseTransform {
            position: DVec3::new(0.0, 0.75, 0.0),
            ..BaseTransform::default()
        },
        boxes: cube.clone(),
        ..BoneSpec::default()
    })
    .unwrap();
    s.add_bone(BoneSpec {
        name: "head".into(),
        parent: Some("body".into()),
        boxes: cube,
        ..BoneSpec::default()
    })
    .unwrap();
    s.add_bone(BoneSpec {
        name: "stick".into(),
        ..BoneSpec::default()
    })
    .unwrap();
    s
}

fn analyze_entries(entries: &[(&str, &str)]) -> ChannelAnalysis {
    let layer: AnimationLayer = entries.iter().map(|(k, v)| (*k, *v)).collect();
    analyze(&compile_layers(&[layer]), &skeleton(), 16.0)
}

#[test]
fn rotation_point_y_respects_invert_axis() {
    let mut s = skeleton();
    let body = s.find("body").unwrap();
    assert_eq!(rotation_point_y_px(s.bone(body), 16.0), 36.0);
    s.bone_mut(body).invert_axis = InvertAxis::parse("y");
    assert_eq!(rotation_point_y_px(s.bone(body), 16.0), 12.0);
}

#[test]
fn additive_literal_self_read_is_a_pivot_seed() {
    let a = analyze_entries(&[("body.tx", "body.tx + 4"), ("head.tx", "head.tx + 1")]);
    assert!(a.pivot_seeds.contains(&ChannelKey::new("body", "tx")));
    assert!(a.translation_self_reads.contains(&ChannelKey::new("head", "tx")));
    assert!(!a.pivot_seeds.contains(&ChannelKey::new("head", "tx")));
}

#[test]
fn pivot_sized_if_branch_is_a_pivot_seed() {
    let a = analyze_entries(&[
        ("body.ty", "if(is_sitting, 36.5, body.ty)"),
        ("head.ty", "if(is_sitting, 12, head.ty)"),
        ("head.tz", "if(is_sitting, 5, head.tz)"),
    ]);
    assert!(a.pivot_seeds.contains(&ChannelKey::new("body", "ty")));
    assert!(a.pivot_seeds.contains(&ChannelKey::new("head", "ty")));
    assert!(!a.pivot_seeds.contains(&ChannelKey::new("head", "tz")));
}

#[test]
fn rotation_self_reads_and_copies_are_found() {
    let a = analyze_entries(&[
        ("body.rx", "body.rx + sin(age)"),
        ("head.rx", "body.rx"),
        ("head.ry", "body.rx"),
    ]);
    assert!(a.rotation_self_reads.contains(&ChannelKey::new("body", "rx")));
    assert_eq!(
        a.rotation_copies.get(&ChannelKey::new("head", "rx")),
        Some(&ChannelKey::new("body", "rx"))
    );
    assert!(!a.rotation_copies.contains_key(&ChannelKey::new("head", "ry")));
}

#[test]
fn cross_reads_and_dependencies_include_variables() {
    let a = analyze_entries(&[("var.bob", "body.ty * 2"), ("head.ty", "var.bob + body.ty")]);
    let head_ty = ChannelKey::new("head", "ty");
    let deps = &a.dependencies[&head_ty];
    assert!(deps.contains(&ChannelKey::new(VAR_NODE, "bob")));
    assert!(deps.contains(&ChannelKey::new("body", "ty")));
    assert!(a.dependencies[&ChannelKey::new(VAR_NODE, "bob")].contains(&ChannelKey::new("body", "ty")));
    assert!(a.cross_reads[&head_ty].contains(&ChannelKey::new("body", "ty")));
    assert!(a.is_read_by_others(&ChannelKey::new("body", "ty")));
    assert!(a.bone_reads.contains(&ChannelKey::new("body", "ty")));
}

#[test]
fn input_only_bones_cover_placeholders_and_missing_bones() {
    let a = analyze_entries(&[("head.rx", "stick.rx + left_arm.rx"), ("body.rx", "head.rx")]);
    assert!(a.input_only_bones.contains("stick"));
    assert!(a.input_only_bones.contains("left_arm"));
    assert!(!a.input_only_bones.contains("body"));
    assert!(a.reads_input_only.contains(&ChannelKey::new("head", "rx")));
    assert!(!a.reads_input_only.contains(&ChannelKey::new("body", "rx")));
}

#[test]
fn var_targets_do_not_count_as_bone_reads() {
    let a = analyze_entries(&[("var.x", "head.rx"), ("varb.y", "body.rx > 0")]);
    assert!(a.bone_reads.is_empty());
}

#[test]
fn constant_only_and_neck_reads_are_flagged() {
    let a = analyze_entries(&[("head.ty", "2 * 3"), ("body.tx", "neck.ty"), ("body.tz", "1")]);
    assert!(a.constant_only.contains(&ChannelKey::new("head", "ty")));
    assert!(a.constant_only.contains(&ChannelKey::new("body", "tz")));
    assert!(!a.constant_only.contains(&ChannelKey::new("body", "tx")));
    assert!(a.reads_neck_ty);
    assert!(a.is_written("head", "ty"));
}
