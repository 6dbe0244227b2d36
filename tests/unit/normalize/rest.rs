use super::*;
use crate::compile::compiler::compile_layers;
use crate::foundation::core::InvertAxis;
use crate::normalize::analysis::analyze;
use crate::scene::model::AnimationLayer;
use crate::scene::skeleton::{Aabb, BaseTransform, BoneSpec};
use glam::DVec3;

fn bone(name: &str, parent: Option<&str>, pos: DVec3, geometry: bool) -> BoneSpec {
    BoneSpec {
        name: name.into(),
        parent: parent.map(Into::into),
        base: BaseTransform {
            position: pos,
            rotation: DVec3::new(0.5, 0.0, 0.0),
            ..BaseTransform::default()
        },
        boxes: if geometry {
            vec![Aabb::new(DVec3::ZERO, DVec3::ONE)]
        } else {
            Vec::new()
        },
        invert_axis: InvertAxis::parse("x"),
        ..BoneSpec::default()
    }
}

fn rest_for(entries: &[(&str, &str)]) -> BoneValues {
    let mut s = Skeleton::new();
    s.add_bone(bone("root_pivot", None, DVec3::new(1.0, 1.0, 0.0), false)).unwrap();
    s.add_bone(bone("pivot", Some("root_pivot"), DVec3::new(0.5, 0.25, 0.0), false))
        .unwrap();
    s.add_bone(bone("body", None, DVec3::new(0.25, 0.5, 0.0), true)).unwrap();
    let layer: AnimationLayer = entries.iter().map(|(k, v)| (*k, *v)).collect();
    let compiled = compile_layers(&[layer]);
    let analysis = analyze(&compiled, &s, 16.0);
    build_rest_values(&s, &analysis, 16.0)
}

#[test]
fn rotation_scale_visibility_come_from_base() {
    let rest = rest_for(&[]);
    let body = &rest["body"];
    assert_eq!(body["rx"], 0.5);
    assert_eq!(body["sy"], 1.0);
    assert_eq!(body["visible"], 1.0);
    assert_eq!(body["tx"], 0.0);
}

#[test]
fn pivot_only_bones_seed_signed_local_pixels_except_at_root() {
    let rest = rest_for(&[]);
    assert_eq!(rest["root_pivot"]["tx"], 0.0);
    assert_eq!(rest["pivot"]["tx"], -8.0);
    assert_eq!(rest["pivot"]["ty"], 4.0);
}

#[test]
fn geometry_bones_seed_only_pivot_self_reads() {
    let rest = rest_for(&[
        ("body.ty", "if(is_sitting, 10, body.ty)"),
        ("body.tx", "body.tx + 4"),
        ("body.tz", "body.tz + 1"),
    ]);
    let body = &rest["body"];
    assert_eq!(body["ty"], 32.0);
    assert_eq!(body["tx"], -4.0);
    assert_eq!(body["tz"], 0.0);
}
