use super::*;
use crate::compile::compiler::compile_layers;
use crate::scene::model::AnimationLayer;

fn layers(entries: &[(&str, &str)]) -> Vec<Vec<CompiledAnimation>> {
    let layer: AnimationLayer = entries.iter().map(|(k, v)| (*k, *v)).collect();
    compile_layers(&[layer]).layers
}

#[test]
fn three_contexts_see_their_inputs() {
    let l = layers(&[
        ("a.ty", "limb_speed * 10"),
        ("a.rx", "if(is_in_water, 0.1, 1.5)"),
        ("a.tz", "frame_counter + frame_time"),
    ]);
    let b = capture_all(&l, &Skeleton::new(), &BoneValues::new(), None, &EntityState::default());
    let ty = ChannelKey::new("a", "ty");
    let rx = ChannelKey::new("a", "rx");
    assert_eq!(b.get(BaselineKind::Default, &ty), Some(0.0));
    assert_eq!(b.get(BaselineKind::WalkingAlt, &ty), Some(4.0));
    assert_eq!(b.get(BaselineKind::Default, &rx), Some(1.5));
    assert_eq!(b.get(BaselineKind::Water, &rx), Some(0.1));
    assert_eq!(b.get(BaselineKind::Default, &ChannelKey::new("a", "tz")), Some(1.0));
}

#[test]
fn captures_start_from_rest_values() {
    let l = layers(&[("a.tx", "b.tx + 1")]);
    let mut rest = BoneValues::new();
    rest.entry("b".into()).or_default().insert("tx".into(), 5.0);
    let b = capture_all(&l, &Skeleton::new(), &rest, None, &EntityState::default());
    assert_eq!(b.default[&ChannelKey::new("a", "tx")], 6.0);
}

#[test]
fn identity_survives_into_the_canonical_state() {
    let id = EntityState {
        id: 42.0,
        limb_speed: 0.9,
        ..EntityState::default()
    };
    let s = BaselineKind::Default.state(&id);
    assert_eq!(s.id, 42.0);
    assert_eq!(s.limb_speed, 0.0);
    assert_eq!(s.frame_counter, 1.0);
}
