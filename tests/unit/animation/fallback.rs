use super::*;
use crate::scene::skeleton::BoneSpec;

fn skeleton(names: &[&str]) -> Skeleton {
    let mut s = Skeleton::new();
    for n in names {
        s.add_bone(BoneSpec {
            name: (*n).to_owned(),
            ..BoneSpec::default()
        })
        .unwrap();
    }
    s
}

fn rx(s: &Skeleton, name: &str) -> f64 {
    s.get(name).unwrap().rotation.x
}

#[test]
fn quadruped_gait_alternates_diagonally() {
    let mut s = skeleton(&["leg1", "leg2", "leg3", "leg4"]);
    let state = EntityState {
        limb_swing: 3.0,
        limb_speed: 0.6,
        ..EntityState::default()
    };
    animate_fallback(&mut s, &state);
    assert_eq!(rx(&s, "leg1"), rx(&s, "leg3"));
    assert_eq!(rx(&s, "leg2"), rx(&s, "leg4"));
    assert_eq!(rx(&s, "leg1"), -rx(&s, "leg2"));
    assert!(rx(&s, "leg1").abs() > 1e-4);
}

#[test]
fn head_follows_look_direction() {
    let mut s = skeleton(&["head", "body"]);
    let state = EntityState {
        head_yaw: 90.0,
        head_pitch: -45.0,
        ..EntityState::default()
    };
    animate_fallback(&mut s, &state);
    let head = s.get("head").unwrap();
    assert!((head.rotation.y - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    assert!((head.rotation.x + std::f64::consts::FRAC_PI_4).abs() < 1e-12);
    assert_eq!(s.get("body").unwrap().rotation, glam::DVec3::ZERO);
}

#[test]
fn wings_flap_in_opposition() {
    let mut s = skeleton(&["left_wing", "right_wing"]);
    let state = EntityState {
        age: 4.0,
        ..EntityState::default()
    };
    animate_fallback(&mut s, &state);
    let l = s.get("left_wing").unwrap().rotation.z;
    let r = s.get("right_wing").unwrap().rotation.z;
    assert!(l.abs() > 1e-4);
    assert_eq!(l, -r);
}
