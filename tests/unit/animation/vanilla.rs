use super::*;

#[test]
fn quadruped_legs_pair_diagonally() {
    assert_eq!(limb_phase("leg1", false), limb_phase("leg3", false));
    assert_eq!(limb_phase("leg2", false), limb_phase("leg4", false));
    assert_eq!(limb_phase("leg1", false), Some(1.0));
    assert_eq!(limb_phase("leg2", false), Some(-1.0));
}

#[test]
fn biped_arms_oppose_their_legs() {
    assert_eq!(limb_phase("right_arm", false), Some(1.0));
    assert_eq!(limb_phase("right_leg", false), Some(-1.0));
    assert_eq!(limb_phase("left_arm", false), Some(-1.0));
    assert_eq!(limb_phase("left_leg", false), Some(1.0));
}

#[test]
fn tripod_gait_switches_front_left_phase() {
    assert_eq!(limb_phase("front_left_leg", false), Some(-1.0));
    assert_eq!(limb_phase("front_left_leg", true), Some(1.0));
    assert_eq!(limb_phase("middle_right_leg", false), None);
    assert_eq!(limb_phase("middle_right_leg", true), Some(1.0));
    assert!(uses_tripod_gait(["body", "middle_left_leg"]));
    assert!(!uses_tripod_gait(["leg1", "leg2"]));
}

#[test]
fn heads_and_wings_are_recognised() {
    assert!(is_head("headwear"));
    assert!(!is_head("body"));
    assert_eq!(wing_phase("left_wing"), Some(1.0));
    assert_eq!(wing_phase("tail"), None);
}
