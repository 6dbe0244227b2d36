use super::*;

fn env() -> TriggerEnv {
    TriggerEnv::default()
}

#[test]
fn hurt_sets_timer_and_bobs_the_root() {
    let mut m = TriggerManager::default();
    let mut s = EntityState::default();
    assert!(m.play("trigger.hurt", &mut s));
    assert_eq!(s.hurt_time, 10.0);

    let f = m.update(0.25, &mut s, &env());
    assert!((f.root.position.y - 0.06).abs() < 1e-12);
    assert_eq!(s.hurt_time, 5.0);

    let f = m.update(0.3, &mut s, &env());
    assert!(f.root.is_zero());
    assert!(m.active().is_empty());
    assert_eq!(s.hurt_time, 0.0);
}

#[test]
fn unknown_ids_are_rejected() {
    let mut m = TriggerManager::default();
    let mut s = EntityState::default();
    assert!(!m.play("trigger.dance", &mut s));
    assert!(m.active().is_empty());
}

#[test]
fn death_eases_out_on_the_root() {
    let mut m = TriggerManager::default();
    let mut s = EntityState::default();
    m.play("trigger.death", &mut s);
    assert_eq!(s.death_time, 20.0);
    let f = m.update(0.5, &mut s, &env());
    let e = (std::f64::consts::FRAC_PI_4).sin();
    assert!((f.root.position.x - 0.12 * e).abs() < 1e-12);
    assert!((f.root.rotation.z - 1.1 * e).abs() < 1e-12);
}

#[test]
fn attack_drives_swing_progress_and_resets() {
    let mut m = TriggerManager::default();
    let mut s = EntityState::default();
    m.play("trigger.attack", &mut s);
    m.update(0.175, &mut s, &env());
    assert!((s.swing_progress - 1.0).abs() < 1e-12);
    m.update(0.2, &mut s, &env());
    assert_eq!(s.swing_progress, 0.0);
}

#[test]
fn concurrent_neck_triggers_accumulate() {
    let mut m = TriggerManager::default();
    let mut s = EntityState::default();
    m.play("trigger.horse_rearing", &mut s);
    m.play("trigger.eat", &mut s);
    let e = TriggerEnv {
        drives_neck: true,
        eat_rule_index: Some(3.0),
        head_rest_rx: 0.0,
    };
    let f = m.update(0.6, &mut s, &e);
    let rearing = -8.0 * (std::f64::consts::PI * 0.5).sin();
    let eating = 7.0 * (std::f64::consts::PI * 0.375).sin();
    let neck = f.bone_inputs["neck"]["ty"];
    assert!((neck - (4.0 + rearing + eating)).abs() < 1e-9);
    assert_eq!(f.state_overrides, vec![("rule_index", 3.0)]);
}

#[test]
fn eating_without_a_neck_input_lowers_the_head() {
    let mut m = TriggerManager::default();
    let mut s = EntityState::default();
    m.play("trigger.eat", &mut s);
    let e = TriggerEnv {
        head_rest_rx: 0.2,
        ..TriggerEnv::default()
    };
    let f = m.update(0.8, &mut s, &e);
    assert!((f.bone_inputs["head"]["rx"] - 1.1).abs() < 1e-12);
    assert!(!f.bone_inputs.contains_key("neck"));
}

#[test]
fn rule_index_is_recovered_from_source() {
    assert_eq!(parse_rule_index("rule_index == 4 && is_child"), Some(4.0));
    assert_eq!(parse_rule_index("in(rule_index, 1) || rule_index==12"), Some(12.0));
    assert_eq!(parse_rule_index("rule_index > 2"), None);
}

#[test]
fn catalog_durations() {
    let d: Vec<(&str, f64)> = triggers().iter().map(|t| (t.id, t.duration_sec)).collect();
    assert_eq!(
        d,
        [
            ("trigger.attack", 0.35),
            ("trigger.hurt", 0.5),
            ("trigger.death", 1.0),
            ("trigger.horse_rearing", 1.2),
            ("trigger.eat", 1.6),
        ]
    );
}
