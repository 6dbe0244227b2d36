use super::*;

#[test]
fn walking_advances_limb_swing_and_age() {
    let p = find_preset("walking").unwrap();
    let mut s = EntityState::default();
    p.step(&mut s, 0.25, 0.25);
    assert_eq!(s.limb_speed, 0.6);
    assert!((s.limb_swing - 3.0).abs() < 1e-12);
    assert_eq!(s.age, 5.0);
}

#[test]
fn idle_stops_the_limbs() {
    let mut s = EntityState {
        limb_speed: 0.9,
        ..EntityState::default()
    };
    find_preset("idle").unwrap().step(&mut s, 0.1, 0.1);
    assert_eq!(s.limb_speed, 0.0);
}

#[test]
fn one_shots_finish_and_loops_never_do() {
    let attack = find_preset("attack").unwrap();
    assert!(!attack.is_finished(0.39));
    assert!(attack.is_finished(0.4));
    assert!(!find_preset("running").unwrap().is_finished(100.0));
}

#[test]
fn death_counts_up_to_twenty_ticks() {
    let p = find_preset("death").unwrap();
    let mut s = EntityState::default();
    p.step(&mut s, 0.5, 0.5);
    assert_eq!(s.death_time, 10.0);
    assert!(!s.is_alive);
    p.step(&mut s, 0.5, 2.0);
    assert_eq!(s.death_time, 20.0);
}

#[test]
fn catalog_ids_are_unique() {
    let ids: Vec<&str> = presets().iter().map(|p| p.id).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(ids.len(), sorted.len());
    assert!(find_preset("moonwalk").is_none());
}
