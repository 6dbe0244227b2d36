//! Vanilla naming conventions: which bones look like heads, limbs and wings, and the phase
//! each limb swings with.

const HEAD_BONES: &[&str] = &["head", "headwear", "hat", "helmet"];

/// Limb name -> swing phase (`+1` swings with the right arm, `-1` against it).
const LIMB_PHASES: &[(&str, f64)] = &[
    // Biped.
    ("right_arm", 1.0),
    ("left_arm", -1.0),
    ("right_leg", -1.0),
    ("left_leg", 1.0),
    ("right_sleeve", 1.0),
    ("left_sleeve", -1.0),
    ("right_pants", -1.0),
    ("left_pants", 1.0),
    // Quadruped, diagonal pairs.
    ("leg1", 1.0),
    ("leg2", -1.0),
    ("leg3", 1.0),
    ("leg4", -1.0),
    // Directional aliases for the same diagonal pairing.
    ("back_right_leg", 1.0),
    ("back_left_leg", -1.0),
    ("front_right_leg", 1.0),
    ("front_left_leg", -1.0),
    ("right_hind_leg", 1.0),
    ("left_hind_leg", -1.0),
    ("right_front_leg", 1.0),
    ("left_front_leg", -1.0),
    ("leg_back_right", 1.0),
    ("leg_back_left", -1.0),
    ("leg_front_right", 1.0),
    ("leg_front_left", -1.0),
    // Eight-legged rigs alternate by index.
    ("leg5", 1.0),
    ("leg6", -1.0),
    ("leg7", 1.0),
    ("leg8", -1.0),
];

/// Six-legged tripod gait: front and back of one side move with the middle of the other.
const TRIPOD_PHASES: &[(&str, f64)] = &[
    ("front_left_leg", 1.0),
    ("middle_right_leg", 1.0),
    ("back_left_leg", 1.0),
    ("front_right_leg", -1.0),
    ("middle_left_leg", -1.0),
    ("back_right_leg", -1.0),
];

const WING_PHASES: &[(&str, f64)] = &[
    ("left_wing", 1.0),
    ("right_wing", -1.0),
    ("outer_left_wing", 1.0),
    ("outer_right_wing", -1.0),
];

pub(crate) fn is_head(name: &str) -> bool {
    HEAD_BONES.contains(&name)
}

fn lookup(table: &[(&str, f64)], name: &str) -> Option<f64> {
    table.iter().find(|(n, _)| *n == name).map(|(_, p)| *p)
}

/// Swing phase for a limb. `tripod` selects the six-legged table for names it covers.
pub(crate) fn limb_phase(name: &str, tripod: bool) -> Option<f64> {
    if tripod && let Some(p) = lookup(TRIPOD_PHASES, name) {
        return Some(p);
    }
    lookup(LIMB_PHASES, name)
}

pub(crate) fn wing_phase(name: &str) -> Option<f64> {
    lookup(WING_PHASES, name)
}

/// True when the bone set carries middle legs, which switches limb phases to the tripod gait.
pub(crate) fn uses_tripod_gait<'a>(names: impl IntoIterator<Item = &'a str>) -> bool {
    names
        .into_iter()
        .any(|n| n == "middle_left_leg" || n == "middle_right_leg")
}

#[cfg(test)]
#[path = "../../tests/unit/animation/vanilla.rs"]
mod tests;
