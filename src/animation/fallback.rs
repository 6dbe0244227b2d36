use crate::animation::vanilla::{is_head, limb_phase, uses_tripod_gait, wing_phase};
use crate::eval::state::EntityState;
use crate::scene::skeleton::Skeleton;

const WING_FLAP_RATE: f64 = 0.4;
const WING_FLAP_AMPLITUDE: f64 = 0.6;

/// Drive common vanilla bone names straight from entity state, for models without layers.
///
/// Works on scene-space rotations on top of the rest pose; the skeleton is expected to be at
/// rest when this runs.
pub(crate) fn animate_fallback(skeleton: &mut Skeleton, state: &EntityState) {
    let tripod = uses_tripod_gait(skeleton.bones().map(|(_, b)| b.name.as_str()));
    let swing = state.swing_amount();
    let flap = (state.age * WING_FLAP_RATE).sin() * WING_FLAP_AMPLITUDE;
    let ids: Vec<_> = skeleton.bones().map(|(i, _)| i).collect();
    for idx in ids {
        let bone = skeleton.bone_mut(idx);
        if is_head(&bone.name) {
            bone.rotation.x = bone.base.rotation.x + state.head_pitch.to_radians();
            bone.rotation.y = bone.base.rotation.y + state.head_yaw.to_radians();
        } else if let Some(phase) = limb_phase(&bone.name, tripod) {
            bone.rotation.x = bone.base.rotation.x + phase * swing;
        } else if let Some(phase) = wing_phase(&bone.name) {
            bone.rotation.z = bone.base.rotation.z + phase * flap;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/fallback.rs"]
mod tests;
