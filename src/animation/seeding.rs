use crate::animation::vanilla::{is_head, limb_phase, uses_tripod_gait};
use crate::eval::context::AnimationContext;
use crate::eval::state::EntityState;
use crate::foundation::core::{Axis, Channel, ChannelKey};
use crate::normalize::analysis::ChannelAnalysis;
use crate::scene::skeleton::Skeleton;
use std::collections::BTreeSet;

/// Which bone rotations to synthesize each pass, fixed per model.
#[derive(Debug, Clone, Default)]
pub(crate) struct SeedPlan {
    channels: BTreeSet<ChannelKey>,
    tripod: bool,
}

impl SeedPlan {
    /// Rotation channels of skeleton bones read by bone-targeting entries and never written.
    pub(crate) fn new(analysis: &ChannelAnalysis, skeleton: &Skeleton) -> Self {
        let channels = analysis
            .bone_reads
            .iter()
            .filter(|k| matches!(k.channel(), Some(Channel::Rotate(_))))
            .filter(|k| !analysis.is_written(&k.target, &k.property))
            .filter(|k| skeleton.find(&k.target).is_some())
            .cloned()
            .collect();
        let tripod = uses_tripod_gait(skeleton.bones().map(|(_, b)| b.name.as_str()));
        Self { channels, tripod }
    }

    pub(crate) fn channels(&self) -> &BTreeSet<ChannelKey> {
        &self.channels
    }

    /// Write vanilla head and limb rotations over the rest values already in `ctx`.
    pub(crate) fn apply(&self, ctx: &mut AnimationContext, skeleton: &Skeleton) {
        for key in &self.channels {
            let Some(Channel::Rotate(axis)) = key.channel() else {
                continue;
            };
            let Some(bone) = skeleton.get(&key.target) else {
                continue;
            };
            let Some(delta) = vanilla_rotation(&key.target, axis, &ctx.entity_state, self.tripod)
            else {
                continue;
            };
            let rest = ctx.bone_value(&key.target, &key.property).unwrap_or(0.0);
            let seeded = rest + bone.sign(axis) * delta;
            ctx.set_bone_value(&key.target, &key.property, seeded);
        }
    }
}

/// Procedural rotation a vanilla model would give `bone` on `axis`, radians.
pub(crate) fn vanilla_rotation(bone: &str, axis: Axis, state: &EntityState, tripod: bool) -> Option<f64> {
    if is_head(bone) {
        return match axis {
            Axis::X => Some(state.head_pitch.to_radians()),
            Axis::Y => Some(state.head_yaw.to_radians()),
            Axis::Z => None,
        };
    }
    match axis {
        Axis::X => limb_phase(bone, tripod).map(|p| p * state.swing_amount()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/seeding.rs"]
mod tests;
