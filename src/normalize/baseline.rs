use crate::animation::seeding::SeedPlan;
use crate::compile::compiler::CompiledAnimation;
use crate::eval::context::{AnimationContext, BoneValues};
use crate::eval::pass::evaluate_pass;
use crate::eval::state::EntityState;
use crate::foundation::core::ChannelKey;
use crate::scene::skeleton::Skeleton;
use std::collections::BTreeMap;

/// Which synthetic context a baseline was captured under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BaselineKind {
    /// Default state, first frame.
    Default,
    /// `limb_speed = 0.4`, `limb_swing = 0`.
    WalkingAlt,
    /// `is_in_water`, off the ground.
    Water,
}

impl BaselineKind {
    /// Canonical first-frame state for this capture, keeping the entity's identity.
    pub(crate) fn state(self, identity: &EntityState) -> EntityState {
        let mut s = EntityState {
            id: identity.id,
            rule_index: identity.rule_index,
            frame_counter: 1.0,
            frame_time: 0.0,
            ..EntityState::default()
        };
        match self {
            Self::Default => {}
            Self::WalkingAlt => {
                s.limb_speed = 0.4;
                s.limb_swing = 0.0;
            }
            Self::Water => {
                s.is_in_water = true;
                s.is_on_ground = false;
            }
        }
        s
    }
}

/// Written bone-channel values under the three canonical contexts.
#[derive(Debug, Clone, Default)]
pub(crate) struct Baselines {
    pub(crate) default: BTreeMap<ChannelKey, f64>,
    pub(crate) walking_alt: BTreeMap<ChannelKey, f64>,
    pub(crate) water: BTreeMap<ChannelKey, f64>,
}

impl Baselines {
    pub(crate) fn get(&self, kind: BaselineKind, key: &ChannelKey) -> Option<f64> {
        let map = match kind {
            BaselineKind::Default => &self.default,
            BaselineKind::WalkingAlt => &self.walking_alt,
            BaselineKind::Water => &self.water,
        };
        map.get(key).copied()
    }
}

/// Evaluate one pass from rest under the canonical state for `kind`.
pub(crate) fn capture(
    kind: BaselineKind,
    layers: &[Vec<CompiledAnimation>],
    skeleton: &Skeleton,
    rest: &BoneValues,
    seeds: Option<&SeedPlan>,
    identity: &EntityState,
) -> BTreeMap<ChannelKey, f64> {
    let mut ctx = AnimationContext::new(kind.state(identity));
    ctx.reset_bone_values(rest);
    if let Some(plan) = seeds {
        plan.apply(&mut ctx, skeleton);
    }
    evaluate_pass(layers, &mut ctx).written
}

pub(crate) fn capture_all(
    layers: &[Vec<CompiledAnimation>],
    skeleton: &Skeleton,
    rest: &BoneValues,
    seeds: Option<&SeedPlan>,
    identity: &EntityState,
) -> Baselines {
    let run = |kind| capture(kind, layers, skeleton, rest, seeds, identity);
    Baselines {
        default: run(BaselineKind::Default),
        walking_alt: run(BaselineKind::WalkingAlt),
        water: run(BaselineKind::Water),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/normalize/baseline.rs"]
mod tests;
