use crate::foundation::core::BoneIdx;
use crate::scene::skeleton::{Aabb, Skeleton};
use glam::DVec3;
use std::collections::BTreeMap;

/// Torso must float above the limbs by more than this, scene units.
pub const MIN_VERTICAL_GAP: f64 = 0.03;
/// Limbs must stick out past the torso front or back by more than this, scene units.
pub const MIN_FORWARD_PROTRUSION: f64 = 0.25;

const TORSO_NAMES: &[&str] = &["body", "torso"];
const LIMB_MARKERS: &[&str] = &["leg", "arm"];

/// Local position offsets keyed by bone.
pub(crate) type RigOffsets = BTreeMap<BoneIdx, DVec3>;

/// One-shot inferred geometric correction.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) enum RigCorrection {
    #[default]
    Uninferred,
    Inferred(RigOffsets),
}

impl RigCorrection {
    /// Run inference the first time only. Returns true when a non-empty correction was
    /// produced by this call.
    pub(crate) fn infer_once(&mut self, skeleton: &Skeleton) -> bool {
        if matches!(self, Self::Inferred(_)) {
            return false;
        }
        let offsets = infer_rig_correction(skeleton);
        let engaged = !offsets.is_empty();
        *self = Self::Inferred(offsets);
        engaged
    }

    pub(crate) fn offsets(&self) -> Option<&RigOffsets> {
        match self {
            Self::Uninferred => None,
            Self::Inferred(o) => Some(o),
        }
    }
}

/// Add `offsets` to the current local positions.
pub(crate) fn apply_offsets(skeleton: &mut Skeleton, offsets: &RigOffsets) {
    for (&idx, &off) in offsets {
        skeleton.bone_mut(idx).position += off;
    }
}

fn is_torso(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    TORSO_NAMES.contains(&lower.as_str())
}

fn is_limb(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    LIMB_MARKERS.iter().any(|m| lower.contains(m))
}

/// A box-bearing bone named `body`/`torso`, else the one with the largest posed volume.
fn find_torso(skeleton: &Skeleton) -> Option<(BoneIdx, Aabb)> {
    let posed = || {
        skeleton
            .bones()
            .filter(|(_, b)| b.has_geometry())
            .filter_map(|(i, b)| skeleton.world_bounds(i).map(|bb| (i, b, bb)))
    };
    posed()
        .find(|(_, b, _)| is_torso(&b.name))
        .or_else(|| posed().max_by(|a, b| a.2.volume().total_cmp(&b.2.volume())))
        .map(|(i, _, bb)| (i, bb))
}

/// Detect a torso floating above its sibling limbs and compute the offset that seats it.
///
/// Reads posed world bounds, so world matrices must be current. Rigs whose limbs overlap
/// the torso vertically, or that don't protrude forward enough, get no correction.
pub(crate) fn infer_rig_correction(skeleton: &Skeleton) -> RigOffsets {
    let mut out = RigOffsets::new();
    let Some((torso_idx, torso)) = find_torso(skeleton) else {
        return out;
    };
    let parent = skeleton.bone(torso_idx).parent;
    let Some(limbs) = skeleton
        .bones()
        .filter(|(i, b)| {
            *i != torso_idx && b.parent == parent && is_limb(&b.name) && b.has_geometry()
        })
        .filter_map(|(i, _)| skeleton.world_bounds(i))
        .reduce(Aabb::union)
    else {
        return out;
    };

    let gap = torso.min.y - limbs.max.y;
    let protrusion = (torso.max.z - limbs.max.z).max(limbs.min.z - torso.min.z);
    tracing::debug!(gap, protrusion, "rig correction measured");
    if gap <= MIN_VERTICAL_GAP || protrusion <= MIN_FORWARD_PROTRUSION {
        return out;
    }

    let world_offset = DVec3::new(0.0, -gap, 0.0);
    let parent_world = skeleton
        .bone(torso_idx)
        .parent
        .map(|p| skeleton.bone(p).world_matrix())
        .unwrap_or_default();
    let local = parent_world.inverse().transform_vector3(world_offset);
    tracing::debug!(bone = %skeleton.bone(torso_idx).name, gap, "inferred rig correction");
    out.insert(torso_idx, local);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/rig/correction.rs"]
mod tests;
