use crate::eval::context::BoneValues;
use crate::foundation::core::{Axis, Channel, ChannelKey};
use crate::normalize::analysis::{ChannelAnalysis, rotation_point_y_px};
use crate::scene::skeleton::Skeleton;
use std::collections::BTreeMap;

/// CEM-space rest vector for every bone, cloned into the context before each pass.
///
/// Rotation and scale are the raw base values. Translation starts at zero; geometry-less
/// bones below the root are seeded with their signed local pivot, and bones with geometry
/// only on channels whose expressions read themselves as a pivot.
pub(crate) fn build_rest_values(
    skeleton: &Skeleton,
    analysis: &ChannelAnalysis,
    ppu: f64,
) -> BoneValues {
    let mut rest = BoneValues::new();
    for (idx, bone) in skeleton.bones() {
        let mut props = BTreeMap::new();
        for axis in Axis::ALL {
            let i = axis.index();
            props.insert(Channel::Rotate(axis).name().to_owned(), bone.base.rotation[i]);
            props.insert(Channel::Scale(axis).name().to_owned(), bone.base.scale[i]);

            let local_px = bone.sign(axis) * bone.base.position[i] * ppu;
            let property = Channel::Translate(axis).name();
            let t = if !bone.has_geometry() {
                if skeleton.is_root_child(idx) { 0.0 } else { local_px }
            } else if analysis
                .pivot_seeds
                .contains(&ChannelKey::new(bone.name.clone(), property))
            {
                if axis == Axis::Y && skeleton.is_root_child(idx) {
                    rotation_point_y_px(bone, ppu)
                } else {
                    local_px
                }
            } else {
                0.0
            };
            props.insert(property.to_owned(), t);
        }
        props.insert(
            Channel::Visible.name().to_owned(),
            if bone.base.visible { 1.0 } else { 0.0 },
        );
        rest.insert(bone.name.clone(), props);
    }
    rest
}

#[cfg(test)]
#[path = "../../tests/unit/normalize/rest.rs"]
mod tests;
