use crate::foundation::core::Axis;
use crate::normalize::thresholds::{
    ABSOLUTE_MATCH_PX, ENTITY_MIN_PX, LOCAL_MIN_PX, PARENT_ORIGIN_CANCEL_PX, POSE_DEPENDENT_PX,
    SMALL_SHARED_TY_PX,
};

/// Outcome for one animated translation axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum TranslationClass {
    /// Absolute, relative to the model root.
    Entity,
    /// Absolute Y measured from the 24 px rotation-point origin.
    RotationPointY,
    /// Absolute, relative to the parent.
    Local,
    /// Additive; the baseline is subtracted at apply time.
    Offset(f64),
    /// Additive with no correction.
    Plain,
}

/// Everything the classifier needs about one bone axis, in CEM pixels.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TranslationFacts {
    pub(crate) axis: Axis,
    pub(crate) baseline: f64,
    pub(crate) sign: f64,
    /// Entity-space pivot on this axis.
    pub(crate) origin_px: f64,
    /// Signed rest position relative to the parent.
    pub(crate) local_px: f64,
    pub(crate) is_root_child: bool,
    /// Rotation-point Y of the bone (only read for Y).
    pub(crate) rotation_point_y: f64,
    /// Parent's entity-space pivot Y, for non-root bones.
    pub(crate) parent_origin_y: Option<f64>,
    /// Pose-dependent, input-derived or small shared channel, after propagation.
    pub(crate) excluded: bool,
    pub(crate) constant_only: bool,
}

pub(crate) fn is_entity_absolute(axis: Axis, baseline: f64, origin_px: f64) -> bool {
    axis != Axis::Y
        && baseline.abs() >= ENTITY_MIN_PX
        && (baseline - origin_px).abs() <= ABSOLUTE_MATCH_PX
}

pub(crate) fn is_rotation_point_y(
    axis: Axis,
    is_root_child: bool,
    baseline: f64,
    rotation_point_y: f64,
) -> bool {
    axis == Axis::Y && is_root_child && (baseline - rotation_point_y).abs() <= ABSOLUTE_MATCH_PX
}

pub(crate) fn is_local_absolute(baseline: f64, local_px: f64) -> bool {
    baseline.abs() >= LOCAL_MIN_PX && (baseline - local_px).abs() <= ABSOLUTE_MATCH_PX
}

pub(crate) fn is_pose_dependent(default: f64, walking_alt: f64) -> bool {
    (default - walking_alt).abs() > POSE_DEPENDENT_PX
}

pub(crate) fn is_small_shared_ty(axis: Axis, baseline: f64, read_by_others: bool) -> bool {
    axis == Axis::Y && read_by_others && baseline.abs() < SMALL_SHARED_TY_PX
}

/// A child's Y baseline that undoes its parent's pivot height.
pub(crate) fn cancels_parent_origin(
    axis: Axis,
    sign: f64,
    baseline: f64,
    parent_origin_y: Option<f64>,
) -> bool {
    axis == Axis::Y
        && parent_origin_y
            .is_some_and(|p| (sign * baseline + p).abs() <= PARENT_ORIGIN_CANCEL_PX)
}

/// First matching rule wins: entity, rotation point, local, then additive offset.
pub(crate) fn classify_translation(f: &TranslationFacts) -> TranslationClass {
    if is_entity_absolute(f.axis, f.baseline, f.origin_px) {
        return TranslationClass::Entity;
    }
    if is_rotation_point_y(f.axis, f.is_root_child, f.baseline, f.rotation_point_y) {
        return TranslationClass::RotationPointY;
    }
    if is_local_absolute(f.baseline, f.local_px) {
        return TranslationClass::Local;
    }
    if f.excluded {
        return TranslationClass::Plain;
    }
    if !f.constant_only || cancels_parent_origin(f.axis, f.sign, f.baseline, f.parent_origin_y) {
        return TranslationClass::Offset(f.baseline);
    }
    TranslationClass::Plain
}

#[cfg(test)]
#[path = "../../tests/unit/normalize/translation.rs"]
mod tests;
