use crate::animation::seeding::SeedPlan;
use crate::compile::compiler::CompiledLayers;
use crate::eval::context::BoneValues;
use crate::eval::state::EntityState;
use crate::foundation::core::{Axis, BoneIdx, Channel, ChannelKey};
use crate::normalize::analysis::{ChannelAnalysis, analyze, rotation_point_y_px};
use crate::normalize::baseline::{BaselineKind, Baselines, capture_all};
use crate::normalize::propagate::propagate_flags;
use crate::normalize::rest::build_rest_values;
use crate::normalize::rotation::{RotationClass, RotationFacts, classify_rotation, inherit_copy};
use crate::normalize::thresholds::CEM_Y_ORIGIN_PX;
use crate::normalize::translation::{
    TranslationClass, TranslationFacts, classify_translation, is_pose_dependent,
    is_small_shared_ty,
};
use crate::scene::skeleton::{AbsoluteSpace, Calibration, Skeleton};
use std::collections::BTreeSet;

/// Everything derived once per model (and again on reload).
#[derive(Debug, Clone, Default)]
pub(crate) struct Normalized {
    pub(crate) analysis: ChannelAnalysis,
    pub(crate) rest: BoneValues,
    pub(crate) seeds: SeedPlan,
    pub(crate) baselines: Baselines,
    /// Channels never given a baseline offset, after propagation.
    pub(crate) excluded: BTreeSet<ChannelKey>,
}

/// Analyze the layers, capture baselines and write calibration onto every animated bone.
#[tracing::instrument(skip_all, fields(bones = skeleton.len(), layers = compiled.layers.len()))]
pub(crate) fn normalize(
    skeleton: &mut Skeleton,
    compiled: &CompiledLayers,
    identity: &EntityState,
    ppu: f64,
    seeding: bool,
) -> Normalized {
    let analysis = analyze(compiled, skeleton, ppu);
    for name in &analysis.animated_bones {
        if skeleton.find(name).is_none() {
            tracing::warn!(bone = %name, "animation targets a bone missing from the skeleton");
        }
    }
    let rest = build_rest_values(skeleton, &analysis, ppu);
    let seeds = SeedPlan::new(&analysis, skeleton);
    tracing::debug!(seeded = seeds.channels().len(), "vanilla input seeding plan");
    let baselines = capture_all(
        &compiled.layers,
        skeleton,
        &rest,
        seeding.then_some(&seeds),
        identity,
    );
    let excluded = excluded_channels(&analysis, &baselines);

    let ids: Vec<BoneIdx> = skeleton.bones().map(|(i, _)| i).collect();
    for &idx in &ids {
        let cal = {
            let mut cal = Calibration::default();
            calibrate_translation(&mut cal, skeleton, idx, compiled, &analysis, &baselines, &excluded, ppu);
            calibrate_rotation(&mut cal, skeleton, idx, compiled, &analysis, &baselines, ppu);
            cal
        };
        skeleton.bone_mut(idx).calibration = cal;
    }
    resolve_rotation_copies(skeleton, &analysis);

    Normalized {
        analysis,
        rest,
        seeds,
        baselines,
        excluded,
    }
}

/// Pose-dependent, small shared `ty` and input-derived channels, closed over dependencies.
pub(crate) fn excluded_channels(
    analysis: &ChannelAnalysis,
    baselines: &Baselines,
) -> BTreeSet<ChannelKey> {
    let mut seeds = analysis.reads_input_only.clone();
    for (key, &default) in &baselines.default {
        let Some(Channel::Translate(axis)) = key.channel() else {
            continue;
        };
        let walking = baselines.get(BaselineKind::WalkingAlt, key).unwrap_or(default);
        if is_pose_dependent(default, walking) {
            tracing::debug!(channel = %key, default, walking, "pose-dependent channel");
            seeds.insert(key.clone());
        } else if is_small_shared_ty(axis, default, analysis.is_read_by_others(key)) {
            tracing::debug!(channel = %key, default, "small shared ty channel");
            seeds.insert(key.clone());
        }
    }
    propagate_flags(&seeds, &analysis.dependencies)
}

#[allow(clippy::too_many_arguments)]
fn calibrate_translation(
    cal: &mut Calibration,
    skeleton: &Skeleton,
    idx: BoneIdx,
    compiled: &CompiledLayers,
    analysis: &ChannelAnalysis,
    baselines: &Baselines,
    excluded: &BTreeSet<ChannelKey>,
    ppu: f64,
) {
    let bone = skeleton.bone(idx);
    let axes = compiled.translation_axes(&bone.name);
    if axes.is_empty() {
        return;
    }
    let origin = skeleton.origin_px(idx, ppu);
    let is_root_child = skeleton.is_root_child(idx);
    let parent_origin_y = match bone.parent {
        Some(p) if p != skeleton.root() => Some(skeleton.origin_px(p, ppu).y),
        _ => None,
    };
    let rotation_point_y = rotation_point_y_px(bone, ppu);

    for axis in axes.iter() {
        let i = axis.index();
        let key = ChannelKey::new(bone.name.clone(), Channel::Translate(axis).name());
        let Some(baseline) = baselines.default.get(&key).copied() else {
            continue;
        };
        let sign = bone.sign(axis);
        let facts = TranslationFacts {
            axis,
            baseline,
            sign,
            origin_px: origin[i],
            local_px: sign * bone.base.position[i] * ppu,
            is_root_child,
            rotation_point_y,
            parent_origin_y,
            excluded: excluded.contains(&key),
            constant_only: analysis.constant_only.contains(&key),
        };
        let class = classify_translation(&facts);
        match class {
            TranslationClass::Entity => {
                cal.translation_absolute[i] = true;
                cal.translation_space[i] = AbsoluteSpace::Entity;
            }
            TranslationClass::RotationPointY => {
                cal.translation_absolute[i] = true;
                cal.translation_space[i] = AbsoluteSpace::Entity;
                cal.translation_offset_px[i] = 0.0;
                cal.cem_y_origin = Some(CEM_Y_ORIGIN_PX);
            }
            TranslationClass::Local => {
                cal.translation_absolute[i] = true;
                cal.translation_space[i] = AbsoluteSpace::Local;
            }
            TranslationClass::Offset(v) => cal.translation_offset_px[i] = v,
            TranslationClass::Plain => {}
        }
        tracing::debug!(
            channel = %key,
            baseline,
            self_read = analysis.translation_self_reads.contains(&key),
            ?class,
            "translation calibrated"
        );
    }
}

fn calibrate_rotation(
    cal: &mut Calibration,
    skeleton: &Skeleton,
    idx: BoneIdx,
    compiled: &CompiledLayers,
    analysis: &ChannelAnalysis,
    baselines: &Baselines,
    ppu: f64,
) {
    let bone = skeleton.bone(idx);
    let axes = compiled.rotation_axes(&bone.name);
    if axes.is_empty() {
        return;
    }
    let origin_len_px = skeleton.origin_px(idx, ppu).length();
    let descendants = skeleton.descendants(idx);

    for axis in axes.iter() {
        let i = axis.index();
        let key = ChannelKey::new(bone.name.clone(), Channel::Rotate(axis).name());
        let Some(baseline) = baselines.default.get(&key).copied() else {
            continue;
        };
        let facts = RotationFacts {
            baseline,
            water_baseline: baselines.get(BaselineKind::Water, &key),
            rest: bone.base.rotation[i],
            sign: bone.sign(axis),
            self_read: analysis.rotation_self_reads.contains(&key),
            pivot_only: !bone.has_geometry(),
            origin_len_px,
            descendant_rests: descendants
                .iter()
                .map(|d| skeleton.bone(*d).base.rotation[i])
                .collect(),
        };
        let class = classify_rotation(&facts);
        apply_rotation_class(cal, axis, class);
        tracing::debug!(channel = %key, baseline, ?class, "rotation calibrated");
    }
}

fn apply_rotation_class(cal: &mut Calibration, axis: Axis, class: RotationClass) {
    let i = axis.index();
    match class {
        RotationClass::Absolute { offset } => {
            cal.rotation_absolute[i] = true;
            cal.rotation_offset[i] = offset;
        }
        RotationClass::Offset(v) => {
            cal.rotation_absolute[i] = false;
            cal.rotation_offset[i] = v;
        }
        RotationClass::Plain => {
            cal.rotation_absolute[i] = false;
            cal.rotation_offset[i] = 0.0;
        }
    }
}

/// `B.r? = A.r?` takes A's calibration. Repeated so chains settle regardless of order.
fn resolve_rotation_copies(skeleton: &mut Skeleton, analysis: &ChannelAnalysis) {
    for _ in 0..analysis.rotation_copies.len() {
        for (dst, src) in &analysis.rotation_copies {
            let Some(Channel::Rotate(axis)) = dst.channel() else {
                continue;
            };
            let Some(dst_idx) = skeleton.find(&dst.target) else {
                continue;
            };
            let i = axis.index();
            let (src_absolute, src_offset, src_rest_value) = match skeleton.find(&src.target) {
                Some(s) => {
                    let b = skeleton.bone(s);
                    let offset = b.calibration.rotation_offset[i];
                    (
                        b.calibration.rotation_absolute[i],
                        offset,
                        offset + b.sign(axis) * b.base.rotation[i],
                    )
                }
                None => (false, 0.0, 0.0),
            };
            let bone = skeleton.bone_mut(dst_idx);
            let class = inherit_copy(
                src_absolute,
                src_offset,
                src_rest_value,
                bone.base.rotation[i],
                bone.sign(axis),
            );
            apply_rotation_class(&mut bone.calibration, axis, class);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/normalize/pass.rs"]
mod tests;
