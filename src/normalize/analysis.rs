//! Static AST analysis over compiled layers. Nothing here evaluates an expression.

use crate::compile::compiler::{CompiledAnimation, CompiledLayers, TargetType};
use crate::eval::pass::VARB_BONE;
use crate::expression::ast::{Expr, VarTarget};
use crate::expression::functions::Builtin;
use crate::foundation::core::{Axis, Channel, ChannelKey};
use crate::normalize::thresholds::{
    CEM_Y_ORIGIN_PX, PIVOT_BRANCH_LITERAL_PX, PIVOT_BRANCH_MATCH_PX, PIVOT_SEED_LITERAL_PX,
};
use crate::scene::skeleton::{Bone, Skeleton};
use std::collections::{BTreeMap, BTreeSet};

/// Target key of the synthetic node holding `var.*` channels in the dependency graph.
pub(crate) const VAR_NODE: &str = "var";

/// Dependency graph: writer channel -> channels its expression reads.
pub(crate) type DependencyGraph = BTreeMap<ChannelKey, BTreeSet<ChannelKey>>;

/// Rotation-point Y of a root bone: `24 - y` when Y is inverted, `y + 24` otherwise.
pub(crate) fn rotation_point_y_px(bone: &Bone, ppu: f64) -> f64 {
    let local_y = bone.base.position.y * ppu;
    if bone.invert_axis.contains(Axis::Y) {
        CEM_Y_ORIGIN_PX - local_y
    } else {
        local_y + CEM_Y_ORIGIN_PX
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ChannelAnalysis {
    /// Bone channels written by some entry.
    pub(crate) writes: BTreeSet<ChannelKey>,
    /// Bones with at least one written channel.
    pub(crate) animated_bones: BTreeSet<String>,
    /// `B.t?` expressions that read `B.t?`.
    pub(crate) translation_self_reads: BTreeSet<ChannelKey>,
    /// Self-read translations whose rest value must be the bone's own pivot.
    pub(crate) pivot_seeds: BTreeSet<ChannelKey>,
    /// `B.r?` expressions that read `B.r?`.
    pub(crate) rotation_self_reads: BTreeSet<ChannelKey>,
    /// Writer bone channel -> other bones' channels read.
    pub(crate) cross_reads: DependencyGraph,
    /// Every writer (bone channel or `var.*`) -> every channel read.
    pub(crate) dependencies: DependencyGraph,
    /// Bone channels read by bone-targeting entries.
    pub(crate) bone_reads: BTreeSet<ChannelKey>,
    /// Geometry-less bones never animated, or bones absent from the skeleton.
    pub(crate) input_only_bones: BTreeSet<String>,
    /// Writers that read an input-only bone directly.
    pub(crate) reads_input_only: BTreeSet<ChannelKey>,
    /// `B.r? = A.r?` bare copies: writer -> source.
    pub(crate) rotation_copies: BTreeMap<ChannelKey, ChannelKey>,
    /// Bone channels whose expression never changes.
    pub(crate) constant_only: BTreeSet<ChannelKey>,
    /// Whether any entry reads `neck.ty`.
    pub(crate) reads_neck_ty: bool,
}

impl ChannelAnalysis {
    pub(crate) fn is_written(&self, bone: &str, property: &str) -> bool {
        self.writes.contains(&ChannelKey::new(bone, property))
    }

    /// Whether a writer targeting a different bone reads `key`.
    pub(crate) fn is_read_by_others(&self, key: &ChannelKey) -> bool {
        self.cross_reads.values().any(|reads| reads.contains(key))
    }
}

fn writer_key(anim: &CompiledAnimation) -> ChannelKey {
    match anim.target_type {
        TargetType::Var => ChannelKey::new(VAR_NODE, anim.property_name.clone()),
        _ => anim.key(),
    }
}

fn read_key(target: &VarTarget) -> Option<ChannelKey> {
    match target {
        VarTarget::Custom(n) => Some(ChannelKey::new(VAR_NODE, n.clone())),
        VarTarget::Bone { bone, property } => Some(ChannelKey::new(bone.clone(), property.clone())),
        VarTarget::Render(_) | VarTarget::State(_) => None,
    }
}

#[tracing::instrument(skip_all)]
pub(crate) fn analyze(compiled: &CompiledLayers, skeleton: &Skeleton, ppu: f64) -> ChannelAnalysis {
    let mut a = ChannelAnalysis::default();

    for anim in compiled.iter() {
        if anim.target_type == TargetType::Bone {
            a.writes.insert(anim.key());
            a.animated_bones.insert(anim.target_name.clone());
        }
    }

    for (_, bone) in skeleton.bones() {
        if !bone.has_geometry() && !a.animated_bones.contains(&bone.name) {
            a.input_only_bones.insert(bone.name.clone());
        }
    }

    for anim in compiled.iter() {
        let writer = writer_key(anim);
        let is_bone = anim.target_type == TargetType::Bone;
        let Some(ast) = anim.expression.ast() else {
            if is_bone {
                a.constant_only.insert(writer);
            }
            continue;
        };
        if is_bone && ast.is_constant_only() {
            a.constant_only.insert(writer.clone());
        }

        for var in ast.variables() {
            let Some(read) = read_key(&var.target) else {
                continue;
            };
            if read.target == "neck" && read.property == "ty" {
                a.reads_neck_ty = true;
            }
            a.dependencies
                .entry(writer.clone())
                .or_default()
                .insert(read.clone());

            if read.target == VAR_NODE || read.target == VARB_BONE {
                continue;
            }
            if skeleton.find(&read.target).is_none() {
                a.input_only_bones.insert(read.target.clone());
            }
            if a.input_only_bones.contains(&read.target) {
                a.reads_input_only.insert(writer.clone());
            }
            if !is_bone {
                continue;
            }
            a.bone_reads.insert(read.clone());
            if read.target != anim.target_name {
                a.cross_reads
                    .entry(writer.clone())
                    .or_default()
                    .insert(read);
            }
        }

        if is_bone {
            classify_self_reads(&mut a, anim, ast, skeleton, ppu);
        }
    }
    a
}

fn classify_self_reads(
    a: &mut ChannelAnalysis,
    anim: &CompiledAnimation,
    ast: &Expr,
    skeleton: &Skeleton,
    ppu: f64,
) {
    let bone = anim.target_name.as_str();
    let property = anim.property_name.as_str();
    let key = anim.key();
    match Channel::parse(property) {
        Some(Channel::Translate(axis)) => {
            if !ast.reads_bone_channel(bone, property) {
                return;
            }
            a.translation_self_reads.insert(key.clone());
            let rpy = match (axis, skeleton.get(bone)) {
                (Axis::Y, Some(b)) => Some(rotation_point_y_px(b, ppu)),
                _ => None,
            };
            if has_large_additive_literal(ast) || has_pivot_branch(ast, bone, property, rpy) {
                a.pivot_seeds.insert(key);
            }
        }
        Some(Channel::Rotate(_)) => {
            if ast.reads_bone_channel(bone, property) {
                a.rotation_self_reads.insert(key.clone());
            }
            if let Expr::Variable(v) = ast
                && let Some((src_bone, src_prop)) = v.as_bone_channel()
                && src_bone != bone
                && src_prop == property
            {
                a.rotation_copies
                    .insert(key, ChannelKey::new(src_bone, src_prop));
            }
        }
        _ => {}
    }
}

/// `x + 12`, `-4 - x`: a literal of pivot magnitude on either side of `+`/`-`.
fn has_large_additive_literal(ast: &Expr) -> bool {
    let mut found = false;
    ast.walk(&mut |e| {
        if let Expr::Binary { op, left, right } = e
            && op.is_additive()
            && [left, right]
                .iter()
                .filter_map(|side| side.as_literal())
                .any(|v| v.abs() >= PIVOT_SEED_LITERAL_PX)
        {
            found = true;
        }
    });
    found
}

/// `if(cond, <pivot-sized literal>, <expr reading bone.property>)` in any branch order.
fn has_pivot_branch(ast: &Expr, bone: &str, property: &str, rotation_point_y: Option<f64>) -> bool {
    let pivot_sized = |v: f64| {
        v.abs() >= PIVOT_BRANCH_LITERAL_PX
            || rotation_point_y.is_some_and(|rpy| (v - rpy).abs() <= PIVOT_BRANCH_MATCH_PX)
    };
    let mut found = false;
    ast.walk(&mut |e| {
        let Expr::Call { func, args } = e else {
            return;
        };
        if !matches!(func, Builtin::If | Builtin::Ifb) {
            return;
        }
        let values: Vec<&Expr> = args
            .iter()
            .enumerate()
            .filter(|(i, _)| i % 2 == 1 || *i + 1 == args.len())
            .map(|(_, v)| v)
            .collect();
        let literal = values
            .iter()
            .any(|v| v.as_literal().is_some_and(pivot_sized));
        let self_read = values
            .iter()
            .any(|v| v.reads_bone_channel(bone, property));
        if literal && self_read {
            found = true;
        }
    });
    found
}

#[cfg(test)]
#[path = "../../tests/unit/normalize/analysis.rs"]
mod tests;
