use crate::compile::compiler::{CompiledAnimation, TargetType};
use crate::eval::context::AnimationContext;
use crate::expression::compile::safe_evaluate;
use crate::expression::functions::{bool_to_f64, truthy};
use crate::foundation::core::{AxisArray, Channel, ChannelKey};
use std::collections::BTreeMap;

/// Synthetic bone key under which `varb.*` values live.
pub(crate) const VARB_BONE: &str = "varb";

/// Channels written to one bone during a pass, in CEM units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct PartialTransform {
    pub(crate) translate: AxisArray<Option<f64>>,
    pub(crate) rotate: AxisArray<Option<f64>>,
    pub(crate) scale: AxisArray<Option<f64>>,
    pub(crate) visible: Option<bool>,
    pub(crate) visible_boxes: Option<bool>,
}

impl PartialTransform {
    fn set(&mut self, channel: Channel, v: f64) {
        match channel {
            Channel::Translate(a) => self.translate[a.index()] = Some(v),
            Channel::Rotate(a) => self.rotate[a.index()] = Some(v),
            Channel::Scale(a) => self.scale[a.index()] = Some(v),
            Channel::Visible => self.visible = Some(v != 0.0),
            Channel::VisibleBoxes => self.visible_boxes = Some(v != 0.0),
        }
    }
}

/// Result of one forward pass over every layer.
#[derive(Debug, Clone, Default)]
pub(crate) struct PassOutput {
    pub(crate) bones: BTreeMap<String, PartialTransform>,
    pub(crate) render: BTreeMap<String, f64>,
    /// Final value of every bone channel written, keyed `bone.property`.
    pub(crate) written: BTreeMap<ChannelKey, f64>,
}

/// Evaluate every layer in declared order against `ctx`.
///
/// Writes become visible to later entries immediately: `var.*` through `ctx.variables`,
/// bone and `varb` channels through `ctx.bone_values`. A single forward pass; earlier entries
/// never observe later writes within the same call.
pub(crate) fn evaluate_pass(layers: &[Vec<CompiledAnimation>], ctx: &mut AnimationContext) -> PassOutput {
    let mut out = PassOutput::default();
    for anim in layers.iter().flatten() {
        let v = safe_evaluate(&anim.expression, ctx, 0.0);
        match anim.target_type {
            TargetType::Var => {
                ctx.variables.insert(anim.property_name.clone(), v);
            }
            TargetType::BoolVar => {
                ctx.set_bone_value(VARB_BONE, &anim.property_name, bool_to_f64(truthy(v)));
            }
            TargetType::Render => {
                out.render.insert(anim.property_name.clone(), v);
            }
            TargetType::Bone => {
                ctx.set_bone_value(&anim.target_name, &anim.property_name, v);
                out.written.insert(anim.key(), v);
                if let Some(channel) = Channel::parse(&anim.property_name) {
                    out.bones
                        .entry(anim.target_name.clone())
                        .or_default()
                        .set(channel, v);
                }
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/eval/pass.rs"]
mod tests;
