use crate::expression::compile::{CompiledExpression, compile_expression};
use crate::foundation::core::{AxisSet, Channel, ChannelKey};
use crate::scene::model::AnimationLayer;
use std::collections::BTreeMap;

/// What a layer entry writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetType {
    /// A skeleton bone channel.
    Bone,
    /// A `var.*` custom variable.
    Var,
    /// A `varb.*` boolean variable, stored under the synthetic `varb` bone.
    BoolVar,
    /// A `render.*` write-only sink.
    Render,
}

impl TargetType {
    fn classify(target: &str) -> Self {
        match target {
            "var" => Self::Var,
            "varb" => Self::BoolVar,
            "render" => Self::Render,
            _ => Self::Bone,
        }
    }
}

/// One compiled `"target.property": expression` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledAnimation {
    /// Full key as authored.
    pub property: String,
    /// What the left-hand side writes to.
    pub target_type: TargetType,
    /// Bone or variable namespace before the dot.
    pub target_name: String,
    /// Channel or variable name after the dot.
    pub property_name: String,
    /// Compiled right-hand side.
    pub expression: CompiledExpression,
}

impl CompiledAnimation {
    /// The `target.property` this entry writes.
    pub fn key(&self) -> ChannelKey {
        ChannelKey::new(self.target_name.clone(), self.property_name.clone())
    }

    /// Bone channel written, for bone targets.
    pub fn channel(&self) -> Option<Channel> {
        match self.target_type {
            TargetType::Bone => Channel::parse(&self.property_name),
            _ => None,
        }
    }
}

/// Compiled layers plus the per-bone record of which transform axes are written.
#[derive(Debug, Clone, Default)]
pub struct CompiledLayers {
    /// Entries per layer, in evaluation order.
    pub layers: Vec<Vec<CompiledAnimation>>,
    /// Bone name to the translation axes any layer writes.
    pub translation_axes: BTreeMap<String, AxisSet>,
    /// Bone name to the rotation axes any layer writes.
    pub rotation_axes: BTreeMap<String, AxisSet>,
}

impl CompiledLayers {
    /// True when no layer survived compilation.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Every compiled entry in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &CompiledAnimation> {
        self.layers.iter().flatten()
    }

    /// The last entry writing `target.property`, if any.
    pub fn writer(&self, target: &str, property: &str) -> Option<&CompiledAnimation> {
        self.layers
            .iter()
            .flatten()
            .rev()
            .find(|a| a.target_name == target && a.property_name == property)
    }

    /// Translation axes written for `bone`.
    pub fn translation_axes(&self, bone: &str) -> AxisSet {
        self.translation_axes.get(bone).copied().unwrap_or_default()
    }

    /// Rotation axes written for `bone`.
    pub fn rotation_axes(&self, bone: &str) -> AxisSet {
        self.rotation_axes.get(bone).copied().unwrap_or_default()
    }
}

/// Compile raw layers. Entries that fail to parse are logged and dropped; a layer whose every
/// entry failed is dropped as well.
#[tracing::instrument(skip_all, fields(layers = layers.len()))]
pub fn compile_layers(layers: &[AnimationLayer]) -> CompiledLayers {
    let mut out = CompiledLayers::default();
    for (layer_idx, layer) in layers.iter().enumerate() {
        let mut compiled = Vec::with_capacity(layer.len());
        for (key, raw) in layer.entries() {
            let Some((target, property)) = key.split_once('.') else {
                tracing::warn!(layer = layer_idx, key, "layer key is not 'target.property'");
                continue;
            };
            if target.is_empty() || property.is_empty() {
                tracing::warn!(layer = layer_idx, key, "layer key has an empty part");
                continue;
            }
            let expression = match compile_expression(raw) {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!(layer = layer_idx, key, error = %e, "dropping unparsable entry");
                    continue;
                }
            };
            let target_type = TargetType::classify(target);
            if target_type == TargetType::Bone {
                record_axis(&mut out, target, property);
            }
            compiled.push(CompiledAnimation {
                property: key.clone(),
                target_type,
                target_name: target.to_owned(),
                property_name: property.to_owned(),
                expression,
            });
        }
        if compiled.is_empty() {
            if !layer.is_empty() {
                tracing::warn!(layer = layer_idx, "every entry failed; dropping layer");
            }
            continue;
        }
        out.layers.push(compiled);
    }
    out
}

fn record_axis(out: &mut CompiledLayers, bone: &str, property: &str) {
    let (map, axis) = match Channel::parse(property) {
        Some(Channel::Translate(a)) => (&mut out.translation_axes, a),
        Some(Channel::Rotate(a)) => (&mut out.rotation_axes, a),
        _ => return,
    };
    map.entry(bone.to_owned()).or_default().insert(axis);
}

#[cfg(test)]
#[path = "../../tests/unit/compile/compiler.rs"]
mod tests;
