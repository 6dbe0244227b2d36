use crate::eval::state::EntityState;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// `bone -> property -> value` in CEM units (pixels, radians).
pub type BoneValues = BTreeMap<String, BTreeMap<String, f64>>;

/// The mutable state one evaluation pass reads and writes.
///
/// `bone_values` is rebuilt from rest values at the top of every pass; entity state,
/// custom variables and the random cache persist across passes.
#[derive(Clone, Debug, Default)]
pub struct AnimationContext {
    /// Inputs visible to bare names.
    pub entity_state: EntityState,
    /// `var.*` values.
    pub variables: BTreeMap<String, f64>,
    /// Per-bone channel values, including the synthetic `varb` bone.
    pub bone_values: BoneValues,
    /// `random(seed)` results keyed by the seed's bit pattern.
    pub random_cache: HashMap<u64, f64>,
    warned_names: BTreeSet<String>,
}

impl AnimationContext {
    /// Fresh context over `entity_state`.
    pub fn new(entity_state: EntityState) -> Self {
        Self {
            entity_state,
            ..Self::default()
        }
    }

    /// Current `bone.property`, if present.
    pub fn bone_value(&self, bone: &str, property: &str) -> Option<f64> {
        self.bone_values.get(bone)?.get(property).copied()
    }

    /// Write `bone.property`, creating the bone entry on demand.
    pub fn set_bone_value(&mut self, bone: &str, property: &str, value: f64) {
        match self.bone_values.get_mut(bone) {
            Some(props) => {
                props.insert(property.to_owned(), value);
            }
            None => {
                let mut props = BTreeMap::new();
                props.insert(property.to_owned(), value);
                self.bone_values.insert(bone.to_owned(), props);
            }
        }
    }

    /// `var.<name>`, `0` when unset.
    pub fn variable(&self, name: &str) -> f64 {
        self.variables.get(name).copied().unwrap_or(0.0)
    }

    /// Replace the bone values with a fresh copy of `rest`.
    pub(crate) fn reset_bone_values(&mut self, rest: &BoneValues) {
        self.bone_values.clone_from(rest);
    }

    /// Record an unresolved bare name. Returns true the first time the name is seen.
    pub(crate) fn note_unknown_name(&mut self, name: &str) -> bool {
        if self.warned_names.contains(name) {
            return false;
        }
        self.warned_names.insert(name.to_owned())
    }

    pub(crate) fn clear(&mut self) {
        self.variables.clear();
        self.bone_values.clear();
        self.random_cache.clear();
        self.warned_names.clear();
    }
}

/// Overlay `src` onto `dst`, later values winning per property.
pub(crate) fn merge_bone_values(dst: &mut BoneValues, src: &BoneValues) {
    for (bone, props) in src {
        let slot = dst.entry(bone.clone()).or_default();
        for (p, v) in props {
            slot.insert(p.clone(), *v);
        }
    }
}
