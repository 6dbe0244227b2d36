use crate::eval::context::BoneValues;
use crate::eval::state::EntityState;

/// A level-triggered overlay, active while toggled on.
#[derive(Debug)]
pub struct PoseDef {
    /// Stable identifier passed to `set_pose_toggles`.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Hint for hosts that want mutually exclusive toggles; not enforced here.
    pub exclusive_group: Option<&'static str>,
    state: fn(&mut EntityState),
    bone_inputs: Option<fn(&mut BoneValues)>,
}

fn sitting(s: &mut EntityState) {
    s.is_sitting = true;
}

fn sneaking(s: &mut EntityState) {
    s.is_sneaking = true;
}

fn sprinting(s: &mut EntityState) {
    s.is_sprinting = true;
}

fn swimming(s: &mut EntityState) {
    s.is_in_water = true;
    s.is_wet = true;
    s.is_on_ground = false;
}

fn riding(s: &mut EntityState) {
    s.is_riding = true;
}

fn aggressive(s: &mut EntityState) {
    s.is_aggressive = true;
    s.anger_time = s.anger_time.max(1.0);
}

fn child(s: &mut EntityState) {
    s.is_child = true;
}

fn burning(s: &mut EntityState) {
    s.is_burning = true;
}

fn no_state(_: &mut EntityState) {}

fn grazing_inputs(inputs: &mut BoneValues) {
    inputs
        .entry("neck".to_owned())
        .or_default()
        .insert("ty".to_owned(), 11.0);
}

static POSES: [PoseDef; 9] = [
    PoseDef {
        id: "pose.sitting",
        name: "Sitting",
        exclusive_group: Some("movement"),
        state: sitting,
        bone_inputs: None,
    },
    PoseDef {
        id: "pose.sneaking",
        name: "Sneaking",
        exclusive_group: Some("movement"),
        state: sneaking,
        bone_inputs: None,
    },
    PoseDef {
        id: "pose.sprinting",
        name: "Sprinting",
        exclusive_group: Some("movement"),
        state: sprinting,
        bone_inputs: None,
    },
    PoseDef {
        id: "pose.swimming",
        name: "Swimming",
        exclusive_group: Some("movement"),
        state: swimming,
        bone_inputs: None,
    },
    PoseDef {
        id: "pose.riding",
        name: "Riding",
        exclusive_group: None,
        state: riding,
        bone_inputs: None,
    },
    PoseDef {
        id: "pose.aggressive",
        name: "Aggressive",
        exclusive_group: None,
        state: aggressive,
        bone_inputs: None,
    },
    PoseDef {
        id: "pose.child",
        name: "Child",
        exclusive_group: None,
        state: child,
        bone_inputs: None,
    },
    PoseDef {
        id: "pose.burning",
        name: "Burning",
        exclusive_group: None,
        state: burning,
        bone_inputs: None,
    },
    PoseDef {
        id: "pose.grazing",
        name: "Grazing",
        exclusive_group: None,
        state: no_state,
        bone_inputs: Some(grazing_inputs),
    },
];

/// Every pose toggle the engine accepts.
pub fn poses() -> &'static [PoseDef] {
    &POSES
}

pub(crate) fn find_pose(id: &str) -> Option<&'static PoseDef> {
    POSES.iter().find(|p| p.id == id)
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PoseManager {
    active: Vec<&'static PoseDef>,
}

impl PoseManager {
    /// Replace the active set. Duplicates collapse; unknown ids are dropped and returned.
    pub(crate) fn set_toggles<'a>(&mut self, ids: &[&'a str]) -> Vec<&'a str> {
        self.active.clear();
        let mut unknown = Vec::new();
        for &id in ids {
            match find_pose(id) {
                Some(def) if self.active.iter().any(|a| a.id == def.id) => {}
                Some(def) => self.active.push(def),
                None => unknown.push(id),
            }
        }
        unknown
    }

    pub(crate) fn active_ids(&self) -> Vec<&'static str> {
        self.active.iter().map(|p| p.id).collect()
    }

    /// Overlay every active pose onto `state` and `inputs`, later toggles winning.
    pub(crate) fn apply(&self, state: &mut EntityState, inputs: &mut BoneValues) {
        for pose in &self.active {
            (pose.state)(state);
            if let Some(f) = pose.bone_inputs {
                f(inputs);
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.active.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/pose.rs"]
mod tests;
