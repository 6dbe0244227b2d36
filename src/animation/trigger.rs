use crate::eval::context::BoneValues;
use crate::eval::state::EntityState;
use glam::DVec3;
use std::f64::consts::{FRAC_PI_2, PI};

const NECK_NEUTRAL_TY: f64 = 4.0;
const NECK_REARING_TY: f64 = -4.0;
const NECK_EATING_TY: f64 = 11.0;
const HEAD_EATING_RX: f64 = 0.9;

/// Root-level transform added on top of the evaluated pose.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RootOverlay {
    /// Scene units.
    pub position: DVec3,
    /// Euler XYZ, radians.
    pub rotation: DVec3,
}

impl RootOverlay {
    /// True when the overlay moves nothing.
    pub fn is_zero(&self) -> bool {
        self.position == DVec3::ZERO && self.rotation == DVec3::ZERO
    }
}

/// Per-model facts the eat and rearing effects depend on.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TriggerEnv {
    /// Some expression reads `neck.ty`, so eating lowers the neck rather than the head.
    pub(crate) drives_neck: bool,
    /// `rule_index` recovered from a `varb.index_eat` expression.
    pub(crate) eat_rule_index: Option<f64>,
    /// Rest `head.rx`, the neutral value for head-driven eating.
    pub(crate) head_rest_rx: f64,
}

/// Contributions of every active trigger for one tick. Accumulated additively.
#[derive(Debug, Clone, Default)]
pub(crate) struct TriggerFrame {
    pub(crate) root: RootOverlay,
    pub(crate) bone_inputs: BoneValues,
    /// Applied to the effective state only.
    pub(crate) state_overrides: Vec<(&'static str, f64)>,
}

impl TriggerFrame {
    fn add_bone_input(&mut self, bone: &str, property: &str, neutral: f64, delta: f64) {
        *self
            .bone_inputs
            .entry(bone.to_owned())
            .or_default()
            .entry(property.to_owned())
            .or_insert(neutral) += delta;
    }
}

/// A one-shot overlay.
#[derive(Debug)]
pub struct TriggerDef {
    /// Stable identifier, e.g. `trigger.hurt`.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Lifetime in seconds.
    pub duration_sec: f64,
    start: fn(&mut EntityState),
    apply: fn(f64, &mut EntityState, &TriggerEnv, &mut TriggerFrame),
    finish: fn(&mut EntityState),
}

fn no_op(_: &mut EntityState) {}

fn attack_start(s: &mut EntityState) {
    s.swing_progress = 0.0;
}

fn attack_apply(t: f64, s: &mut EntityState, _: &TriggerEnv, _: &mut TriggerFrame) {
    s.swing_progress = (PI * t).sin();
}

fn hurt_start(s: &mut EntityState) {
    s.hurt_time = s.hurt_time.max(10.0);
}

fn hurt_apply(t: f64, _: &mut EntityState, _: &TriggerEnv, f: &mut TriggerFrame) {
    f.root.position.y += 0.06 * (PI * t).sin();
}

fn death_start(s: &mut EntityState) {
    s.death_time = s.death_time.max(20.0);
}

fn death_apply(t: f64, _: &mut EntityState, _: &TriggerEnv, f: &mut TriggerFrame) {
    let envelope = (FRAC_PI_2 * t).sin();
    f.root.position.x += 0.12 * envelope;
    f.root.position.y += 0.02 * envelope;
    f.root.rotation.z += 1.1 * envelope;
}

fn rearing_apply(t: f64, _: &mut EntityState, _: &TriggerEnv, f: &mut TriggerFrame) {
    let delta = (NECK_REARING_TY - NECK_NEUTRAL_TY) * (PI * t).sin();
    f.add_bone_input("neck", "ty", NECK_NEUTRAL_TY, delta);
}

fn eat_apply(t: f64, _: &mut EntityState, env: &TriggerEnv, f: &mut TriggerFrame) {
    let envelope = (PI * t).sin();
    if env.drives_neck {
        f.add_bone_input("neck", "ty", NECK_NEUTRAL_TY, (NECK_EATING_TY - NECK_NEUTRAL_TY) * envelope);
    } else {
        f.add_bone_input("head", "rx", env.head_rest_rx, HEAD_EATING_RX * envelope);
    }
    if let Some(index) = env.eat_rule_index {
        f.state_overrides.push(("rule_index", index));
    }
}

static TRIGGERS: [TriggerDef; 5] = [
    TriggerDef {
        id: "trigger.attack",
        name: "Attack",
        duration_sec: 0.35,
        start: attack_start,
        apply: attack_apply,
        finish: attack_start,
    },
    TriggerDef {
        id: "trigger.hurt",
        name: "Hurt",
        duration_sec: 0.5,
        start: hurt_start,
        apply: hurt_apply,
        finish: no_op,
    },
    TriggerDef {
        id: "trigger.death",
        name: "Death",
        duration_sec: 1.0,
        start: death_start,
        apply: death_apply,
        finish: no_op,
    },
    TriggerDef {
        id: "trigger.horse_rearing",
        name: "Horse rearing",
        duration_sec: 1.2,
        start: no_op,
        apply: rearing_apply,
        finish: no_op,
    },
    TriggerDef {
        id: "trigger.eat",
        name: "Eat",
        duration_sec: 1.6,
        start: no_op,
        apply: eat_apply,
        finish: no_op,
    },
];

/// Every trigger the engine accepts.
pub fn triggers() -> &'static [TriggerDef] {
    &TRIGGERS
}

pub(crate) fn find_trigger(id: &str) -> Option<&'static TriggerDef> {
    TRIGGERS.iter().find(|t| t.id == id)
}

/// One running trigger.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveTrigger {
    /// Identifier of the running [`TriggerDef`].
    pub id: &'static str,
    /// Seconds since it started.
    pub elapsed_sec: f64,
    /// Lifetime in seconds.
    pub duration_sec: f64,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct TriggerManager {
    active: Vec<ActiveTrigger>,
}

impl TriggerManager {
    /// Start `id`, applying its immediate state effect. `false` for unknown ids.
    pub(crate) fn play(&mut self, id: &str, state: &mut EntityState) -> bool {
        let Some(def) = find_trigger(id) else {
            return false;
        };
        (def.start)(state);
        self.active.push(ActiveTrigger {
            id: def.id,
            elapsed_sec: 0.0,
            duration_sec: def.duration_sec,
        });
        true
    }

    /// Decay hurt/death counters, advance every trigger and collect this tick's overlays.
    /// A trigger whose elapsed time reaches its duration is dropped without contributing.
    pub(crate) fn update(
        &mut self,
        delta_sec: f64,
        state: &mut EntityState,
        env: &TriggerEnv,
    ) -> TriggerFrame {
        let ticks = delta_sec * 20.0;
        state.hurt_time = (state.hurt_time - ticks).max(0.0);
        state.death_time = (state.death_time - ticks).max(0.0);

        let mut frame = TriggerFrame::default();
        self.active.retain_mut(|a| {
            let Some(def) = find_trigger(a.id) else {
                return false;
            };
            a.elapsed_sec += delta_sec;
            if a.elapsed_sec >= a.duration_sec {
                (def.finish)(state);
                return false;
            }
            let t = (a.elapsed_sec / a.duration_sec).min(1.0);
            (def.apply)(t, state, env, &mut frame);
            true
        });
        frame
    }

    pub(crate) fn active(&self) -> &[ActiveTrigger] {
        &self.active
    }

    pub(crate) fn clear(&mut self) {
        self.active.clear();
    }
}

/// Recover `N` from a `rule_index == N` comparison in an expression source.
pub(crate) fn parse_rule_index(source: &str) -> Option<f64> {
    let mut rest = source;
    while let Some(pos) = rest.find("rule_index") {
        let after = rest[pos + "rule_index".len()..].trim_start();
        if let Some(value) = after.strip_prefix("==") {
            let value = value.trim_start();
            let end = value
                .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'))
                .unwrap_or(value.len());
            if let Ok(n) = value[..end].parse::<f64>() {
                return Some(n);
            }
        }
        rest = &rest[pos + "rule_index".len()..];
    }
    None
}

#[cfg(test)]
#[path = "../../tests/unit/animation/trigger.rs"]
mod tests;
