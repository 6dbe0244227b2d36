use crate::eval::state::EntityState;

/// Ticks per second of the simulation the presets emulate.
const TICKS_PER_SEC: f64 = 20.0;

/// A time-driven entity-state driver.
#[derive(Debug)]
pub struct PresetDef {
    /// Stable identifier passed to `set_preset`.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// One-shot presets stop playing once elapsed time reaches this.
    pub duration_sec: Option<f64>,
    /// Whether the preset repeats instead of finishing.
    pub looping: bool,
    update: fn(&mut EntityState, f64, f64),
}

impl PresetDef {
    pub(crate) fn step(&self, state: &mut EntityState, delta_sec: f64, elapsed_sec: f64) {
        state.age += delta_sec * TICKS_PER_SEC;
        (self.update)(state, delta_sec, elapsed_sec);
    }

    /// True when a non-looping preset has run its course.
    pub(crate) fn is_finished(&self, elapsed_sec: f64) -> bool {
        !self.looping && self.duration_sec.is_some_and(|d| elapsed_sec >= d)
    }
}

fn stride(s: &mut EntityState, delta_sec: f64, speed: f64) {
    s.limb_speed = speed;
    s.limb_swing += delta_sec * TICKS_PER_SEC * speed;
}

fn idle(s: &mut EntityState, _: f64, _: f64) {
    s.limb_speed = 0.0;
}

fn walking(s: &mut EntityState, dt: f64, _: f64) {
    stride(s, dt, 0.6);
}

fn running(s: &mut EntityState, dt: f64, _: f64) {
    s.is_sprinting = true;
    stride(s, dt, 1.0);
}

fn swimming(s: &mut EntityState, dt: f64, _: f64) {
    s.is_in_water = true;
    s.is_wet = true;
    s.is_on_ground = false;
    stride(s, dt, 0.3);
}

fn sneaking(s: &mut EntityState, dt: f64, _: f64) {
    s.is_sneaking = true;
    stride(s, dt, 0.3);
}

fn attack(s: &mut EntityState, _: f64, elapsed: f64) {
    s.limb_speed = 0.0;
    s.swing_progress = (elapsed / 0.4).clamp(0.0, 1.0);
}

fn hurt(s: &mut EntityState, _: f64, elapsed: f64) {
    s.is_hurt = true;
    s.hurt_time = 10.0 * (1.0 - elapsed / 0.5).max(0.0);
}

fn death(s: &mut EntityState, _: f64, elapsed: f64) {
    s.limb_speed = 0.0;
    s.health = 0.0;
    s.is_alive = false;
    s.death_time = (elapsed * TICKS_PER_SEC).min(20.0);
}

static PRESETS: [PresetDef; 8] = [
    PresetDef {
        id: "idle",
        name: "Idle",
        duration_sec: None,
        looping: true,
        update: idle,
    },
    PresetDef {
        id: "walking",
        name: "Walking",
        duration_sec: None,
        looping: true,
        update: walking,
    },
    PresetDef {
        id: "running",
        name: "Running",
        duration_sec: None,
        looping: true,
        update: running,
    },
    PresetDef {
        id: "swimming",
        name: "Swimming",
        duration_sec: None,
        looping: true,
        update: swimming,
    },
    PresetDef {
        id: "sneaking",
        name: "Sneaking",
        duration_sec: None,
        looping: true,
        update: sneaking,
    },
    PresetDef {
        id: "attack",
        name: "Attack",
        duration_sec: Some(0.4),
        looping: false,
        update: attack,
    },
    PresetDef {
        id: "hurt",
        name: "Hurt",
        duration_sec: Some(0.5),
        looping: false,
        update: hurt,
    },
    PresetDef {
        id: "death",
        name: "Death",
        duration_sec: Some(1.0),
        looping: false,
        update: death,
    },
];

/// Every preset the engine accepts.
pub fn presets() -> &'static [PresetDef] {
    &PRESETS
}

pub(crate) fn find_preset(id: &str) -> Option<&'static PresetDef> {
    PRESETS.iter().find(|p| p.id == id)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/preset.rs"]
mod tests;
