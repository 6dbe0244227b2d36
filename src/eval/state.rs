//! Entity simulation inputs read by bare names inside expressions.

macro_rules! entity_state {
    (
        numbers { $($(#[$nmeta:meta])* $num:ident = $ndefault:expr,)* }
        flags { $($(#[$fmeta:meta])* $flag:ident = $fdefault:expr,)* }
    ) => {
        /// Flat record of named simulation inputs. Booleans read as `1`/`0` in expressions.
        #[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(default)]
        pub struct EntityState {
            $($(#[$nmeta])* pub $num: f64,)*
            $($(#[$fmeta])* pub $flag: bool,)*
        }

        impl Default for EntityState {
            fn default() -> Self {
                Self {
                    $($num: $ndefault,)*
                    $($flag: $fdefault,)*
                }
            }
        }

        impl EntityState {
            /// Every field name, in declaration order.
            pub const FIELD_NAMES: &'static [&'static str] =
                &[$(stringify!($num),)* $(stringify!($flag),)*];

            /// Read a field by its expression name.
            pub fn get(&self, name: &str) -> Option<f64> {
                match name {
                    $(stringify!($num) => Some(self.$num),)*
                    $(stringify!($flag) => Some(if self.$flag { 1.0 } else { 0.0 }),)*
                    _ => None,
                }
            }

            /// Write a field by its expression name. Flags take any non-zero value as true.
            /// Returns `false` for unknown names.
            pub fn set(&mut self, name: &str, value: f64) -> bool {
                match name {
                    $(stringify!($num) => self.$num = value,)*
                    $(stringify!($flag) => self.$flag = value != 0.0,)*
                    _ => return false,
                }
                true
            }
        }
    };
}

entity_state! {
    numbers {
        /// Accumulated walk distance driving limb swing.
        limb_swing = 0.0,
        /// Walk speed factor, 0..1.
        limb_speed = 0.0,
        /// Head yaw relative to the body, degrees.
        head_yaw = 0.0,
        /// Head pitch, degrees.
        head_pitch = 0.0,
        /// Entity age in ticks.
        age = 0.0,
        /// World time in ticks.
        time = 0.0,
        /// Hurt flash countdown, ticks.
        hurt_time = 0.0,
        /// Death animation counter, ticks.
        death_time = 0.0,
        /// Anger countdown, ticks.
        anger_time = 0.0,
        /// Attack swing progress, 0..1.
        swing_progress = 0.0,
        /// Current health points.
        health = 20.0,
        /// Maximum health points.
        max_health = 20.0,
        /// World position X.
        pos_x = 0.0,
        /// World position Y.
        pos_y = 0.0,
        /// World position Z.
        pos_z = 0.0,
        /// Forward movement input, -1..1.
        move_forward = 0.0,
        /// Sideways movement input, -1..1.
        move_strafing = 0.0,
        /// Time of day in ticks, 0..24000.
        day_time = 0.0,
        /// Days elapsed.
        day_count = 0.0,
        /// Dimension id: -1 nether, 0 overworld, 1 end.
        dimension = 0.0,
        /// Stable numeric identity; default seed for `random()`.
        id = 0.0,
        /// Index of the matched random-entity rule.
        rule_index = 0.0,
        /// Seconds elapsed during the last tick.
        frame_time = 0.0,
        /// Ticks evaluated so far.
        frame_counter = 0.0,
    }
    flags {
        /// Taking damage.
        is_hurt = false,
        /// Submerged in water.
        is_in_water = false,
        /// Riding another entity.
        is_riding = false,
        /// Standing on a block.
        is_on_ground = true,
        /// Baby variant.
        is_child = false,
        /// Targeting something.
        is_aggressive = false,
        /// Not dead.
        is_alive = true,
        /// On fire.
        is_burning = false,
        /// Crouching.
        is_sneaking = false,
        /// Sprinting.
        is_sprinting = false,
        /// In water or rain.
        is_wet = false,
        /// Submerged in lava.
        is_in_lava = false,
        /// Invisibility effect active.
        is_invisible = false,
        /// Carrying a rider.
        is_ridden = false,
        /// Sitting.
        is_sitting = false,
        /// Tamed by a player.
        is_tamed = false,
        /// Projectile stuck in a block.
        is_in_ground = false,
    }
}

impl EntityState {
    /// Default record that keeps identity and head orientation, used on preset changes.
    pub fn reset_preserving_identity(&mut self) {
        *self = Self {
            id: self.id,
            rule_index: self.rule_index,
            head_yaw: self.head_yaw,
            head_pitch: self.head_pitch,
            ..Self::default()
        };
    }

    /// `sin(limb_swing * 0.6662) * 1.4 * limb_speed`, the vanilla limb swing amount.
    pub fn swing_amount(&self) -> f64 {
        (self.limb_swing * 0.6662).sin() * 1.4 * self.limb_speed
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/state.rs"]
mod tests;
