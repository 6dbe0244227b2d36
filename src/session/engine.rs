use crate::animation::fallback::animate_fallback;
use crate::animation::pose::PoseManager;
use crate::animation::preset::{PresetDef, find_preset};
use crate::animation::trigger::{
    ActiveTrigger, RootOverlay, TriggerEnv, TriggerManager, parse_rule_index,
};
use crate::compile::compiler::{CompiledLayers, compile_layers};
use crate::eval::context::{AnimationContext, BoneValues, merge_bone_values};
use crate::eval::pass::{PartialTransform, VARB_BONE, evaluate_pass};
use crate::eval::state::EntityState;
use crate::foundation::core::Axis;
use crate::foundation::error::{CemError, CemResult};
use crate::normalize::pass::{Normalized, normalize};
use crate::rig::correction::{RigCorrection, RigOffsets, apply_offsets};
use crate::scene::model::AnimationLayer;
use crate::scene::skeleton::{AbsoluteSpace, Bone, Skeleton};
use glam::DVec3;
use std::collections::{BTreeMap, BTreeSet};

const MIN_SPEED: f64 = 0.1;
const MAX_SPEED: f64 = 3.0;

/// Options controlling an [`AnimationEngine`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineOpts {
    /// CEM pixels per scene unit.
    pub pixels_per_unit: f64,
    /// Playback speed at construction, clamped like [`AnimationEngine::set_speed`].
    pub initial_speed: f64,
    /// Enable one-time rig-correction inference.
    pub rig_correction: bool,
    /// Synthesize vanilla head/limb rotations for bones read but never written.
    pub vanilla_input_seeding: bool,
    /// Upper bound on a single tick's delta, seconds.
    pub max_delta_sec: f64,
}

impl Default for EngineOpts {
    fn default() -> Self {
        Self {
            pixels_per_unit: crate::foundation::core::DEFAULT_PIXELS_PER_UNIT,
            initial_speed: 1.0,
            rig_correction: true,
            vanilla_input_seeding: true,
            max_delta_sec: 0.25,
        }
    }
}

impl EngineOpts {
    fn validate(&self) -> CemResult<()> {
        if !(self.pixels_per_unit.is_finite() && self.pixels_per_unit > 0.0) {
            return Err(CemError::validation(
                "pixels_per_unit must be finite and positive",
            ));
        }
        if !(self.max_delta_sec.is_finite() && self.max_delta_sec > 0.0) {
            return Err(CemError::validation(
                "max_delta_sec must be finite and positive",
            ));
        }
        if !self.initial_speed.is_finite() {
            return Err(CemError::validation("initial_speed must be finite"));
        }
        Ok(())
    }
}

/// Per-entity animation runtime: owns the skeleton, the compiled layers and all playback state.
///
/// Construction front-loads compilation and normalization; [`AnimationEngine::tick`] then
/// evaluates every layer once per frame and writes the result into the skeleton.
#[derive(Debug)]
pub struct AnimationEngine {
    skeleton: Skeleton,
    compiled: CompiledLayers,
    normalized: Normalized,
    trigger_env: TriggerEnv,
    ctx: AnimationContext,
    /// Persistent entity state; poses and trigger overrides only touch a per-tick copy.
    state: EntityState,
    identity: EntityState,

    preset: Option<&'static PresetDef>,
    preset_elapsed: f64,
    playing: bool,
    speed: f64,

    triggers: TriggerManager,
    poses: PoseManager,
    feature_inputs: BoneValues,
    render: BTreeMap<String, f64>,
    root_overlay: RootOverlay,

    registered_corrections: RigOffsets,
    rig: RigCorrection,

    warned: BTreeSet<String>,
    disposed: bool,
    opts: EngineOpts,
}

impl AnimationEngine {
    /// Build an engine with default options.
    pub fn new(
        skeleton: Skeleton,
        layers: &[AnimationLayer],
        entity_id: Option<f64>,
    ) -> CemResult<Self> {
        Self::with_opts(skeleton, layers, entity_id, EngineOpts::default())
    }

    /// Build an engine, compiling and normalizing `layers` against `skeleton`.
    #[tracing::instrument(skip_all, fields(bones = skeleton.len(), layers = layers.len()))]
    pub fn with_opts(
        mut skeleton: Skeleton,
        layers: &[AnimationLayer],
        entity_id: Option<f64>,
        opts: EngineOpts,
    ) -> CemResult<Self> {
        opts.validate()?;
        let identity = EntityState {
            id: entity_id.unwrap_or(0.0),
            ..EntityState::default()
        };
        let compiled = compile_layers(layers);
        let normalized = normalize(
            &mut skeleton,
            &compiled,
            &identity,
            opts.pixels_per_unit,
            opts.vanilla_input_seeding,
        );
        log_normalized(&normalized);
        let trigger_env = trigger_env(&compiled, &normalized);
        skeleton.reset_to_rest();
        skeleton.update_world_matrices();
        Ok(Self {
            skeleton,
            compiled,
            normalized,
            trigger_env,
            ctx: AnimationContext::new(identity.clone()),
            state: identity.clone(),
            identity,
            preset: None,
            preset_elapsed: 0.0,
            playing: false,
            speed: opts.initial_speed.clamp(MIN_SPEED, MAX_SPEED),
            triggers: TriggerManager::default(),
            poses: PoseManager::default(),
            feature_inputs: BoneValues::new(),
            render: BTreeMap::new(),
            root_overlay: RootOverlay::default(),
            registered_corrections: RigOffsets::new(),
            rig: RigCorrection::default(),
            warned: BTreeSet::new(),
            disposed: false,
            opts,
        })
    }

    /// Advance by `delta_sec` and pose the skeleton. Returns false when nothing was updated.
    pub fn tick(&mut self, delta_sec: f64) -> bool {
        if self.disposed {
            return false;
        }
        if !delta_sec.is_finite() {
            self.warn_once("tick", "non-finite tick delta ignored");
            return false;
        }
        let delta = delta_sec.clamp(0.0, self.opts.max_delta_sec) * self.speed;

        self.step_preset(delta);
        self.state.frame_time = delta;
        self.state.frame_counter += 1.0;

        let frame = self.triggers.update(delta, &mut self.state, &self.trigger_env);
        let mut effective = self.state.clone();
        let mut pose_inputs = BoneValues::new();
        self.poses.apply(&mut effective, &mut pose_inputs);
        for &(name, value) in &frame.state_overrides {
            effective.set(name, value);
        }
        self.root_overlay = frame.root;

        if self.compiled.is_empty() {
            self.skeleton.reset_to_rest();
            if self.preset.is_some() {
                animate_fallback(&mut self.skeleton, &effective);
            }
            self.finish_frame();
            return true;
        }

        let mut inputs = pose_inputs;
        merge_bone_values(&mut inputs, &self.feature_inputs);
        merge_bone_values(&mut inputs, &frame.bone_inputs);
        match self.evaluate_layers(effective, &inputs) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "animation tick failed");
                false
            }
        }
    }

    fn step_preset(&mut self, delta: f64) {
        let Some(preset) = self.preset else {
            return;
        };
        if !self.playing {
            return;
        }
        if preset.is_finished(self.preset_elapsed) {
            self.playing = false;
            return;
        }
        self.preset_elapsed += delta;
        if preset.looping
            && let Some(d) = preset.duration_sec
            && d > 0.0
        {
            self.preset_elapsed %= d;
        }
        preset.step(&mut self.state, delta, self.preset_elapsed);
    }

    fn evaluate_layers(&mut self, effective: EntityState, inputs: &BoneValues) -> CemResult<()> {
        let ppu = self.opts.pixels_per_unit;
        self.skeleton.reset_to_rest();
        self.ctx.entity_state = effective;
        self.ctx.reset_bone_values(&self.normalized.rest);
        if self.opts.vanilla_input_seeding {
            self.normalized.seeds.apply(&mut self.ctx, &self.skeleton);
        }
        merge_bone_values(&mut self.ctx.bone_values, inputs);

        let out = evaluate_pass(&self.compiled.layers, &mut self.ctx);
        self.render.extend(out.render);

        for (name, partial) in &out.bones {
            let Some(idx) = self.skeleton.find(name) else {
                continue;
            };
            let parent_units = match self.skeleton.bone(idx).parent {
                Some(p) if p != self.skeleton.root() => self.skeleton.root_relative_px(p, ppu) / ppu,
                _ => DVec3::ZERO,
            };
            apply_partial(self.skeleton.bone_mut(idx), partial, parent_units, ppu)?;
        }

        apply_offsets(&mut self.skeleton, &self.registered_corrections);
        if let Some(inferred) = self.rig.offsets() {
            apply_offsets(&mut self.skeleton, inferred);
        }
        self.skeleton.update_world_matrices();
        if self.opts.rig_correction && self.rig.infer_once(&self.skeleton) {
            if let Some(inferred) = self.rig.offsets() {
                apply_offsets(&mut self.skeleton, inferred);
            }
            self.skeleton.update_world_matrices();
        }
        self.finish_frame();
        Ok(())
    }

    fn finish_frame(&mut self) {
        let root = self.skeleton.root();
        let bone = self.skeleton.bone_mut(root);
        bone.position += self.root_overlay.position;
        bone.rotation += self.root_overlay.rotation;
        self.skeleton.update_world_matrices();
    }

    /// Select a preset (or none). Unknown ids are warned and ignored.
    pub fn set_preset(&mut self, id: Option<&str>, auto_play: bool) -> bool {
        let preset = match id {
            None => None,
            Some(id) => match find_preset(id) {
                Some(p) => Some(p),
                None => {
                    self.warn_once(id, "unknown preset");
                    return false;
                }
            },
        };
        self.preset = preset;
        self.preset_elapsed = 0.0;
        self.state.reset_preserving_identity();
        self.playing = preset.is_some() && auto_play;
        true
    }

    /// Resume the preset, restarting a finished one-shot.
    pub fn play(&mut self) {
        if let Some(p) = self.preset
            && p.is_finished(self.preset_elapsed)
        {
            self.preset_elapsed = 0.0;
        }
        self.playing = true;
    }

    /// Freeze the preset clock. Ticks still evaluate.
    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Stop playback and rewind the preset clock.
    pub fn stop(&mut self) {
        self.playing = false;
        self.preset_elapsed = 0.0;
    }

    /// Stop, drop triggers and variables, and return the skeleton to rest.
    pub fn reset(&mut self) {
        self.stop();
        self.reset_state();
        self.triggers.clear();
        self.ctx.variables.clear();
        self.render.clear();
        self.root_overlay = RootOverlay::default();
        self.skeleton.reset_to_rest();
        self.skeleton.update_world_matrices();
    }

    /// Restore default entity state, keeping identity and head orientation.
    pub fn reset_state(&mut self) {
        self.state.reset_preserving_identity();
    }

    /// Set playback speed, clamped to `[0.1, 3.0]`. Non-finite values are ignored.
    pub fn set_speed(&mut self, speed: f64) {
        if speed.is_finite() {
            self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
        }
    }

    /// Current playback speed multiplier.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Head yaw and pitch, degrees.
    pub fn set_head_orientation(&mut self, yaw: f64, pitch: f64) {
        self.state.head_yaw = yaw;
        self.state.head_pitch = pitch;
    }

    /// Current `var.<name>`, `0` when unset.
    pub fn variable(&self, name: &str) -> f64 {
        self.ctx.variable(name)
    }

    /// Set `var.<name>`.
    pub fn set_variable(&mut self, name: &str, value: f64) {
        self.ctx.variables.insert(name.to_owned(), value);
    }

    /// Value of `bone.property` as of the last evaluated tick (CEM units).
    pub fn bone_value(&self, bone: &str, property: &str) -> Option<f64> {
        self.ctx.bone_value(bone, property)
    }

    /// Current `varb.<name>` as a boolean.
    pub fn bool_variable(&self, name: &str) -> bool {
        self.ctx.bone_value(VARB_BONE, name).is_some_and(|v| v != 0.0)
    }

    /// Start a one-shot trigger. Unknown ids are warned and ignored.
    pub fn play_trigger(&mut self, id: &str) -> bool {
        if self.triggers.play(id, &mut self.state) {
            return true;
        }
        self.warn_once(id, "unknown trigger");
        false
    }

    /// Replace the active pose toggles. Unknown ids are warned and dropped.
    pub fn set_pose_toggles(&mut self, ids: &[&str]) {
        let unknown: Vec<String> = self
            .poses
            .set_toggles(ids)
            .into_iter()
            .map(str::to_owned)
            .collect();
        for id in unknown {
            self.warn_once(&id, "unknown pose toggle");
        }
    }

    /// Host-supplied bone inputs, layered between pose and trigger inputs.
    pub fn set_feature_bone_input_overrides(&mut self, overrides: BoneValues) {
        self.feature_inputs = overrides;
    }

    /// Set entity-state fields by expression name. Unknown names are warned once.
    pub fn update_entity_state(&mut self, fields: &[(&str, f64)]) {
        for &(name, value) in fields {
            if !self.state.set(name, value) {
                self.warn_once(name, "unknown entity state field");
            }
        }
    }

    /// Last value written to `render.<name>`.
    pub fn render_value(&self, name: &str) -> Option<f64> {
        self.render.get(name).copied()
    }

    /// Add a local position offset to `bone` after every evaluated frame.
    pub fn register_rig_correction(&mut self, bone: &str, offset: DVec3) -> bool {
        match self.skeleton.find(bone) {
            Some(idx) => {
                self.registered_corrections.insert(idx, offset);
                true
            }
            None => {
                self.warn_once(bone, "rig correction for unknown bone");
                false
            }
        }
    }

    /// Recompile and renormalize for a new layer set on the same skeleton.
    #[tracing::instrument(skip_all, fields(layers = layers.len()))]
    pub fn reload(&mut self, layers: &[AnimationLayer]) {
        self.skeleton.reset_to_rest();
        self.compiled = compile_layers(layers);
        self.normalized = normalize(
            &mut self.skeleton,
            &self.compiled,
            &self.identity,
            self.opts.pixels_per_unit,
            self.opts.vanilla_input_seeding,
        );
        log_normalized(&self.normalized);
        self.trigger_env = trigger_env(&self.compiled, &self.normalized);
        let state = std::mem::take(&mut self.ctx.entity_state);
        self.ctx.clear();
        self.ctx.entity_state = state;
        self.render.clear();
        self.rig = RigCorrection::default();
        self.warned.clear();
        self.disposed = false;
        self.skeleton.update_world_matrices();
    }

    /// Drop every derived map. Later ticks are no-ops.
    pub fn dispose(&mut self) {
        self.skeleton.clear();
        self.compiled = CompiledLayers::default();
        self.normalized = Normalized::default();
        self.ctx.clear();
        self.triggers.clear();
        self.poses.clear();
        self.feature_inputs.clear();
        self.render.clear();
        self.registered_corrections.clear();
        self.rig = RigCorrection::default();
        self.warned.clear();
        self.preset = None;
        self.playing = false;
        self.disposed = true;
    }

    /// Triggers still running.
    pub fn active_triggers(&self) -> &[ActiveTrigger] {
        self.triggers.active()
    }

    /// Ids of the poses toggled on.
    pub fn pose_toggles(&self) -> Vec<&'static str> {
        self.poses.active_ids()
    }

    /// Whether the preset clock advances.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Id of the selected preset.
    pub fn preset(&self) -> Option<&'static str> {
        self.preset.map(|p| p.id)
    }

    /// Persistent entity state (pose overrides excluded).
    pub fn entity_state(&self) -> &EntityState {
        &self.state
    }

    /// The posed skeleton.
    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    /// Root overlay applied on the last tick.
    pub fn root_overlay(&self) -> RootOverlay {
        self.root_overlay
    }

    /// Options the engine was built with.
    pub fn opts(&self) -> &EngineOpts {
        &self.opts
    }

    fn warn_once(&mut self, subject: &str, what: &'static str) {
        if self.warned.insert(format!("{what}:{subject}")) {
            tracing::warn!(subject, "{what}");
        }
    }
}

fn log_normalized(normalized: &Normalized) {
    tracing::debug!(
        baseline_channels = normalized.baselines.default.len(),
        excluded = normalized.excluded.len(),
        "layers normalized"
    );
}

fn trigger_env(compiled: &CompiledLayers, normalized: &Normalized) -> TriggerEnv {
    TriggerEnv {
        drives_neck: normalized.analysis.reads_neck_ty,
        eat_rule_index: compiled
            .writer(VARB_BONE, "index_eat")
            .and_then(|a| a.expression.source())
            .and_then(parse_rule_index),
        head_rest_rx: normalized
            .rest
            .get("head")
            .and_then(|p| p.get("rx"))
            .copied()
            .unwrap_or(0.0),
    }
}

/// Write one bone's evaluated channels into its transform using its calibration.
pub(crate) fn apply_partial(
    bone: &mut Bone,
    partial: &PartialTransform,
    parent_rest_units: DVec3,
    ppu: f64,
) -> CemResult<()> {
    let cal = bone.calibration.clone();
    for axis in Axis::ALL {
        let i = axis.index();
        let sign = bone.sign(axis);
        if let Some(v) = partial.translate[i] {
            let p = if cal.translation_absolute[i] {
                match cal.translation_space[i] {
                    AbsoluteSpace::Local => sign * v / ppu,
                    AbsoluteSpace::Entity => {
                        let origin = if axis == Axis::Y {
                            cal.cem_y_origin.unwrap_or(0.0)
                        } else {
                            0.0
                        };
                        sign * (v - origin) / ppu - parent_rest_units[i]
                    }
                }
            } else {
                bone.base.position[i] + sign * (v - cal.translation_offset_px[i]) / ppu
            };
            bone.position[i] = finite(p, &bone.name, "translation")?;
        }
        if let Some(v) = partial.rotate[i] {
            let delta = sign * (v - cal.rotation_offset[i]);
            let r = if cal.rotation_absolute[i] {
                delta
            } else {
                bone.base.rotation[i] + delta
            };
            bone.rotation[i] = finite(r, &bone.name, "rotation")?;
        }
        if let Some(v) = partial.scale[i] {
            bone.scale[i] = finite(bone.base.scale[i] * v, &bone.name, "scale")?;
        }
    }
    if let Some(v) = partial.visible {
        bone.visible = v;
    }
    if let Some(v) = partial.visible_boxes {
        bone.boxes_visible = v;
    }
    Ok(())
}

fn finite(v: f64, bone: &str, what: &str) -> CemResult<f64> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CemError::evaluation(format!(
            "non-finite {what} for bone '{bone}'"
        )))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/engine.rs"]
mod tests;
