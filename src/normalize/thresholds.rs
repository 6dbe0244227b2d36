//! Calibration thresholds for the channel normalizer.
//!
//! Pixel values are CEM pixels, angles are radians. The rotation-offset heuristics (pivot-only
//! baked rotation and moderate baseline on a large pivot) were tuned against published
//! resource packs and may need re-tuning for a broader corpus.

/// Rotation-point Y origin of root bones.
pub const CEM_Y_ORIGIN_PX: f64 = 24.0;

/// Baseline-vs-expected tolerance for every absolute translation test.
pub const ABSOLUTE_MATCH_PX: f64 = 0.75;
/// Minimum baseline magnitude for entity-space absolute X/Z.
pub const ENTITY_MIN_PX: f64 = 1.5;
/// Minimum baseline magnitude for local-space absolute translation.
pub const LOCAL_MIN_PX: f64 = 3.0;
/// Default vs walking-alt baseline difference that marks a channel pose-dependent.
pub const POSE_DEPENDENT_PX: f64 = 0.75;
/// Below this, a `ty` read by other bones is a shared bob amount, not a calibration constant.
pub const SMALL_SHARED_TY_PX: f64 = 3.0;
/// Tolerance for the "Y baseline cancels the parent's origin" offset exception.
pub const PARENT_ORIGIN_CANCEL_PX: f64 = 2.0;

/// Additive literal magnitude that makes a self-read translation a pivot seed.
pub const PIVOT_SEED_LITERAL_PX: f64 = 3.0;
/// Literal magnitude in an `if` branch that counts as pivot-sized.
pub const PIVOT_BRANCH_LITERAL_PX: f64 = 10.0;
/// Tolerance between an `if` literal and the bone's rotation-point Y.
pub const PIVOT_BRANCH_MATCH_PX: f64 = 2.0;

/// Rotation equality tolerance (baseline vs rest, descendant rest matching).
pub const ROTATION_EPSILON: f64 = 1e-4;
/// Pivot-only bone: minimum baked rest rotation.
pub const PIVOT_BAKED_REST_RAD: f64 = 0.75;
/// Pivot-only bone: minimum combined rest plus baseline.
pub const PIVOT_BAKED_TOTAL_RAD: f64 = 1.25;
/// Posture pivot duplication: minimum baseline magnitude.
pub const POSTURE_PIVOT_MIN_RAD: f64 = 0.4;
/// Moderate baseline window on large pivot bones.
pub const LARGE_PIVOT_MIN_RAD: f64 = 0.52;
/// Upper end of that window.
pub const LARGE_PIVOT_MAX_RAD: f64 = 1.15;
/// Minimum origin distance for a "large" pivot bone.
pub const LARGE_PIVOT_ORIGIN_PX: f64 = 16.0;
/// Descendant rotation that counts as materially rotated.
pub const ROTATED_DESCENDANT_RAD: f64 = 0.35;
/// Extreme baseline that must also hold under water to be an offset.
pub const EXTREME_BASELINE_RAD: f64 = 1.25;
