use crate::normalize::thresholds::{
    EXTREME_BASELINE_RAD, LARGE_PIVOT_MAX_RAD, LARGE_PIVOT_MIN_RAD, LARGE_PIVOT_ORIGIN_PX,
    PIVOT_BAKED_REST_RAD, PIVOT_BAKED_TOTAL_RAD, POSTURE_PIVOT_MIN_RAD, ROTATED_DESCENDANT_RAD,
    ROTATION_EPSILON,
};

/// Outcome for one animated rotation axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum RotationClass {
    /// Value replaces the rest rotation; `offset` is subtracted first.
    Absolute { offset: f64 },
    /// Additive with the baseline subtracted.
    Offset(f64),
    /// Additive with no correction.
    Plain,
}

/// Inputs for one bone axis. Angles in radians, `rest` is the raw base rotation.
#[derive(Debug, Clone)]
pub(crate) struct RotationFacts {
    pub(crate) baseline: f64,
    pub(crate) water_baseline: Option<f64>,
    pub(crate) rest: f64,
    pub(crate) sign: f64,
    pub(crate) self_read: bool,
    pub(crate) pivot_only: bool,
    /// Distance of the bone's entity-space pivot from the model origin, pixels.
    pub(crate) origin_len_px: f64,
    /// Rest rotation of every descendant on the same axis.
    pub(crate) descendant_rests: Vec<f64>,
}

fn near_zero(v: f64) -> bool {
    v.abs() <= ROTATION_EPSILON
}

pub(crate) fn matches_rest(baseline: f64, rest: f64, sign: f64) -> bool {
    (baseline - sign * rest).abs() <= ROTATION_EPSILON
}

/// (a) A pivot-only bone with a baked rest angle whose baseline keeps it large.
pub(crate) fn is_baked_pivot(f: &RotationFacts) -> bool {
    f.pivot_only
        && f.rest.abs() >= PIVOT_BAKED_REST_RAD
        && (f.rest + f.sign * f.baseline).abs() >= PIVOT_BAKED_TOTAL_RAD
}

/// (b) The baseline duplicates a descendant's rest angle: the posture was baked twice.
pub(crate) fn is_posture_duplicate(f: &RotationFacts) -> bool {
    f.baseline.abs() >= POSTURE_PIVOT_MIN_RAD
        && near_zero(f.rest)
        && f
            .descendant_rests
            .iter()
            .any(|d| (d - f.baseline).abs() <= ROTATION_EPSILON)
}

/// (c) Moderate baseline on a far-out pivot bone carrying rotated children.
pub(crate) fn is_large_pivot_posture(f: &RotationFacts) -> bool {
    let b = f.baseline.abs();
    (LARGE_PIVOT_MIN_RAD..=LARGE_PIVOT_MAX_RAD).contains(&b)
        && f.pivot_only
        && f.origin_len_px >= LARGE_PIVOT_ORIGIN_PX
        && near_zero(f.rest)
        && f
            .descendant_rests
            .iter()
            .any(|d| d.abs() > ROTATED_DESCENDANT_RAD)
}

/// (d) An extreme baseline that also holds under water.
pub(crate) fn is_extreme_in_all_states(f: &RotationFacts) -> bool {
    f.baseline.abs() >= EXTREME_BASELINE_RAD
        && f
            .water_baseline
            .is_some_and(|w| w.abs() >= EXTREME_BASELINE_RAD)
}

pub(crate) fn classify_rotation(f: &RotationFacts) -> RotationClass {
    if f.self_read || matches_rest(f.baseline, f.rest, f.sign) {
        return RotationClass::Absolute { offset: 0.0 };
    }
    if is_baked_pivot(f)
        || is_posture_duplicate(f)
        || is_large_pivot_posture(f)
        || is_extreme_in_all_states(f)
    {
        return RotationClass::Offset(f.baseline);
    }
    RotationClass::Plain
}

/// Calibration for `B.r? = A.r?`. `source_rest_value` is the CEM value A evaluates to at
/// rest; an absolute source makes B absolute with the offset that maps that value to B's rest.
pub(crate) fn inherit_copy(
    source_absolute: bool,
    source_offset: f64,
    source_rest_value: f64,
    rest: f64,
    sign: f64,
) -> RotationClass {
    if source_absolute {
        RotationClass::Absolute {
            offset: source_rest_value - sign * rest,
        }
    } else if source_offset == 0.0 {
        RotationClass::Plain
    } else {
        RotationClass::Offset(source_offset)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/normalize/rotation.rs"]
mod tests;
