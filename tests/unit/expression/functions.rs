use super::*;

#[test]
fn catalog_round_trips_names() {
    for name in ["sin", "atan2", "torad", "fmod", "ifb", "between", "in", "printb"] {
        assert_eq!(Builtin::from_name(name).unwrap().name(), name);
    }
    assert_eq!(Builtin::from_name("sinh"), None);
}

#[test]
fn min_max_are_variadic() {
    assert_eq!(apply_pure(Builtin::Min, &[3.0, 1.0, 2.0]).unwrap(), 1.0);
    assert_eq!(apply_pure(Builtin::Max, &[3.0, 1.0, 7.0]).unwrap(), 7.0);
    assert!(apply_pure(Builtin::Max, &[]).is_err());
}

#[test]
fn clamp_tolerates_inverted_bounds() {
    assert_eq!(apply_pure(Builtin::Clamp, &[5.0, 0.0, 1.0]).unwrap(), 1.0);
    assert_eq!(apply_pure(Builtin::Clamp, &[5.0, 2.0, 1.0]).unwrap(), 1.0);
}

#[test]
fn fmod_is_floored_and_zero_safe() {
    assert_eq!(apply_pure(Builtin::Fmod, &[-1.0, 4.0]).unwrap(), 3.0);
    assert_eq!(apply_pure(Builtin::Fmod, &[5.0, 0.0]).unwrap(), 0.0);
}

#[test]
fn signum_of_zero_is_zero() {
    assert_eq!(apply_pure(Builtin::Signum, &[0.0]).unwrap(), 0.0);
    assert_eq!(apply_pure(Builtin::Signum, &[-2.0]).unwrap(), -1.0);
}

#[test]
fn round_goes_half_up() {
    assert_eq!(apply_pure(Builtin::Round, &[2.5]).unwrap(), 3.0);
    assert_eq!(apply_pure(Builtin::Round, &[-2.5]).unwrap(), -2.0);
}

#[test]
fn between_and_in() {
    assert_eq!(apply_pure(Builtin::Between, &[1.0, 1.0, 2.0]).unwrap(), 1.0);
    assert_eq!(apply_pure(Builtin::Between, &[2.5, 1.0, 2.0]).unwrap(), 0.0);
    assert_eq!(apply_pure(Builtin::In, &[3.0, 1.0, 2.0, 3.0]).unwrap(), 1.0);
    assert_eq!(apply_pure(Builtin::Equals, &[4.0, 1.0]).unwrap(), 0.0);
}

#[test]
fn arity_errors_name_the_function() {
    let err = apply_pure(Builtin::Atan2, &[1.0]).unwrap_err();
    assert!(err.to_string().contains("atan2"));
}

#[test]
fn print_passes_first_argument_through() {
    assert_eq!(apply_pure(Builtin::Print, &[4.0, 9.0]).unwrap(), 4.0);
    assert_eq!(apply_pure(Builtin::PrintB, &[]).unwrap(), 0.0);
}
