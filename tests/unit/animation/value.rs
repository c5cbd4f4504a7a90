use super::*;

#[test]
fn scalar_interpolation_hits_endpoints() {
    let a = PropValue::Scalar(2.0);
    let b = PropValue::Scalar(6.0);
    assert_eq!(PropValue::interpolate(a, b, 0.0), a);
    assert_eq!(PropValue::interpolate(a, b, 0.5), PropValue::Scalar(4.0));
    assert_eq!(PropValue::interpolate(a, b, 1.0), b);
}

#[test]
fn bool_turns_on_immediately_and_off_at_end() {
    let on = PropValue::interpolate(false.into(), true.into(), 0.01);
    assert_eq!(on, PropValue::Bool(true));

    let still_on = PropValue::interpolate(true.into(), false.into(), 0.99);
    assert_eq!(still_on, PropValue::Bool(true));
    let off = PropValue::interpolate(true.into(), false.into(), 1.0);
    assert_eq!(off, PropValue::Bool(false));
}

#[test]
fn mismatched_types_are_coerced() {
    assert_eq!(PropValue::Bool(true).as_f64(), 1.0);
    assert!(PropValue::Scalar(0.5).as_bool());
    assert_eq!(PropValue::Scalar(0.25).as_rgb(), Rgb::splat(0.25));
    let mixed = PropValue::interpolate(PropValue::Bool(false), PropValue::Scalar(10.0), 0.5);
    assert_eq!(mixed, PropValue::Scalar(5.0));
}

#[test]
fn untagged_json_forms() {
    let v: Vec<PropValue> = serde_json::from_str(r##"[true, 1.5, "#ff0000"]"##).unwrap();
    assert_eq!(
        v,
        vec![
            PropValue::Bool(true),
            PropValue::Scalar(1.5),
            PropValue::Color(Rgb::new(1.0, 0.0, 0.0)),
        ]
    );
}
