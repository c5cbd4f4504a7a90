use super::*;

#[test]
fn parses_short_and_long_hex() {
    assert_eq!(Rgb::parse("#fff").unwrap(), Rgb::WHITE);
    assert_eq!(Rgb::parse("#ff0000").unwrap(), Rgb::new(1.0, 0.0, 0.0));
    assert_eq!(Rgb::parse("red").unwrap(), Rgb::new(1.0, 0.0, 0.0));
}

#[test]
fn rejects_malformed_colors() {
    assert!(Rgb::parse("#ff00").is_err());
    assert!(Rgb::parse("#gg0000").is_err());
    assert!(Rgb::parse("chartreuse-ish").is_err());
}

#[test]
fn color_serde_uses_hex_strings() {
    let s = serde_json::to_string(&Rgb::new(1.0, 0.0, 0.0)).unwrap();
    assert_eq!(s, "\"#ff0000\"");
    let back: Rgb = serde_json::from_str("\"#00ff00\"").unwrap();
    assert_eq!(back, Rgb::new(0.0, 1.0, 0.0));
}

#[test]
fn identity_transform_is_identity_matrix() {
    assert_eq!(Transform3D::default().matrix(), Mat4::IDENTITY);
}

#[test]
fn transform_applies_scale_then_translation() {
    let t = Transform3D {
        position: Vec3::new(0.0, 0.0, -10.0),
        rotation: Vec3::ZERO,
        scale: Vec3::splat(8.0),
    };
    let p = t.matrix().transform_point3(Vec3::new(1.0, 0.0, 0.0));
    assert!((p - Vec3::new(8.0, 0.0, -10.0)).length() < 1e-5);
}

#[test]
fn side_culling_table() {
    assert!(Side::Front.draws(true));
    assert!(!Side::Front.draws(false));
    assert!(Side::Back.draws(false));
    assert!(Side::Double.draws(false));
}
