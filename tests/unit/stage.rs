use super::*;
use crate::effects::glitch::GlitchPass;
use crate::effects::pass::{EffectPass, ScenePass};
use crate::material::composite::Lighting;
use crate::material::layer::LayerProps;
use crate::material::layers::{DisplaceLayer, NoiseKind, StarterLayer};

fn stage() -> Stage {
    let material = CompositeMaterial::new(Rgb::WHITE, Lighting::Standard)
        .with_layer(DisplaceLayer::new(NoiseKind::Simplex, LayerProps::new()).unwrap())
        .with_layer(StarterLayer::new(LayerProps::new()).unwrap());
    let scene = Scene {
        logo: Logo {
            mesh: Mesh::torus(0.12, 0.03, 8, 16),
            transform: Transform3D::default(),
            material,
        },
        camera: Camera::default(),
        ambient: Rgb::WHITE,
        clear: Rgb::BLACK,
    };
    let mut glitch = GlitchPass::new(4, 1).unwrap();
    glitch.set_enabled(false);
    let pipeline = EffectPipeline::new(8, 6)
        .with_pass(ScenePass::new())
        .with_pass(glitch);
    Stage::new(scene, pipeline, 3.5)
}

#[test]
fn construction_mirrors_time_into_declaring_layers() {
    let s = stage();
    assert_eq!(s.read("uniforms.time"), Some(PropValue::Scalar(3.5)));
    assert_eq!(
        s.read("material.layers.starter.time"),
        Some(PropValue::Scalar(3.5))
    );
    assert!(s.read("material.layers.displace.time").is_none());
}

#[test]
fn drift_accumulates_and_mirrors() {
    let mut s = stage();
    s.drift(1.0, 0.005);
    let t = s.drift(1.0, 0.005);
    assert!((t - 3.51).abs() < 1e-12);
    let mirrored = s.read("material.layers.starter.time").unwrap().as_f64();
    assert!((mirrored - 3.51).abs() < 1e-12);
}

#[test]
fn writes_read_back_through_every_path_family() {
    let mut s = stage();
    let cases: &[(&str, PropValue)] = &[
        ("logo.position.z", PropValue::Scalar(-10.0)),
        ("logo.rotation.x", PropValue::Scalar(1.5)),
        ("logo.scale.y", PropValue::Scalar(8.0)),
        ("material.alpha", PropValue::Scalar(0.25)),
        ("material.transparent", PropValue::Bool(true)),
        ("material.color", PropValue::Color(Rgb::new(1.0, 0.0, 0.0))),
        ("material.layers.displace.opacity", PropValue::Scalar(0.5)),
        ("material.layers.displace.visible", PropValue::Bool(false)),
        ("material.layers.displace.strength", PropValue::Scalar(2.0)),
        ("passes.glitch.enabled", PropValue::Bool(true)),
        ("passes.glitch.uniforms.col_s", PropValue::Scalar(0.5)),
        ("camera.fov", PropValue::Scalar(60.0)),
        ("camera.position.z", PropValue::Scalar(4.0)),
        ("uniforms.time", PropValue::Scalar(9.0)),
    ];
    for (path, value) in cases {
        assert!(s.write(path, *value), "{path}");
        assert_eq!(s.read(path), Some(*value), "{path}");
    }
    assert!(s.pipeline.pass("glitch").unwrap().enabled());
    assert_eq!(
        s.read("material.layers.starter.time"),
        Some(PropValue::Scalar(9.0))
    );
}

#[test]
fn writes_are_coerced_to_the_property_type() {
    let mut s = stage();
    assert!(s.write("passes.glitch.enabled", PropValue::Scalar(0.3)));
    assert_eq!(s.read("passes.glitch.enabled"), Some(PropValue::Bool(true)));
    assert!(s.write("material.transparent", PropValue::Scalar(0.0)));
    assert_eq!(s.read("material.transparent"), Some(PropValue::Bool(false)));
    assert!(s.write("logo.position.x", PropValue::Bool(true)));
    assert_eq!(s.read("logo.position.x"), Some(PropValue::Scalar(1.0)));
}

#[test]
fn unknown_paths_are_ignored() {
    let mut s = stage();
    for path in [
        "logo.position.w",
        "logo.colour",
        "material.layers.missing.opacity",
        "material.layers.displace.nonsense",
        "passes.bloom.enabled",
        "passes.glitch.uniforms.nope",
        "",
    ] {
        assert!(s.read(path).is_none(), "{path}");
        assert!(!s.write(path, PropValue::Scalar(1.0)), "{path}");
    }
}

#[test]
fn check_paths_reports_the_first_unknown_target() {
    let s = stage();
    assert!(
        s.check_paths(["logo.rotation.x".to_owned(), "passes.glitch.enabled".to_owned()])
            .is_ok()
    );
    let err = s
        .check_paths(["material.alpha".to_owned(), "logo.spin".to_owned()])
        .unwrap_err();
    assert!(err.to_string().contains("logo.spin"));
    assert!(matches!(err, StrataError::Timeline(_)));
}

#[test]
fn render_runs_only_enabled_passes() {
    let mut s = stage();
    let out = s.render().unwrap();
    assert_eq!(out.applied, vec!["scene"]);
    s.write("passes.glitch.enabled", true.into());
    let out = s.render().unwrap();
    assert_eq!(out.applied, vec!["scene", "glitch"]);
}
