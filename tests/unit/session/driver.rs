use super::*;
use crate::animation::script::logo_reveal;
use crate::animation::value::PropValue;
use crate::clock::FixedStep;
use crate::foundation::error::StrataError;
use crate::render::mesh::Mesh;
use crate::session::assets::{MeshFile, ProceduralLogo};
use crate::stage::Animatable;

fn small_config() -> SessionConfig {
    let mut cfg = SessionConfig::default();
    cfg.viewport.width = 32;
    cfg.viewport.height = 24;
    cfg
}

fn session() -> Session {
    Session::bootstrap(small_config(), &logo_reveal(), &ProceduralLogo::default()).unwrap()
}

fn read(stage: &Stage, path: &str) -> f64 {
    stage.read(path).unwrap().as_f64()
}

#[test]
fn bootstrap_builds_the_stock_stage() {
    let s = session();
    assert_eq!(s.program().layer_order(), ["displace"]);
    assert!(s.stage.scene.logo.material.is_built());
    assert_eq!(s.stage.pipeline.size(), (32, 24));
    assert_eq!(read(&s.stage, "logo.scale.x"), 8.0);
    assert_eq!(read(&s.stage, "logo.position.z"), -10.0);
    assert_eq!(read(&s.stage, "material.alpha"), 0.0);
    assert_eq!(read(&s.stage, "uniforms.time"), 3.5);
    assert_eq!(s.stage.read("passes.glitch.enabled"), Some(PropValue::Bool(false)));
    assert_eq!(read(&s.stage, "passes.glitch.uniforms.col_s"), 0.0);
    assert_eq!(s.timeline.state(), TimelineState::Idle);
}

#[test]
fn starter_layer_joins_when_active() {
    let mut cfg = small_config();
    cfg.material.starter.active = true;
    let s = Session::bootstrap(cfg, &logo_reveal(), &ProceduralLogo::default()).unwrap();
    assert_eq!(s.program().layer_order(), ["displace", "starter"]);
    assert_eq!(read(&s.stage, "material.layers.starter.time"), 3.5);
}

#[test]
fn ticks_report_the_uniforms_that_changed() {
    let mut cfg = small_config();
    cfg.material.starter.active = true;
    let s = Session::bootstrap(cfg, &logo_reveal(), &ProceduralLogo::default()).unwrap();
    let mut driver = s.into_driver(FixedStep::from_fps(60.0));
    let first = driver.tick();
    assert!(first.changed_uniforms.contains(&"u_strength_displace_0".to_owned()));
    let second = driver.tick();
    assert_eq!(second.changed_uniforms, ["u_time_starter_1"]);
}

#[test]
fn bootstrap_fails_on_bad_inputs() {
    let err = Session::bootstrap(
        small_config(),
        &logo_reveal(),
        &MeshFile::new("/no/such/mesh.json"),
    )
    .unwrap_err();
    assert!(matches!(err, StrataError::Asset(_)));

    let script = ScriptDef::from_json(
        r#"{ "cues": [ { "target": "logo.wobble", "props": { "x": 1 } } ] }"#,
    )
    .unwrap();
    let err = Session::bootstrap(small_config(), &script, &ProceduralLogo::default()).unwrap_err();
    assert!(matches!(err, StrataError::Timeline(_)));

    let script = ScriptDef::from_json(
        r#"{ "cues": [ { "target": "material", "props": { "alpha": 1 }, "position": "nowhere" } ] }"#,
    )
    .unwrap();
    let err = Session::bootstrap(small_config(), &script, &ProceduralLogo::default()).unwrap_err();
    assert!(matches!(err, StrataError::Timeline(_)));

    let mut cfg = small_config();
    cfg.glitch.dt_size = 70_000;
    let err = Session::bootstrap(cfg, &logo_reveal(), &ProceduralLogo::default()).unwrap_err();
    assert!(matches!(err, StrataError::Validation(_)));

    let broken = Mesh {
        positions: vec![Vec3::ZERO],
        normals: Vec::new(),
        indices: vec![[0, 0, 5]],
    };
    let err = Session::bootstrap(small_config(), &logo_reveal(), &broken).unwrap_err();
    assert!(matches!(err, StrataError::Asset(_)));
}

#[test]
fn starting_applies_negative_offset_cues_before_the_first_tick() {
    let driver = session().into_driver(FixedStep::from_fps(60.0));
    let stage = driver.stage();
    let x = read(stage, "logo.rotation.x");
    assert!((x + std::f64::consts::FRAC_PI_2).abs() < 1e-6);
    assert_eq!(driver.timeline().state(), TimelineState::Playing);
    assert_eq!(driver.frame_count(), 0);
}

#[test]
fn tick_advances_timeline_and_drift_together() {
    let mut driver = session().into_driver(FixedStep::new(0.5));
    let out = driver.tick();
    assert_eq!(out.index, 0);
    assert_eq!(out.delta, 0.5);
    assert_eq!(out.play_head, 0.5);
    assert_eq!(out.applied, vec![ScenePass::NAME]);
    assert_eq!((out.frame.width, out.frame.height), (32, 24));
    assert!((read(driver.stage(), "uniforms.time") - (3.5 + 0.5 * 0.005)).abs() < 1e-12);

    let out = driver.tick();
    assert_eq!(out.index, 1);
    assert_eq!(out.play_head, 1.0);
    assert!(read(driver.stage(), "material.alpha") > 0.0);
}

#[test]
fn timeline_rate_scales_the_play_head_but_not_drift() {
    let mut cfg = small_config();
    cfg.timeline.time_scale = 2.0;
    let s = Session::bootstrap(cfg, &logo_reveal(), &ProceduralLogo::default()).unwrap();
    let mut driver = s.into_driver(FixedStep::new(0.25));
    let out = driver.tick();
    assert_eq!(out.play_head, 0.5);
    assert!((read(driver.stage(), "uniforms.time") - (3.5 + 0.25 * 0.005)).abs() < 1e-12);
}

#[test]
fn driver_reaches_finished_after_the_last_cue() {
    let mut driver = session().into_driver(FixedStep::new(1.0));
    let mut last = None;
    for _ in 0..6 {
        last = Some(driver.tick());
    }
    let last = last.unwrap();
    assert_eq!(last.state, TimelineState::Finished);
    assert_eq!(read(driver.stage(), "logo.position.z"), 5.0);
    assert_eq!(driver.stage().read("passes.glitch.enabled"), Some(PropValue::Bool(false)));
}

#[test]
fn resize_tracks_aspect_and_caps_pixel_ratio() {
    let mut driver = session().into_driver(FixedStep::from_fps(60.0));
    driver.resize(40, 20, 3.0);
    assert_eq!(driver.surface_size(), (80, 40));
    assert_eq!(driver.stage().scene.camera.aspect, 2.0);
    let out = driver.tick();
    assert_eq!((out.frame.width, out.frame.height), (80, 40));

    driver.resize(0, 0, 1.0);
    assert_eq!(driver.surface_size(), (1, 1));
    assert_eq!(driver.stage().scene.camera.aspect, 2.0);
}

#[test]
fn controls_update_once_per_tick() {
    let mut driver = session()
        .into_driver(FixedStep::from_fps(60.0))
        .with_controls(OrbitControls::new(0.5));
    let before = driver.stage().scene.camera.position;
    driver.tick();
    assert_eq!(driver.stage().scene.camera.position, before);

    let mut orbit = OrbitControls::new(0.5);
    orbit.rotate_left(1.0);
    let mut driver = session()
        .into_driver(FixedStep::from_fps(60.0))
        .with_controls(orbit);
    driver.tick();
    assert_ne!(driver.stage().scene.camera.position, before);
}
