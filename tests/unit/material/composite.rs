use super::*;
use crate::material::layer::{BlendMode, LayerCore, LayerProps, ShadingLayer, SurfaceContext};
use crate::material::layers::{DisplaceLayer, NoiseKind, StarterLayer};

fn layered() -> CompositeMaterial {
    CompositeMaterial::new(Rgb::WHITE, Lighting::Standard)
        .with_layer(
            DisplaceLayer::new(NoiseKind::Simplex, LayerProps::new().with("strength", 0.0))
                .unwrap(),
        )
        .with_layer(StarterLayer::new(LayerProps::new().blend(BlendMode::Multiply)).unwrap())
}

#[test]
fn program_lists_layers_once_in_order() {
    let m = layered();
    let p = m.build();
    assert_eq!(p.layer_order(), ["displace", "starter"]);

    let frag = &p.fragment;
    let first = frag.find("strata_layer_displace_0_fragment()").unwrap();
    let second = frag.find("strata_layer_starter_1_fragment()").unwrap();
    assert!(first < second);
    assert_eq!(frag.matches("vec4 strata_layer_displace_0_fragment()").count(), 1);
    assert_eq!(frag.matches("vec4 strata_layer_starter_1_fragment()").count(), 1);
}

#[test]
fn build_is_idempotent() {
    let m = layered();
    let a = m.build().clone();
    let b = m.build().clone();
    assert_eq!(a, b);
    assert_eq!(a.fingerprint(), b.fingerprint());
}

#[test]
fn base_property_changes_keep_the_program() {
    let mut m = layered();
    let before = m.build().fingerprint();
    m.alpha = 0.3;
    m.color = Rgb::BLACK;
    assert!(m.is_built());
    assert_eq!(m.build().fingerprint(), before);
}

#[test]
fn push_layer_invalidates_the_program() {
    let mut m = CompositeMaterial::default();
    let empty = m.build().fingerprint();
    m.push_layer(Box::new(StarterLayer::new(LayerProps::new()).unwrap()));
    assert!(!m.is_built());
    assert_ne!(m.build().fingerprint(), empty);
}

#[test]
fn uniforms_are_renamed_per_layer() {
    let m = layered();
    let p = m.build();
    assert!(p.fragment.contains("uniform float u_strength_displace_0;"));
    assert!(p.fragment.contains("uniform float u_time_starter_1;"));
    assert!(p.vertex.contains("varying vec3 v_uv_starter_1;"));
    assert!(p.fragment.contains("strata_blend_multiply"));
    // helpers are emitted once even when several layers need them
    assert_eq!(p.fragment.matches("vec3 strata_hash3(").count(), 1);
}

#[test]
fn empty_material_shades_to_base_color_and_alpha() {
    let mut m = CompositeMaterial::new(Rgb::new(0.2, 0.4, 0.6), Lighting::Basic);
    m.transparent = true;
    m.alpha = 0.35;
    let (c, a) = m.shade(&SurfaceContext::default(), Rgb::WHITE);
    assert_eq!(c, Rgb::new(0.2, 0.4, 0.6));
    assert!((a - 0.35).abs() < 1e-6);
    assert!(m.build().layer_order().is_empty());
}

#[test]
fn opaque_material_ignores_alpha() {
    let mut m = CompositeMaterial::default();
    m.alpha = 0.0;
    let (_, a) = m.shade(&SurfaceContext::default(), Rgb::WHITE);
    assert_eq!(a, 1.0);
}

#[test]
fn lighting_scales_by_ambient() {
    let lit = CompositeMaterial::new(Rgb::WHITE, Lighting::Standard);
    let (c, _) = lit.shade(&SurfaceContext::default(), Rgb::splat(0.5));
    assert_eq!(c, Rgb::splat(0.5));

    let unlit = CompositeMaterial::new(Rgb::WHITE, Lighting::Basic);
    let (c, _) = unlit.shade(&SurfaceContext::default(), Rgb::splat(0.5));
    assert_eq!(c, Rgb::WHITE);
}

#[test]
fn hidden_layers_do_not_contribute() {
    let mut m = CompositeMaterial::new(Rgb::WHITE, Lighting::Basic)
        .with_layer(StarterLayer::new(LayerProps::new()).unwrap());
    let ctx = SurfaceContext::default();
    let (shown, _) = m.shade(&ctx, Rgb::WHITE);
    m.layer_mut("starter").unwrap().core_mut().visible = false;
    let (hidden, _) = m.shade(&ctx, Rgb::WHITE);
    assert_ne!(shown, hidden);
    assert_eq!(hidden, Rgb::WHITE);
}

#[test]
fn uniform_writes_are_visible_and_flushed() {
    let mut m = layered();
    assert!(!m.flush_uniforms().is_empty());
    assert!(m.flush_uniforms().is_empty());

    let layer = m.layer_mut("displace").unwrap();
    assert!(layer.uniforms_mut().set("strength", PropValue::Scalar(0.7)));
    assert_eq!(m.layer("displace").unwrap().uniforms().scalar("strength"), 0.7);

    let values = m.uniform_values(Rgb::WHITE);
    let strength = values
        .iter()
        .find(|(name, _)| name == "u_strength_displace_0")
        .map(|(_, v)| v.as_f64());
    assert_eq!(strength, Some(0.7));
    assert_eq!(m.flush_uniforms(), ["u_strength_displace_0"]);
    assert!(m.flush_uniforms().is_empty());
}

#[derive(Debug)]
struct Warp {
    core: LayerCore,
    scale: f32,
    shift: Vec3,
}

impl Warp {
    fn new(name: &str, scale: f32, shift: Vec3) -> Self {
        Self {
            core: LayerCore::new("warp", &[], LayerProps::new().named(name)).unwrap(),
            scale,
            shift,
        }
    }
}

impl ShadingLayer for Warp {
    fn core(&self) -> &LayerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut LayerCore {
        &mut self.core
    }

    fn contribute(&self, _ctx: &SurfaceContext) -> (Rgb, f32) {
        (Rgb::BLACK, 0.0)
    }

    fn vertex_transform(&self, position: Vec3, _normal: Vec3) -> Vec3 {
        position * self.scale + self.shift
    }

    fn fragment_source(&self) -> &'static str {
        "    return vec4(0.0);\n"
    }
}

#[test]
fn transform_vertex_feeds_each_layer_the_previous_output() {
    let m = CompositeMaterial::default()
        .with_layer(Warp::new("double", 2.0, Vec3::ZERO))
        .with_layer(Warp::new("lift", 1.0, Vec3::new(0.0, 1.0, 0.0)));
    let p = Vec3::new(0.1, 0.2, 0.3);
    let out = m.transform_vertex(p, Vec3::Z);
    assert!(out.abs_diff_eq(Vec3::new(0.2, 1.4, 0.6), 1e-6), "{out}");

    let swapped = CompositeMaterial::default()
        .with_layer(Warp::new("lift", 1.0, Vec3::new(0.0, 1.0, 0.0)))
        .with_layer(Warp::new("double", 2.0, Vec3::ZERO));
    let out = swapped.transform_vertex(p, Vec3::Z);
    assert!(out.abs_diff_eq(Vec3::new(0.2, 2.4, 0.6), 1e-6), "{out}");
}

#[test]
fn displacing_layers_compose_in_order() {
    let first = LayerProps::new().named("coarse").with("strength", 0.4).with("scale", 1.5);
    let second = LayerProps::new().named("fine").with("strength", 0.2).with("scale", 7.0);
    let m = CompositeMaterial::default()
        .with_layer(DisplaceLayer::new(NoiseKind::Perlin, first).unwrap())
        .with_layer(DisplaceLayer::new(NoiseKind::Simplex, second).unwrap());

    let (p, n) = (Vec3::new(0.31, -0.17, 0.42), Vec3::new(0.0, 0.6, 0.8));
    let coarse = m.layer("coarse").unwrap();
    let fine = m.layer("fine").unwrap();
    let expected = fine.vertex_transform(coarse.vertex_transform(p, n), n);
    assert_eq!(m.transform_vertex(p, n), expected);
}

#[test]
fn hidden_layers_skip_the_vertex_stage() {
    let mut m = CompositeMaterial::default()
        .with_layer(Warp::new("double", 2.0, Vec3::ZERO))
        .with_layer(Warp::new("lift", 1.0, Vec3::Y));
    m.layer_mut("lift").unwrap().core_mut().visible = false;
    let p = Vec3::new(1.0, 1.0, 1.0);
    assert_eq!(m.transform_vertex(p, Vec3::Z), Vec3::splat(2.0));
}

#[test]
fn program_gates_every_layer_on_its_visibility() {
    let mut m = CompositeMaterial::new(Rgb::WHITE, Lighting::Basic)
        .with_layer(DisplaceLayer::new(NoiseKind::Simplex, LayerProps::new()).unwrap())
        .with_layer(StarterLayer::new(LayerProps::new().blend(BlendMode::Switch)).unwrap());
    m.layer_mut("starter").unwrap().core_mut().visible = false;

    let p = m.build();
    assert!(p.vertex.contains(
        "if (u_strata_visible_displace_0 > 0.5) strata_position = strata_layer_displace_0_vertex("
    ));
    assert!(p.fragment.contains(
        "if (u_strata_visible_starter_1 > 0.5) strata_acc = strata_blend_switch(strata_acc, strata_layer_starter_1_fragment()"
    ));
    assert!(p.fragment.contains("uniform float u_strata_visible_starter_1;"));

    let values = m.uniform_values(Rgb::WHITE);
    let value = |name: &str| {
        values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_f64())
    };
    assert_eq!(value("u_strata_visible_displace_0"), Some(1.0));
    assert_eq!(value("u_strata_visible_starter_1"), Some(0.0));

    let (hidden, _) = m.shade(&SurfaceContext::default(), Rgb::WHITE);
    assert_eq!(hidden.r, 1.0);
    m.layer_mut("starter").unwrap().core_mut().visible = true;
    let (shown, _) = m.shade(&SurfaceContext::default(), Rgb::WHITE);
    assert_ne!(hidden, shown);
}
