use crate::animation::value::PropValue;
use crate::foundation::core::{Rgb, Vec3};
use crate::foundation::error::StrataResult;
use crate::material::layer::{LayerCore, LayerProps, ShadingLayer, SurfaceContext};
use crate::material::uniform::UniformDecl;

const DECLS: &[UniformDecl] = &[
    UniformDecl::with_default("u_color", PropValue::Color(Rgb::new(1.0, 0.0, 0.0))),
    UniformDecl::with_default("u_alpha", PropValue::Scalar(1.0)),
    UniformDecl::with_default("u_time", PropValue::Scalar(0.0)),
    UniformDecl::varying("v_uv", "vec3"),
];

const FRAGMENT: &str = "\
    vec2 p = v_uv.xy * 3.0;
    for (int i = 1; i < 4; i++) {
        float k = float(i);
        p.x += 0.3 / k * sin(k * 3.0 * p.y + u_time);
        p.y += 0.3 / k * cos(k * 3.0 * p.x + u_time);
    }
    float f = 0.5 + 0.5 * sin(p.x + p.y);
    return vec4(u_color * f, u_alpha);
";

const VERTEX: &str = "\
    v_uv = position;
    return position;
";

/// Starter coloring layer: a time-driven fluid tint of `u_color`.
///
/// Kept as an extension point. The default logo material does not include it.
#[derive(Clone, Debug)]
pub struct StarterLayer {
    core: LayerCore,
}

impl StarterLayer {
    /// Variant name.
    pub const VARIANT: &'static str = "starter";

    /// Build with `color`, `alpha` and `time` overrides from `props`.
    pub fn new(props: LayerProps) -> StrataResult<Self> {
        Ok(Self {
            core: LayerCore::new(Self::VARIANT, DECLS, props)?,
        })
    }
}

fn fluid(uv: Vec3, time: f32) -> f32 {
    let mut x = uv.x * 3.0;
    let mut y = uv.y * 3.0;
    for i in 1..4 {
        let k = i as f32;
        x += 0.3 / k * (k * 3.0 * y + time).sin();
        y += 0.3 / k * (k * 3.0 * x + time).cos();
    }
    0.5 + 0.5 * (x + y).sin()
}

impl ShadingLayer for StarterLayer {
    fn core(&self) -> &LayerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut LayerCore {
        &mut self.core
    }

    fn contribute(&self, ctx: &SurfaceContext) -> (Rgb, f32) {
        let u = &self.core.uniforms;
        let f = fluid(ctx.rest_position, u.scalar("time"));
        (u.color("color").scale(f), u.scalar("alpha"))
    }

    fn fragment_source(&self) -> &'static str {
        FRAGMENT
    }

    fn vertex_source(&self) -> Option<&'static str> {
        Some(VERTEX)
    }
}
