use crate::animation::value::PropValue;
use crate::foundation::core::{Rgb, Vec3};
use crate::foundation::error::{StrataError, StrataResult};
use crate::material::layer::{LayerCore, LayerProps, ShadingLayer, SurfaceContext};
use crate::material::noise;
use crate::material::uniform::UniformDecl;

/// Noise family a [`DisplaceLayer`] samples.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseKind {
    /// Gradient noise.
    Perlin,
    /// Simplex noise.
    #[default]
    Simplex,
    /// Worley F1 distance.
    Cell,
    /// Mean component of a curl field.
    Curl,
}

impl NoiseKind {
    /// Parse `perlin`, `simplex`, `cell` or `curl`.
    pub fn parse(s: &str) -> StrataResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "perlin" => Ok(Self::Perlin),
            "simplex" => Ok(Self::Simplex),
            "cell" => Ok(Self::Cell),
            "curl" => Ok(Self::Curl),
            other => Err(StrataError::material(format!("unknown noise type '{other}'"))),
        }
    }

    /// Scalar noise at `p`.
    pub fn sample(self, p: Vec3) -> f32 {
        match self {
            Self::Perlin => noise::perlin(p),
            Self::Simplex => noise::simplex(p),
            Self::Cell => noise::cell(p),
            Self::Curl => {
                let c = noise::curl(p);
                (c.x + c.y + c.z) / 3.0
            }
        }
    }
}

const DECLS: &[UniformDecl] = &[
    UniformDecl::with_default("u_strength", PropValue::Scalar(1.0)),
    UniformDecl::with_default("u_scale", PropValue::Scalar(1.0)),
    UniformDecl::with_default("u_offset", PropValue::Scalar(0.0)),
];

/// Displaces vertices along their normal by a noise field and paints the same field as a flat
/// grey pattern.
#[derive(Clone, Debug)]
pub struct DisplaceLayer {
    core: LayerCore,
    kind: NoiseKind,
}

impl DisplaceLayer {
    /// Variant name.
    pub const VARIANT: &'static str = "displace";

    /// Build with `strength`, `scale` and `offset` overrides from `props`.
    pub fn new(kind: NoiseKind, props: LayerProps) -> StrataResult<Self> {
        Ok(Self {
            core: LayerCore::new(Self::VARIANT, DECLS, props)?,
            kind,
        })
    }

    /// Noise family.
    pub fn noise_kind(&self) -> NoiseKind {
        self.kind
    }

    fn field(&self, p: Vec3) -> f32 {
        let u = &self.core.uniforms;
        let q = p * u.scalar("scale") + Vec3::splat(u.scalar("offset"));
        self.kind.sample(q)
    }
}

impl ShadingLayer for DisplaceLayer {
    fn core(&self) -> &LayerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut LayerCore {
        &mut self.core
    }

    fn contribute(&self, ctx: &SurfaceContext) -> (Rgb, f32) {
        let n = self.field(ctx.rest_position);
        (Rgb::splat((n * 0.5 + 0.5).clamp(0.0, 1.0)), 1.0)
    }

    fn vertex_transform(&self, position: Vec3, normal: Vec3) -> Vec3 {
        let strength = self.core.uniforms.scalar("strength");
        if strength == 0.0 {
            return position;
        }
        position + normal * self.field(position) * strength
    }

    fn fragment_source(&self) -> &'static str {
        match self.kind {
            NoiseKind::Perlin => FRAGMENT_PERLIN,
            NoiseKind::Simplex => FRAGMENT_SIMPLEX,
            NoiseKind::Cell => FRAGMENT_CELL,
            NoiseKind::Curl => FRAGMENT_CURL,
        }
    }

    fn vertex_source(&self) -> Option<&'static str> {
        Some(match self.kind {
            NoiseKind::Perlin => VERTEX_PERLIN,
            NoiseKind::Simplex => VERTEX_SIMPLEX,
            NoiseKind::Cell => VERTEX_CELL,
            NoiseKind::Curl => VERTEX_CURL,
        })
    }

    fn glsl_helpers(&self) -> &'static [&'static str] {
        match self.kind {
            NoiseKind::Perlin => &[noise::GLSL_HASH, noise::GLSL_PERLIN],
            NoiseKind::Simplex => &[noise::GLSL_HASH, noise::GLSL_SIMPLEX],
            NoiseKind::Cell => &[noise::GLSL_HASH, noise::GLSL_CELL],
            NoiseKind::Curl => &[noise::GLSL_HASH, noise::GLSL_PERLIN, noise::GLSL_CURL],
        }
    }
}

macro_rules! displace_sources {
    ($frag:ident, $vert:ident, $call:literal) => {
        const $frag: &str = concat!(
            "    vec3 p = strata_rest_position * u_scale + vec3(u_offset);\n",
            "    float n = ",
            $call,
            ";\n",
            "    return vec4(vec3(clamp(n * 0.5 + 0.5, 0.0, 1.0)), 1.0);\n",
        );
        const $vert: &str = concat!(
            "    vec3 p = position * u_scale + vec3(u_offset);\n",
            "    float n = ",
            $call,
            ";\n",
            "    return position + normal * n * u_strength;\n",
        );
    };
}

displace_sources!(FRAGMENT_PERLIN, VERTEX_PERLIN, "strata_perlin(p)");
displace_sources!(FRAGMENT_SIMPLEX, VERTEX_SIMPLEX, "strata_simplex(p)");
displace_sources!(FRAGMENT_CELL, VERTEX_CELL, "strata_cell(p)");
displace_sources!(
    FRAGMENT_CURL,
    VERTEX_CURL,
    "dot(strata_curl(p), vec3(1.0 / 3.0))"
);
