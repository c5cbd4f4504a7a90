use std::collections::BTreeMap;
use std::fmt;

use crate::animation::value::PropValue;
use crate::foundation::core::{Rgb, Vec3};
use crate::foundation::error::StrataResult;
use crate::material::uniform::{UniformDecl, UniformTable};

/// Per-fragment surface data handed to layer contributions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceContext {
    /// Object-space position after every layer's vertex transform.
    pub position: Vec3,
    /// Object-space position before vertex transforms.
    pub rest_position: Vec3,
    /// World-space unit normal.
    pub normal: Vec3,
    /// World-space unit vector from the surface toward the camera.
    pub view_dir: Vec3,
}

impl Default for SurfaceContext {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rest_position: Vec3::ZERO,
            normal: Vec3::Z,
            view_dir: Vec3::Z,
        }
    }
}

/// How a layer's color combines with everything beneath it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Source replaces destination.
    #[default]
    Normal,
    /// `dst + src`.
    Add,
    /// `dst - src`.
    Subtract,
    /// `dst * src`.
    Multiply,
    /// `1 - (1 - dst) * (1 - src)`.
    Screen,
    /// Multiply in darks, screen in lights.
    Overlay,
    /// Channel-wise maximum.
    Lighten,
    /// Channel-wise minimum.
    Darken,
    /// `dst / src`.
    Divide,
    /// Source replaces destination wherever source alpha is non-zero, ignoring opacity.
    Switch,
}

impl BlendMode {
    /// Lower-case mode name used in GLSL helper names.
    pub fn glsl_name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
            Self::Overlay => "overlay",
            Self::Lighten => "lighten",
            Self::Darken => "darken",
            Self::Divide => "divide",
            Self::Switch => "switch",
        }
    }

    /// The raw blend function `f(dst, src)` before opacity is applied.
    pub fn apply(self, dst: Rgb, src: Rgb) -> Rgb {
        match self {
            Self::Normal | Self::Switch => src,
            Self::Add => dst.zip(src, |d, s| d + s),
            Self::Subtract => dst.zip(src, |d, s| d - s),
            Self::Multiply => dst.zip(src, |d, s| d * s),
            Self::Screen => dst.zip(src, |d, s| 1.0 - (1.0 - d) * (1.0 - s)),
            Self::Overlay => dst.zip(src, |d, s| {
                if d < 0.5 {
                    2.0 * d * s
                } else {
                    1.0 - 2.0 * (1.0 - d) * (1.0 - s)
                }
            }),
            Self::Lighten => dst.zip(src, f32::max),
            Self::Darken => dst.zip(src, f32::min),
            Self::Divide => dst.zip(src, |d, s| if s > 0.0 { d / s } else { d }),
        }
    }

    /// GLSL expression of `f(dst, src)` over `vec3 d` and `vec3 s`.
    pub(crate) fn glsl_expr(self) -> &'static str {
        match self {
            Self::Normal | Self::Switch => "s",
            Self::Add => "d + s",
            Self::Subtract => "d - s",
            Self::Multiply => "d * s",
            Self::Screen => "1.0 - (1.0 - d) * (1.0 - s)",
            Self::Overlay => {
                "mix(2.0 * d * s, 1.0 - 2.0 * (1.0 - d) * (1.0 - s), step(0.5, d))"
            }
            Self::Lighten => "max(d, s)",
            Self::Darken => "min(d, s)",
            Self::Divide => "d / max(s, vec3(1e-6))",
        }
    }
}

/// Blend a contribution over an accumulator.
///
/// Color mixes toward `mode(acc, src)` by `src_alpha * opacity`, and alpha composites with the
/// usual over rule. Applying layers left to right is the only supported order, so the last layer
/// always lands on top.
pub fn blend(
    acc: Rgb,
    acc_alpha: f32,
    src: Rgb,
    src_alpha: f32,
    mode: BlendMode,
    opacity: f32,
) -> (Rgb, f32) {
    let opacity = opacity.clamp(0.0, 1.0);
    let src_alpha = src_alpha.clamp(0.0, 1.0);
    let k = match mode {
        BlendMode::Switch => {
            if src_alpha > 0.0 {
                1.0
            } else {
                0.0
            }
        }
        _ => src_alpha * opacity,
    };
    let color = acc.mix(mode.apply(acc, src), k);
    let alpha = acc_alpha + k * (1.0 - acc_alpha);
    (color, alpha)
}

/// Construction-time properties for a layer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayerProps {
    /// Instance name; defaults to the variant's name.
    pub name: Option<String>,
    /// Blend mode; defaults to [`BlendMode::Normal`].
    pub blend: Option<BlendMode>,
    /// Opacity; defaults to `1`.
    pub opacity: Option<f32>,
    /// Uniform overrides keyed by property name (no prefix).
    pub uniforms: BTreeMap<String, PropValue>,
}

impl LayerProps {
    /// Empty props.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override one uniform.
    pub fn with(mut self, prop: &str, value: impl Into<PropValue>) -> Self {
        self.uniforms.insert(prop.to_owned(), value.into());
        self
    }

    /// Set the instance name.
    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_owned());
        self
    }

    /// Set the blend mode.
    pub fn blend(mut self, mode: BlendMode) -> Self {
        self.blend = Some(mode);
        self
    }

    /// Set the opacity.
    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }
}

/// State every layer variant carries: identity, blend parameters and uniforms.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerCore {
    /// Instance name.
    pub name: String,
    /// Blend mode.
    pub blend: BlendMode,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
    /// Whether the layer takes part in shading.
    pub visible: bool,
    /// Declared inputs.
    pub uniforms: UniformTable,
}

impl LayerCore {
    /// Resolve `props` against a variant's declarations.
    pub fn new(variant: &str, decls: &[UniformDecl], props: LayerProps) -> StrataResult<Self> {
        let name = props.name.unwrap_or_else(|| variant.to_owned());
        let uniforms = UniformTable::from_decls(&name, decls, &props.uniforms)?;
        Ok(Self {
            name,
            blend: props.blend.unwrap_or_default(),
            opacity: props.opacity.unwrap_or(1.0),
            visible: true,
            uniforms,
        })
    }
}

/// Capability interface of a composable shading layer.
///
/// A variant supplies its declarations, a CPU contribution and the matching GLSL snippets; the
/// composite material handles ordering, blending and program assembly.
pub trait ShadingLayer: fmt::Debug {
    /// Shared layer state.
    fn core(&self) -> &LayerCore;

    /// Mutable shared layer state.
    fn core_mut(&mut self) -> &mut LayerCore;

    /// Color and alpha this layer contributes for one fragment.
    fn contribute(&self, ctx: &SurfaceContext) -> (Rgb, f32);

    /// Displace an object-space vertex. Identity unless overridden.
    fn vertex_transform(&self, position: Vec3, _normal: Vec3) -> Vec3 {
        position
    }

    /// GLSL body returning this layer's `vec4` color. It may read its own `u_`/`v_` names and
    /// the helpers listed in [`ShadingLayer::glsl_helpers`].
    fn fragment_source(&self) -> &'static str;

    /// GLSL body returning the displaced `vec3 position`, given `position` and `normal`.
    fn vertex_source(&self) -> Option<&'static str> {
        None
    }

    /// Shared GLSL functions this layer needs, emitted once per program in first-use order.
    fn glsl_helpers(&self) -> &'static [&'static str] {
        &[]
    }

    /// Instance name.
    fn name(&self) -> &str {
        &self.core().name
    }

    /// Declared inputs.
    fn uniforms(&self) -> &UniformTable {
        &self.core().uniforms
    }

    /// Mutable declared inputs.
    fn uniforms_mut(&mut self) -> &mut UniformTable {
        &mut self.core_mut().uniforms
    }

    /// Blend mode.
    fn blend_mode(&self) -> BlendMode {
        self.core().blend
    }

    /// Opacity.
    fn opacity(&self) -> f32 {
        self.core().opacity
    }

    /// Whether the layer takes part in shading.
    fn visible(&self) -> bool {
        self.core().visible
    }
}

#[cfg(test)]
#[path = "../../tests/unit/material/layer.rs"]
mod tests;
