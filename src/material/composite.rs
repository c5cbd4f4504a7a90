use std::cell::OnceCell;

use crate::animation::value::PropValue;
use crate::foundation::core::{Rgb, Side, Vec3};
use crate::material::layer::{ShadingLayer, SurfaceContext, blend};
use crate::material::program::{AssembledProgram, BaseInput, BindingSource};
use crate::material::uniform::SlotKind;

/// Lighting model of the base surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lighting {
    /// Unlit.
    Basic,
    /// Diffuse only.
    Lambert,
    /// Diffuse and specular.
    Phong,
    /// Metal/roughness.
    #[default]
    Standard,
    /// Standard plus clearcoat.
    Physical,
    /// Banded diffuse.
    Toon,
}

impl Lighting {
    /// Return `true` when scene light modulates the surface.
    pub fn is_lit(self) -> bool {
        !matches!(self, Self::Basic)
    }
}

/// An ordered stack of shading layers over base surface properties.
///
/// The program is assembled on first use and cached. Base properties are uniforms of the
/// program, so they can change freely without a rebuild; only [`CompositeMaterial::push_layer`]
/// invalidates the cache.
#[derive(Debug)]
pub struct CompositeMaterial {
    /// Base color seeding the layer accumulator.
    pub color: Rgb,
    /// Lighting model.
    pub lighting: Lighting,
    /// Faces to draw.
    pub side: Side,
    /// When `false` the surface is drawn opaque regardless of alpha.
    pub transparent: bool,
    /// Global alpha applied after all layers.
    pub alpha: f32,
    layers: Vec<Box<dyn ShadingLayer>>,
    program: OnceCell<AssembledProgram>,
}

impl Default for CompositeMaterial {
    fn default() -> Self {
        Self {
            color: Rgb::WHITE,
            lighting: Lighting::default(),
            side: Side::default(),
            transparent: false,
            alpha: 1.0,
            layers: Vec::new(),
            program: OnceCell::new(),
        }
    }
}

impl CompositeMaterial {
    /// Material with no layers.
    pub fn new(color: Rgb, lighting: Lighting) -> Self {
        Self {
            color,
            lighting,
            ..Self::default()
        }
    }

    /// Builder form of [`CompositeMaterial::push_layer`].
    pub fn with_layer(mut self, layer: impl ShadingLayer + 'static) -> Self {
        self.push_layer(Box::new(layer));
        self
    }

    /// Append a layer on top of the stack.
    pub fn push_layer(&mut self, layer: Box<dyn ShadingLayer>) {
        self.layers.push(layer);
        self.program.take();
    }

    /// Layers in sequence order.
    pub fn layers(&self) -> &[Box<dyn ShadingLayer>] {
        &self.layers
    }

    /// Layer lookup by instance name.
    pub fn layer(&self, name: &str) -> Option<&dyn ShadingLayer> {
        self.layers
            .iter()
            .find(|l| l.name() == name)
            .map(|l| &**l)
    }

    /// Mutable layer lookup by instance name.
    pub fn layer_mut(&mut self, name: &str) -> Option<&mut (dyn ShadingLayer + 'static)> {
        for layer in &mut self.layers {
            if layer.name() == name {
                return Some(layer.as_mut());
            }
        }
        None
    }

    /// Assembled program, built on first call.
    pub fn build(&self) -> &AssembledProgram {
        self.program.get_or_init(|| {
            let program = AssembledProgram::assemble(&self.layers);
            tracing::debug!(
                layers = program.layer_order().len(),
                fingerprint = format_args!("{:016x}", program.fingerprint()),
                "assembled material program"
            );
            program
        })
    }

    /// Return `true` once the program has been assembled.
    pub fn is_built(&self) -> bool {
        self.program.get().is_some()
    }

    /// Evaluate the program for one fragment.
    ///
    /// The accumulator starts at the base color with alpha 1, each visible layer blends over
    /// it in program order, then lighting scales the color by `ambient` and the global alpha
    /// applies. Opaque materials always return alpha 1.
    pub fn shade(&self, ctx: &SurfaceContext, ambient: Rgb) -> (Rgb, f32) {
        let program = self.build();
        let mut acc = self.color;
        let mut acc_alpha = 1.0;
        for &i in program.stages() {
            let layer = &self.layers[i];
            if !layer.visible() {
                continue;
            }
            let (src, src_alpha) = layer.contribute(ctx);
            (acc, acc_alpha) = blend(
                acc,
                acc_alpha,
                src,
                src_alpha,
                layer.blend_mode(),
                layer.opacity(),
            );
        }

        let lit = if self.lighting.is_lit() {
            acc.zip(ambient, |c, a| c * a)
        } else {
            acc
        };
        let alpha = if self.transparent {
            (acc_alpha * self.alpha).clamp(0.0, 1.0)
        } else {
            1.0
        };
        (lit, alpha)
    }

    /// Apply each visible layer's vertex transform in program order.
    pub fn transform_vertex(&self, position: Vec3, normal: Vec3) -> Vec3 {
        let program = self.build();
        program.stages().iter().fold(position, |p, &i| {
            let layer = &self.layers[i];
            if layer.visible() {
                layer.vertex_transform(p, normal)
            } else {
                p
            }
        })
    }

    /// Current value of every program uniform, keyed by its GLSL name.
    pub fn uniform_values(&self, ambient: Rgb) -> Vec<(String, PropValue)> {
        let program = self.build();
        program
            .bindings
            .iter()
            .filter_map(|b| {
                let value = match &b.source {
                    BindingSource::Base(input) => Some(match input {
                        BaseInput::Color => PropValue::Color(self.color),
                        BaseInput::Alpha => PropValue::from(self.alpha),
                        BaseInput::Transparent => PropValue::from(flag(self.transparent)),
                        BaseInput::Lit => PropValue::from(flag(self.lighting.is_lit())),
                        BaseInput::Ambient => PropValue::Color(ambient),
                    }),
                    BindingSource::LayerOpacity { layer } => {
                        Some(PropValue::from(self.layers[*layer].opacity()))
                    }
                    BindingSource::LayerVisible { layer } => {
                        Some(PropValue::from(flag(self.layers[*layer].visible())))
                    }
                    BindingSource::LayerSlot { layer, prop } => {
                        self.layers[*layer].uniforms().get(prop)
                    }
                };
                value.map(|v| (b.glsl_name.clone(), v))
            })
            .collect()
    }

    /// Drain dirty flags from every layer and return the GLSL names of the program uniforms
    /// whose values changed, in binding order. The host re-uploads exactly these.
    pub fn flush_uniforms(&mut self) -> Vec<String> {
        let dirty: Vec<Vec<String>> = self
            .layers
            .iter_mut()
            .map(|l| l.uniforms_mut().take_dirty())
            .collect();
        if dirty.iter().all(Vec::is_empty) {
            return Vec::new();
        }
        self.build()
            .bindings
            .iter()
            .filter(|b| match &b.source {
                BindingSource::LayerSlot { layer, prop } => dirty[*layer]
                    .iter()
                    .any(|name| SlotKind::classify(name).1 == prop.as_str()),
                _ => false,
            })
            .map(|b| b.glsl_name.clone())
            .collect()
    }
}

fn flag(b: bool) -> f32 {
    if b { 1.0 } else { 0.0 }
}

#[cfg(test)]
#[path = "../../tests/unit/material/composite.rs"]
mod tests;
