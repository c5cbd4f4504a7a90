use std::fmt::Write as _;

use crate::material::layer::{BlendMode, ShadingLayer};
use crate::material::uniform::SlotKind;

/// Where a program uniform takes its value from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindingSource {
    /// A base surface property of the material.
    Base(BaseInput),
    /// A layer's opacity.
    LayerOpacity {
        /// Index into the material's layer sequence.
        layer: usize,
    },
    /// `1` while a layer is visible, else `0`.
    LayerVisible {
        /// Index into the material's layer sequence.
        layer: usize,
    },
    /// A declared layer uniform.
    LayerSlot {
        /// Index into the material's layer sequence.
        layer: usize,
        /// Property name without prefix.
        prop: String,
    },
}

/// Base surface inputs every assembled program declares.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BaseInput {
    /// Base color seeding the accumulator.
    Color,
    /// Global alpha.
    Alpha,
    /// `1` when transparent, else `0`.
    Transparent,
    /// `1` for lit lighting models, else `0`.
    Lit,
    /// Scene ambient light.
    Ambient,
}

const BASE_INPUTS: [(BaseInput, &str, &str); 5] = [
    (BaseInput::Color, "u_strata_color", "vec3"),
    (BaseInput::Alpha, "u_strata_alpha", "float"),
    (BaseInput::Transparent, "u_strata_transparent", "float"),
    (BaseInput::Lit, "u_strata_lit", "float"),
    (BaseInput::Ambient, "u_strata_ambient", "vec3"),
];

/// One uniform the host must upload before drawing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UniformBinding {
    /// Name in the assembled sources.
    pub glsl_name: String,
    /// GLSL type.
    pub glsl_type: &'static str,
    /// Value source.
    pub source: BindingSource,
}

/// Vertex and fragment sources assembled from an ordered layer sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssembledProgram {
    /// GLSL vertex stage.
    pub vertex: String,
    /// GLSL fragment stage.
    pub fragment: String,
    /// Uniforms in declaration order.
    pub bindings: Vec<UniformBinding>,
    layer_order: Vec<String>,
    stages: Vec<usize>,
    fingerprint: u64,
}

impl AssembledProgram {
    /// Layer names in the order their contributions are chained.
    pub fn layer_order(&self) -> &[String] {
        &self.layer_order
    }

    /// Layer indices in chaining order.
    pub fn stages(&self) -> &[usize] {
        &self.stages
    }

    /// xxh3 hash of both sources.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Assemble sources for `layers` in sequence order.
    pub(crate) fn assemble(layers: &[Box<dyn ShadingLayer>]) -> Self {
        let ids: Vec<String> = layers
            .iter()
            .enumerate()
            .map(|(i, l)| format!("{}_{i}", sanitize(l.name())))
            .collect();

        let mut bindings: Vec<UniformBinding> = BASE_INPUTS
            .iter()
            .map(|&(input, name, ty)| UniformBinding {
                glsl_name: name.to_owned(),
                glsl_type: ty,
                source: BindingSource::Base(input),
            })
            .collect();

        let mut decls = String::new();
        let mut varyings = String::from("varying vec3 strata_rest_position;\n");
        let mut renames: Vec<Vec<(String, String)>> = Vec::with_capacity(layers.len());

        for (idx, (layer, id)) in layers.iter().zip(&ids).enumerate() {
            let opacity_name = format!("u_strata_opacity_{id}");
            bindings.push(UniformBinding {
                glsl_name: opacity_name.clone(),
                glsl_type: "float",
                source: BindingSource::LayerOpacity { layer: idx },
            });
            let _ = writeln!(decls, "uniform float {opacity_name};");
            let visible_name = format!("u_strata_visible_{id}");
            bindings.push(UniformBinding {
                glsl_name: visible_name.clone(),
                glsl_type: "float",
                source: BindingSource::LayerVisible { layer: idx },
            });
            let _ = writeln!(decls, "uniform float {visible_name};");

            let mut map = Vec::new();
            for slot in layer.uniforms().iter() {
                let renamed = format!("{}_{id}", slot.name);
                match slot.kind {
                    SlotKind::Uniform => {
                        let _ = writeln!(decls, "uniform {} {renamed};", slot.glsl_type);
                        bindings.push(UniformBinding {
                            glsl_name: renamed.clone(),
                            glsl_type: slot.glsl_type,
                            source: BindingSource::LayerSlot {
                                layer: idx,
                                prop: slot.prop().to_owned(),
                            },
                        });
                    }
                    SlotKind::Varying => {
                        let _ = writeln!(varyings, "varying {} {renamed};", slot.glsl_type);
                    }
                    SlotKind::Constant => {
                        let literal = slot.value.map(|v| v.to_glsl()).unwrap_or_default();
                        let _ = writeln!(decls, "const {} {renamed} = {literal};", slot.glsl_type);
                    }
                }
                map.push((slot.name.clone(), renamed));
            }
            renames.push(map);
        }

        let mut helpers: Vec<&'static str> = Vec::new();
        for layer in layers {
            for &h in layer.glsl_helpers() {
                if !helpers.contains(&h) {
                    helpers.push(h);
                }
            }
        }

        let vertex = assemble_vertex(layers, &ids, &renames, &decls, &varyings, &helpers);
        let fragment = assemble_fragment(layers, &ids, &renames, &decls, &varyings, &helpers);

        let mut hash_input = Vec::with_capacity(vertex.len() + fragment.len() + 1);
        hash_input.extend_from_slice(vertex.as_bytes());
        hash_input.push(0);
        hash_input.extend_from_slice(fragment.as_bytes());
        let fingerprint = xxhash_rust::xxh3::xxh3_64(&hash_input);

        Self {
            vertex,
            fragment,
            bindings,
            layer_order: layers.iter().map(|l| l.name().to_owned()).collect(),
            stages: (0..layers.len()).collect(),
            fingerprint,
        }
    }
}

fn assemble_vertex(
    layers: &[Box<dyn ShadingLayer>],
    ids: &[String],
    renames: &[Vec<(String, String)>],
    decls: &str,
    varyings: &str,
    helpers: &[&str],
) -> String {
    let mut out = String::new();
    out.push_str("// strata: assembled vertex stage\n");
    out.push_str("uniform mat4 modelViewMatrix;\nuniform mat4 projectionMatrix;\n");
    out.push_str("attribute vec3 position;\nattribute vec3 normal;\n");
    out.push_str(decls);
    out.push_str(varyings);
    for h in helpers {
        out.push_str(h);
    }

    let mut calls = String::new();
    for ((layer, id), map) in layers.iter().zip(ids).zip(renames) {
        let Some(body) = layer.vertex_source() else {
            continue;
        };
        let _ = write!(
            out,
            "vec3 strata_layer_{id}_vertex(vec3 position, vec3 normal) {{\n{}}}\n",
            rename_idents(body, map)
        );
        let _ = writeln!(
            calls,
            "    if (u_strata_visible_{id} > 0.5) strata_position = strata_layer_{id}_vertex(strata_position, normal);"
        );
    }

    out.push_str("void main() {\n");
    out.push_str("    strata_rest_position = position;\n");
    out.push_str("    vec3 strata_position = position;\n");
    out.push_str(&calls);
    out.push_str(
        "    gl_Position = projectionMatrix * modelViewMatrix * vec4(strata_position, 1.0);\n}\n",
    );
    out
}

fn assemble_fragment(
    layers: &[Box<dyn ShadingLayer>],
    ids: &[String],
    renames: &[Vec<(String, String)>],
    decls: &str,
    varyings: &str,
    helpers: &[&str],
) -> String {
    let mut out = String::new();
    out.push_str("// strata: assembled fragment stage\n");
    out.push_str("precision highp float;\n");
    for (_, name, ty) in BASE_INPUTS {
        let _ = writeln!(out, "uniform {ty} {name};");
    }
    out.push_str(decls);
    out.push_str(varyings);
    for h in helpers {
        out.push_str(h);
    }

    let mut modes: Vec<BlendMode> = Vec::new();
    for layer in layers {
        if !modes.contains(&layer.blend_mode()) {
            modes.push(layer.blend_mode());
        }
    }
    for mode in modes {
        out.push_str(&blend_helper(mode));
    }

    let mut chain = String::new();
    for ((layer, id), map) in layers.iter().zip(ids).zip(renames) {
        let _ = write!(
            out,
            "vec4 strata_layer_{id}_fragment() {{\n{}}}\n",
            rename_idents(layer.fragment_source(), map)
        );
        let _ = writeln!(
            chain,
            "    if (u_strata_visible_{id} > 0.5) strata_acc = strata_blend_{}(strata_acc, strata_layer_{id}_fragment(), u_strata_opacity_{id});",
            layer.blend_mode().glsl_name()
        );
    }

    out.push_str("void main() {\n");
    out.push_str("    vec4 strata_acc = vec4(u_strata_color, 1.0);\n");
    out.push_str(&chain);
    out.push_str("    vec3 strata_lit = strata_acc.rgb * mix(vec3(1.0), u_strata_ambient, u_strata_lit);\n");
    out.push_str(
        "    float strata_alpha = mix(1.0, strata_acc.a * u_strata_alpha, u_strata_transparent);\n",
    );
    out.push_str("    gl_FragColor = vec4(strata_lit, strata_alpha);\n}\n");
    out
}

fn blend_helper(mode: BlendMode) -> String {
    let k = match mode {
        BlendMode::Switch => "step(1e-6, src.a)",
        _ => "clamp(src.a, 0.0, 1.0) * clamp(opacity, 0.0, 1.0)",
    };
    format!(
        "vec4 strata_blend_{name}(vec4 acc, vec4 src, float opacity) {{\n    \
         vec3 d = acc.rgb;\n    vec3 s = src.rgb;\n    float k = {k};\n    \
         return vec4(mix(d, {expr}, k), acc.a + k * (1.0 - acc.a));\n}}\n",
        name = mode.glsl_name(),
        expr = mode.glsl_expr(),
    )
}

fn sanitize(name: &str) -> String {
    let s: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    if s.is_empty() { "layer".to_owned() } else { s }
}

/// Replace whole identifiers found in `map`, leaving every other token untouched.
fn rename_idents(src: &str, map: &[(String, String)]) -> String {
    let mut out = String::with_capacity(src.len() + 16);
    let mut chars = src.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        if c.is_ascii_alphabetic() || c == '_' {
            let mut end = start + c.len_utf8();
            while let Some(&(i, n)) = chars.peek() {
                if n.is_ascii_alphanumeric() || n == '_' {
                    end = i + n.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            let ident = &src[start..end];
            match map.iter().find(|(from, _)| from == ident) {
                Some((_, to)) => out.push_str(to),
                None => out.push_str(ident),
            }
        } else if c.is_ascii_digit() {
            // Keep numeric literals like `1e6` from being read as identifiers.
            out.push(c);
            while let Some(&(_, n)) = chars.peek() {
                if n.is_ascii_alphanumeric() || n == '.' || n == '_' {
                    out.push(n);
                    chars.next();
                } else {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}
