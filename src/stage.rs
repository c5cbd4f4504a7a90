use crate::animation::value::PropValue;
use crate::effects::pipeline::{EffectPipeline, PipelineOutput};
use crate::foundation::core::{Rgb, Transform3D, Vec3};
use crate::foundation::error::{StrataError, StrataResult};
use crate::material::composite::CompositeMaterial;
use crate::render::mesh::Mesh;
use crate::session::controls::Camera;

/// Something cues can read and write through dotted property paths.
pub trait Animatable {
    /// Current value at `path`, or `None` when the path is not exposed.
    fn read(&self, path: &str) -> Option<PropValue>;

    /// Store `value` at `path`, coercing it to the property's type. Returns `false` when the
    /// path is not exposed.
    fn write(&mut self, path: &str, value: PropValue) -> bool;
}

/// The animated object.
#[derive(Debug)]
pub struct Logo {
    /// Geometry.
    pub mesh: Mesh,
    /// Placement.
    pub transform: Transform3D,
    /// Surface.
    pub material: CompositeMaterial,
}

/// Everything the scene pass draws.
#[derive(Debug)]
pub struct Scene {
    /// The logo.
    pub logo: Logo,
    /// Viewing camera.
    pub camera: Camera,
    /// Ambient light color times intensity.
    pub ambient: Rgb,
    /// Color the scene pass clears to.
    pub clear: Rgb,
}

/// Mutable session state: the scene, its effect pipeline and the drifting time uniform.
///
/// Exposed paths:
///
/// - `logo.{position,rotation,scale}.{x,y,z}`
/// - `material.{alpha,transparent,color}`
/// - `material.layers.<layer>.{opacity,visible,<uniform>}`
/// - `passes.<pass>.enabled` and `passes.<pass>.uniforms.<uniform>`
/// - `camera.fov` and `camera.position.{x,y,z}`
/// - `uniforms.time`
#[derive(Debug)]
pub struct Stage {
    /// Scene contents.
    pub scene: Scene,
    /// Post-render passes.
    pub pipeline: EffectPipeline,
    /// Time uniform shared by layers that declare `time`.
    pub time: f64,
}

impl Stage {
    /// Assemble a stage and push the initial time to every layer that declares it.
    pub fn new(scene: Scene, pipeline: EffectPipeline, time: f64) -> Self {
        let mut stage = Self {
            scene,
            pipeline,
            time,
        };
        stage.mirror_time();
        stage
    }

    /// Advance the time uniform by `delta * scale` and mirror it into the layers.
    pub fn drift(&mut self, delta: f64, scale: f64) -> f64 {
        self.time += delta * scale;
        self.mirror_time();
        self.time
    }

    fn mirror_time(&mut self) {
        let material = &mut self.scene.logo.material;
        let names: Vec<String> = material
            .layers()
            .iter()
            .filter(|l| l.uniforms().declares("time"))
            .map(|l| l.name().to_owned())
            .collect();
        for name in names {
            if let Some(layer) = material.layer_mut(&name) {
                layer.uniforms_mut().set("time", PropValue::Scalar(self.time));
            }
        }
    }

    /// Run the pipeline once over the current scene.
    pub fn render(&mut self) -> StrataResult<PipelineOutput> {
        self.pipeline.render(&self.scene)
    }

    /// Fail on the first path this stage does not expose.
    pub fn check_paths(&self, paths: impl IntoIterator<Item = String>) -> StrataResult<()> {
        for path in paths {
            if self.read(&path).is_none() {
                return Err(StrataError::timeline(format!(
                    "cue target '{path}' is not an animatable property"
                )));
            }
        }
        Ok(())
    }
}

fn axis(v: &Vec3, name: &str) -> Option<f32> {
    match name {
        "x" => Some(v.x),
        "y" => Some(v.y),
        "z" => Some(v.z),
        _ => None,
    }
}

fn axis_mut<'a>(v: &'a mut Vec3, name: &str) -> Option<&'a mut f32> {
    match name {
        "x" => Some(&mut v.x),
        "y" => Some(&mut v.y),
        "z" => Some(&mut v.z),
        _ => None,
    }
}

impl Animatable for Stage {
    fn read(&self, path: &str) -> Option<PropValue> {
        let parts: Vec<&str> = path.split('.').collect();
        let logo = &self.scene.logo;
        let material = &logo.material;
        match parts.as_slice() {
            ["logo", "position", a] => axis(&logo.transform.position, a).map(PropValue::from),
            ["logo", "rotation", a] => axis(&logo.transform.rotation, a).map(PropValue::from),
            ["logo", "scale", a] => axis(&logo.transform.scale, a).map(PropValue::from),
            ["material", "alpha"] => Some(material.alpha.into()),
            ["material", "transparent"] => Some(material.transparent.into()),
            ["material", "color"] => Some(material.color.into()),
            ["material", "layers", layer, prop] => {
                let layer = material.layer(layer)?;
                match *prop {
                    "opacity" => Some(layer.opacity().into()),
                    "visible" => Some(layer.visible().into()),
                    prop => layer.uniforms().get(prop),
                }
            }
            ["passes", pass, "enabled"] => Some(self.pipeline.pass(pass)?.enabled().into()),
            ["passes", pass, "uniforms", u] => self.pipeline.pass(pass)?.uniforms().get(u),
            ["camera", "fov"] => Some(self.scene.camera.fov.into()),
            ["camera", "position", a] => axis(&self.scene.camera.position, a).map(PropValue::from),
            ["uniforms", "time"] => Some(self.time.into()),
            _ => None,
        }
    }

    fn write(&mut self, path: &str, value: PropValue) -> bool {
        let parts: Vec<&str> = path.split('.').collect();
        let logo = &mut self.scene.logo;
        let written = match parts.as_slice() {
            ["logo", "position", a] => set_axis(&mut logo.transform.position, a, value),
            ["logo", "rotation", a] => set_axis(&mut logo.transform.rotation, a, value),
            ["logo", "scale", a] => set_axis(&mut logo.transform.scale, a, value),
            ["material", "alpha"] => {
                logo.material.alpha = value.as_f32();
                true
            }
            ["material", "transparent"] => {
                logo.material.transparent = value.as_bool();
                true
            }
            ["material", "color"] => {
                logo.material.color = value.as_rgb();
                true
            }
            ["material", "layers", layer, prop] => match logo.material.layer_mut(layer) {
                Some(layer) => match *prop {
                    "opacity" => {
                        layer.core_mut().opacity = value.as_f32();
                        true
                    }
                    "visible" => {
                        layer.core_mut().visible = value.as_bool();
                        true
                    }
                    prop => layer.uniforms_mut().set(prop, value),
                },
                None => false,
            },
            ["passes", pass, "enabled"] => match self.pipeline.pass_mut(pass) {
                Some(pass) => {
                    pass.set_enabled(value.as_bool());
                    true
                }
                None => false,
            },
            ["passes", pass, "uniforms", u] => self
                .pipeline
                .pass_mut(pass)
                .is_some_and(|p| p.uniforms_mut().set(u, value)),
            ["camera", "fov"] => {
                self.scene.camera.fov = value.as_f32();
                true
            }
            ["camera", "position", a] => set_axis(&mut self.scene.camera.position, a, value),
            ["uniforms", "time"] => {
                self.time = value.as_f64();
                self.mirror_time();
                true
            }
            _ => false,
        };
        if !written {
            tracing::debug!(path, "ignoring write to unknown property");
        }
        written
    }
}

fn set_axis(v: &mut Vec3, name: &str, value: PropValue) -> bool {
    match axis_mut(v, name) {
        Some(slot) => {
            *slot = value.as_f32();
            true
        }
        None => false,
    }
}

#[cfg(test)]
#[path = "../tests/unit/stage.rs"]
mod tests;
