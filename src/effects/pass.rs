use std::fmt;

use crate::foundation::error::StrataResult;
use crate::material::uniform::UniformTable;
use crate::render::frame::{FrameRGBA, to_rgba8};
use crate::render::raster::{DrawCall, Rasterizer};
use crate::stage::Scene;

/// One independently enabled stage of the post-render pipeline.
pub trait EffectPass: fmt::Debug {
    /// Pass name used in property paths.
    fn name(&self) -> &str;

    /// Whether the pipeline runs this pass.
    fn enabled(&self) -> bool;

    /// Toggle the pass.
    fn set_enabled(&mut self, enabled: bool);

    /// Pass-specific inputs.
    fn uniforms(&self) -> &UniformTable;

    /// Mutable pass-specific inputs.
    fn uniforms_mut(&mut self) -> &mut UniformTable;

    /// Read the previous pass's output from `read` and write this pass's output to `write`.
    /// Both frames have the same size.
    fn render(&mut self, read: &FrameRGBA, write: &mut FrameRGBA, scene: &Scene)
    -> StrataResult<()>;
}

/// Base render: clears to the scene's clear color and draws the logo.
#[derive(Debug)]
pub struct ScenePass {
    enabled: bool,
    uniforms: UniformTable,
    raster: Rasterizer,
}

impl Default for ScenePass {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenePass {
    /// Name of the scene pass.
    pub const NAME: &'static str = "scene";

    /// Enabled scene pass.
    pub fn new() -> Self {
        Self {
            enabled: true,
            uniforms: UniformTable::default(),
            raster: Rasterizer::new(),
        }
    }
}

impl EffectPass for ScenePass {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn uniforms(&self) -> &UniformTable {
        &self.uniforms
    }

    fn uniforms_mut(&mut self) -> &mut UniformTable {
        &mut self.uniforms
    }

    fn render(
        &mut self,
        _read: &FrameRGBA,
        write: &mut FrameRGBA,
        scene: &Scene,
    ) -> StrataResult<()> {
        write.clear(to_rgba8(scene.clear, 1.0));
        let logo = &scene.logo;
        let call = DrawCall {
            mesh: &logo.mesh,
            model: logo.transform.matrix(),
            view_projection: scene.camera.view_projection(),
            eye: scene.camera.position,
            material: &logo.material,
            ambient: scene.ambient,
        };
        let stats = self.raster.draw(write, &call)?;
        tracing::trace!(
            triangles = stats.triangles,
            fragments = stats.fragments,
            "scene drawn"
        );
        Ok(())
    }
}
