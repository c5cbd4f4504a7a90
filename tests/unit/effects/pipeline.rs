use super::*;
use crate::effects::pass::ScenePass;
use crate::foundation::core::{Rgb, Transform3D};
use crate::material::composite::CompositeMaterial;
use crate::material::uniform::UniformTable;
use crate::render::mesh::Mesh;
use crate::session::controls::Camera;
use crate::stage::Logo;

fn scene() -> Scene {
    Scene {
        logo: Logo {
            mesh: Mesh::default(),
            transform: Transform3D::default(),
            material: CompositeMaterial::default(),
        },
        camera: Camera::default(),
        ambient: Rgb::WHITE,
        clear: Rgb::new(0.0, 0.0, 1.0),
    }
}

/// Adds `step` to the red channel of every pixel and counts its runs.
#[derive(Debug)]
struct MockPass {
    name: &'static str,
    enabled: bool,
    step: u8,
    runs: usize,
    uniforms: UniformTable,
}

impl MockPass {
    fn new(name: &'static str, step: u8) -> Self {
        Self {
            name,
            enabled: true,
            step,
            runs: 0,
            uniforms: UniformTable::default(),
        }
    }
}

impl EffectPass for MockPass {
    fn name(&self) -> &str {
        self.name
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

    fn render(&mut self, read: &FrameRGBA, write: &mut FrameRGBA, _scene: &Scene) -> StrataResult<()> {
        self.runs += 1;
        for (dst, src) in write.data.chunks_exact_mut(4).zip(read.data.chunks_exact(4)) {
            dst.copy_from_slice(src);
            dst[0] = src[0].saturating_add(self.step);
        }
        Ok(())
    }
}

#[test]
fn passes_chain_through_swapped_buffers() {
    let mut pipeline = EffectPipeline::new(2, 2)
        .with_pass(MockPass::new("a", 10))
        .with_pass(MockPass::new("b", 5));
    let out = pipeline.render(&scene()).unwrap();
    assert_eq!(out.applied, vec!["a", "b"]);
    assert_eq!(out.frame.pixel(1, 1), [15, 0, 0, 0]);
}

#[test]
fn disabled_pass_is_skipped_entirely() {
    let mut pipeline = EffectPipeline::new(2, 2)
        .with_pass(MockPass::new("a", 10))
        .with_pass(MockPass::new("b", 5));
    pipeline.pass_mut("b").unwrap().set_enabled(false);
    let out = pipeline.render(&scene()).unwrap();
    assert_eq!(out.applied, vec!["a"]);
    assert_eq!(out.frame.pixel(0, 0), [10, 0, 0, 0]);
}

#[test]
fn every_render_starts_from_a_cleared_buffer() {
    let mut pipeline = EffectPipeline::new(1, 1).with_pass(MockPass::new("a", 7));
    pipeline.render(&scene()).unwrap();
    let out = pipeline.render(&scene()).unwrap();
    assert_eq!(out.frame.pixel(0, 0), [7, 0, 0, 0]);
}

#[test]
fn no_enabled_passes_yields_a_blank_frame() {
    let mut pipeline = EffectPipeline::new(3, 2);
    let out = pipeline.render(&scene()).unwrap();
    assert!(out.applied.is_empty());
    assert_eq!(out.frame, FrameRGBA::new(3, 2));
}

#[test]
fn scene_pass_clears_to_the_scene_color() {
    let mut pipeline = EffectPipeline::new(4, 4).with_pass(ScenePass::new());
    let out = pipeline.render(&scene()).unwrap();
    assert_eq!(out.applied, vec![ScenePass::NAME]);
    assert_eq!(out.frame.pixel(2, 2), [0, 0, 255, 255]);
}

#[test]
fn lookup_and_resize() {
    let mut pipeline = EffectPipeline::new(4, 4).with_pass(MockPass::new("a", 1));
    assert!(pipeline.pass("a").is_some());
    assert!(pipeline.pass("missing").is_none());
    pipeline.resize(8, 2);
    assert_eq!(pipeline.size(), (8, 2));
    let out = pipeline.render(&scene()).unwrap();
    assert_eq!((out.frame.width, out.frame.height), (8, 2));
}
