use crate::animation::script::ScriptDef;
use crate::animation::timeline::{Timeline, TimelineState};
use crate::clock::{Clock, MonotonicTime, TimeSource};
use crate::effects::glitch::GlitchPass;
use crate::effects::pass::{EffectPass, ScenePass};
use crate::effects::pipeline::EffectPipeline;
use crate::foundation::core::{Transform3D, Vec3};
use crate::foundation::error::StrataResult;
use crate::material::composite::CompositeMaterial;
use crate::material::layer::LayerProps;
use crate::material::layers::{DisplaceLayer, StarterLayer};
use crate::material::program::AssembledProgram;
use crate::render::frame::FrameRGBA;
use crate::session::assets::AssetSource;
use crate::session::config::{GlitchConfig, MaterialConfig, SessionConfig, surface_size};
use crate::session::controls::{Camera, CameraControls, OrbitControls};
use crate::stage::{Logo, Scene, Stage};

/// A bootstrapped session: the stage with its loaded mesh, and the compiled choreography.
///
/// Nothing has played yet. Turn it into a [`FrameDriver`] to start the timeline.
#[derive(Debug)]
pub struct Session {
    /// Configuration the session was built from.
    pub config: SessionConfig,
    /// Scene, pipeline and time uniform.
    pub stage: Stage,
    /// Compiled choreography, not yet started.
    pub timeline: Timeline,
}

impl Session {
    /// Load the mesh, build the material and pipeline, compile `script` and check every cue
    /// target against the stage.
    ///
    /// Blocks once on the asset future.
    #[tracing::instrument(skip_all, fields(cues = script.cues.len()))]
    pub fn bootstrap(
        config: SessionConfig,
        script: &ScriptDef,
        assets: &impl AssetSource,
    ) -> StrataResult<Self> {
        config.validate()?;
        let mut mesh = pollster::block_on(assets.load())?;
        mesh.validate()?;
        tracing::debug!(
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            "logo mesh loaded"
        );

        let material = build_material(&config.material)?;
        material.build();

        let (width, height) = config.surface_size();
        let pipeline = EffectPipeline::new(width, height)
            .with_pass(ScenePass::new())
            .with_pass(build_glitch(&config.glitch)?);

        let cam = &config.camera;
        let camera = Camera {
            fov: cam.fov,
            aspect: config.viewport.width as f32 / config.viewport.height as f32,
            near: cam.near,
            far: cam.far,
            position: cam.position,
            target: Vec3::ZERO,
        };
        let transform = Transform3D {
            position: config.logo.position,
            rotation: config.logo.rotation,
            scale: Vec3::splat(config.logo.scale),
        };
        let scene = Scene {
            logo: Logo {
                mesh,
                transform,
                material,
            },
            camera,
            ambient: config.ambient.light(),
            clear: config.clear,
        };
        let stage = Stage::new(scene, pipeline, config.drift.time);

        let timeline = script
            .compile()?
            .with_time_scale(config.timeline.time_scale);
        stage.check_paths(timeline.targets())?;
        tracing::debug!(
            cues = timeline.len(),
            duration = timeline.duration(),
            "session ready"
        );

        Ok(Self {
            config,
            stage,
            timeline,
        })
    }

    /// The material's assembled shader program.
    pub fn program(&self) -> &AssembledProgram {
        self.stage.scene.logo.material.build()
    }

    /// Start the timeline and hand the session to a driver reading `source`.
    pub fn into_driver<S: TimeSource>(self, source: S) -> FrameDriver<S> {
        FrameDriver::new(self, Clock::new(source))
    }
}

fn build_material(cfg: &MaterialConfig) -> StrataResult<CompositeMaterial> {
    let mut material = CompositeMaterial::new(cfg.color, cfg.lighting);
    material.side = cfg.side;
    material.transparent = cfg.transparent;
    material.alpha = cfg.alpha;

    let d = &cfg.displace;
    if d.active {
        let props = LayerProps::new()
            .with("strength", d.strength)
            .with("scale", d.scale)
            .with("offset", d.offset)
            .blend(d.blend)
            .opacity(d.opacity);
        material.push_layer(Box::new(DisplaceLayer::new(d.noise, props)?));
    }
    let s = &cfg.starter;
    if s.active {
        let props = LayerProps::new()
            .with("color", s.color)
            .with("alpha", s.alpha)
            .blend(s.blend)
            .opacity(s.opacity);
        material.push_layer(Box::new(StarterLayer::new(props)?));
    }
    Ok(material)
}

fn build_glitch(cfg: &GlitchConfig) -> StrataResult<GlitchPass> {
    let mut glitch = GlitchPass::new(cfg.dt_size, cfg.seed)?;
    glitch.uniforms_mut().set("col_s", cfg.col_s.into());
    glitch.set_enabled(cfg.enabled);
    Ok(glitch)
}

/// What one tick produced.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameOutput {
    /// Zero-based tick index.
    pub index: u64,
    /// Final pipeline frame.
    pub frame: FrameRGBA,
    /// Passes that ran, in order.
    pub applied: Vec<String>,
    /// Clock seconds since the driver started.
    pub elapsed: f64,
    /// Clock seconds since the previous tick.
    pub delta: f64,
    /// Timeline play-head after this tick.
    pub play_head: f64,
    /// Timeline state after this tick.
    pub state: TimelineState,
    /// Program uniforms written since the previous tick, by GLSL name.
    pub changed_uniforms: Vec<String>,
}

/// Per-frame orchestration of a started session.
///
/// Each [`tick`](FrameDriver::tick) reads the clock, advances the timeline, drifts the time
/// uniform, updates the camera controls and renders the pipeline, in that order.
#[derive(Debug)]
pub struct FrameDriver<S = MonotonicTime> {
    stage: Stage,
    timeline: Timeline,
    clock: Clock<S>,
    controls: Box<dyn CameraControls>,
    drift_scale: f64,
    frames: u64,
}

impl<S: TimeSource> FrameDriver<S> {
    /// Start the session's timeline against its stage, so cues at or before zero apply before
    /// the first tick.
    pub fn new(session: Session, clock: Clock<S>) -> Self {
        let Session {
            config,
            mut stage,
            mut timeline,
        } = session;
        timeline.start(&mut stage);
        Self {
            stage,
            timeline,
            clock,
            controls: Box::new(OrbitControls::new(config.camera.damping)),
            drift_scale: config.drift.scale,
            frames: 0,
        }
    }

    /// Replace the camera controls.
    pub fn with_controls(mut self, controls: impl CameraControls + 'static) -> Self {
        self.controls = Box::new(controls);
        self
    }

    /// Mutable access to the camera controls, e.g. to feed input.
    pub fn controls_mut(&mut self) -> &mut dyn CameraControls {
        self.controls.as_mut()
    }

    /// Current stage.
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Mutable stage, for hosts that poke properties directly.
    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    /// The running timeline.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Number of completed ticks.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Render surface size in physical pixels.
    pub fn surface_size(&self) -> (u32, u32) {
        self.stage.pipeline.size()
    }

    /// Run one frame.
    #[tracing::instrument(level = "trace", skip_all, fields(index = self.frames))]
    pub fn tick(&mut self) -> FrameOutput {
        let sample = self.clock.tick();
        let play_head = self.timeline.advance(sample.delta, &mut self.stage);
        self.stage.drift(sample.delta, self.drift_scale);
        self.controls.update(&mut self.stage.scene.camera);
        let changed_uniforms = self.stage.scene.logo.material.flush_uniforms();

        let (frame, applied) = match self.stage.render() {
            Ok(out) => (out.frame, out.applied),
            Err(err) => {
                tracing::error!(%err, "pipeline render failed");
                let (w, h) = self.stage.pipeline.size();
                (FrameRGBA::new(w, h), Vec::new())
            }
        };
        tracing::trace!(
            play_head,
            changed = changed_uniforms.len(),
            passes = applied.len(),
            "frame done"
        );

        let index = self.frames;
        self.frames += 1;
        FrameOutput {
            index,
            frame,
            applied,
            elapsed: sample.elapsed,
            delta: sample.delta,
            play_head,
            state: self.timeline.state(),
            changed_uniforms,
        }
    }

    /// Follow a viewport change. The camera aspect tracks the CSS size and the surface is
    /// allocated at `device_pixel_ratio` (capped at 2).
    pub fn resize(&mut self, width: u32, height: u32, device_pixel_ratio: f32) {
        if width > 0 && height > 0 {
            self.stage.scene.camera.aspect = width as f32 / height as f32;
        }
        let (w, h) = surface_size(width, height, device_pixel_ratio);
        self.stage.pipeline.resize(w, h);
        tracing::debug!(width = w, height = h, "surface resized");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/driver.rs"]
mod tests;
