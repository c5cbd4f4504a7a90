//! Strata animates a single 3-D logo by driving a layered procedural material and a
//! post-processing pipeline from a time-indexed choreography script.
//!
//! The public API is session-oriented:
//!
//! - Load a [`SessionConfig`] and a choreography [`ScriptDef`]
//! - Bootstrap a [`Session`] from an [`AssetSource`]
//! - Call [`FrameDriver::tick`] once per display refresh
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod foundation;

/// Timeline choreography: eases, property values, cues and scripts.
pub mod animation;
/// Monotonic time sources.
pub mod clock;
/// Post-render effect passes.
pub mod effects;
/// Layer-composition material system.
pub mod material;
/// CPU rendering backend.
pub mod render;
/// Session bootstrap and the per-frame driver.
pub mod session;
/// Mutable scene state addressed by property paths.
pub mod stage;

pub use crate::foundation::core::{Rgb, Side, Transform3D, Vec3};
pub use crate::foundation::error::{StrataError, StrataResult};

pub use crate::animation::ease::{Curve, Ease};
pub use crate::animation::script::{ScriptDef, logo_reveal};
pub use crate::animation::timeline::{Position, Timeline, TimelineState, Tween};
pub use crate::animation::value::PropValue;
pub use crate::clock::{Clock, FixedStep, MonotonicTime, TimeSource};
pub use crate::effects::glitch::GlitchPass;
pub use crate::effects::pass::{EffectPass, ScenePass};
pub use crate::effects::pipeline::{EffectPipeline, PipelineOutput};
pub use crate::material::composite::{CompositeMaterial, Lighting};
pub use crate::material::layer::{BlendMode, LayerProps, ShadingLayer, SurfaceContext};
pub use crate::material::layers::{DisplaceLayer, NoiseKind, StarterLayer};
pub use crate::material::program::AssembledProgram;
pub use crate::material::uniform::{SlotKind, UniformSlot, UniformTable};
pub use crate::render::frame::FrameRGBA;
pub use crate::render::mesh::Mesh;
pub use crate::session::assets::{AssetSource, MeshFile, ProceduralLogo};
pub use crate::session::config::SessionConfig;
pub use crate::session::controls::{Camera, CameraControls, OrbitControls};
pub use crate::session::driver::{FrameDriver, FrameOutput, Session};
pub use crate::stage::{Animatable, Stage};
