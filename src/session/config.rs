use std::path::Path;

use crate::effects::glitch::MAX_DT_SIZE;
use crate::foundation::core::{Rgb, Side, Vec3};
use crate::foundation::error::{StrataError, StrataResult};
use crate::material::composite::Lighting;
use crate::material::layer::BlendMode;
use crate::material::layers::NoiseKind;

/// Everything a session needs besides the mesh and the choreography script.
///
/// Every field has a default, so `{}` is a valid configuration.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Output surface.
    pub viewport: ViewportConfig,
    /// Color the scene pass clears to.
    pub clear: Rgb,
    /// Initial logo placement.
    pub logo: LogoConfig,
    /// Camera and orbit controls.
    pub camera: CameraConfig,
    /// Ambient light.
    pub ambient: AmbientConfig,
    /// Base material and its layers.
    pub material: MaterialConfig,
    /// Time uniform drift.
    pub drift: DriftConfig,
    /// Timeline playback.
    pub timeline: TimelineConfig,
    /// Glitch pass.
    pub glitch: GlitchConfig,
}

/// Output surface size in CSS pixels plus the device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// CSS width.
    pub width: u32,
    /// CSS height.
    pub height: u32,
    /// Device pixel ratio, capped at 2.
    pub device_pixel_ratio: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            device_pixel_ratio: 1.0,
        }
    }
}

/// Initial logo placement.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LogoConfig {
    /// Translation.
    pub position: Vec3,
    /// Euler angles in radians.
    pub rotation: Vec3,
    /// Uniform scale.
    pub scale: f32,
}

impl Default for LogoConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, -10.0),
            rotation: Vec3::ZERO,
            scale: 8.0,
        }
    }
}

/// Perspective camera and orbit damping.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
    /// Eye position.
    pub position: Vec3,
    /// Orbit damping factor.
    pub damping: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.1,
            far: 3000.0,
            position: Vec3::new(0.0, 0.0, 2.5),
            damping: 0.05,
        }
    }
}

/// Ambient light.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AmbientConfig {
    /// Light color.
    pub color: Rgb,
    /// Multiplier on `color`.
    pub intensity: f32,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            color: Rgb::WHITE,
            intensity: 1.0,
        }
    }
}

impl AmbientConfig {
    /// Color times intensity.
    pub fn light(&self) -> Rgb {
        self.color.scale(self.intensity)
    }
}

/// Base surface properties plus the layer stack.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    /// Base color.
    pub color: Rgb,
    /// Lighting model.
    pub lighting: Lighting,
    /// Faces drawn.
    pub side: Side,
    /// Whether alpha blends over the background.
    pub transparent: bool,
    /// Global alpha.
    pub alpha: f32,
    /// Displacement layer.
    pub displace: DisplaceConfig,
    /// Starter coloring layer.
    pub starter: StarterConfig,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            color: Rgb::WHITE,
            lighting: Lighting::Standard,
            side: Side::Double,
            transparent: true,
            alpha: 0.0,
            displace: DisplaceConfig::default(),
            starter: StarterConfig::default(),
        }
    }
}

/// Displacement layer settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DisplaceConfig {
    /// Whether the layer is part of the material.
    pub active: bool,
    /// Displacement along the normal.
    pub strength: f64,
    /// Noise frequency.
    pub scale: f64,
    /// Noise domain offset.
    pub offset: f64,
    /// Noise family.
    pub noise: NoiseKind,
    /// Blend mode.
    pub blend: BlendMode,
    /// Layer opacity.
    pub opacity: f32,
}

impl Default for DisplaceConfig {
    fn default() -> Self {
        Self {
            active: true,
            strength: 0.0,
            scale: 0.0,
            offset: 0.0,
            noise: NoiseKind::Simplex,
            blend: BlendMode::Normal,
            opacity: 1.0,
        }
    }
}

/// The starter layer is off unless `active` is set.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StarterConfig {
    /// Whether the layer is part of the material.
    pub active: bool,
    /// Tint.
    pub color: Rgb,
    /// Layer alpha.
    pub alpha: f64,
    /// Blend mode.
    pub blend: BlendMode,
    /// Layer opacity.
    pub opacity: f32,
}

impl Default for StarterConfig {
    fn default() -> Self {
        Self {
            active: false,
            color: Rgb::new(1.0, 0.0, 0.0),
            alpha: 1.0,
            blend: BlendMode::Normal,
            opacity: 1.0,
        }
    }
}

/// Time uniform drift.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    /// Initial value of the time uniform.
    pub time: f64,
    /// Time uniform growth per second of frame delta.
    pub scale: f64,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            time: 3.5,
            scale: 0.005,
        }
    }
}

/// Timeline playback.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Play-head rate multiplier.
    pub time_scale: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self { time_scale: 1.0 }
    }
}

/// Glitch pass settings.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GlitchConfig {
    /// Side of the square displacement heightmap, at most [`MAX_DT_SIZE`].
    pub dt_size: u32,
    /// RNG seed.
    pub seed: u64,
    /// Width of the row/column tearing bands.
    pub col_s: f64,
    /// Whether the pass starts enabled.
    pub enabled: bool,
}

impl Default for GlitchConfig {
    fn default() -> Self {
        Self {
            dt_size: 10,
            seed: 0x5eed,
            col_s: 0.0,
            enabled: false,
        }
    }
}

impl SessionConfig {
    /// Parse JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> StrataResult<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: &Path) -> StrataResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            StrataError::validation(format!("read config '{}': {e}", path.display()))
        })?;
        Self::from_json(&text)
    }

    /// Reject values no session can run with.
    pub fn validate(&self) -> StrataResult<()> {
        let vp = &self.viewport;
        if vp.width == 0 || vp.height == 0 {
            return Err(StrataError::validation("viewport width/height must be > 0"));
        }
        if !(vp.device_pixel_ratio.is_finite() && vp.device_pixel_ratio > 0.0) {
            return Err(StrataError::validation(
                "viewport device_pixel_ratio must be finite and > 0",
            ));
        }
        let cam = &self.camera;
        if !(cam.fov > 0.0 && cam.fov < 180.0) {
            return Err(StrataError::validation("camera fov must be in (0, 180)"));
        }
        if !(cam.near > 0.0 && cam.far > cam.near) {
            return Err(StrataError::validation("camera needs 0 < near < far"));
        }
        if !self.timeline.time_scale.is_finite() {
            return Err(StrataError::validation("timeline time_scale must be finite"));
        }
        if !(1..=MAX_DT_SIZE).contains(&self.glitch.dt_size) {
            return Err(StrataError::validation(format!(
                "glitch dt_size must be in 1..={MAX_DT_SIZE}"
            )));
        }
        Ok(())
    }

    /// Backing surface size in physical pixels, with the pixel ratio capped at 2.
    pub fn surface_size(&self) -> (u32, u32) {
        surface_size(
            self.viewport.width,
            self.viewport.height,
            self.viewport.device_pixel_ratio,
        )
    }
}

/// Physical size for a CSS size and pixel ratio. Ratios are capped at 2 and bad ratios fall
/// back to 1.
pub(crate) fn surface_size(width: u32, height: u32, dpr: f32) -> (u32, u32) {
    let dpr = if dpr.is_finite() && dpr > 0.0 {
        dpr.min(2.0)
    } else {
        1.0
    };
    let scale = |v: u32| ((v as f32 * dpr).round() as u32).max(1);
    (scale(width), scale(height))
}

#[cfg(test)]
#[path = "../../tests/unit/session/config.rs"]
mod tests;
