use crate::foundation::error::{StrataError, StrataResult};

pub use glam::{Mat4, Quat, Vec3};
pub use kurbo::{Point, Vec2};

/// Linear RGB color with channels in `[0, 1]`. Defaults to black.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
}

impl Rgb {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    /// Build a color from channel values.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Grey with all channels equal to `v`.
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }

    /// Parse `#rgb`, `#rrggbb` or a CSS basic color name.
    pub fn parse(s: &str) -> StrataResult<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            let digits: Vec<u8> = hex
                .chars()
                .map(|c| {
                    c.to_digit(16)
                        .map(|d| d as u8)
                        .ok_or_else(|| StrataError::validation(format!("invalid hex color '{s}'")))
                })
                .collect::<StrataResult<_>>()?;
            let (r, g, b) = match digits.as_slice() {
                [r, g, b] => (r * 17, g * 17, b * 17),
                [r1, r0, g1, g0, b1, b0] => (r1 * 16 + r0, g1 * 16 + g0, b1 * 16 + b0),
                _ => {
                    return Err(StrataError::validation(format!(
                        "hex color '{s}' must have 3 or 6 digits"
                    )));
                }
            };
            return Ok(Self::from_u8([r, g, b]));
        }

        match s.to_ascii_lowercase().as_str() {
            "black" => Ok(Self::BLACK),
            "white" => Ok(Self::WHITE),
            "red" => Ok(Self::new(1.0, 0.0, 0.0)),
            "green" => Ok(Self::new(0.0, 128.0 / 255.0, 0.0)),
            "lime" => Ok(Self::new(0.0, 1.0, 0.0)),
            "blue" => Ok(Self::new(0.0, 0.0, 1.0)),
            "yellow" => Ok(Self::new(1.0, 1.0, 0.0)),
            "cyan" => Ok(Self::new(0.0, 1.0, 1.0)),
            "magenta" => Ok(Self::new(1.0, 0.0, 1.0)),
            "grey" | "gray" => Ok(Self::splat(128.0 / 255.0)),
            _ => Err(StrataError::validation(format!("unknown color '{s}'"))),
        }
    }

    /// Build from 8-bit channels.
    pub fn from_u8(c: [u8; 3]) -> Self {
        Self::new(
            f32::from(c[0]) / 255.0,
            f32::from(c[1]) / 255.0,
            f32::from(c[2]) / 255.0,
        )
    }

    /// Quantize to 8-bit channels with clamping.
    pub fn to_u8(self) -> [u8; 3] {
        fn q(v: f32) -> u8 {
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        [q(self.r), q(self.g), q(self.b)]
    }

    /// Apply `f` to every channel.
    pub fn map(self, f: impl Fn(f32) -> f32) -> Self {
        Self::new(f(self.r), f(self.g), f(self.b))
    }

    /// Combine two colors channel by channel.
    pub fn zip(self, other: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        Self::new(f(self.r, other.r), f(self.g, other.g), f(self.b, other.b))
    }

    /// Linear mix toward `other` by `t`.
    pub fn mix(self, other: Self, t: f32) -> Self {
        self.zip(other, |a, b| a + (b - a) * t)
    }

    /// Uniform scale.
    pub fn scale(self, k: f32) -> Self {
        self.map(|v| v * k)
    }

    /// `vec3(r, g, b)` literal for GLSL sources.
    pub fn to_glsl(self) -> String {
        format!("vec3({:.6}, {:.6}, {:.6})", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Rgb {
    type Error = StrataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        let [r, g, b] = c.to_u8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

/// Position, Euler rotation (radians, XYZ order) and scale of an object.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Transform3D {
    /// Translation.
    pub position: Vec3,
    /// Euler angles in radians, applied X then Y then Z.
    pub rotation: Vec3,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Default for Transform3D {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform3D {
    /// Model matrix `T * R * S`.
    pub fn matrix(&self) -> Mat4 {
        let q = Quat::from_euler(
            glam::EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_scale_rotation_translation(self.scale, q, self.position)
    }
}

/// Which triangle faces a material draws.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Counter-clockwise faces only.
    Front,
    /// Clockwise faces only.
    Back,
    /// Both faces.
    #[default]
    Double,
}

impl Side {
    /// Return `true` when a face with the given orientation is drawn.
    pub fn draws(self, front_facing: bool) -> bool {
        match self {
            Self::Front => front_facing,
            Self::Back => !front_facing,
            Self::Double => true,
        }
    }
}

/// Degrees to radians for `f64` script values.
pub fn deg2rad(degrees: f64) -> f64 {
    degrees.to_radians()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
