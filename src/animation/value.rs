use crate::foundation::core::Rgb;

/// A value a cue can write and a uniform can hold.
///
/// Writes are never type-checked. Readers coerce whatever they find, so a mismatched write
/// shows up as a wrong render instead of an error.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    /// Boolean flag, e.g. a pass's `enabled`.
    Bool(bool),
    /// Scalar, e.g. a rotation angle or an opacity.
    Scalar(f64),
    /// RGB color.
    Color(Rgb),
}

impl PropValue {
    /// Numeric view: `true`/`false` become `1`/`0`, colors their mean channel.
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Scalar(v) => v,
            Self::Bool(b) => {
                if b {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Color(c) => f64::from(c.r + c.g + c.b) / 3.0,
        }
    }

    /// Numeric view narrowed to `f32`.
    pub fn as_f32(self) -> f32 {
        self.as_f64() as f32
    }

    /// Truthiness: non-zero numbers are `true`.
    pub fn as_bool(self) -> bool {
        match self {
            Self::Bool(b) => b,
            other => other.as_f64() != 0.0,
        }
    }

    /// Color view: scalars become grey.
    pub fn as_rgb(self) -> Rgb {
        match self {
            Self::Color(c) => c,
            other => Rgb::splat(other.as_f32()),
        }
    }

    /// Interpolate from `from` toward `to` with eased progress `t`.
    ///
    /// The target's type decides the rule. Booleans tween numerically as 0/1 and read back as
    /// truthy: `false -> true` flips on as soon as `t > 0`, `true -> false` only at `t == 1`.
    pub fn interpolate(from: Self, to: Self, t: f64) -> Self {
        match to {
            Self::Scalar(b) => {
                let a = from.as_f64();
                Self::Scalar(a + (b - a) * t)
            }
            Self::Bool(b) => {
                let a = from.as_f64();
                let b = if b { 1.0 } else { 0.0 };
                Self::Bool(a + (b - a) * t != 0.0)
            }
            Self::Color(b) => Self::Color(from.as_rgb().mix(b, t as f32)),
        }
    }

    /// GLSL type used to declare a uniform holding this value.
    pub fn glsl_type(self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Scalar(_) => "float",
            Self::Color(_) => "vec3",
        }
    }

    /// GLSL literal for constants.
    pub fn to_glsl(self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Scalar(v) => format!("{v:.6}"),
            Self::Color(c) => c.to_glsl(),
        }
    }
}

impl From<f64> for PropValue {
    fn from(v: f64) -> Self {
        Self::Scalar(v)
    }
}

impl From<f32> for PropValue {
    fn from(v: f32) -> Self {
        Self::Scalar(f64::from(v))
    }
}

impl From<bool> for PropValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<Rgb> for PropValue {
    fn from(v: Rgb) -> Self {
        Self::Color(v)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/value.rs"]
mod tests;
