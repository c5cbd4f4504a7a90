use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;

use crate::foundation::error::{StrataError, StrataResult};

/// Shape of an ease before direction is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Curve {
    /// `t^2`.
    Power1,
    /// `t^3`.
    Power2,
    /// `t^4`.
    Power3,
    /// `t^5`.
    Power4,
    /// Quarter sine wave.
    Sine,
    /// Exponential.
    Expo,
    /// Circular arc.
    Circ,
    /// Overshoots then returns.
    Back,
    /// Damped spring.
    Elastic,
    /// Bouncing ball.
    Bounce,
}

impl Curve {
    fn name(self) -> &'static str {
        match self {
            Self::Power1 => "power1",
            Self::Power2 => "power2",
            Self::Power3 => "power3",
            Self::Power4 => "power4",
            Self::Sine => "sine",
            Self::Expo => "expo",
            Self::Circ => "circ",
            Self::Back => "back",
            Self::Elastic => "elastic",
            Self::Bounce => "bounce",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "power1" | "quad" => Self::Power1,
            "power2" | "cubic" => Self::Power2,
            "power3" | "quart" => Self::Power3,
            "power4" | "quint" | "strong" => Self::Power4,
            "sine" => Self::Sine,
            "expo" => Self::Expo,
            "circ" => Self::Circ,
            "back" => Self::Back,
            "elastic" => Self::Elastic,
            "bounce" => Self::Bounce,
            _ => return None,
        })
    }

    /// The ease-in form over `(0, 1)`.
    fn ease_in(self, t: f64) -> f64 {
        match self {
            Self::Power1 => t.powi(2),
            Self::Power2 => t.powi(3),
            Self::Power3 => t.powi(4),
            Self::Power4 => t.powi(5),
            Self::Sine => 1.0 - (t * FRAC_PI_2).cos(),
            Self::Expo => 2f64.powf(10.0 * (t - 1.0)),
            Self::Circ => 1.0 - (1.0 - t * t).max(0.0).sqrt(),
            Self::Back => {
                const S: f64 = 1.70158;
                t * t * ((S + 1.0) * t - S)
            }
            Self::Elastic | Self::Bounce => 1.0 - self.ease_out(1.0 - t),
        }
    }

    /// The ease-out form over `(0, 1)`.
    fn ease_out(self, t: f64) -> f64 {
        match self {
            Self::Elastic => {
                const PERIOD: f64 = 0.3;
                let phase = PERIOD / 4.0;
                2f64.powf(-10.0 * t) * ((t - phase) * (2.0 * PI / PERIOD)).sin() + 1.0
            }
            Self::Bounce => {
                const N: f64 = 7.5625;
                const D: f64 = 2.75;
                if t < 1.0 / D {
                    N * t * t
                } else if t < 2.0 / D {
                    let t = t - 1.5 / D;
                    N * t * t + 0.75
                } else if t < 2.5 / D {
                    let t = t - 2.25 / D;
                    N * t * t + 0.9375
                } else {
                    let t = t - 2.625 / D;
                    N * t * t + 0.984375
                }
            }
            _ => 1.0 - self.ease_in(1.0 - t),
        }
    }
}

/// Progress curve mapping normalized time to normalized value.
///
/// Names follow the common `family.direction` convention (`power4.in`, `sine.inOut`). A bare
/// family name means `.out`, and the default is `power1.out`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Ease {
    /// Identity.
    Linear,
    /// Accelerating.
    In(Curve),
    /// Decelerating.
    Out(Curve),
    /// Accelerate then decelerate.
    InOut(Curve),
}

impl Default for Ease {
    fn default() -> Self {
        Self::Out(Curve::Power1)
    }
}

impl Ease {
    /// Eased progress. Exactly `0` at `t <= 0` and exactly `1` at `t >= 1`.
    pub fn apply(self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match self {
            Self::Linear => t,
            Self::In(c) => c.ease_in(t),
            Self::Out(c) => c.ease_out(t),
            Self::InOut(c) => {
                if t < 0.5 {
                    c.ease_in(2.0 * t) / 2.0
                } else {
                    1.0 - c.ease_in(2.0 * (1.0 - t)) / 2.0
                }
            }
        }
    }

    /// Parse `none`, `linear`, or `<family>[.in|.out|.inOut]`.
    pub fn parse(s: &str) -> StrataResult<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("none") || s.eq_ignore_ascii_case("linear") {
            return Ok(Self::Linear);
        }
        let (family, dir) = s.split_once('.').unwrap_or((s, "out"));
        let curve = Curve::parse(&family.to_ascii_lowercase())
            .ok_or_else(|| StrataError::validation(format!("unknown ease '{s}'")))?;
        match dir.to_ascii_lowercase().as_str() {
            "in" | "easein" => Ok(Self::In(curve)),
            "out" | "easeout" => Ok(Self::Out(curve)),
            "inout" | "easeinout" => Ok(Self::InOut(curve)),
            _ => Err(StrataError::validation(format!(
                "unknown ease direction in '{s}'"
            ))),
        }
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("none"),
            Self::In(c) => write!(f, "{}.in", c.name()),
            Self::Out(c) => write!(f, "{}.out", c.name()),
            Self::InOut(c) => write!(f, "{}.inOut", c.name()),
        }
    }
}

impl TryFrom<String> for Ease {
    type Error = StrataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Ease> for String {
    fn from(e: Ease) -> Self {
        e.to_string()
    }
}
