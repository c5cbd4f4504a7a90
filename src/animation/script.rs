use std::collections::BTreeMap;
use std::path::Path;

use crate::animation::ease::{Curve, Ease};
use crate::animation::timeline::{Position, Timeline, Tween};
use crate::animation::value::PropValue;
use crate::foundation::core::deg2rad;
use crate::foundation::error::{StrataError, StrataResult};

/// A cue or label position as written in JSON: a number or a position string.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum PositionDef {
    /// Absolute seconds.
    Seconds(f64),
    /// `label`, `label+=x`, `+=x`, `<` or `>`.
    Expr(String),
}

impl Default for PositionDef {
    fn default() -> Self {
        Self::Expr("+=0".to_owned())
    }
}

impl PositionDef {
    fn resolve(&self) -> StrataResult<Position> {
        match self {
            Self::Seconds(t) => Ok(Position::At(*t)),
            Self::Expr(s) => s.parse(),
        }
    }
}

/// A cue end value: a plain value or `{"deg": x}` converted to radians.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ValueDef {
    /// Angle in degrees.
    Degrees {
        /// Degrees.
        deg: f64,
    },
    /// Literal value.
    Value(PropValue),
}

impl ValueDef {
    fn resolve(self) -> PropValue {
        match self {
            Self::Degrees { deg } => PropValue::Scalar(deg2rad(deg)),
            Self::Value(v) => v,
        }
    }
}

/// A named point on the timeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LabelDef {
    /// Label name.
    pub name: String,
    /// Where it sits.
    pub position: PositionDef,
}

/// One scheduled mutation.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CueDef {
    /// Property path prefix, e.g. `logo.rotation` or `passes.glitch`.
    pub target: String,
    /// End values keyed by the last path segment.
    pub props: BTreeMap<String, ValueDef>,
    /// Seconds; `0` sets instantly.
    #[serde(default)]
    pub duration: f64,
    /// Ease name; defaults to `power1.out`.
    #[serde(default)]
    pub ease: Ease,
    /// Start position; defaults to the current end of the timeline.
    #[serde(default)]
    pub position: PositionDef,
}

/// Choreography as data: labels followed by cues, compiled into a [`Timeline`].
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScriptDef {
    /// Labels, placed before any cue.
    pub labels: Vec<LabelDef>,
    /// Cues in declaration order.
    pub cues: Vec<CueDef>,
}

impl ScriptDef {
    /// Parse a JSON script.
    pub fn from_json(json: &str) -> StrataResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON script file.
    pub fn load(path: &Path) -> StrataResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            StrataError::validation(format!("read script '{}': {e}", path.display()))
        })?;
        Self::from_json(&text)
    }

    /// Build a timeline. Fails on unknown labels, bad positions and invalid durations.
    pub fn compile(&self) -> StrataResult<Timeline> {
        let mut tl = Timeline::new();
        for label in &self.labels {
            tl.add_label(&label.name, label.position.resolve()?)?;
        }
        for cue in &self.cues {
            let props: Vec<(&str, PropValue)> = cue
                .props
                .iter()
                .map(|(k, v)| (k.as_str(), v.resolve()))
                .collect();
            tl.to(
                &cue.target,
                &props,
                Tween::new(cue.duration).ease(cue.ease),
                cue.position.resolve()?,
            )?;
        }
        Ok(tl)
    }
}

fn cue(target: &str, props: &[(&str, ValueDef)], duration: f64, position: PositionDef) -> CueDef {
    CueDef {
        target: target.to_owned(),
        props: props.iter().map(|(k, v)| ((*k).to_owned(), *v)).collect(),
        duration,
        ease: Ease::default(),
        position,
    }
}

fn deg(deg: f64) -> ValueDef {
    ValueDef::Degrees { deg }
}

fn val(v: impl Into<PropValue>) -> ValueDef {
    ValueDef::Value(v.into())
}

fn at(t: f64) -> PositionDef {
    PositionDef::Seconds(t)
}

fn label(s: &str) -> PositionDef {
    PositionDef::Expr(s.to_owned())
}

/// The logo reveal: spin in from behind the camera while fading up, glitch through the
/// landing, then fly past the camera with a second glitch burst.
pub fn logo_reveal() -> ScriptDef {
    let mut fade = cue("material", &[("alpha", val(1.0))], 1.75, label("reveal"));
    fade.ease = Ease::In(Curve::Power4);

    ScriptDef {
        labels: vec![
            LabelDef {
                name: "reveal".to_owned(),
                position: at(0.0),
            },
            LabelDef {
                name: "exit".to_owned(),
                position: at(3.5),
            },
        ],
        cues: vec![
            cue(
                "logo.rotation",
                &[("x", deg(-90.0)), ("z", deg(-360.0))],
                0.0,
                at(-1.0),
            ),
            cue(
                "logo.position",
                &[("y", val(0.0)), ("z", val(0.0))],
                1.75,
                label("reveal"),
            ),
            fade,
            cue(
                "logo.rotation",
                &[("x", deg(90.0)), ("z", deg(360.0))],
                1.75,
                label("reveal"),
            ),
            cue("passes.glitch", &[("enabled", val(true))], 0.0, at(1.445)),
            cue("passes.glitch", &[("enabled", val(false))], 0.0, at(1.75)),
            cue("passes.glitch", &[("enabled", val(true))], 1.0, label("exit")),
            cue("passes.glitch.uniforms", &[("col_s", val(0.5))], 0.0, at(2.5)),
            cue("logo.position", &[("z", val(5.0))], 2.0, label("exit")),
            cue(
                "logo.rotation",
                &[("z", val(0.0)), ("x", deg(360.0))],
                2.0,
                label("exit"),
            ),
            cue(
                "passes.glitch",
                &[("enabled", val(false))],
                1.0,
                label("exit+=0.5"),
            ),
        ],
    }
}
