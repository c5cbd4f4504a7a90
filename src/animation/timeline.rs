use std::collections::BTreeMap;
use std::str::FromStr;

use crate::animation::ease::Ease;
use crate::animation::value::PropValue;
use crate::foundation::error::{StrataError, StrataResult};
use crate::stage::Animatable;

/// Lifecycle of a [`Timeline`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimelineState {
    /// Built but not started.
    #[default]
    Idle,
    /// Started, with cues still ahead of or under the play-head.
    Playing,
    /// The play-head is at or past the end of the last cue.
    Finished,
}

/// Where a cue starts.
#[derive(Clone, Debug, PartialEq)]
pub enum Position {
    /// Absolute time in seconds. May be negative.
    At(f64),
    /// Offset from a named label.
    Label {
        /// Label name.
        name: String,
        /// Seconds added to the label time.
        offset: f64,
    },
    /// Offset from the current end of the timeline (`+=1`, `-=0.5`).
    End(f64),
    /// Offset from the start of the previously added cue (`<`).
    PrevStart(f64),
    /// Offset from the end of the previously added cue (`>`).
    PrevEnd(f64),
}

impl From<f64> for Position {
    fn from(t: f64) -> Self {
        Self::At(t)
    }
}

impl FromStr for Position {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::End(0.0));
        }
        if let Ok(t) = s.parse::<f64>() {
            return Ok(Self::At(t));
        }
        if let Some(rest) = s.strip_prefix('<') {
            return Ok(Self::PrevStart(parse_offset(s, rest)?));
        }
        if let Some(rest) = s.strip_prefix('>') {
            return Ok(Self::PrevEnd(parse_offset(s, rest)?));
        }
        if s.starts_with("+=") || s.starts_with("-=") {
            return Ok(Self::End(parse_offset(s, s)?));
        }
        let (name, offset) = match s.find("+=").or_else(|| s.find("-=")) {
            Some(i) => (&s[..i], parse_offset(s, &s[i..])?),
            None => (s, 0.0),
        };
        if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
            return Err(StrataError::timeline(format!("invalid position '{s}'")));
        }
        Ok(Self::Label {
            name: name.to_owned(),
            offset,
        })
    }
}

/// Parse `""`, `+=x`, `-=x` or a bare number.
fn parse_offset(whole: &str, rest: &str) -> StrataResult<f64> {
    let rest = rest.trim();
    let bad = || StrataError::timeline(format!("invalid position offset in '{whole}'"));
    if rest.is_empty() {
        return Ok(0.0);
    }
    if let Some(v) = rest.strip_prefix("+=") {
        return v.trim().parse().map_err(|_| bad());
    }
    if let Some(v) = rest.strip_prefix("-=") {
        return v.trim().parse::<f64>().map(|v| -v).map_err(|_| bad());
    }
    rest.parse().map_err(|_| bad())
}

/// Duration and ease of one cue.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    /// Seconds; `0` applies the end value atomically.
    pub duration: f64,
    /// Progress curve.
    pub ease: Ease,
}

impl Tween {
    /// Tween over `duration` seconds with the default ease.
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            ease: Ease::default(),
        }
    }

    /// Instant set.
    pub fn set() -> Self {
        Self::new(0.0)
    }

    /// Replace the ease.
    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
enum CueState {
    Pending,
    Active,
    Settled,
}

#[derive(Clone, Debug)]
struct Cue {
    seq: u64,
    target: String,
    props: Vec<(String, PropValue)>,
    start: f64,
    tween: Tween,
    entry: Vec<Option<PropValue>>,
    state: CueState,
}

impl Cue {
    fn end(&self) -> f64 {
        self.start + self.tween.duration
    }

    fn path(&self, prop: &str) -> String {
        format!("{}.{prop}", self.target)
    }

    fn progress(&self, p: f64) -> f64 {
        if self.tween.duration <= 0.0 {
            1.0
        } else {
            ((p - self.start) / self.tween.duration).clamp(0.0, 1.0)
        }
    }

    fn capture(&mut self, target: &dyn Animatable) {
        self.entry = self
            .props
            .iter()
            .map(|(prop, _)| {
                let path = self.path(prop);
                let v = target.read(&path);
                if v.is_none() {
                    tracing::warn!(path = path.as_str(), "cue targets an unknown property");
                }
                v
            })
            .collect();
    }

    fn write_progress(&self, f: f64, target: &mut dyn Animatable) {
        let eased = self.tween.ease.apply(f);
        for ((prop, end), from) in self.props.iter().zip(&self.entry) {
            let Some(from) = *from else {
                continue;
            };
            let value = if f >= 1.0 {
                *end
            } else {
                PropValue::interpolate(from, *end, eased)
            };
            target.write(&self.path(prop), value);
        }
    }

    fn restore(&self, target: &mut dyn Animatable) {
        for ((prop, _), from) in self.props.iter().zip(&self.entry) {
            if let Some(from) = *from {
                target.write(&self.path(prop), from);
            }
        }
    }
}

/// A choreography of property cues against a shared play-head.
///
/// Cues are kept sorted by start time, ties broken by insertion order, and are applied in
/// that order every time the play-head moves. Each cue captures the target's value the first
/// time the play-head reaches its start and interpolates from there, so later cues on the same
/// property pick up wherever earlier ones left it.
#[derive(Clone, Debug)]
pub struct Timeline {
    cues: Vec<Cue>,
    labels: BTreeMap<String, f64>,
    playhead: f64,
    time_scale: f64,
    state: TimelineState,
    next_seq: u64,
    last: Option<(f64, f64)>,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Timeline {
    /// Empty timeline at rate 1.
    pub fn new() -> Self {
        Self {
            cues: Vec::new(),
            labels: BTreeMap::new(),
            playhead: 0.0,
            time_scale: 1.0,
            state: TimelineState::Idle,
            next_seq: 0,
            last: None,
        }
    }

    /// Builder form of [`Timeline::set_time_scale`].
    pub fn with_time_scale(mut self, rate: f64) -> Self {
        self.time_scale = rate;
        self
    }

    /// Rate multiplier applied to every `advance` delta.
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Change the rate. Negative rates play backward.
    pub fn set_time_scale(&mut self, rate: f64) {
        self.time_scale = rate;
    }

    /// Current play-head in seconds.
    pub fn position(&self) -> f64 {
        self.playhead
    }

    /// End of the last cue, never below zero.
    pub fn duration(&self) -> f64 {
        self.cues.iter().map(Cue::end).fold(0.0, f64::max)
    }

    /// Lifecycle state.
    pub fn state(&self) -> TimelineState {
        self.state
    }

    /// Number of scheduled cues.
    pub fn len(&self) -> usize {
        self.cues.len()
    }

    /// Return `true` when no cue is scheduled.
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Time of a label.
    pub fn label(&self, name: &str) -> Option<f64> {
        self.labels.get(name).copied()
    }

    /// Every property path the cues write, in schedule order.
    pub fn targets(&self) -> impl Iterator<Item = String> + '_ {
        self.cues
            .iter()
            .flat_map(|c| c.props.iter().map(move |(prop, _)| c.path(prop)))
    }

    /// Place a label and return its resolved time.
    pub fn add_label(&mut self, name: &str, position: impl Into<Position>) -> StrataResult<f64> {
        let at = self.resolve(&position.into())?;
        self.labels.insert(name.to_owned(), at);
        Ok(at)
    }

    /// Schedule a cue tweening `props` of `target` to their end values.
    pub fn to(
        &mut self,
        target: &str,
        props: &[(&str, PropValue)],
        tween: Tween,
        position: impl Into<Position>,
    ) -> StrataResult<&mut Self> {
        if !(tween.duration >= 0.0 && tween.duration.is_finite()) {
            return Err(StrataError::timeline(format!(
                "cue on '{target}' has invalid duration {}",
                tween.duration
            )));
        }
        if props.is_empty() {
            return Err(StrataError::timeline(format!("cue on '{target}' has no properties")));
        }
        let start = self.resolve(&position.into())?;
        let cue = Cue {
            seq: self.next_seq,
            target: target.to_owned(),
            props: props.iter().map(|(p, v)| ((*p).to_owned(), *v)).collect(),
            start,
            tween,
            entry: Vec::new(),
            state: CueState::Pending,
        };
        self.next_seq += 1;
        self.last = Some((start, cue.end()));

        let idx = self.cues.partition_point(|c| (c.start, c.seq) <= (start, cue.seq));
        self.cues.insert(idx, cue);
        Ok(self)
    }

    /// Schedule an instant write of `props`.
    pub fn set(
        &mut self,
        target: &str,
        props: &[(&str, PropValue)],
        position: impl Into<Position>,
    ) -> StrataResult<&mut Self> {
        self.to(target, props, Tween::set(), position)
    }

    fn resolve(&self, position: &Position) -> StrataResult<f64> {
        let t = match position {
            Position::At(t) => *t,
            Position::Label { name, offset } => {
                let at = self
                    .labels
                    .get(name)
                    .ok_or_else(|| StrataError::timeline(format!("unknown label '{name}'")))?;
                at + offset
            }
            Position::End(offset) => self.duration() + offset,
            Position::PrevStart(offset) => self.last.map_or(0.0, |(s, _)| s) + offset,
            Position::PrevEnd(offset) => self.last.map_or(0.0, |(_, e)| e) + offset,
        };
        if !t.is_finite() {
            return Err(StrataError::timeline(format!("position {position:?} is not finite")));
        }
        Ok(t)
    }

    /// Begin playback and apply the state at play-head 0, so cues starting at or before zero
    /// land before the first frame. Starting twice is a no-op.
    #[tracing::instrument(skip_all, fields(cues = self.cues.len()))]
    pub fn start(&mut self, target: &mut dyn Animatable) {
        if self.state != TimelineState::Idle {
            tracing::debug!("timeline already started");
            return;
        }
        self.playhead = 0.0;
        self.state = TimelineState::Playing;
        self.render_forward(target);
        self.update_state();
    }

    /// Move the play-head by `delta * time_scale` and apply every due cue. Returns the new
    /// play-head. Does nothing before [`Timeline::start`].
    pub fn advance(&mut self, delta: f64, target: &mut dyn Animatable) -> f64 {
        if self.state == TimelineState::Idle {
            return self.playhead;
        }
        let step = delta * self.time_scale;
        if step >= 0.0 {
            self.playhead += step;
            self.render_forward(target);
        } else {
            self.playhead = (self.playhead + step).max(0.0);
            self.render_backward(target);
        }
        self.update_state();
        self.playhead
    }

    fn render_forward(&mut self, target: &mut dyn Animatable) {
        let p = self.playhead;
        for cue in &mut self.cues {
            if cue.start > p {
                // sorted by start, nothing later is due either
                break;
            }
            if cue.state == CueState::Settled {
                continue;
            }
            if cue.state == CueState::Pending {
                cue.capture(&*target);
                cue.state = CueState::Active;
            }
            let f = cue.progress(p);
            cue.write_progress(f, target);
            if f >= 1.0 {
                cue.state = CueState::Settled;
                tracing::debug!(cue = cue.target.as_str(), start = cue.start, "cue settled");
            }
        }
    }

    fn render_backward(&mut self, target: &mut dyn Animatable) {
        let p = self.playhead;
        for cue in self.cues.iter_mut().rev() {
            if cue.state == CueState::Pending {
                continue;
            }
            if p < cue.start {
                cue.restore(target);
                cue.state = CueState::Pending;
            } else if p < cue.end() {
                cue.write_progress(cue.progress(p), target);
                cue.state = CueState::Active;
            }
        }
    }

    fn update_state(&mut self) {
        self.state = if self.playhead >= self.duration() {
            TimelineState::Finished
        } else {
            TimelineState::Playing
        };
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timeline.rs"]
mod tests;
