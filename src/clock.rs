use std::time::Instant;

/// Source of monotonically non-decreasing seconds since an arbitrary origin.
pub trait TimeSource {
    /// Seconds elapsed since the source was created.
    fn now_secs(&mut self) -> f64;
}

/// Wall-clock source backed by [`Instant`].
#[derive(Debug)]
pub struct MonotonicTime {
    origin: Instant,
}

impl MonotonicTime {
    /// Start counting from now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicTime {
    fn now_secs(&mut self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Deterministic source that advances by a fixed step on every read.
///
/// The first read returns `step`, matching a host that calls the frame callback one refresh
/// after the session starts.
#[derive(Clone, Copy, Debug)]
pub struct FixedStep {
    step: f64,
    now: f64,
}

impl FixedStep {
    /// Advance `step` seconds per read.
    pub fn new(step: f64) -> Self {
        Self {
            step: step.max(0.0),
            now: 0.0,
        }
    }

    /// Step for a given frame rate.
    pub fn from_fps(fps: f64) -> Self {
        Self::new(if fps > 0.0 { 1.0 / fps } else { 0.0 })
    }
}

impl TimeSource for FixedStep {
    fn now_secs(&mut self) -> f64 {
        self.now += self.step;
        self.now
    }
}

/// One frame's time sample.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClockSample {
    /// Seconds since the clock started.
    pub elapsed: f64,
    /// Seconds since the previous sample.
    pub delta: f64,
}

/// Per-frame clock producing elapsed and delta seconds.
#[derive(Debug)]
pub struct Clock<S = MonotonicTime> {
    source: S,
    previous: f64,
}

impl<S: TimeSource> Clock<S> {
    /// Wrap a time source. The first sample's delta is measured from the source origin.
    pub fn new(source: S) -> Self {
        Self {
            source,
            previous: 0.0,
        }
    }

    /// Read the source once. Deltas never go negative, even if the source misbehaves.
    pub fn tick(&mut self) -> ClockSample {
        let elapsed = self.source.now_secs().max(self.previous);
        let delta = elapsed - self.previous;
        self.previous = elapsed;
        ClockSample { elapsed, delta }
    }

    /// Elapsed seconds at the last sample.
    pub fn elapsed(&self) -> f64 {
        self.previous
    }
}
