use std::f64::consts::PI;

use crate::animation::value::PropValue;
use crate::effects::pass::EffectPass;
use crate::foundation::core::{Point, Vec2};
use crate::foundation::error::{StrataError, StrataResult};
use crate::foundation::math::{Rng64, shader_rand};
use crate::material::uniform::{UniformDecl, UniformTable};
use crate::render::frame::FrameRGBA;
use crate::stage::Scene;

/// Largest heightmap side accepted by [`GlitchPass::new`].
pub const MAX_DT_SIZE: u32 = 4096;

const DECLS: &[UniformDecl] = &[
    UniformDecl::with_default("u_amount", PropValue::Scalar(0.08)),
    UniformDecl::with_default("u_angle", PropValue::Scalar(0.02)),
    UniformDecl::with_default("u_seed", PropValue::Scalar(0.02)),
    UniformDecl::with_default("u_seed_x", PropValue::Scalar(0.02)),
    UniformDecl::with_default("u_seed_y", PropValue::Scalar(0.02)),
    UniformDecl::with_default("u_distortion_x", PropValue::Scalar(0.5)),
    UniformDecl::with_default("u_distortion_y", PropValue::Scalar(0.6)),
    UniformDecl::with_default("u_col_s", PropValue::Scalar(0.05)),
    UniformDecl::with_default("u_byp", PropValue::Scalar(0.0)),
    UniformDecl::with_default("u_go_wild", PropValue::Bool(false)),
];

/// What the last rendered frame did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlitchState {
    /// Full glitch with fresh parameters; restarts the trigger interval.
    Wild,
    /// Mild glitch during the first fifth of the interval.
    Weak,
    /// Input copied through untouched.
    Bypass,
}

/// Digital glitch: RGB split along a random angle, row and column tearing, heightmap jitter
/// and additive snow.
///
/// A frame counter runs against a trigger interval drawn from `[120, 240]`. Hitting the
/// interval (or `go_wild`) fires a wild glitch and draws a new interval, the first fifth of
/// every interval glitches weakly, and the rest bypasses.
#[derive(Debug)]
pub struct GlitchPass {
    enabled: bool,
    uniforms: UniformTable,
    rng: Rng64,
    dt_size: u32,
    heightmap: Vec<f32>,
    cur_f: u32,
    rand_x: u32,
    last: Option<GlitchState>,
}

impl GlitchPass {
    /// Name used in property paths.
    pub const NAME: &'static str = "glitch";

    /// Glitch with a `dt_size`² displacement heightmap and a deterministic seed.
    pub fn new(dt_size: u32, seed: u64) -> StrataResult<Self> {
        if !(1..=MAX_DT_SIZE).contains(&dt_size) {
            return Err(StrataError::validation(format!(
                "glitch dt_size must be in 1..={MAX_DT_SIZE}, got {dt_size}"
            )));
        }
        let mut rng = Rng64::new(seed);
        let heightmap = (0..dt_size * dt_size)
            .map(|_| rng.next_f64_01() as f32)
            .collect();
        let rand_x = rng.range_u32(120, 240);
        Ok(Self {
            enabled: true,
            uniforms: UniformTable::from_decls(Self::NAME, DECLS, &Default::default())?,
            rng,
            dt_size,
            heightmap,
            cur_f: 0,
            rand_x,
            last: None,
        })
    }

    /// State chosen by the most recent render.
    pub fn last_state(&self) -> Option<GlitchState> {
        self.last
    }

    /// Frames since the last wild glitch.
    pub fn frame_counter(&self) -> u32 {
        self.cur_f
    }

    /// Current trigger interval.
    pub fn trigger_interval(&self) -> u32 {
        self.rand_x
    }

    fn step(&mut self) -> GlitchState {
        let rng = &mut self.rng;
        let u = &mut self.uniforms;
        u.set("seed", rng.next_f64_01().into());
        u.set("byp", 0.0.into());
        let wild = u.get("go_wild").is_some_and(PropValue::as_bool);

        let phase = self.cur_f % self.rand_x;
        let state = if phase == 0 || wild {
            u.set("amount", (rng.next_f64_01() / 30.0).into());
            u.set("angle", rng.range_f64(-PI, PI).into());
            u.set("seed_x", rng.range_f64(-1.0, 1.0).into());
            u.set("seed_y", rng.range_f64(-1.0, 1.0).into());
            u.set("distortion_x", rng.range_f64(0.0, 1.0).into());
            u.set("distortion_y", rng.range_f64(0.0, 1.0).into());
            self.cur_f = 0;
            self.rand_x = rng.range_u32(120, 240);
            GlitchState::Wild
        } else if f64::from(phase) < f64::from(self.rand_x) / 5.0 {
            u.set("amount", (rng.next_f64_01() / 90.0).into());
            u.set("angle", rng.range_f64(-PI, PI).into());
            u.set("distortion_x", rng.range_f64(0.0, 1.0).into());
            u.set("distortion_y", rng.range_f64(0.0, 1.0).into());
            u.set("seed_x", rng.range_f64(-0.3, 0.3).into());
            u.set("seed_y", rng.range_f64(-0.3, 0.3).into());
            GlitchState::Weak
        } else {
            u.set("byp", 1.0.into());
            GlitchState::Bypass
        };
        self.cur_f += 1;
        state
    }

    fn displacement(&self, p: Point) -> f32 {
        let n = self.dt_size as f64;
        let x = (p.x * n).floor().clamp(0.0, n - 1.0) as usize;
        let y = ((1.0 - p.y) * n).floor().clamp(0.0, n - 1.0) as usize;
        self.heightmap[y * self.dt_size as usize + x]
    }

    fn apply(&self, read: &FrameRGBA, write: &mut FrameRGBA) {
        let u = &self.uniforms;
        let s = |name: &str| f64::from(u.scalar(name));
        let (amount, angle, seed) = (s("amount"), s("angle"), s("seed"));
        let (seed_x, seed_y) = (s("seed_x"), s("seed_y"));
        let (dist_x, dist_y) = (s("distortion_x"), s("distortion_y"));
        let col_s = s("col_s");
        let offset = Vec2::from_angle(angle) * amount;
        let snow_scale = (200.0 * amount * 0.2) as f32;
        let (w, h) = (f64::from(write.width), f64::from(write.height));

        for y in 0..write.height {
            for x in 0..write.width {
                let mut p = Point::new((f64::from(x) + 0.5) / w, 1.0 - (f64::from(y) + 0.5) / h);
                let xs = ((f64::from(x) + 0.5) / 0.5).floor();
                let ys = ((h - f64::from(y) - 0.5) / 0.5).floor();
                let height = f64::from(self.displacement(Point::new(
                    p.x * seed * seed,
                    p.y * seed * seed,
                )));

                if p.y < dist_x + col_s && p.y > dist_x - col_s * seed {
                    p.y = if seed_x > 0.0 { 1.0 - (p.y + dist_y) } else { dist_y };
                }
                if p.x < dist_y + col_s && p.x > dist_y - col_s * seed {
                    p.x = if seed_y > 0.0 { dist_x } else { 1.0 - (p.x + dist_x) };
                }
                // the heightmap is single-channel, so only x is displaced
                p.x += height * seed_x * (seed / 5.0);

                let sample = |q: Point| read.sample_uv(q.x as f32, q.y as f32);
                let cr = sample(p + offset);
                let cga = sample(p);
                let cb = sample(p - offset);

                let snow = shader_rand((xs * seed) as f32, (ys * seed * 50.0) as f32) * snow_scale;
                let add = |c: u8| {
                    ((f32::from(c) / 255.0 + snow).clamp(0.0, 1.0) * 255.0).round() as u8
                };
                write.put(x, y, [add(cr[0]), add(cga[1]), add(cb[2]), add(cga[3])]);
            }
        }
    }
}

impl EffectPass for GlitchPass {
    fn name(&self) -> &str {
        Self::NAME
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
        let state = self.step();
        self.last = Some(state);
        if state == GlitchState::Bypass {
            write.data.copy_from_slice(&read.data);
        } else {
            self.apply(read, write);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/glitch.rs"]
mod tests;
