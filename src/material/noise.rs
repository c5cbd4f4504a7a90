//! 3-D noise functions.
//!
//! The CPU implementations and the GLSL helpers emitted into assembled programs share the same
//! sine hash and the same formulas, so both backends draw the same pattern up to float
//! precision.

use crate::foundation::core::Vec3;
use crate::foundation::math::fract;

fn hash3(c: Vec3) -> Vec3 {
    let p = Vec3::new(
        c.dot(Vec3::new(127.1, 311.7, 74.7)),
        c.dot(Vec3::new(269.5, 183.3, 246.1)),
        c.dot(Vec3::new(113.5, 271.9, 124.6)),
    );
    Vec3::new(
        fract(p.x.sin() * 43_758.547),
        fract(p.y.sin() * 43_758.547),
        fract(p.z.sin() * 43_758.547),
    ) * 2.0
        - Vec3::ONE
}

fn fade(t: Vec3) -> Vec3 {
    t * t * t * (t * (t * 6.0 - Vec3::splat(15.0)) + Vec3::splat(10.0))
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Gradient noise, centred on zero and vanishing on integer lattice points.
pub fn perlin(p: Vec3) -> f32 {
    let i = p.floor();
    let f = p - i;
    let u = fade(f);

    let corner = |o: Vec3| hash3(i + o).dot(f - o);
    let x00 = lerp(corner(Vec3::new(0.0, 0.0, 0.0)), corner(Vec3::new(1.0, 0.0, 0.0)), u.x);
    let x10 = lerp(corner(Vec3::new(0.0, 1.0, 0.0)), corner(Vec3::new(1.0, 1.0, 0.0)), u.x);
    let x01 = lerp(corner(Vec3::new(0.0, 0.0, 1.0)), corner(Vec3::new(1.0, 0.0, 1.0)), u.x);
    let x11 = lerp(corner(Vec3::new(0.0, 1.0, 1.0)), corner(Vec3::new(1.0, 1.0, 1.0)), u.x);
    lerp(lerp(x00, x10, u.y), lerp(x01, x11, u.y), u.z)
}

/// Simplex noise, centred on zero.
pub fn simplex(p: Vec3) -> f32 {
    const F3: f32 = 1.0 / 3.0;
    const G3: f32 = 1.0 / 6.0;

    let s = (p.x + p.y + p.z) * F3;
    let i = (p + Vec3::splat(s)).floor();
    let t = (i.x + i.y + i.z) * G3;
    let x0 = p - (i - Vec3::splat(t));

    // Rank the offsets to pick the simplex corners.
    let (i1, i2) = if x0.x >= x0.y {
        if x0.y >= x0.z {
            (Vec3::X, Vec3::new(1.0, 1.0, 0.0))
        } else if x0.x >= x0.z {
            (Vec3::X, Vec3::new(1.0, 0.0, 1.0))
        } else {
            (Vec3::Z, Vec3::new(1.0, 0.0, 1.0))
        }
    } else if x0.y < x0.z {
        (Vec3::Z, Vec3::new(0.0, 1.0, 1.0))
    } else if x0.x < x0.z {
        (Vec3::Y, Vec3::new(0.0, 1.0, 1.0))
    } else {
        (Vec3::Y, Vec3::new(1.0, 1.0, 0.0))
    };

    let x1 = x0 - i1 + Vec3::splat(G3);
    let x2 = x0 - i2 + Vec3::splat(2.0 * G3);
    let x3 = x0 - Vec3::ONE + Vec3::splat(3.0 * G3);

    let contrib = |x: Vec3, o: Vec3| {
        let r = (0.6 - x.length_squared()).max(0.0);
        let r2 = r * r;
        r2 * r2 * hash3(i + o).dot(x)
    };
    32.0 * (contrib(x0, Vec3::ZERO) + contrib(x1, i1) + contrib(x2, i2) + contrib(x3, Vec3::ONE))
}

/// Distance to the nearest feature point (worley F1), in `[0, ~1]`.
pub fn cell(p: Vec3) -> f32 {
    let i = p.floor();
    let f = p - i;
    let mut best = 8.0f32;
    for z in -1..=1 {
        for y in -1..=1 {
            for x in -1..=1 {
                let n = Vec3::new(x as f32, y as f32, z as f32);
                let feature = n + (hash3(i + n) * 0.5 + Vec3::splat(0.5));
                best = best.min((feature - f).length());
            }
        }
    }
    best
}

/// Curl of a perlin vector potential.
pub fn curl(p: Vec3) -> Vec3 {
    const E: f32 = 0.1;
    let field = |q: Vec3| {
        Vec3::new(
            perlin(q),
            perlin(q + Vec3::new(31.3, 17.1, 7.7)),
            perlin(q + Vec3::new(-11.9, 53.2, 23.4)),
        )
    };
    let dx = (field(p + Vec3::X * E) - field(p - Vec3::X * E)) / (2.0 * E);
    let dy = (field(p + Vec3::Y * E) - field(p - Vec3::Y * E)) / (2.0 * E);
    let dz = (field(p + Vec3::Z * E) - field(p - Vec3::Z * E)) / (2.0 * E);
    Vec3::new(dy.z - dz.y, dz.x - dx.z, dx.y - dy.x)
}

pub(crate) const GLSL_HASH: &str = "\
vec3 strata_hash3(vec3 c) {
    vec3 p = vec3(dot(c, vec3(127.1, 311.7, 74.7)),
                  dot(c, vec3(269.5, 183.3, 246.1)),
                  dot(c, vec3(113.5, 271.9, 124.6)));
    return fract(sin(p) * 43758.5453) * 2.0 - 1.0;
}
";

pub(crate) const GLSL_PERLIN: &str = "\
float strata_perlin(vec3 p) {
    vec3 i = floor(p);
    vec3 f = p - i;
    vec3 u = f * f * f * (f * (f * 6.0 - 15.0) + 10.0);
    float x00 = mix(dot(strata_hash3(i), f), dot(strata_hash3(i + vec3(1, 0, 0)), f - vec3(1, 0, 0)), u.x);
    float x10 = mix(dot(strata_hash3(i + vec3(0, 1, 0)), f - vec3(0, 1, 0)), dot(strata_hash3(i + vec3(1, 1, 0)), f - vec3(1, 1, 0)), u.x);
    float x01 = mix(dot(strata_hash3(i + vec3(0, 0, 1)), f - vec3(0, 0, 1)), dot(strata_hash3(i + vec3(1, 0, 1)), f - vec3(1, 0, 1)), u.x);
    float x11 = mix(dot(strata_hash3(i + vec3(0, 1, 1)), f - vec3(0, 1, 1)), dot(strata_hash3(i + vec3(1, 1, 1)), f - vec3(1, 1, 1)), u.x);
    return mix(mix(x00, x10, u.y), mix(x01, x11, u.y), u.z);
}
";

pub(crate) const GLSL_SIMPLEX: &str = "\
float strata_simplex(vec3 p) {
    const float F3 = 1.0 / 3.0;
    const float G3 = 1.0 / 6.0;
    vec3 i = floor(p + dot(p, vec3(F3)));
    vec3 x0 = p - (i - dot(i, vec3(G3)));
    vec3 g = step(x0.yzx, x0.xyz);
    vec3 l = 1.0 - g;
    vec3 i1 = min(g.xyz, l.zxy);
    vec3 i2 = max(g.xyz, l.zxy);
    vec3 x1 = x0 - i1 + G3;
    vec3 x2 = x0 - i2 + 2.0 * G3;
    vec3 x3 = x0 - 1.0 + 3.0 * G3;
    vec4 r = max(0.6 - vec4(dot(x0, x0), dot(x1, x1), dot(x2, x2), dot(x3, x3)), 0.0);
    r = r * r;
    r = r * r;
    vec4 d = vec4(dot(strata_hash3(i), x0), dot(strata_hash3(i + i1), x1),
                  dot(strata_hash3(i + i2), x2), dot(strata_hash3(i + 1.0), x3));
    return 32.0 * dot(r, d);
}
";

pub(crate) const GLSL_CELL: &str = "\
float strata_cell(vec3 p) {
    vec3 i = floor(p);
    vec3 f = p - i;
    float best = 8.0;
    for (int z = -1; z <= 1; z++)
    for (int y = -1; y <= 1; y++)
    for (int x = -1; x <= 1; x++) {
        vec3 n = vec3(float(x), float(y), float(z));
        vec3 feature = n + strata_hash3(i + n) * 0.5 + 0.5;
        best = min(best, length(feature - f));
    }
    return best;
}
";

pub(crate) const GLSL_CURL: &str = "\
vec3 strata_curl_field(vec3 q) {
    return vec3(strata_perlin(q), strata_perlin(q + vec3(31.3, 17.1, 7.7)),
                strata_perlin(q + vec3(-11.9, 53.2, 23.4)));
}
vec3 strata_curl(vec3 p) {
    const float E = 0.1;
    vec3 dx = (strata_curl_field(p + vec3(E, 0, 0)) - strata_curl_field(p - vec3(E, 0, 0))) / (2.0 * E);
    vec3 dy = (strata_curl_field(p + vec3(0, E, 0)) - strata_curl_field(p - vec3(0, E, 0))) / (2.0 * E);
    vec3 dz = (strata_curl_field(p + vec3(0, 0, E)) - strata_curl_field(p - vec3(0, 0, E))) / (2.0 * E);
    return vec3(dy.z - dz.y, dz.x - dx.z, dx.y - dy.x);
}
";
