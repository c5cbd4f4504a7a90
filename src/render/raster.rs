use glam::{Mat3, Vec4};

use crate::foundation::core::{Mat4, Rgb, Vec3};
use crate::foundation::error::StrataResult;
use crate::material::composite::CompositeMaterial;
use crate::material::layer::SurfaceContext;
use crate::render::frame::FrameRGBA;
use crate::render::mesh::Mesh;

/// One mesh draw.
#[derive(Debug)]
pub struct DrawCall<'a> {
    /// Geometry in object space.
    pub mesh: &'a Mesh,
    /// Object to world transform.
    pub model: Mat4,
    /// World to clip transform.
    pub view_projection: Mat4,
    /// Camera position in world space.
    pub eye: Vec3,
    /// Surface material.
    pub material: &'a CompositeMaterial,
    /// Ambient light.
    pub ambient: Rgb,
}

/// Counters from one draw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RasterStats {
    /// Triangles that produced at least one candidate pixel.
    pub triangles: usize,
    /// Fragments shaded after the depth test.
    pub fragments: usize,
}

struct Vertex {
    clip: Vec4,
    rest: Vec3,
    displaced: Vec3,
    world: Vec3,
    normal: Vec3,
}

/// Depth-tested triangle rasterizer over a straight-alpha frame.
///
/// Colors accumulate premultiplied in `f32` and are written back once per draw, so blending
/// never round-trips through 8 bits.
#[derive(Debug, Default)]
pub struct Rasterizer {
    depth: Vec<f32>,
    color: Vec<[f32; 4]>,
}

impl Rasterizer {
    /// Empty rasterizer; buffers grow to the first target size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw `call` over the current contents of `target`.
    pub fn draw(&mut self, target: &mut FrameRGBA, call: &DrawCall<'_>) -> StrataResult<RasterStats> {
        target.validate()?;
        let (w, h) = (target.width as usize, target.height as usize);
        self.depth.clear();
        self.depth.resize(w * h, f32::INFINITY);
        self.color.clear();
        self.color.extend(target.data.chunks_exact(4).map(|px| {
            let a = f32::from(px[3]) / 255.0;
            [
                f32::from(px[0]) / 255.0 * a,
                f32::from(px[1]) / 255.0 * a,
                f32::from(px[2]) / 255.0 * a,
                a,
            ]
        }));

        let normal_matrix = Mat3::from_mat4(call.model).inverse().transpose();
        let mvp = call.view_projection * call.model;
        let material = call.material;
        let vertices: Vec<Vertex> = call
            .mesh
            .positions
            .iter()
            .zip(&call.mesh.normals)
            .map(|(&rest, &n)| {
                let displaced = material.transform_vertex(rest, n);
                Vertex {
                    clip: mvp * displaced.extend(1.0),
                    rest,
                    displaced,
                    world: call.model.transform_point3(displaced),
                    normal: (normal_matrix * n).normalize_or_zero(),
                }
            })
            .collect();

        let mut stats = RasterStats::default();
        for &[a, b, c] in &call.mesh.indices {
            let (Some(va), Some(vb), Some(vc)) = (
                vertices.get(a as usize),
                vertices.get(b as usize),
                vertices.get(c as usize),
            ) else {
                continue;
            };
            if self.triangle(target, call, [va, vb, vc], &mut stats) {
                stats.triangles += 1;
            }
        }

        for (px, c) in target.data.chunks_exact_mut(4).zip(&self.color) {
            let a = c[3].clamp(0.0, 1.0);
            let un = |v: f32| {
                if a > 0.0 {
                    ((v / a).clamp(0.0, 1.0) * 255.0).round() as u8
                } else {
                    0
                }
            };
            px.copy_from_slice(&[un(c[0]), un(c[1]), un(c[2]), (a * 255.0).round() as u8]);
        }
        target.premultiplied = false;
        Ok(stats)
    }

    fn triangle(
        &mut self,
        target: &FrameRGBA,
        call: &DrawCall<'_>,
        v: [&Vertex; 3],
        stats: &mut RasterStats,
    ) -> bool {
        // no near-plane clipping: triangles touching the camera plane are dropped
        if v.iter().any(|v| v.clip.w <= 1e-5) {
            return false;
        }
        let ndc = v.map(|v| v.clip.truncate() / v.clip.w);
        let area = (ndc[1].x - ndc[0].x) * (ndc[2].y - ndc[0].y)
            - (ndc[2].x - ndc[0].x) * (ndc[1].y - ndc[0].y);
        if area.abs() < 1e-12 {
            return false;
        }
        let front_facing = area > 0.0;
        if !call.material.side.draws(front_facing) {
            return false;
        }

        let (w, h) = (target.width as f32, target.height as f32);
        let screen = ndc.map(|p| ((p.x + 1.0) * 0.5 * w, (1.0 - p.y) * 0.5 * h));
        let min_x = screen.iter().map(|s| s.0).fold(f32::INFINITY, f32::min).floor().max(0.0);
        let max_x = screen.iter().map(|s| s.0).fold(f32::NEG_INFINITY, f32::max).ceil().min(w);
        let min_y = screen.iter().map(|s| s.1).fold(f32::INFINITY, f32::min).floor().max(0.0);
        let max_y = screen.iter().map(|s| s.1).fold(f32::NEG_INFINITY, f32::max).ceil().min(h);
        if min_x >= max_x || min_y >= max_y {
            return false;
        }

        let edge = |a: (f32, f32), b: (f32, f32), p: (f32, f32)| {
            (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0)
        };
        let screen_area = edge(screen[0], screen[1], screen[2]);
        let inv_w = v.map(|v| 1.0 / v.clip.w);

        for py in min_y as usize..max_y as usize {
            for px in min_x as usize..max_x as usize {
                let p = (px as f32 + 0.5, py as f32 + 0.5);
                let b0 = edge(screen[1], screen[2], p) / screen_area;
                let b1 = edge(screen[2], screen[0], p) / screen_area;
                let b2 = edge(screen[0], screen[1], p) / screen_area;
                if b0 < 0.0 || b1 < 0.0 || b2 < 0.0 {
                    continue;
                }
                let z = b0 * ndc[0].z + b1 * ndc[1].z + b2 * ndc[2].z;
                let idx = py * target.width as usize + px;
                if !(-1.0..=1.0).contains(&z) || z >= self.depth[idx] {
                    continue;
                }

                // perspective-correct weights
                let (p0, p1, p2) = (b0 * inv_w[0], b1 * inv_w[1], b2 * inv_w[2]);
                let norm = p0 + p1 + p2;
                let wts = [p0 / norm, p1 / norm, p2 / norm];
                let world = interp(&v, wts, |v| v.world);
                let mut normal = interp(&v, wts, |v| v.normal).normalize_or_zero();
                if !front_facing {
                    normal = -normal;
                }
                let ctx = SurfaceContext {
                    position: interp(&v, wts, |v| v.displaced),
                    rest_position: interp(&v, wts, |v| v.rest),
                    normal,
                    view_dir: (call.eye - world).normalize_or_zero(),
                };
                let (rgb, alpha) = call.material.shade(&ctx, call.ambient);
                self.depth[idx] = z;
                stats.fragments += 1;

                let dst = &mut self.color[idx];
                let inv = 1.0 - alpha;
                dst[0] = rgb.r * alpha + dst[0] * inv;
                dst[1] = rgb.g * alpha + dst[1] * inv;
                dst[2] = rgb.b * alpha + dst[2] * inv;
                dst[3] = alpha + dst[3] * inv;
            }
        }
        true
    }
}

fn interp(v: &[&Vertex; 3], w: [f32; 3], f: impl Fn(&Vertex) -> Vec3) -> Vec3 {
    f(v[0]) * w[0] + f(v[1]) * w[1] + f(v[2]) * w[2]
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
