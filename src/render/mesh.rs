use std::f32::consts::TAU;

use crate::foundation::core::Vec3;
use crate::foundation::error::{StrataError, StrataResult};

/// Indexed triangle mesh in object space.
///
/// Triangles wind counter-clockwise when seen from their front side.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Mesh {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Unit vertex normals. Computed from faces when left empty.
    #[serde(default)]
    pub normals: Vec<Vec3>,
    /// Vertex index triples.
    pub indices: Vec<[u32; 3]>,
}

impl Mesh {
    /// Torus in the XY plane facing +Z, centered on the origin.
    pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Self {
        let radial = radial_segments.max(3);
        let tubular = tubular_segments.max(3);
        let mut mesh = Self::default();

        for j in 0..=radial {
            let v = j as f32 / radial as f32 * TAU;
            for i in 0..=tubular {
                let u = i as f32 / tubular as f32 * TAU;
                let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
                let p = Vec3::new(
                    (radius + tube * v.cos()) * u.cos(),
                    (radius + tube * v.cos()) * u.sin(),
                    tube * v.sin(),
                );
                mesh.positions.push(p);
                mesh.normals.push((p - center).normalize_or_zero());
            }
        }

        let row = tubular + 1;
        for j in 1..=radial {
            for i in 1..=tubular {
                let a = row * j + i - 1;
                let b = row * (j - 1) + i - 1;
                let c = row * (j - 1) + i;
                let d = row * j + i;
                mesh.indices.push([a, b, d]);
                mesh.indices.push([b, c, d]);
            }
        }
        mesh
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Check index bounds and the normal count, filling normals in when absent.
    pub fn validate(&mut self) -> StrataResult<()> {
        let n = self.positions.len();
        if let Some(bad) = self
            .indices
            .iter()
            .flatten()
            .find(|&&i| i as usize >= n)
        {
            return Err(StrataError::asset(format!(
                "mesh index {bad} out of range for {n} vertices"
            )));
        }
        if self.normals.is_empty() {
            self.compute_normals();
        } else if self.normals.len() != n {
            return Err(StrataError::asset(format!(
                "mesh has {} normals for {n} vertices",
                self.normals.len()
            )));
        }
        Ok(())
    }

    /// Area-weighted smooth normals.
    pub fn compute_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];
        for &[a, b, c] in &self.indices {
            let (a, b, c) = (a as usize, b as usize, c as usize);
            let face = (self.positions[b] - self.positions[a])
                .cross(self.positions[c] - self.positions[a]);
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }
        self.normals = normals.into_iter().map(Vec3::normalize_or_zero).collect();
    }

    /// Axis-aligned bounds, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p))),
        )
    }
}
