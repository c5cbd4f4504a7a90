use std::future::Future;
use std::path::PathBuf;

use crate::foundation::error::{StrataError, StrataResult};
use crate::render::mesh::Mesh;

/// Where the logo mesh comes from.
///
/// Loading is the only suspension point of a session. Bootstrap drives the future to
/// completion once; a failure aborts bootstrap.
pub trait AssetSource {
    /// Produce the logo mesh.
    fn load(&self) -> impl Future<Output = StrataResult<Mesh>>;
}

/// Built-in ring standing in for a logo model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProceduralLogo {
    /// Ring radius in object units.
    pub radius: f32,
    /// Tube radius.
    pub tube: f32,
    /// Segments around the tube.
    pub radial_segments: u32,
    /// Segments around the ring.
    pub tubular_segments: u32,
}

impl Default for ProceduralLogo {
    fn default() -> Self {
        Self {
            radius: 0.12,
            tube: 0.035,
            radial_segments: 16,
            tubular_segments: 64,
        }
    }
}

impl AssetSource for ProceduralLogo {
    async fn load(&self) -> StrataResult<Mesh> {
        if !(self.radius > 0.0 && self.tube > 0.0) {
            return Err(StrataError::asset("procedural logo needs positive radii"));
        }
        Ok(Mesh::torus(
            self.radius,
            self.tube,
            self.radial_segments,
            self.tubular_segments,
        ))
    }
}

/// Mesh stored as JSON (`positions`, optional `normals`, `indices`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MeshFile {
    /// File to read.
    pub path: PathBuf,
}

impl MeshFile {
    /// Source reading `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl AssetSource for MeshFile {
    async fn load(&self) -> StrataResult<Mesh> {
        let path = &self.path;
        let bytes = std::fs::read(path)
            .map_err(|e| StrataError::asset(format!("read mesh '{}': {e}", path.display())))?;
        let mut mesh: Mesh = serde_json::from_slice(&bytes)
            .map_err(|e| StrataError::asset(format!("parse mesh '{}': {e}", path.display())))?;
        mesh.validate()?;
        Ok(mesh)
    }
}

impl AssetSource for Mesh {
    async fn load(&self) -> StrataResult<Mesh> {
        Ok(self.clone())
    }
}
