/// RGBA8 frame buffers.
pub mod frame;
/// Triangle meshes.
pub mod mesh;
/// Perspective triangle rasterizer.
pub mod raster;
