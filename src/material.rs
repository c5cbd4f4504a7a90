/// Composite material: ordered layers plus base surface properties.
pub mod composite;
/// Shading layer contract, blend modes and surface context.
pub mod layer;
/// Concrete shading layer variants.
pub mod layers;
/// 3-D noise shared by CPU shading and the emitted GLSL.
pub mod noise;
/// Assembled shader program.
pub mod program;
/// Named shader inputs with dirty tracking.
pub mod uniform;
