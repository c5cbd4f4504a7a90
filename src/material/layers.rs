mod displace;
mod starter;

pub use displace::{DisplaceLayer, NoiseKind};
pub use starter::StarterLayer;
