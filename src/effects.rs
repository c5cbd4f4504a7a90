/// Digital glitch pass.
pub mod glitch;
/// The pass contract and the scene pass.
pub mod pass;
/// Ordered pass execution over a buffer pair.
pub mod pipeline;
