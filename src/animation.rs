/// GSAP-style ease curves.
pub mod ease;
/// Serializable choreography scripts.
pub mod script;
/// Cue scheduling against a play-head.
pub mod timeline;
/// Values cues write and uniforms hold.
pub mod value;
