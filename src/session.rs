/// Logo mesh sources.
pub mod assets;
/// Session configuration.
pub mod config;
/// Camera and orbit controls.
pub mod controls;
/// Bootstrap and the per-frame driver.
pub mod driver;
