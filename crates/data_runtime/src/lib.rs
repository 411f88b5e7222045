//! data_runtime: tuning configs and loaders for the slope simulation.
//!
//! Each config lives in `data/config/<name>.toml`; every loader falls back to
//! built-in defaults when the file is missing and applies env overrides.

pub mod loader;
pub mod configs {
    pub mod skier;
    pub mod snow_particles;
    pub mod surfaces;
    pub mod telemetry;
}
