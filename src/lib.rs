// Root crate: wires the shared snow surfaces and particle pool to the skier
// controllers, and re-exports the workspace crates used by tools.
pub use skier_core as skier;
pub use snow_fx as fx;
pub use surface_field as surface;

pub mod session;
pub mod telemetry;

pub use session::{Skier, SlopeSession};
