//! Path resolution for files under `data/`.

use std::path::{Path, PathBuf};

/// Root of the data directory. Prefers the top-level workspace `data/` so tests
/// and tools can run from any crate.
pub fn data_root() -> PathBuf {
    let here = Path::new(env!("CARGO_MANIFEST_DIR"));
    let ws = here.join("../../data");
    if ws.is_dir() { ws } else { here.join("data") }
}
