use depot_core::paths;
use std::path::{Path, PathBuf};

/// Resolve the depot root directory.
///
/// Priority:
/// 1. `--root` flag / `DEPOT_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.depot/`
/// 3. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_depot_dir(&cwd).unwrap_or(cwd)
}

fn find_depot_dir(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        if dir.join(paths::DEPOT_DIR).is_dir() {
            return Some(dir);
        }
        dir = dir.parent()?.to_path_buf();
    }
}
