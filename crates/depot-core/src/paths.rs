use std::path::{Path, PathBuf};

pub const DEPOT_DIR: &str = ".depot";
pub const CONFIG_FILE: &str = ".depot/config.yaml";

pub fn depot_dir(root: &Path) -> PathBuf {
    root.join(DEPOT_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}
