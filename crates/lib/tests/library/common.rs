use std::path::Path;

use tempfile::TempDir;
use unibuild_lib::eval::{LoadedConfig, evaluate_config};

/// Write `files` into a fresh project directory.
pub fn write_project(files: &[(&str, &str)]) -> TempDir {
  let temp = TempDir::new().unwrap();
  for (relative, content) in files {
    let path = temp.path().join(relative);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
  }
  temp
}

/// Evaluate the project's `unibuild.lua`.
pub fn load(project: &TempDir) -> LoadedConfig {
  evaluate_config(&project.path().join("unibuild.lua")).unwrap()
}

pub fn read(dir: &Path, relative: &str) -> String {
  std::fs::read_to_string(dir.join(relative)).unwrap()
}
