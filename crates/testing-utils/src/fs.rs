use std::{fs, path::Path};
use walkdir::WalkDir;

/// Write `node_modules/<name>/package.json` the way an installer would.
pub fn write_installed_package(modules_dir: &Path, name: &str, version: &str) {
    let dir = modules_dir.join(name);
    fs::create_dir_all(&dir).expect("create package directory");
    let descriptor = serde_json::json!({ "name": name, "version": version });
    fs::write(dir.join("package.json"), descriptor.to_string()).expect("write package descriptor");
}

pub fn get_all_files(root: &Path) -> Vec<String> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.expect("access entry");
        if entry.file_type().is_dir() {
            continue;
        }

        // Join with `/` so that snapshots are the same on every platform.
        let simple_path = entry
            .path()
            .strip_prefix(root)
            .expect("strip prefix from path")
            .components()
            .map(|c| c.as_os_str().to_str().expect("invalid UTF-8"))
            .collect::<Vec<_>>()
            .join("/");

        if !simple_path.is_empty() {
            files.push(simple_path);
        }
    }
    files.sort();
    files
}
