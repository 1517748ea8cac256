use clap::Args;
use miette::Context;
use pkgsynth_project::Project;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Name of the package, defaults to the name of the directory.
    #[clap(long)]
    pub name: Option<String>,
}

impl InitArgs {
    /// Execute the subcommand.
    pub fn run(self, dir: &Path, project_path: PathBuf) -> miette::Result<()> {
        let name = self.name.unwrap_or_else(|| default_name(dir));
        Project::init(project_path, name).wrap_err("initializing pkgsynth.json")?;
        Ok(())
    }
}

/// Name of the directory, or `"package"` when it has none.
fn default_name(dir: &Path) -> String {
    dir.canonicalize()
        .ok()
        .and_then(|dir| dir.file_name().map(|name| name.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "package".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn name_from_directory() {
        let root = tempdir().unwrap();
        let dir = root.path().join("my-app");
        std::fs::create_dir(&dir).unwrap();
        assert_eq!(default_name(&dir), "my-app");
        assert_eq!(default_name(&dir.join("missing")), "package");
    }
}
