use clap::Args;
use miette::Context;
use pkgsynth_config::Config;
use pkgsynth_executor::ShellExecutor;
use pkgsynth_installed_packages::InstalledPackages;
use pkgsynth_project::Project;
use pkgsynth_reconciler::{Reconcile, ReconcileReport};
use std::path::Path;

#[derive(Debug, Args)]
pub struct SynthArgs {}

impl SynthArgs {
    /// Execute the subcommand.
    pub fn run(self, dir: &Path, config: &Config, project: &Project) -> miette::Result<()> {
        let declarations = project.declarations().wrap_err("reading declared dependencies")?;
        let fields = project.manifest_fields(config.generated_marker);
        let manifest_path = config.manifest_path(dir);
        let report = Reconcile {
            installer: ShellExecutor,
            install_command: config.install_command(),
            project_dir: dir,
            manifest_path: &manifest_path,
            lockfile_path: &config.lockfile_path(dir),
            installed: &InstalledPackages::new(config.modules_dir(dir)),
            fields: &fields,
            declarations: &declarations,
        }
        .run()
        .wrap_err("synthesizing the manifest")?;
        println!("{}", summary(&manifest_path, &report));
        Ok(())
    }
}

fn summary(manifest_path: &Path, report: &ReconcileReport) -> String {
    let ReconcileReport { installs, manifest_written, pinned, pending, .. } = report;
    let manifest = manifest_path.display();
    let state = if *manifest_written { "written" } else { "up to date" };
    let mut summary = format!("{manifest} {state}, {installs} install(s)");
    if !pinned.is_empty() {
        let pinned: Vec<_> = pinned.iter().map(|pin| format!("{}@{}", pin.name, pin.range)).collect();
        summary.push_str(", pinned ");
        summary.push_str(&pinned.join(" "));
    }
    if !pending.is_empty() {
        summary.push_str(", unresolved ");
        summary.push_str(&pending.join(" "));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkgsynth_package_manifest::DependencyKind;
    use pkgsynth_reconciler::PinnedDependency;
    use pretty_assertions::assert_eq;

    #[test]
    fn summary_lists_pinned_dependencies() {
        let report = ReconcileReport {
            installs: 2,
            manifest_written: true,
            pinned: vec![PinnedDependency {
                name: "ms".to_string(),
                kind: DependencyKind::Runtime,
                version: "2.1.3".to_string(),
                range: "^2.1.3".to_string(),
            }],
            pending: vec!["react".to_string()],
            lockfile_present: true,
        };
        assert_eq!(
            summary(Path::new("package.json"), &report),
            "package.json written, 2 install(s), pinned ms@^2.1.3, unresolved react",
        );
        assert_eq!(
            summary(Path::new("package.json"), &ReconcileReport::default()),
            "package.json up to date, 0 install(s)",
        );
    }
}
