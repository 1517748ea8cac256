use crate::cli_args::DependencyKindOptions;
use clap::Args;
use miette::Context;
use pkgsynth_package_manifest::{DependencyDeclaration, DependencyKind};
use pkgsynth_project::Project;

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Dependencies to declare, as `name` or `name@range`.
    #[clap(required = true)]
    pub packages: Vec<String>,
    /// --dev, --peer, --bundled
    #[clap(flatten)]
    pub dependency_options: DependencyKindOptions,
}

impl AddArgs {
    /// Execute the subcommand.
    pub fn run(self, mut project: Project) -> miette::Result<()> {
        let kind = self.dependency_options.kind().unwrap_or(DependencyKind::Runtime);
        for package in &self.packages {
            let declaration = DependencyDeclaration::parse(package, kind)
                .wrap_err_with(|| format!("parsing {package:?}"))?;
            project.add_dependency(&declaration).wrap_err("adding a dependency")?;
        }
        project.save().wrap_err("saving pkgsynth.json")
    }
}
