use crate::cli_args::DependencyKindOptions;
use clap::Args;
use miette::Context;
use pkgsynth_project::Project;

#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Names of the dependencies to remove.
    #[clap(required = true)]
    pub names: Vec<String>,
    /// Only remove from one group: --dev, --peer, --bundled
    #[clap(flatten)]
    pub dependency_options: DependencyKindOptions,
}

impl RemoveArgs {
    /// Execute the subcommand.
    pub fn run(self, mut project: Project) -> miette::Result<()> {
        let kind = self.dependency_options.kind();
        for name in &self.names {
            let removed = project.remove_dependency(name, kind).wrap_err("removing a dependency")?;
            if removed == 0 {
                eprintln!("{name} is not declared");
            }
        }
        project.save().wrap_err("saving pkgsynth.json")
    }
}
