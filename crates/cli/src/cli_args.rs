pub mod add;
pub mod init;
pub mod remove;
pub mod synth;

use add::AddArgs;
use clap::{Args, Parser, Subcommand};
use init::InitArgs;
use miette::Context;
use pkgsynth_config::Config;
use pkgsynth_package_manifest::DependencyKind;
use pkgsynth_project::{project_file_path, Project};
use remove::RemoveArgs;
use std::path::PathBuf;
use synth::SynthArgs;

/// Declarative package.json synthesis for node.js projects.
#[derive(Debug, Parser)]
#[clap(name = "pkgsynth")]
#[clap(bin_name = "pkgsynth")]
#[clap(version)]
#[clap(about = "Declarative package.json synthesis for node.js projects")]
pub struct CliArgs {
    #[clap(subcommand)]
    pub command: CliCommand,

    /// Set working directory.
    #[clap(short = 'C', long, default_value = ".")]
    pub dir: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Create a pkgsynth.json
    Init(InitArgs),
    /// Declare dependencies
    Add(AddArgs),
    /// Remove declared dependencies
    Remove(RemoveArgs),
    /// Write package.json and reconcile it with the installed dependencies
    Synth(SynthArgs),
}

/// `--dev`, `--peer` and `--bundled`.
#[derive(Debug, Args)]
#[group(multiple = false)]
pub struct DependencyKindOptions {
    /// Target devDependencies.
    #[clap(short = 'D', long)]
    pub dev: bool,
    /// Target peerDependencies.
    #[clap(long)]
    pub peer: bool,
    /// Target bundledDependencies.
    #[clap(long)]
    pub bundled: bool,
}

impl DependencyKindOptions {
    /// Kind selected by the flags, if any.
    pub fn kind(&self) -> Option<DependencyKind> {
        match *self {
            DependencyKindOptions { dev: true, .. } => Some(DependencyKind::Dev),
            DependencyKindOptions { peer: true, .. } => Some(DependencyKind::Peer),
            DependencyKindOptions { bundled: true, .. } => Some(DependencyKind::Bundled),
            _ => None,
        }
    }
}

impl CliArgs {
    /// Execute the command
    pub fn run(self) -> miette::Result<()> {
        let CliArgs { command, dir } = self;
        let project_path = || project_file_path(&dir);
        let project = || Project::load(project_path()).wrap_err("loading the project definition");

        match command {
            CliCommand::Init(args) => args.run(&dir, project_path()),
            CliCommand::Add(args) => args.run(project()?),
            CliCommand::Remove(args) => args.run(project()?),
            CliCommand::Synth(args) => {
                let config = Config::current(&dir, home::home_dir);
                args.run(&dir, &config, &project()?)
            }
        }
    }
}
