mod cli_args;

use clap::Parser;
use cli_args::CliArgs;
use miette::set_panic_hook;
use pkgsynth_diagnostics::enable_tracing_by_env;

pub fn run_cli() -> miette::Result<()> {
    enable_tracing_by_env();
    set_panic_hook();
    CliArgs::parse().run()
}
