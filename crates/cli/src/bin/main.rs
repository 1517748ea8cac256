use pkgsynth_diagnostics::Result;

pub fn main() -> Result<()> {
    pkgsynth_cli::run_cli()
}
