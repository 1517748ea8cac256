use derive_more::{Display, Error};
use miette::Diagnostic;
use pkgsynth_executor::ExecutorError;
use pkgsynth_package_manifest::{ReadManifestError, WriteManifestError};

/// Error type of [`crate::Reconcile`]. Every variant aborts the pass.
#[derive(Debug, Display, Error, Diagnostic)]
#[non_exhaustive]
pub enum ReconcileError {
    #[diagnostic(transparent)]
    ReadManifest(#[error(source)] ReadManifestError),

    #[diagnostic(transparent)]
    WriteManifest(#[error(source)] WriteManifestError),

    #[display("Failed to install dependencies: {_0}")]
    #[diagnostic(code(pkgsynth_reconciler::install))]
    Install(#[error(source)] ExecutorError),

    #[display(
        "Installed version of {name} ({}) does not satisfy {range:?} after the second install",
        installed.as_deref().unwrap_or("missing")
    )]
    #[diagnostic(
        code(pkgsynth_reconciler::not_converged),
        help("The installer changed its resolution between runs; run the synthesis again.")
    )]
    NotConverged { name: String, range: String, installed: Option<String> },
}
