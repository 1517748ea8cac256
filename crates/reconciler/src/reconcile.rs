use crate::{
    effective_ranges::{pin_wildcards, CarriedForward},
    PinnedDependency, PinnedWildcards, ReconcileError,
};
use pkgsynth_executor::{ExecuteOptions, Executor};
use pkgsynth_installed_packages::InstalledPackages;
use pkgsynth_package_manifest::{
    has_changed, version_range, DependencySet, ManifestDocument, ManifestFields, PersistedManifest,
};
use std::path::Path;

/// One synthesis pass: render the manifest, install, pin wildcards, install again if needed.
///
/// The installer runs at most twice per pass.
#[must_use]
pub struct Reconcile<'a, Installer>
where
    Installer: Executor,
{
    /// Runs the package manager.
    pub installer: Installer,
    /// Command that makes the package manager install the manifest's dependencies.
    pub install_command: &'a str,
    /// Directory the installer runs in.
    pub project_dir: &'a Path,
    /// Path of the synthesized manifest.
    pub manifest_path: &'a Path,
    /// Path of the lockfile the package manager maintains.
    pub lockfile_path: &'a Path,
    /// Modules directory the installer populates.
    pub installed: &'a InstalledPackages,
    /// Static part of the manifest.
    pub fields: &'a ManifestFields,
    /// Dependencies declared by the project.
    pub declarations: &'a DependencySet,
}

/// Outcome of a successful [`Reconcile`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Number of installer invocations, between 0 and 2.
    pub installs: usize,
    /// Whether the manifest file was (re)written.
    pub manifest_written: bool,
    /// Wildcard dependencies pinned during this pass.
    pub pinned: Vec<PinnedDependency>,
    /// Wildcard dependencies the installer left without a usable descriptor. The next pass retries them.
    pub pending: Vec<String>,
    /// Whether the lockfile exists at the end of the pass.
    pub lockfile_present: bool,
}

impl<'a, Installer> Reconcile<'a, Installer>
where
    Installer: Executor,
{
    /// Execute the pass.
    pub fn run(self) -> Result<ReconcileReport, ReconcileError> {
        let Reconcile { manifest_path, lockfile_path, installed, fields, declarations, .. } = &self;

        tracing::info!(target: "pkgsynth::reconcile", ?manifest_path, "Start");

        let persisted = PersistedManifest::read(manifest_path).map_err(ReconcileError::ReadManifest)?;
        let CarriedForward { dependencies, fully_resolved } =
            CarriedForward::compute(declarations, persisted.as_ref());
        let document = ManifestDocument::render(fields, &dependencies);

        let changed = has_changed(persisted.as_ref().map(|manifest| manifest.text.as_str()), &document);
        let materialized = installed.is_materialized();
        tracing::debug!(target: "pkgsynth::reconcile", changed, fully_resolved, materialized);

        let mut report = ReconcileReport::default();

        if !changed && fully_resolved && materialized {
            tracing::info!(target: "pkgsynth::reconcile", "Up to date");
            report.lockfile_present = lockfile_path.exists();
            return Ok(report);
        }

        report.manifest_written |= self.write(&document)?;
        self.install(&mut report)?;

        let PinnedWildcards { dependencies: resolved, pinned, pending } =
            pin_wildcards(&dependencies, installed);
        let resolved_document = ManifestDocument::render(fields, &resolved);
        report.pinned = pinned;
        report.pending = pending;

        if has_changed(Some(document.text()), &resolved_document) {
            report.manifest_written |= self.write(&resolved_document)?;
            self.install(&mut report)?;
            self.verify_pinned(&report.pinned)?;
        }

        report.lockfile_present = lockfile_path.exists();
        if !report.lockfile_present {
            tracing::warn!(target: "pkgsynth::reconcile", ?lockfile_path, "Installer left no lockfile");
        }

        tracing::info!(target: "pkgsynth::reconcile", installs = report.installs, "Complete");
        Ok(report)
    }

    fn write(&self, document: &ManifestDocument) -> Result<bool, ReconcileError> {
        document.write_if_changed(self.manifest_path).map_err(ReconcileError::WriteManifest)
    }

    fn install(&self, report: &mut ReconcileReport) -> Result<(), ReconcileError> {
        tracing::info!(target: "pkgsynth::reconcile", command = self.install_command, "Install");
        self.installer
            .execute(self.install_command, &ExecuteOptions::in_dir(self.project_dir))
            .map_err(ReconcileError::Install)?;
        report.installs += 1;
        Ok(())
    }

    /// After the second install, every pinned dependency must still be satisfied on disk.
    fn verify_pinned(&self, pinned: &[PinnedDependency]) -> Result<(), ReconcileError> {
        for PinnedDependency { name, range, .. } in pinned {
            let found = self.installed.resolve(name);
            if !found.as_deref().is_some_and(|version| version_range::satisfies(range, version)) {
                return Err(ReconcileError::NotConverged {
                    name: name.clone(),
                    range: range.clone(),
                    installed: found,
                });
            }
        }
        Ok(())
    }
}
