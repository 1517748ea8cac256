//! Deterministic stand-ins for the package manager.

use crate::fs::write_installed_package;
use pkgsynth_executor::{ExecuteOptions, Executor, ExecutorError};
use serde_json::Value;
use std::{
    cell::RefCell,
    fs,
    path::{Path, PathBuf},
};

/// What the installer saw when it was invoked.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallCall {
    pub command: String,
    pub working_directory: PathBuf,
    /// `package.json` of the working directory at the time of the call.
    pub manifest: Option<Value>,
}

impl InstallCall {
    /// Range of `name` under `dependencies` in the manifest seen by the installer.
    pub fn dependency_range(&self, name: &str) -> Option<&'_ str> {
        self.manifest.as_ref()?.get("dependencies")?.get(name)?.as_str()
    }
}

/// [`Executor`] that records every call and delegates its side effects to `script`.
pub struct ScriptedInstaller<Script> {
    script: Script,
    calls: RefCell<Vec<InstallCall>>,
}

impl<Script> ScriptedInstaller<Script>
where
    Script: Fn(&InstallCall) -> Result<(), String>,
{
    pub fn new(script: Script) -> Self {
        ScriptedInstaller { script, calls: RefCell::new(Vec::new()) }
    }

    pub fn calls(&self) -> Vec<InstallCall> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl<Script> Executor for ScriptedInstaller<Script>
where
    Script: Fn(&InstallCall) -> Result<(), String>,
{
    fn execute(&self, command: &str, options: &ExecuteOptions) -> Result<(), ExecutorError> {
        let manifest = fs::read_to_string(options.working_directory.join("package.json"))
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok());
        let call = InstallCall {
            command: command.to_string(),
            working_directory: options.working_directory.clone(),
            manifest,
        };
        self.calls.borrow_mut().push(call.clone());
        (self.script)(&call)
            .map_err(|message| ExecutorError::Failed { command: command.to_string(), message })
    }
}

/// Installer that succeeds without touching the disk.
pub fn noop_installer() -> ScriptedInstaller<impl Fn(&InstallCall) -> Result<(), String>> {
    ScriptedInstaller::new(|_| Ok(()))
}

/// Installer that always fails with `message`.
pub fn failing_installer(
    message: &'static str,
) -> ScriptedInstaller<impl Fn(&InstallCall) -> Result<(), String>> {
    ScriptedInstaller::new(move |_| Err(message.to_string()))
}

/// Installer that behaves like `yarn install`.
///
/// Every runtime dependency whose range is `"*"` gets materialized in `node_modules` at the
/// version given by `resolutions`; `yarn.lock` receives one `name: range` line per runtime
/// dependency, in manifest order.
pub fn simulated_yarn(
    resolutions: &'static [(&'static str, &'static str)],
) -> ScriptedInstaller<impl Fn(&InstallCall) -> Result<(), String>> {
    ScriptedInstaller::new(move |call| {
        let dir = &call.working_directory;
        let modules_dir = dir.join("node_modules");
        fs::create_dir_all(&modules_dir).map_err(|error| error.to_string())?;

        let dependencies = call
            .manifest
            .as_ref()
            .and_then(|manifest| manifest.get("dependencies"))
            .and_then(Value::as_object);
        let mut lock = Vec::new();
        for (name, range) in dependencies.into_iter().flatten() {
            let range = range.as_str().ok_or_else(|| format!("unexpected version: {range}"))?;
            if range == "*" {
                let (_, version) = resolutions
                    .iter()
                    .find(|(candidate, _)| *candidate == name.as_str())
                    .ok_or_else(|| format!("cannot resolve {name}"))?;
                write_installed_package(&modules_dir, name, version);
            }
            lock.push(format!("{name}: {range}"));
        }

        write_lockfile(dir, &lock.join("\n"))
    })
}

fn write_lockfile(dir: &Path, content: &str) -> Result<(), String> {
    fs::write(dir.join("yarn.lock"), content).map_err(|error| error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn records_calls_and_manifest() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("package.json"), r#"{ "dependencies": { "ms": "^2" } }"#).unwrap();

        let installer = noop_installer();
        installer.execute("yarn install", &ExecuteOptions::in_dir(dir.path())).unwrap();

        let calls = installer.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].command, "yarn install");
        assert_eq!(calls[0].working_directory, dir.path());
        assert_eq!(calls[0].dependency_range("ms"), Some("^2"));
    }

    #[test]
    fn failure_is_an_executor_error() {
        let dir = tempdir().unwrap();
        let installer = failing_installer("network down");
        let error = installer.execute("yarn install", &ExecuteOptions::in_dir(dir.path())).unwrap_err();
        assert_eq!(error.to_string(), r#"Command "yarn install" failed: network down"#);
        assert_eq!(installer.call_count(), 1);
    }

    #[test]
    fn simulated_yarn_resolves_wildcards() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("package.json"), r#"{ "dependencies": { "ms": "*" } }"#).unwrap();

        let installer = simulated_yarn(&[("ms", "2.1.3")]);
        installer.execute("yarn install", &ExecuteOptions::in_dir(dir.path())).unwrap();

        let descriptor = fs::read_to_string(dir.path().join("node_modules/ms/package.json")).unwrap();
        assert!(descriptor.contains("2.1.3"));
        assert_eq!(fs::read_to_string(dir.path().join("yarn.lock")).unwrap(), "ms: *");
    }
}
