use crate::DependencyKind;
use derive_more::{Display, Error};
use miette::Diagnostic;
use pipe_trait::Pipe;
use serde_json::Value;
use std::{
    fs,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

/// Manifest as it was found on disk before a synthesis pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedManifest {
    /// Raw content, compared byte for byte against the next render.
    pub text: String,
    /// Parsed content, `None` if the file is not valid JSON.
    pub value: Option<Value>,
}

/// Error when reading the manifest from disk.
#[derive(Debug, Display, Error, Diagnostic)]
#[display("Failed to read manifest at {path:?}: {error}")]
#[diagnostic(code(pkgsynth_package_manifest::read_manifest))]
pub struct ReadManifestError {
    pub path: PathBuf,
    #[error(source)]
    pub error: io::Error,
}

impl PersistedManifest {
    /// Read the manifest at `path`, or `None` if there is no such file.
    pub fn read(path: &Path) -> Result<Option<Self>, ReadManifestError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(ReadManifestError { path: path.to_path_buf(), error }),
        };
        let value = match serde_json::from_str::<Value>(&text) {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::warn!(target: "pkgsynth::manifest", ?path, %error, "Existing manifest is not valid JSON");
                None
            }
        };
        PersistedManifest { text, value }.pipe(Some).pipe(Ok)
    }

    /// Range recorded for `name` in the group that carries `kind`.
    pub fn dependency_range(&self, kind: DependencyKind, name: &str) -> Option<&'_ str> {
        self.value.as_ref()?.get(kind.range_field())?.get(name)?.as_str()
    }
}
