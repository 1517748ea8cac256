use crate::{fields::MARKER_KEY, DependencyKind, DependencySet, ManifestFields};
use derive_more::{Display, Error};
use miette::Diagnostic;
use serde_json::{Map, Value};
use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

/// Groups rendered as `name -> range` maps, in manifest order.
const RANGE_GROUPS: [DependencyKind; 3] =
    [DependencyKind::Runtime, DependencyKind::Dev, DependencyKind::Peer];

/// Manifest rendered from the project model, together with its canonical text.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestDocument {
    value: Value,
    text: String,
}

/// Error when writing a [`ManifestDocument`] to disk.
#[derive(Debug, Display, Error, Diagnostic)]
#[display("Failed to write manifest to {path:?}: {error}")]
#[diagnostic(code(pkgsynth_package_manifest::write_manifest))]
pub struct WriteManifestError {
    pub path: PathBuf,
    #[error(source)]
    pub error: io::Error,
}

impl ManifestDocument {
    /// Render the document for `dependencies`, whose ranges are written verbatim.
    pub fn render(fields: &ManifestFields, dependencies: &DependencySet) -> Self {
        let mut root = Map::new();
        fields.write_head(&mut root);

        for kind in RANGE_GROUPS {
            let group = range_group(dependencies, kind);
            if !group.is_empty() {
                root.insert(kind.range_field().to_string(), Value::Object(group));
            }
        }

        let mut bundled: Vec<&str> = dependencies
            .of_kind(DependencyKind::Bundled)
            .map(|declaration| declaration.name.as_str())
            .collect();
        bundled.sort_unstable();
        if !bundled.is_empty() {
            let list = bundled.into_iter().map(Value::from).collect();
            root.insert(<&str>::from(DependencyKind::Bundled).to_string(), Value::Array(list));
        }

        if let Some(marker) = &fields.marker {
            root.insert(MARKER_KEY.to_string(), marker.clone().into());
        }

        ManifestDocument::from_value(Value::Object(root))
    }

    /// Wrap an existing value, computing its canonical text.
    pub fn from_value(value: Value) -> Self {
        // SAFETY: a `Value` always has string keys, so serializing it cannot fail
        let mut text = serde_json::to_string_pretty(&value).expect("serialize manifest");
        text.push('\n');
        ManifestDocument { value, text }
    }

    pub fn value(&self) -> &'_ Value {
        &self.value
    }

    /// Canonical on-disk form: two-space indented JSON with a trailing newline.
    pub fn text(&self) -> &'_ str {
        &self.text
    }

    /// Range written for `name` in the group that carries `kind`.
    pub fn dependency_range(&self, kind: DependencyKind, name: &str) -> Option<&'_ str> {
        self.value.get(kind.range_field())?.get(name)?.as_str()
    }

    /// Write the document to `path` unless the file already holds the same bytes.
    ///
    /// Returns whether the file was written.
    pub fn write_if_changed(&self, path: &Path) -> Result<bool, WriteManifestError> {
        let current = fs::read_to_string(path).ok();
        if !has_changed(current.as_deref(), self) {
            tracing::debug!(target: "pkgsynth::manifest", ?path, "Unchanged");
            return Ok(false);
        }
        fs::write(path, &self.text)
            .map_err(|error| WriteManifestError { path: path.to_path_buf(), error })?;
        tracing::info!(target: "pkgsynth::manifest", ?path, "Written");
        Ok(true)
    }
}

/// Whether writing `new` would change a file whose content is `previous`.
///
/// A missing previous form always counts as changed.
pub fn has_changed(previous: Option<&str>, new: &ManifestDocument) -> bool {
    previous != Some(new.text())
}

fn range_group(dependencies: &DependencySet, kind: DependencyKind) -> Map<String, Value> {
    let mut group = BTreeMap::<&str, &str>::new();
    for declaration in dependencies {
        if declaration.kind.range_field() != kind.range_field() {
            continue;
        }
        let name = declaration.name.as_str();
        let range = declaration.requested_range.as_str();
        if declaration.kind == kind {
            group.insert(name, range);
        } else {
            group.entry(name).or_insert(range);
        }
    }
    group.into_iter().map(|(name, range)| (name.to_string(), Value::from(range))).collect()
}
