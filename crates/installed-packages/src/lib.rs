use pipe_trait::Pipe;
use pkgsynth_package_manifest::is_valid_name;
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

/// File name of the descriptor an installed package carries.
const DESCRIPTOR_FILE_NAME: &str = "package.json";

/// The part of an installed package's descriptor that matters here.
#[derive(Debug, Deserialize)]
struct PackageDescriptor {
    name: Option<String>,
    version: String,
}

/// Modules directory populated by the installer (e.g. `node_modules`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackages {
    modules_dir: PathBuf,
}

impl InstalledPackages {
    pub fn new(modules_dir: impl Into<PathBuf>) -> Self {
        InstalledPackages { modules_dir: modules_dir.into() }
    }

    pub fn modules_dir(&self) -> &'_ Path {
        &self.modules_dir
    }

    /// Whether the installer has materialized the modules directory at all.
    pub fn is_materialized(&self) -> bool {
        self.modules_dir.is_dir()
    }

    /// Path of the descriptor of `name`, e.g. `node_modules/@types/node/package.json`.
    ///
    /// Returns `None` for names that would escape the modules directory.
    pub fn descriptor_path(&self, name: &str) -> Option<PathBuf> {
        if !is_valid_name(name) {
            return None;
        }
        name.split('/')
            .fold(self.modules_dir.clone(), |path, segment| path.join(segment))
            .join(DESCRIPTOR_FILE_NAME)
            .pipe(Some)
    }

    /// Version of `name` as installed on disk.
    ///
    /// Returns `None` when the package is not installed or its descriptor is unreadable,
    /// malformed, or belongs to another package.
    pub fn resolve(&self, name: &str) -> Option<String> {
        let Some(path) = self.descriptor_path(name) else {
            tracing::debug!(target: "pkgsynth::installed", %name, "Not a package name");
            return None;
        };
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(error) => {
                tracing::trace!(target: "pkgsynth::installed", ?path, %error, "No descriptor");
                return None;
            }
        };
        let descriptor = match serde_json::from_str::<PackageDescriptor>(&content) {
            Ok(descriptor) => descriptor,
            Err(error) => {
                tracing::debug!(target: "pkgsynth::installed", ?path, %error, "Malformed descriptor");
                return None;
            }
        };
        if descriptor.name.as_deref().is_some_and(|found| found != name) {
            tracing::debug!(target: "pkgsynth::installed", ?path, found = ?descriptor.name, "Descriptor of another package");
            return None;
        }
        descriptor.version.trim().to_string().pipe(Some).filter(|version| !version.is_empty())
    }

    /// Resolve every name in `names`, skipping those that are not installed.
    pub fn index<'a, Names>(&self, names: Names) -> ResolvedVersionIndex
    where
        Names: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .filter_map(|name| self.resolve(name).map(|version| (name.to_string(), version)))
            .collect()
    }
}

/// Concrete versions found on disk after an install, by package name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedVersionIndex {
    versions: BTreeMap<String, String>,
}

impl ResolvedVersionIndex {
    pub fn get(&self, name: &str) -> Option<&'_ str> {
        self.versions.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.versions.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'_ str, &'_ str)> + '_ {
        self.versions.iter().map(|(name, version)| (name.as_str(), version.as_str()))
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

impl FromIterator<(String, String)> for ResolvedVersionIndex {
    fn from_iter<Iter: IntoIterator<Item = (String, String)>>(iter: Iter) -> Self {
        ResolvedVersionIndex { versions: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn write_descriptor(modules_dir: &Path, name: &str, content: &str) {
        let dir = modules_dir.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("package.json"), content).unwrap();
    }

    #[test]
    fn resolve_installed_versions() {
        let root = tempdir().unwrap();
        let modules_dir = root.path().join("node_modules");
        write_descriptor(&modules_dir, "ms", r#"{ "name": "ms", "version": "2.1.3" }"#);
        write_descriptor(&modules_dir, "@types/node", r#"{ "name": "@types/node", "version": "18.7.19" }"#);
        write_descriptor(&modules_dir, "nameless", r#"{ "version": "1.0.0" }"#);

        let installed = InstalledPackages::new(&modules_dir);
        assert!(installed.is_materialized());
        assert_eq!(installed.resolve("ms").as_deref(), Some("2.1.3"));
        assert_eq!(installed.resolve("@types/node").as_deref(), Some("18.7.19"));
        assert_eq!(installed.resolve("nameless").as_deref(), Some("1.0.0"));
    }

    #[test]
    fn tolerate_missing_and_malformed_descriptors() {
        let root = tempdir().unwrap();
        let modules_dir = root.path().join("node_modules");
        let installed = InstalledPackages::new(&modules_dir);
        assert!(!installed.is_materialized());
        assert_eq!(installed.resolve("ms"), None);

        write_descriptor(&modules_dir, "broken", "{ not json");
        write_descriptor(&modules_dir, "no-version", r#"{ "name": "no-version" }"#);
        write_descriptor(&modules_dir, "number", r#"{ "name": "number", "version": 2 }"#);
        write_descriptor(&modules_dir, "empty", r#"{ "name": "empty", "version": " " }"#);
        write_descriptor(&modules_dir, "alias", r#"{ "name": "other", "version": "1.0.0" }"#);
        fs::create_dir_all(modules_dir.join("no-descriptor")).unwrap();

        for name in ["broken", "no-version", "number", "empty", "alias", "no-descriptor"] {
            eprintln!("CASE: {name:?}");
            assert_eq!(installed.resolve(name), None);
        }
    }

    #[test]
    fn index_skips_unresolved() {
        let root = tempdir().unwrap();
        write_descriptor(root.path(), "ms", r#"{ "name": "ms", "version": "2.1.3" }"#);
        write_descriptor(root.path(), "chalk", r#"{ "name": "chalk", "version": "5.3.0" }"#);

        let index = InstalledPackages::new(root.path()).index(["ms", "chalk", "missing"]);
        assert_eq!(index.len(), 2);
        assert!(index.contains("ms"));
        assert!(!index.contains("missing"));
        assert_eq!(index.iter().collect::<Vec<_>>(), [("chalk", "5.3.0"), ("ms", "2.1.3")]);
    }

    #[test]
    fn scoped_descriptor_path() {
        let installed = InstalledPackages::new("node_modules");
        assert_eq!(
            installed.descriptor_path("@types/node"),
            Some(Path::new("node_modules").join("@types").join("node").join("package.json")),
        );
    }

    #[test]
    fn names_outside_the_modules_dir_are_not_resolved() {
        let root = tempdir().unwrap();
        let modules_dir = root.path().join("node_modules");
        write_descriptor(root.path(), "outside", r#"{ "name": "../outside", "version": "6.6.6" }"#);
        write_descriptor(&modules_dir, "@scope", r#"{ "name": "@scope/..", "version": "6.6.6" }"#);
        fs::write(modules_dir.join("package.json"), r#"{ "name": ".", "version": "6.6.6" }"#).unwrap();

        let installed = InstalledPackages::new(&modules_dir);
        for name in ["../outside", "@scope/..", ".", "..", "", "a/b", "@scope/./x", r"..\outside"] {
            eprintln!("CASE: {name:?}");
            assert_eq!(installed.descriptor_path(name), None);
            assert_eq!(installed.resolve(name), None);
        }
    }
}
