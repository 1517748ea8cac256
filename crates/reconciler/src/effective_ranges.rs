use pkgsynth_installed_packages::InstalledPackages;
use pkgsynth_package_manifest::{
    version_range, DependencyKind, DependencySet, PersistedManifest,
};

/// Ranges to render at the start of a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarriedForward {
    /// Declarations with the ranges to render.
    pub dependencies: DependencySet,
    /// Whether every wildcard declaration got a concrete range from the persisted manifest.
    pub fully_resolved: bool,
}

impl CarriedForward {
    /// Replace each wildcard range with the concrete range a previous pass already wrote
    /// for the same dependency, if any.
    pub fn compute(declarations: &DependencySet, persisted: Option<&PersistedManifest>) -> Self {
        let mut fully_resolved = true;
        let dependencies = declarations
            .iter()
            .map(|declaration| {
                if !declaration.is_wildcard() {
                    return declaration.clone();
                }
                let previous = persisted
                    .and_then(|manifest| manifest.dependency_range(declaration.kind, &declaration.name))
                    .filter(|range| !version_range::is_wildcard(range));
                match previous {
                    Some(range) => declaration.with_range(range),
                    None => {
                        fully_resolved = false;
                        declaration.clone()
                    }
                }
            })
            .collect();
        CarriedForward { dependencies, fully_resolved }
    }
}

/// A wildcard dependency that got pinned to what the installer picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedDependency {
    pub name: String,
    pub kind: DependencyKind,
    /// Version found on disk.
    pub version: String,
    /// Range written back, e.g. `^2.1.3`.
    pub range: String,
}

/// Outcome of [`pin_wildcards`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedWildcards {
    /// Declarations with every resolved wildcard replaced by its caret range.
    pub dependencies: DependencySet,
    pub pinned: Vec<PinnedDependency>,
    /// Names of the wildcards with no usable descriptor on disk. They keep their wildcard range.
    pub pending: Vec<String>,
}

/// Pin every remaining wildcard of `dependencies` to the caret range of its installed version.
///
/// A wildcard whose descriptor is missing or malformed stays pending.
pub fn pin_wildcards(dependencies: &DependencySet, installed: &InstalledPackages) -> PinnedWildcards {
    let wildcards = dependencies.iter().filter(|declaration| declaration.is_wildcard());
    let index = installed.index(wildcards.clone().map(|declaration| declaration.name.as_str()));

    let mut pinned = Vec::new();
    let mut pending = Vec::new();
    for declaration in wildcards {
        let Some(version) = index.get(&declaration.name) else {
            tracing::warn!(
                target: "pkgsynth::reconcile",
                name = %declaration.name,
                range = %declaration.requested_range,
                "Installed version not found, keeping the wildcard",
            );
            pending.push(declaration.name.clone());
            continue;
        };
        pinned.push(PinnedDependency {
            name: declaration.name.clone(),
            kind: declaration.kind,
            version: version.to_string(),
            range: version_range::caret(version),
        });
    }

    let dependencies = dependencies
        .iter()
        .map(|declaration| {
            pinned
                .iter()
                .find(|pin| pin.name == declaration.name && pin.kind == declaration.kind)
                .map_or_else(|| declaration.clone(), |pin| declaration.with_range(&pin.range))
        })
        .collect();

    PinnedWildcards { dependencies, pinned, pending }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkgsynth_package_manifest::DependencyDeclaration;
    use pkgsynth_testing_utils::fs::write_installed_package;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::tempdir;
    use DependencyKind::{Dev, Runtime};

    fn declarations(list: &[(&str, &str, DependencyKind)]) -> DependencySet {
        list.iter().map(|(name, range, kind)| DependencyDeclaration::new(*name, *range, *kind)).collect()
    }

    fn persisted(value: serde_json::Value) -> PersistedManifest {
        PersistedManifest { text: value.to_string(), value: Some(value) }
    }

    #[test]
    fn carry_forward_concrete_ranges() {
        let declarations = declarations(&[("ms", "*", Runtime), ("jest", "*", Dev), ("chalk", "^5", Runtime)]);
        let manifest = persisted(json!({
            "dependencies": { "ms": "^2.1.3", "chalk": "^4" },
            "devDependencies": { "jest": "^29.7.0" },
        }));

        let received = CarriedForward::compute(&declarations, Some(&manifest));
        assert!(received.fully_resolved);
        assert_eq!(
            received.dependencies,
            self::declarations(&[("ms", "^2.1.3", Runtime), ("jest", "^29.7.0", Dev), ("chalk", "^5", Runtime)]),
        );
    }

    #[test]
    fn wildcards_stay_without_concrete_range() {
        let declarations = declarations(&[("ms", "*", Runtime), ("jest", "*", Dev)]);
        let manifest = persisted(json!({
            "dependencies": { "ms": "*", "jest": "^29.7.0" },
        }));

        let received = CarriedForward::compute(&declarations, Some(&manifest));
        assert!(!received.fully_resolved);
        assert_eq!(received.dependencies, declarations);

        let received = CarriedForward::compute(&declarations, None);
        assert!(!received.fully_resolved);
        assert_eq!(received.dependencies, declarations);
    }

    #[test]
    fn no_wildcard_is_fully_resolved() {
        let declarations = declarations(&[("ms", "^2", Runtime)]);
        let received = CarriedForward::compute(&declarations, None);
        assert!(received.fully_resolved);
        assert_eq!(received.dependencies, declarations);
    }

    #[test]
    fn pin_installed_versions() {
        let root = tempdir().unwrap();
        write_installed_package(root.path(), "ms", "2.1.3");
        write_installed_package(root.path(), "jest", "29.7.0");
        let installed = InstalledPackages::new(root.path());

        let declarations =
            declarations(&[("ms", "*", Runtime), ("jest", "latest", Dev), ("chalk", "^5", Runtime)]);
        let PinnedWildcards { dependencies, pinned, pending } = pin_wildcards(&declarations, &installed);

        assert!(pending.is_empty());
        assert_eq!(
            dependencies,
            self::declarations(&[("ms", "^2.1.3", Runtime), ("jest", "^29.7.0", Dev), ("chalk", "^5", Runtime)]),
        );
        let pinned: Vec<_> = pinned.iter().map(|pin| (pin.name.as_str(), pin.version.as_str(), pin.range.as_str())).collect();
        assert_eq!(pinned, [("ms", "2.1.3", "^2.1.3"), ("jest", "29.7.0", "^29.7.0")]);
    }

    #[test]
    fn unresolved_wildcard_stays_pending() {
        let root = tempdir().unwrap();
        write_installed_package(root.path(), "chalk", "5.3.0");
        std::fs::create_dir(root.path().join("ms")).unwrap();
        std::fs::write(root.path().join("ms/package.json"), "{ not json").unwrap();
        let installed = InstalledPackages::new(root.path());

        let declarations =
            declarations(&[("ms", "*", Runtime), ("react", "*", DependencyKind::Peer), ("chalk", "*", Runtime)]);
        let PinnedWildcards { dependencies, pinned, pending } = pin_wildcards(&declarations, &installed);

        assert_eq!(pending, ["ms", "react"]);
        assert_eq!(
            dependencies,
            self::declarations(&[("ms", "*", Runtime), ("react", "*", DependencyKind::Peer), ("chalk", "^5.3.0", Runtime)]),
        );
        let pinned: Vec<_> = pinned.iter().map(|pin| pin.name.as_str()).collect();
        assert_eq!(pinned, ["chalk"]);
    }
}
