use pkgsynth_package_manifest::{
    DependencyDeclaration, DependencyKind, DependencySet, ParseDependencyError,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// What the user declares about the project, as stored in `pkgsynth.json`.
///
/// Dependencies are kept in the `name[@range]` syntax of the command line.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bugs_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bugs_url: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub scripts: Map<String, Value>,
    /// Top-level manifest fields copied verbatim after the known ones.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extra_fields: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deps: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dev_deps: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub peer_deps: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bundled_deps: Vec<String>,
}

impl ProjectDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        ProjectDefinition { name: name.into(), ..ProjectDefinition::default() }
    }

    fn list(&self, kind: DependencyKind) -> &'_ Vec<String> {
        match kind {
            DependencyKind::Runtime => &self.deps,
            DependencyKind::Dev => &self.dev_deps,
            DependencyKind::Peer => &self.peer_deps,
            DependencyKind::Bundled => &self.bundled_deps,
        }
    }

    fn list_mut(&mut self, kind: DependencyKind) -> &'_ mut Vec<String> {
        match kind {
            DependencyKind::Runtime => &mut self.deps,
            DependencyKind::Dev => &mut self.dev_deps,
            DependencyKind::Peer => &mut self.peer_deps,
            DependencyKind::Bundled => &mut self.bundled_deps,
        }
    }

    /// Parse every declared dependency.
    pub fn declarations(&self) -> Result<DependencySet, ParseDependencyError> {
        let mut set = DependencySet::new();
        for kind in KINDS {
            for spec in self.list(kind) {
                set.add(DependencyDeclaration::parse(spec, kind)?);
            }
        }
        Ok(set)
    }

    /// Add `declaration` to its list, replacing the entry with the same name.
    pub fn add_dependency(
        &mut self,
        declaration: &DependencyDeclaration,
    ) -> Result<(), ParseDependencyError> {
        let spec = format_spec(declaration);
        let list = self.list_mut(declaration.kind);
        let mut position = None;
        for (index, existing) in list.iter().enumerate() {
            if DependencyDeclaration::parse(existing, declaration.kind)?.name == declaration.name {
                position = Some(index);
                break;
            }
        }
        match position {
            Some(index) => list[index] = spec,
            None => list.push(spec),
        }
        Ok(())
    }

    /// Remove the entries named `name` from the list of `kind`, or from every list.
    pub fn remove_dependency(
        &mut self,
        name: &str,
        kind: Option<DependencyKind>,
    ) -> Result<usize, ParseDependencyError> {
        let mut removed = 0;
        for candidate in KINDS {
            if kind.is_some_and(|kind| kind != candidate) {
                continue;
            }
            let list = self.list_mut(candidate);
            let mut kept = Vec::with_capacity(list.len());
            for spec in list.drain(..) {
                if DependencyDeclaration::parse(&spec, candidate)?.name == name {
                    removed += 1;
                } else {
                    kept.push(spec);
                }
            }
            *list = kept;
        }
        Ok(removed)
    }
}

const KINDS: [DependencyKind; 4] =
    [DependencyKind::Runtime, DependencyKind::Dev, DependencyKind::Peer, DependencyKind::Bundled];

/// `name` for wildcard ranges, `name@range` otherwise.
fn format_spec(declaration: &DependencyDeclaration) -> String {
    let DependencyDeclaration { name, requested_range, .. } = declaration;
    if requested_range == "*" {
        name.clone()
    } else {
        format!("{name}@{requested_range}")
    }
}
