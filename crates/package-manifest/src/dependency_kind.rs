use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoStaticStr};

/// How a dependency is consumed by the package.
///
/// The static string of each variant is the manifest field that lists it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, IntoStaticStr, EnumIter, Deserialize,
    Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    #[strum(serialize = "dependencies")]
    Runtime,
    #[strum(serialize = "devDependencies")]
    Dev,
    #[strum(serialize = "peerDependencies")]
    Peer,
    #[strum(serialize = "bundledDependencies")]
    Bundled,
}

impl DependencyKind {
    /// Manifest field that carries the version range of this kind.
    ///
    /// Bundled dependencies are listed by name in `bundledDependencies` but their
    /// ranges live in `dependencies`.
    pub fn range_field(self) -> &'static str {
        match self {
            DependencyKind::Bundled => DependencyKind::Runtime.into(),
            kind => kind.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    #[test]
    fn range_fields() {
        let fields: Vec<_> = DependencyKind::iter().map(DependencyKind::range_field).collect();
        assert_eq!(fields, ["dependencies", "devDependencies", "peerDependencies", "dependencies"]);
    }

    #[test]
    fn list_fields() {
        let fields: Vec<&str> = DependencyKind::iter().map(Into::into).collect();
        assert_eq!(
            fields,
            ["dependencies", "devDependencies", "peerDependencies", "bundledDependencies"],
        );
    }
}
