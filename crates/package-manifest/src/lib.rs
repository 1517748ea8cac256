mod dependency;
mod dependency_kind;
mod dependency_set;
mod document;
mod fields;
mod persisted;
pub mod version_range;

pub use dependency::{is_valid_name, DependencyDeclaration, ParseDependencyError};
pub use dependency_kind::DependencyKind;
pub use dependency_set::DependencySet;
pub use document::{has_changed, ManifestDocument, WriteManifestError};
pub use fields::ManifestFields;
pub use persisted::{PersistedManifest, ReadManifestError};
