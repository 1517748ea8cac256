use crate::DependencyKind;
use serde_json::{Map, Value};
use strum::IntoEnumIterator;

/// Key of the generated-file marker.
pub(crate) const MARKER_KEY: &str = "//";

/// Static part of the manifest, transcribed as-is by the synthesizer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManifestFields {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
    pub license: Option<String>,
    pub main: Option<String>,
    pub bugs_email: Option<String>,
    pub bugs_url: Option<String>,
    pub scripts: Map<String, Value>,
    /// Additional top-level fields, rendered in insertion order.
    pub extra: Map<String, Value>,
    /// Value of the `"//"` key that flags the file as generated.
    pub marker: Option<String>,
}

impl ManifestFields {
    pub fn new(name: impl Into<String>) -> Self {
        ManifestFields { name: name.into(), ..ManifestFields::default() }
    }

    /// The `bugs` object, if any of its fields is set.
    pub fn bugs(&self) -> Option<Value> {
        let mut bugs = Map::new();
        if let Some(email) = &self.bugs_email {
            bugs.insert("email".to_string(), email.clone().into());
        }
        if let Some(url) = &self.bugs_url {
            bugs.insert("url".to_string(), url.clone().into());
        }
        (!bugs.is_empty()).then_some(Value::Object(bugs))
    }

    /// Insert every field except the dependency groups and the marker.
    pub(crate) fn write_head(&self, root: &mut Map<String, Value>) {
        root.insert("name".to_string(), self.name.clone().into());

        let optional = [
            ("description", &self.description),
            ("version", &self.version),
            ("license", &self.license),
            ("main", &self.main),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                root.insert(key.to_string(), value.clone().into());
            }
        }

        if let Some(bugs) = self.bugs() {
            root.insert("bugs".to_string(), bugs);
        }

        if !self.scripts.is_empty() {
            root.insert("scripts".to_string(), Value::Object(self.scripts.clone()));
        }

        for (key, value) in &self.extra {
            if root.contains_key(key) || is_reserved(key) {
                tracing::warn!(
                    target: "pkgsynth::manifest",
                    %key,
                    "Extra field collides with a generated field, skipping"
                );
                continue;
            }
            root.insert(key.clone(), value.clone());
        }
    }
}

/// Keys written after the head, which extra fields must not claim.
fn is_reserved(key: &str) -> bool {
    key == MARKER_KEY || DependencyKind::iter().any(|kind| <&str>::from(kind) == key)
}
