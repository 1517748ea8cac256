use std::{path::PathBuf, str::FromStr};

use serde::{de, Deserialize, Deserializer};

// This needs to be implemented because serde doesn't support default = "true" as
// a valid option, and throws  "failed to parse" error.
pub fn bool_true() -> bool {
    true
}

pub fn default_manifest_file() -> PathBuf {
    PathBuf::from("package.json")
}

pub fn default_modules_dir() -> PathBuf {
    PathBuf::from("node_modules")
}

pub fn deserialize_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    bool::from_str(s.trim()).map_err(de::Error::custom)
}

/// Paths are kept relative, they are resolved against the project directory on use.
pub fn deserialize_pathbuf<'de, D>(deserializer: D) -> Result<PathBuf, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let s = s.trim();
    if s.is_empty() {
        return Err(de::Error::custom("path is empty"));
    }
    PathBuf::from_str(s).map_err(de::Error::custom)
}

/// An empty value means "not set".
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let s = s.trim();
    Ok((!s.is_empty()).then(|| s.to_string()))
}
