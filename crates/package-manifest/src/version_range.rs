//! Classification of the version ranges written into a manifest.

use node_semver::{Range, Version};

/// Ranges that pin nothing and have to be resolved by the installer.
const WILDCARDS: &[&str] = &["", "*", "x", "X", "latest"];

/// Whether `range` accepts any version.
pub fn is_wildcard(range: &str) -> bool {
    WILDCARDS.contains(&range.trim())
}

/// Caret range that keeps the major version of `version` (`2.1.3` becomes `^2.1.3`).
pub fn caret(version: &str) -> String {
    format!("^{}", version.trim())
}

/// Whether the installed `version` satisfies `range`.
///
/// Unparsable input never satisfies.
pub fn satisfies(range: &str, version: &str) -> bool {
    let (Ok(range), Ok(version)) = (range.trim().parse::<Range>(), Version::parse(version.trim()))
    else {
        return false;
    };
    version.satisfies(&range)
}
