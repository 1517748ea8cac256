use crate::DependencyKind;
use derive_more::{Display, Error};
use miette::Diagnostic;
use split_first_char::SplitFirstChar;

/// A dependency the project asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyDeclaration {
    /// Package name, including the scope if any (e.g. `@types/node`).
    pub name: String,
    /// Range as requested by the user: `*`, a semver range, or an exact version.
    pub requested_range: String,
    pub kind: DependencyKind,
}

/// Error when parsing a [`DependencyDeclaration`] from `name[@range]`.
#[derive(Debug, Display, Error, Diagnostic)]
#[non_exhaustive]
pub enum ParseDependencyError {
    #[display("Dependency is empty")]
    #[diagnostic(code(pkgsynth_package_manifest::empty_dependency))]
    EmptyInput,

    #[display("Missing name part of the scoped package {_0:?}")]
    #[diagnostic(code(pkgsynth_package_manifest::missing_name))]
    MissingName(#[error(not(source))] String),

    #[display("Invalid package name {_0:?}")]
    #[diagnostic(
        code(pkgsynth_package_manifest::invalid_name),
        help("Names cannot contain `.` or `..` path segments, backslashes, or extra slashes")
    )]
    InvalidName(#[error(not(source))] String),
}

impl DependencyDeclaration {
    /// Construct a [`DependencyDeclaration`].
    pub fn new(
        name: impl Into<String>,
        requested_range: impl Into<String>,
        kind: DependencyKind,
    ) -> Self {
        DependencyDeclaration { name: name.into(), requested_range: requested_range.into(), kind }
    }

    /// Parse `name[@range]`. A missing range means `*`.
    ///
    /// Examples: `ms`, `ms@^2`, `@types/node`, `@types/node@18`.
    pub fn parse(input: &str, kind: DependencyKind) -> Result<Self, ParseDependencyError> {
        let input = input.trim();
        let (name, range) = match input.split_first_char() {
            None => return Err(ParseDependencyError::EmptyInput),
            Some(('@', rest)) => {
                let (scope, name_and_range) = rest
                    .split_once('/')
                    .ok_or_else(|| ParseDependencyError::MissingName(input.to_string()))?;
                let (name, range) = split_range(name_and_range);
                if scope.is_empty() || name.is_empty() {
                    return Err(ParseDependencyError::MissingName(input.to_string()));
                }
                (&input[..scope.len() + name.len() + 2], range)
            }
            Some(_) => split_range(input),
        };
        if name.is_empty() {
            return Err(ParseDependencyError::EmptyInput);
        }
        if !is_valid_name(name) {
            return Err(ParseDependencyError::InvalidName(name.to_string()));
        }
        Ok(DependencyDeclaration::new(name, range.unwrap_or("*"), kind))
    }

    /// Whether the installer has to pick the version of this dependency.
    pub fn is_wildcard(&self) -> bool {
        crate::version_range::is_wildcard(&self.requested_range)
    }

    /// Same dependency with another range.
    pub fn with_range(&self, range: impl Into<String>) -> Self {
        DependencyDeclaration { requested_range: range.into(), ..self.clone() }
    }
}

/// Whether `name` maps to exactly one directory below `node_modules` (two when scoped).
pub fn is_valid_name(name: &str) -> bool {
    let (unscoped, segment_count) = match name.strip_prefix('@') {
        Some(rest) => (rest, 2),
        None => (name, 1),
    };
    let segments: Vec<&str> = unscoped.split('/').collect();
    segments.len() == segment_count
        && segments
            .iter()
            .all(|segment| !matches!(*segment, "" | "." | "..") && !segment.contains('\\'))
}

fn split_range(input: &str) -> (&str, Option<&str>) {
    match input.split_once('@') {
        Some((name, range)) => (name, Some(range)),
        None => (input, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_ok() {
        fn case(input: &'static str, name: &str, range: &str) {
            eprintln!("CASE: {input:?}");
            let received = DependencyDeclaration::parse(input, DependencyKind::Dev).unwrap();
            assert_eq!(received, DependencyDeclaration::new(name, range, DependencyKind::Dev));
        }

        case("ms", "ms", "*");
        case("ms@^2", "ms", "^2");
        case("ms@2.1.3", "ms", "2.1.3");
        case("ms@", "ms", "");
        case("@types/node", "@types/node", "*");
        case("@types/node@18", "@types/node", "18");
        case("@types/node@>=18 <20", "@types/node", ">=18 <20");
        case("  typescript@~5.1  ", "typescript", "~5.1");
    }

    #[test]
    fn parse_err() {
        macro_rules! case {
            ($input:expr => $message:expr, $pattern:pat) => {{
                let input = $input;
                eprintln!("CASE: {input:?}");
                let error = DependencyDeclaration::parse(input, DependencyKind::Runtime).unwrap_err();
                dbg!(&error);
                assert_eq!(error.to_string(), $message);
                assert!(matches!(&error, $pattern));
            }};
        }

        case!("" => "Dependency is empty", ParseDependencyError::EmptyInput);
        case!("@types" => r#"Missing name part of the scoped package "@types""#, ParseDependencyError::MissingName(_));
        case!("@types/" => r#"Missing name part of the scoped package "@types/""#, ParseDependencyError::MissingName(_));
        case!("../x" => r#"Invalid package name "../x""#, ParseDependencyError::InvalidName(_));
        case!("..@^1" => r#"Invalid package name "..""#, ParseDependencyError::InvalidName(_));
        case!("@scope/.." => r#"Invalid package name "@scope/..""#, ParseDependencyError::InvalidName(_));
        case!("@../x@1" => r#"Invalid package name "@../x""#, ParseDependencyError::InvalidName(_));
        case!("@scope/a/b" => r#"Invalid package name "@scope/a/b""#, ParseDependencyError::InvalidName(_));
        case!(r"..\evil" => r#"Invalid package name "..\\evil""#, ParseDependencyError::InvalidName(_));
    }

    #[test]
    fn wildcard() {
        let dependency = |range| DependencyDeclaration::new("ms", range, DependencyKind::Runtime);
        assert!(dependency("*").is_wildcard());
        assert!(!dependency("^2").is_wildcard());
        assert_eq!(dependency("*").with_range("^2.1.3"), dependency("^2.1.3"));
    }
}
