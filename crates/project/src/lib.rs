mod definition;

pub use definition::ProjectDefinition;

use derive_more::{Display, Error};
use miette::Diagnostic;
use pipe_trait::Pipe;
use pkgsynth_package_manifest::{
    DependencyDeclaration, DependencyKind, DependencySet, ManifestFields, ParseDependencyError,
};
use std::{
    fs,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

/// File name of the project definition.
pub const PROJECT_FILE_NAME: &str = "pkgsynth.json";

/// Value of the `"//"` key of generated manifests.
pub const GENERATED_MARKER: &str =
    "~~ Generated by pkgsynth. To modify, edit pkgsynth.json and run \"pkgsynth synth\".";

/// Error type of [`Project`].
#[derive(Debug, Display, Error, Diagnostic)]
#[non_exhaustive]
pub enum ProjectError {
    #[display("{} file already exists", PROJECT_FILE_NAME)]
    #[diagnostic(
        code(pkgsynth_project::already_exist),
        help("Your project directory already has a project definition.")
    )]
    AlreadyExist,

    #[display("No {} was found at {_0:?}", PROJECT_FILE_NAME)]
    #[diagnostic(code(pkgsynth_project::not_found), help("Run `pkgsynth init` first."))]
    NotFound(#[error(not(source))] PathBuf),

    #[display("Failed to read {path:?}: {error}")]
    #[diagnostic(code(pkgsynth_project::read_file))]
    ReadFile {
        path: PathBuf,
        #[error(source)]
        error: io::Error,
    },

    #[display("Failed to parse {path:?}: {error}")]
    #[diagnostic(code(pkgsynth_project::parse_file))]
    ParseFile {
        path: PathBuf,
        #[error(source)]
        error: serde_json::Error,
    },

    #[display("Failed to write {path:?}: {error}")]
    #[diagnostic(code(pkgsynth_project::write_file))]
    WriteFile {
        path: PathBuf,
        #[error(source)]
        error: io::Error,
    },

    #[diagnostic(transparent)]
    ParseDependency(#[error(source)] ParseDependencyError),
}

/// Content of the project definition file and its path.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    path: PathBuf,
    definition: ProjectDefinition,
}

impl Project {
    /// Load the project definition at `path`.
    pub fn load(path: PathBuf) -> Result<Self, ProjectError> {
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                return Err(ProjectError::NotFound(path))
            }
            Err(error) => return Err(ProjectError::ReadFile { path, error }),
        };
        let definition = serde_json::from_str(&content)
            .map_err(|error| ProjectError::ParseFile { path: path.clone(), error })?;
        Ok(Project { path, definition })
    }

    /// Create a new project definition named `name` at `path`.
    pub fn init(path: PathBuf, name: impl Into<String>) -> Result<Self, ProjectError> {
        if path.exists() {
            return Err(ProjectError::AlreadyExist);
        }
        let project = Project { path, definition: ProjectDefinition::new(name) };
        project.save()?;
        Ok(project)
    }

    pub fn path(&self) -> &'_ Path {
        &self.path
    }

    pub fn definition(&self) -> &'_ ProjectDefinition {
        &self.definition
    }

    pub fn save(&self) -> Result<(), ProjectError> {
        // SAFETY: the definition only holds strings and JSON values
        let mut content =
            serde_json::to_string_pretty(&self.definition).expect("serialize project definition");
        content.push('\n');
        fs::write(&self.path, content)
            .map_err(|error| ProjectError::WriteFile { path: self.path.clone(), error })
    }

    /// Every dependency the project declares.
    pub fn declarations(&self) -> Result<DependencySet, ProjectError> {
        self.definition.declarations().map_err(ProjectError::ParseDependency)
    }

    /// Add a dependency, replacing an existing one with the same name and kind.
    pub fn add_dependency(&mut self, declaration: &DependencyDeclaration) -> Result<(), ProjectError> {
        self.definition.add_dependency(declaration).map_err(ProjectError::ParseDependency)
    }

    /// Remove dependencies named `name`, of `kind` only if given.
    ///
    /// Returns the number of removed dependencies.
    pub fn remove_dependency(
        &mut self,
        name: &str,
        kind: Option<DependencyKind>,
    ) -> Result<usize, ProjectError> {
        self.definition.remove_dependency(name, kind).map_err(ProjectError::ParseDependency)
    }

    /// Static manifest fields, with the generated marker if `marker` is true.
    pub fn manifest_fields(&self, marker: bool) -> ManifestFields {
        let ProjectDefinition {
            name,
            version,
            description,
            license,
            main,
            bugs_email,
            bugs_url,
            scripts,
            extra_fields,
            ..
        } = &self.definition;
        ManifestFields {
            name: name.clone(),
            description: description.clone(),
            version: version.clone(),
            license: license.clone(),
            main: main.clone(),
            bugs_email: bugs_email.clone(),
            bugs_url: bugs_url.clone(),
            scripts: scripts.clone(),
            extra: extra_fields.clone(),
            marker: marker.then(|| GENERATED_MARKER.to_string()),
        }
    }
}

/// Path of the project definition inside `project_dir`.
pub fn project_file_path(project_dir: &Path) -> PathBuf {
    PROJECT_FILE_NAME.pipe(|name| project_dir.join(name))
}
