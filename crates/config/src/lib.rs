mod custom_deserializer;

use pipe_trait::Pipe;
use serde::Deserialize;
use smart_default::SmartDefault;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::custom_deserializer::{
    bool_true, default_manifest_file, default_modules_dir, deserialize_bool, deserialize_optional_string,
    deserialize_pathbuf,
};

/// File name of the configuration file.
pub const CONFIG_FILE_NAME: &str = ".pkgsynthrc";

/// Package manager that installs the dependencies of the synthesized manifest.
#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PackageManager {
    /// Yarn Classic.
    #[default]
    Yarn,

    /// The npm CLI bundled with Node.js.
    Npm,

    /// pnpm.
    Pnpm,
}

impl PackageManager {
    /// Command that installs the dependencies listed in the manifest.
    ///
    /// When `ci` is true the command refuses to modify the lockfile.
    pub fn install_command(self, ci: bool) -> &'static str {
        match (self, ci) {
            (PackageManager::Yarn, false) => "yarn install --check-files",
            (PackageManager::Yarn, true) => "yarn install --check-files --frozen-lockfile",
            (PackageManager::Npm, false) => "npm install",
            (PackageManager::Npm, true) => "npm ci",
            (PackageManager::Pnpm, false) => "pnpm i --no-frozen-lockfile",
            (PackageManager::Pnpm, true) => "pnpm i --frozen-lockfile",
        }
    }

    /// Name of the lockfile the package manager writes next to the manifest.
    pub fn lockfile_name(self) -> &'static str {
        match self {
            PackageManager::Yarn => "yarn.lock",
            PackageManager::Npm => "package-lock.json",
            PackageManager::Pnpm => "pnpm-lock.yaml",
        }
    }
}

#[derive(Debug, Deserialize, SmartDefault, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Package manager used to install dependencies.
    #[serde(default)]
    pub package_manager: PackageManager,

    /// Command run instead of the package manager's own install command.
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub install_command: Option<String>,

    /// Install with a frozen lockfile, as continuous integration builds do.
    #[serde(default, deserialize_with = "deserialize_bool")]
    pub ci: bool,

    /// Path of the synthesized manifest, relative to the project directory.
    #[default(_code = "default_manifest_file()")]
    #[serde(default = "default_manifest_file", deserialize_with = "deserialize_pathbuf")]
    pub manifest_file: PathBuf,

    /// Directory the installer materializes dependencies into, relative to the project directory.
    #[default(_code = "default_modules_dir()")]
    #[serde(default = "default_modules_dir", deserialize_with = "deserialize_pathbuf")]
    pub modules_dir: PathBuf,

    /// Whether the manifest carries a `"//"` key flagging it as generated.
    #[default = true]
    #[serde(default = "bool_true", deserialize_with = "deserialize_bool")]
    pub generated_marker: bool,
}

impl Config {
    /// Parse the content of a configuration file.
    pub fn parse(content: &str) -> Result<Self, serde_ini::de::Error> {
        serde_ini::from_str(content)
    }

    /// Load the configuration of the project at `project_dir`.
    ///
    /// Looks for a configuration file in the project directory, then in the home directory.
    /// A missing or invalid file falls back to the defaults.
    pub fn current<HomeDir>(project_dir: &Path, home_dir: HomeDir) -> Self
    where
        HomeDir: FnOnce() -> Option<PathBuf>,
    {
        let candidates = std::iter::once(project_dir.to_path_buf())
            .chain(std::iter::once_with(home_dir).flatten())
            .map(|dir| dir.join(CONFIG_FILE_NAME));

        for path in candidates {
            let Ok(content) = fs::read_to_string(&path) else {
                continue;
            };
            match Config::parse(&content) {
                Ok(config) => {
                    tracing::debug!(target: "pkgsynth::config", ?path, "Loaded");
                    return config;
                }
                Err(error) => {
                    tracing::warn!(target: "pkgsynth::config", ?path, %error, "Ignoring invalid configuration");
                    break;
                }
            }
        }

        Config::default()
    }

    /// Command that installs the project's dependencies.
    pub fn install_command(&self) -> &'_ str {
        self.install_command
            .as_deref()
            .unwrap_or_else(|| self.package_manager.install_command(self.ci))
    }

    pub fn manifest_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.manifest_file)
    }

    pub fn modules_dir(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.modules_dir)
    }

    pub fn lockfile_path(&self, project_dir: &Path) -> PathBuf {
        self.package_manager.lockfile_name().pipe(|name| project_dir.join(name))
    }
}
