use assert_cmd::prelude::*;
use command_extra::CommandExtra;
use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};
use tempfile::{tempdir, TempDir};
use text_block_macros::text_block_fnl;

/// Install script that behaves like `yarn install` for a single `ms` dependency:
/// a `"*"` range materializes `ms@2.1.3`, any range is copied into `yarn.lock`,
/// and every call is appended to `install.log`.
pub const FAKE_YARN_SCRIPT: &str = text_block_fnl! {
    "set -e"
    "echo install >> install.log"
    "range=$(sed -n 's/.*\"ms\": \"\\([^\"]*\\)\".*/\\1/p' package.json | head -n 1)"
    "if [ \"$range\" = \"*\" ]; then"
    "  mkdir -p node_modules/ms"
    "  echo '{ \"name\": \"ms\", \"version\": \"2.1.3\" }' > node_modules/ms/package.json"
    "fi"
    "mkdir -p node_modules"
    "printf 'ms: %s' \"$range\" > yarn.lock"
};

/// Write `.pkgsynthrc` and `install.sh` so that `pkgsynth synth` runs [`FAKE_YARN_SCRIPT`].
pub fn use_fake_yarn(workspace: &Path) {
    fs::write(workspace.join("install.sh"), FAKE_YARN_SCRIPT).expect("write to install.sh");
    fs::write(workspace.join(".pkgsynthrc"), "install-command=sh install.sh\n")
        .expect("write to .pkgsynthrc");
}

/// Number of lines in `install.log`, i.e. how many times the fake installer ran.
pub fn install_count(workspace: &Path) -> usize {
    match fs::read_to_string(workspace.join("install.log")) {
        Ok(log) => log.lines().count(),
        Err(_) => 0,
    }
}

/// `pkgsynth` command that runs in `workspace`, with `home` as its home directory.
pub fn pkgsynth_in(workspace: &Path, home: &Path) -> Command {
    Command::cargo_bin("pkgsynth")
        .expect("find the pkgsynth binary")
        .with_current_dir(workspace)
        .with_env("HOME", home)
}

pub fn pkgsynth_with_temp_cwd() -> (Command, TempDir, PathBuf) {
    let root = tempdir().expect("create temporary directory");
    let workspace = root.path().join("workspace");
    fs::create_dir(&workspace).expect("create temporary workspace for pkgsynth");
    let command = pkgsynth_in(&workspace, root.path());
    (command, root, workspace)
}
