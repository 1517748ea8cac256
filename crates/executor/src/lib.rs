use derive_more::{Display, Error};
use miette::Diagnostic;
use std::{
    path::{Path, PathBuf},
    process::{Command, ExitStatus},
};

/// Error type of [`Executor::execute`].
#[derive(Debug, Display, Error, Diagnostic)]
#[non_exhaustive]
pub enum ExecutorError {
    #[display("Failed to spawn {command:?}: {error}")]
    #[diagnostic(code(pkgsynth_executor::spawn))]
    Spawn {
        command: String,
        #[error(source)]
        error: std::io::Error,
    },

    #[display("Command {command:?} exited with {status}")]
    #[diagnostic(code(pkgsynth_executor::exit_status))]
    ExitStatus { command: String, status: ExitStatus },

    /// Failure reported by a non-process executor, such as a test double.
    #[display("Command {command:?} failed: {message}")]
    #[diagnostic(code(pkgsynth_executor::failed))]
    Failed { command: String, message: String },
}

/// Options of [`Executor::execute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteOptions {
    /// Directory the command runs in.
    pub working_directory: PathBuf,
}

impl ExecuteOptions {
    pub fn in_dir(working_directory: impl Into<PathBuf>) -> Self {
        ExecuteOptions { working_directory: working_directory.into() }
    }
}

/// Capability to run an external command and wait for it.
///
/// Side effects of the command land on disk; the caller only learns whether it succeeded.
pub trait Executor {
    fn execute(&self, command: &str, options: &ExecuteOptions) -> Result<(), ExecutorError>;
}

impl<E: Executor + ?Sized> Executor for &E {
    fn execute(&self, command: &str, options: &ExecuteOptions) -> Result<(), ExecutorError> {
        (**self).execute(command, options)
    }
}

/// Runs commands through the platform shell.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellExecutor;

impl Executor for ShellExecutor {
    fn execute(&self, command: &str, options: &ExecuteOptions) -> Result<(), ExecutorError> {
        tracing::info!(target: "pkgsynth::installer", ?command, cwd = ?options.working_directory, "Execute");

        let status = shell_command(command, &options.working_directory)
            .status()
            .map_err(|error| ExecutorError::Spawn { command: command.to_string(), error })?;

        if !status.success() {
            return Err(ExecutorError::ExitStatus { command: command.to_string(), status });
        }

        Ok(())
    }
}

fn shell_command(command: &str, working_directory: &Path) -> Command {
    #[cfg(windows)]
    let mut cmd = {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command);
        cmd
    };
    #[cfg(not(windows))]
    let mut cmd = {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    };
    cmd.current_dir(working_directory);
    cmd
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn runs_in_working_directory() {
        let dir = tempdir().unwrap();
        ShellExecutor
            .execute("echo hello > out.txt", &ExecuteOptions::in_dir(dir.path()))
            .unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("out.txt")).unwrap(), "hello\n");
    }

    #[test]
    fn non_zero_exit_is_an_error() {
        let dir = tempdir().unwrap();
        let error =
            ShellExecutor.execute("exit 3", &ExecuteOptions::in_dir(dir.path())).unwrap_err();
        dbg!(&error);
        assert!(matches!(&error, ExecutorError::ExitStatus { command, status }
            if command == "exit 3" && status.code() == Some(3)));
    }

    #[test]
    fn missing_working_directory_fails_to_spawn() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing");
        let error = ShellExecutor.execute("true", &ExecuteOptions::in_dir(missing)).unwrap_err();
        dbg!(&error);
        assert!(matches!(error, ExecutorError::Spawn { .. }));
    }

    #[test]
    fn executor_by_reference() {
        fn run(executor: impl Executor, dir: &Path) -> Result<(), ExecutorError> {
            executor.execute("true", &ExecuteOptions::in_dir(dir))
        }
        let dir = tempdir().unwrap();
        run(&ShellExecutor, dir.path()).unwrap();
    }
}
