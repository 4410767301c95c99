use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::ffi::OsString;
use std::process::Command;
use tracing::instrument;

/// Runs an external program to completion and hands back its stdout.
pub trait CommandRunner: Send + Sync {
    /// # Errors
    ///
    /// - [`ToolNotFound`](ErrorKind::ToolNotFound) if `program` can't be found.
    /// - [`ToolFailed`](ErrorKind::ToolFailed) if it can't be started or
    ///   exits unsuccessfully.
    fn run(&self, program: &str, args: &[OsString]) -> Result<String>;
}

/// Resolves programs on `PATH` and runs them with [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    #[instrument(skip(self, args), fields(args = args.len()))]
    fn run(&self, program: &str, args: &[OsString]) -> Result<String> {
        let executable = which::which(program).or_raise(|| ErrorKind::ToolNotFound(program.to_string()))?;
        tracing::trace!(executable = %executable.display(), "Resolved program");
        let output =
            Command::new(&executable).args(args).output().or_raise(|| ErrorKind::ToolFailed(program.to_string()))?;
        if !output.status.success() {
            tracing::warn!(
                program,
                status = %output.status,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "Program exited unsuccessfully"
            );
            exn::bail!(ErrorKind::ToolFailed(program.to_string()));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_captures_stdout() {
        let output = SystemRunner.run("echo", &["hello".into(), "world".into()]).unwrap();
        assert_eq!(output, "hello world\n");
    }

    #[test]
    fn test_missing_program() {
        let err = SystemRunner.run("filemeta-no-such-program", &[]).unwrap_err();
        assert_eq!(*err, ErrorKind::ToolNotFound("filemeta-no-such-program".to_string()));
    }

    #[test]
    fn test_unsuccessful_exit() {
        let err = SystemRunner.run("false", &[]).unwrap_err();
        assert_eq!(*err, ErrorKind::ToolFailed("false".to_string()));
    }
}
