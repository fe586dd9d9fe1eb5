use crate::{Error, Result};
use log::debug;
use std::process::Command;

/// Runs an external program with a pre-rendered argument string.
pub trait CommandRunner: Send + Sync {
    /// Run `program` synchronously, inheriting the working directory and
    /// environment. A non-zero exit is an [`Error::ExternalToolFailure`].
    fn exec(&self, program: &str, arguments: &str) -> Result<()>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn exec(&self, program: &str, arguments: &str) -> Result<()> {
        (**self).exec(program, arguments)
    }
}

/// `CommandRunner` backed by `std::process`.
///
/// On Windows the argument string reaches the program verbatim. Elsewhere
/// the command line is handed to `sh -c`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl ProcessRunner {
    #[cfg(windows)]
    fn command(program: &str, arguments: &str) -> Command {
        use std::os::windows::process::CommandExt;

        let mut cmd = Command::new(program);
        cmd.raw_arg(arguments);
        cmd
    }

    #[cfg(not(windows))]
    fn command(program: &str, arguments: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(format!("{} {}", program, arguments));
        cmd
    }
}

impl CommandRunner for ProcessRunner {
    fn exec(&self, program: &str, arguments: &str) -> Result<()> {
        debug!("running {}", program);
        let status = Self::command(program, arguments)
            .status()
            .map_err(|e| Error::ExternalToolFailure {
                program: program.to_string(),
                reason: e.to_string(),
            })?;

        if !status.success() {
            return Err(Error::ExternalToolFailure {
                program: program.to_string(),
                reason: match status.code() {
                    Some(code) => format!("exit code {}", code),
                    None => "terminated by signal".to_string(),
                },
            });
        }
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_successful_command() {
        ProcessRunner.exec("true", "").unwrap();
    }

    #[test]
    fn test_arguments_are_passed_through_the_shell() {
        ProcessRunner.exec("test", "'a b' = 'a b'").unwrap();
    }

    #[test]
    fn test_non_zero_exit_is_failure() {
        let err = ProcessRunner.exec("exit", "3").unwrap_err();
        assert!(matches!(
            err,
            Error::ExternalToolFailure { ref program, ref reason }
                if program == "exit" && reason == "exit code 3"
        ));
    }
}
