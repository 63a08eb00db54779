//! Command execution for pbtc.
//!
//! This module handles:
//! - Executing resolved commands with inherited stdio
//! - Turning non-zero exit statuses into errors

use crate::error::{PbtcError, Result};
use crate::pattern::ResolvedCommand;
use std::process::{Command, ExitStatus, Stdio};
use tracing::debug;

/// Execute a resolved command with proper stdio handling.
///
/// This function:
/// - Passes stdin, stdout, stderr through to the child process
/// - Returns the exit status of the child process
pub fn execute_command(command: &ResolvedCommand) -> Result<ExitStatus> {
	let program = command.program();
	debug!(program, args = command.args().len(), "spawning");

	let mut cmd = Command::new(program);
	cmd.args(command.args())
		.stdin(Stdio::inherit())
		.stdout(Stdio::inherit())
		.stderr(Stdio::inherit());

	let status = cmd.status().map_err(|source| {
		if source.kind() == std::io::ErrorKind::NotFound {
			PbtcError::CommandNotFound {
				command: program.to_string(),
			}
		} else {
			PbtcError::CommandFailed {
				command: program.to_string(),
				source,
			}
		}
	})?;

	Ok(status)
}

/// Execute a command and require a zero exit status.
///
/// A child killed by a signal has no exit code and is reported as `-1`.
pub fn run_checked(command: &ResolvedCommand) -> Result<()> {
	let status = execute_command(command)?;

	if !status.success() {
		return Err(PbtcError::CommandExitedNonZero {
			command: command.program().to_string(),
			exit_code: status.code().unwrap_or(-1),
		});
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::pattern::PatternProgram;
	use std::path::Path;

	fn command(pattern: &str) -> ResolvedCommand {
		PatternProgram::parse_str(pattern, Path::new("test.pattern"))
			.unwrap()
			.resolve("input", "out/")
	}

	#[test]
	fn test_command_not_found() {
		let result = execute_command(&command("/nonexistent/path/to/binary\n"));
		match result.unwrap_err() {
			PbtcError::CommandNotFound { command } => {
				assert_eq!(command, "/nonexistent/path/to/binary");
			}
			other => panic!("Expected CommandNotFound error, got {other:?}"),
		}
	}

	#[cfg(unix)]
	#[test]
	fn test_run_checked_success() {
		assert!(run_checked(&command("true\n")).is_ok());
	}

	#[cfg(unix)]
	#[test]
	fn test_run_checked_exit_code() {
		let result = run_checked(&command("sh\n-c\nexit 7\n"));
		match result.unwrap_err() {
			PbtcError::CommandExitedNonZero { command, exit_code } => {
				assert_eq!(command, "sh");
				assert_eq!(exit_code, 7);
			}
			other => panic!("Expected CommandExitedNonZero error, got {other:?}"),
		}
	}

	#[cfg(unix)]
	#[test]
	fn test_input_is_passed_as_argument() {
		// `test "$0" = input` succeeds only if the placeholder was substituted
		let result = run_checked(&command("sh\n-c\ntest \"$0\" = input\n%<\n"));
		assert!(result.is_ok());
	}
}
