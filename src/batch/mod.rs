//! Batch processing for pbtc.
//!
//! This module handles:
//! - Loading the list of input files
//! - Printing resolved commands (check mode)
//! - Running resolved commands in order, stopping at the first failure

pub mod file_list;

pub use file_list::{load_file_list, parse_file_list};

use crate::error::{PbtcError, Result};
use crate::exec::run_checked;
use crate::pattern::{PatternProgram, ResolvedCommand};
use std::io::Write;
use std::path::{MAIN_SEPARATOR, Path};
use tracing::{debug, info, warn};

/// A batch run stopped at one input file.
#[derive(Debug, thiserror::Error)]
#[error("Failed to process {input}")]
pub struct BatchFailure {
	/// The input file being processed.
	pub input: String,

	/// The command that was (or would have been) run.
	pub command: ResolvedCommand,

	#[source]
	pub source: PbtcError,
}

/// A pattern program paired with its input files and build directory.
#[derive(Debug)]
pub struct Batch {
	program: PatternProgram,
	inputs: Vec<String>,
	build_dir: String,
}

impl Batch {
	pub fn new(program: PatternProgram, inputs: Vec<String>, build_dir: &Path) -> Self {
		if inputs.is_empty() {
			warn!("file list is empty, nothing to do");
		}

		Batch {
			program,
			inputs,
			build_dir: normalize_build_dir(build_dir),
		}
	}

	pub fn program(&self) -> &PatternProgram {
		&self.program
	}

	pub fn inputs(&self) -> &[String] {
		&self.inputs
	}

	/// Build directory with a trailing separator.
	pub fn build_dir(&self) -> &str {
		&self.build_dir
	}

	/// All resolved commands, in file-list order.
	pub fn commands(&self) -> Vec<ResolvedCommand> {
		self.program.resolve_all(&self.inputs, &self.build_dir)
	}

	/// Print every command without running anything.
	pub fn check<W: Write>(&self, out: &mut W) -> Result<()> {
		for command in self.commands() {
			write_command(out, &command).map_err(PbtcError::OutputWrite)?;
		}
		out.flush().map_err(PbtcError::OutputWrite)
	}

	/// Run every command as a subprocess. Returns the number of commands run.
	///
	/// When `echo` is set each command is printed to `out` first, in the
	/// same format as [`Batch::check`].
	pub fn run<W: Write>(
		&self,
		out: &mut W,
		echo: bool,
	) -> std::result::Result<usize, BatchFailure> {
		self.run_with(out, echo, run_checked)
	}

	/// Like [`Batch::run`] but with a custom executor.
	pub fn run_with<W, F>(
		&self,
		out: &mut W,
		echo: bool,
		mut execute: F,
	) -> std::result::Result<usize, BatchFailure>
	where
		W: Write,
		F: FnMut(&ResolvedCommand) -> Result<()>,
	{
		let total = self.inputs.len();

		for (index, input) in self.inputs.iter().enumerate() {
			let command = self.program.resolve(input, &self.build_dir);
			info!("[{}/{}] {}", index + 1, total, input);
			debug!(command = %command, "resolved");

			let outcome = if echo {
				write_command(out, &command)
					.and_then(|()| out.flush())
					.map_err(PbtcError::OutputWrite)
					.and_then(|()| execute(&command))
			} else {
				execute(&command)
			};

			if let Err(source) = outcome {
				return Err(BatchFailure {
					input: input.clone(),
					command,
					source,
				});
			}
		}

		info!("processed {} file(s)", total);
		Ok(total)
	}
}

/// Write one command: a token per line, then a blank line.
pub fn write_command<W: Write>(out: &mut W, command: &ResolvedCommand) -> std::io::Result<()> {
	for token in command.tokens() {
		writeln!(out, "{}", token)?;
	}
	writeln!(out)
}

/// Make sure output paths land inside the build directory by giving it a
/// trailing separator.
pub fn normalize_build_dir(build_dir: &Path) -> String {
	let mut dir = build_dir.to_string_lossy().into_owned();
	if !dir.is_empty() && !dir.ends_with(std::path::is_separator) {
		dir.push(MAIN_SEPARATOR);
	}
	dir
}

/// The build directory must exist before anything runs.
pub fn ensure_build_dir(build_dir: &Path) -> Result<()> {
	if !build_dir.exists() {
		return Err(PbtcError::BuildDirNotFound {
			path: build_dir.to_path_buf(),
		});
	}
	if !build_dir.is_dir() {
		return Err(PbtcError::BuildDirNotDirectory {
			path: build_dir.to_path_buf(),
		});
	}
	Ok(())
}
