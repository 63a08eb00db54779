use crate::error::{PbtcError, Result};
use crate::pattern::command::ResolvedCommand;
use crate::pattern::line::{PatternLine, RecordKind};
use std::path::{Path, PathBuf};
use tracing::debug;

/// One non-blank line of a pattern file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternRecord {
	line_number: usize,
	raw_text: String,
	line: PatternLine,
}

impl PatternRecord {
	/// 1-based line number in the source file.
	pub fn line_number(&self) -> usize {
		self.line_number
	}

	/// The trimmed source text.
	pub fn raw_text(&self) -> &str {
		&self.raw_text
	}

	pub fn kind(&self) -> RecordKind {
		self.line.kind()
	}

	pub fn line(&self) -> &PatternLine {
		&self.line
	}

	pub fn resolve(&self, input_path: &str, build_dir: &str) -> String {
		self.line.resolve(input_path, build_dir)
	}
}

/// A loaded pattern file: the template for one external command.
///
/// Every line is parsed when the program is loaded, so resolving it
/// against an input file can never fail.
#[derive(Debug, Clone)]
pub struct PatternProgram {
	path: PathBuf,
	records: Vec<PatternRecord>,
}

impl PatternProgram {
	/// Load a pattern file from disk.
	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path).map_err(|source| PbtcError::PatternRead {
			path: path.to_path_buf(),
			source,
		})?;

		Self::parse_str(&content, path)
	}

	/// Parse pattern text. `path` is only used in diagnostics.
	pub fn parse_str(content: &str, path: &Path) -> Result<Self> {
		let mut records: Vec<PatternRecord> = Vec::new();

		// `lines` strips both "\n" and "\r\n" terminators
		for (index, physical) in content.lines().enumerate() {
			let line_number = index + 1;
			let raw_text = physical.trim();
			if raw_text.is_empty() {
				continue;
			}

			let line = PatternLine::parse(raw_text).map_err(|issue| PbtcError::Grammar {
				path: path.to_path_buf(),
				line: line_number,
				text: raw_text.to_string(),
				issue,
			})?;

			if records.is_empty() && !line.kind().names_program() {
				return Err(PbtcError::FirstRecordKind {
					path: path.to_path_buf(),
					line: line_number,
					kind: line.kind(),
				});
			}

			records.push(PatternRecord {
				line_number,
				raw_text: raw_text.to_string(),
				line,
			});
		}

		if records.is_empty() {
			return Err(PbtcError::EmptyPatternFile {
				path: path.to_path_buf(),
			});
		}

		debug!(
			path = %path.display(),
			records = records.len(),
			"loaded pattern file"
		);

		Ok(PatternProgram {
			path: path.to_path_buf(),
			records,
		})
	}

	/// Where this program was loaded from.
	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn records(&self) -> &[PatternRecord] {
		&self.records
	}

	/// Number of records, which is also the token count of every command.
	pub fn len(&self) -> usize {
		self.records.len()
	}

	/// Always false for a loaded program.
	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	/// Build the command for one input file.
	pub fn resolve(&self, input_path: &str, build_dir: &str) -> ResolvedCommand {
		let tokens = self
			.records
			.iter()
			.map(|record| record.resolve(input_path, build_dir))
			.collect();

		ResolvedCommand::new(tokens)
	}

	/// Build one command per input, in input order.
	pub fn resolve_all<S: AsRef<str>>(
		&self,
		inputs: &[S],
		build_dir: &str,
	) -> Vec<ResolvedCommand> {
		inputs
			.iter()
			.map(|input| self.resolve(input.as_ref(), build_dir))
			.collect()
	}
}
