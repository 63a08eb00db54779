use crate::error::SyntaxIssue;
use std::fmt;

/// The four kinds of pattern records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
	Literal,
	Escape,
	Input,
	Output,
}

impl RecordKind {
	/// Name used in diagnostics and `pbtc validate` listings.
	pub fn as_str(&self) -> &'static str {
		match self {
			RecordKind::Literal => "literal",
			RecordKind::Escape => "escape",
			RecordKind::Input => "input",
			RecordKind::Output => "output",
		}
	}

	/// Whether a record of this kind may open a pattern file.
	pub fn names_program(&self) -> bool {
		matches!(self, RecordKind::Literal | RecordKind::Escape)
	}
}

impl fmt::Display for RecordKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.pad(self.as_str())
	}
}

/// Parsed body of a `%>` record.
///
/// Format: `%> [ext ext ...] [: ext]`. The listed input extensions are
/// tried in order against the input file name; the first one that matches
/// (ignoring case) is stripped. The output extension, if any, is appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputSpec {
	/// Lowercased input extensions, in declaration order.
	pub input_extensions: Vec<String>,

	/// Extension appended after stripping, case preserved.
	pub output_extension: Option<String>,
}

impl OutputSpec {
	/// Parse the text following `%>`.
	pub fn parse(spec: &str) -> Result<Self, SyntaxIssue> {
		let spec = spec.trim();

		let (inputs, output_extension) = match spec.rsplit_once(':') {
			Some((head, tail)) => {
				let tail = tail.trim();
				if tail.is_empty() {
					return Err(SyntaxIssue::MissingOutputExtension);
				}
				validate_extension(tail)?;
				(head.trim(), Some(tail.to_string()))
			}
			None => (spec, None),
		};

		let input_extensions = inputs
			.split_whitespace()
			.map(|ext| validate_extension(ext).map(|()| ext.to_ascii_lowercase()))
			.collect::<Result<Vec<_>, _>>()?;

		Ok(OutputSpec {
			input_extensions,
			output_extension,
		})
	}

	/// Rewrite a bare file name: strip the first matching input extension,
	/// then append the output extension.
	pub fn rewrite_file_name(&self, file_name: &str) -> String {
		let stem = self
			.input_extensions
			.iter()
			.find_map(|ext| strip_extension(file_name, ext))
			.unwrap_or(file_name);

		match self.output_extension {
			Some(ref ext) => format!("{stem}{ext}"),
			None => stem.to_string(),
		}
	}

	/// Resolve against an input path, placing the result in `build_dir`.
	///
	/// Only the directory part of `build_dir` (up to and including its last
	/// separator) is used.
	pub fn resolve(&self, input_path: &str, build_dir: &str) -> String {
		let (_, file_name) = split_file_name(input_path);
		let (directory, _) = split_file_name(build_dir);
		format!("{directory}{}", self.rewrite_file_name(file_name))
	}
}

/// One classified pattern line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternLine {
	/// Emitted verbatim.
	Literal(String),

	/// Holds the text with its leading `%` already removed.
	Escape(String),

	/// Replaced by the input path.
	Input,

	/// Replaced by a derived path in the build directory.
	Output(OutputSpec),
}

impl PatternLine {
	/// Classify a trimmed, non-empty line.
	pub fn parse(raw_text: &str) -> Result<Self, SyntaxIssue> {
		let Some(rest) = raw_text.strip_prefix('%') else {
			return Ok(PatternLine::Literal(raw_text.to_string()));
		};

		if rest.starts_with('%') {
			Ok(PatternLine::Escape(rest.to_string()))
		} else if let Some(tail) = rest.strip_prefix('<') {
			if tail.is_empty() {
				Ok(PatternLine::Input)
			} else {
				Err(SyntaxIssue::TrailingInputContent)
			}
		} else if let Some(spec) = rest.strip_prefix('>') {
			OutputSpec::parse(spec).map(PatternLine::Output)
		} else {
			Err(SyntaxIssue::UnknownDirective)
		}
	}

	pub fn kind(&self) -> RecordKind {
		match self {
			PatternLine::Literal(_) => RecordKind::Literal,
			PatternLine::Escape(_) => RecordKind::Escape,
			PatternLine::Input => RecordKind::Input,
			PatternLine::Output(_) => RecordKind::Output,
		}
	}

	/// Produce the command token for this line.
	pub fn resolve(&self, input_path: &str, build_dir: &str) -> String {
		match self {
			PatternLine::Literal(text) | PatternLine::Escape(text) => text.clone(),
			PatternLine::Input => input_path.to_string(),
			PatternLine::Output(spec) => spec.resolve(input_path, build_dir),
		}
	}
}

/// Check an extension token: printable ASCII, no path separators or colons.
pub fn is_valid_extension(ext: &str) -> bool {
	!ext.is_empty()
		&& ext
			.bytes()
			.all(|b| (0x21..=0x7e).contains(&b) && !matches!(b, b'/' | b'\\' | b':'))
}

fn validate_extension(ext: &str) -> Result<(), SyntaxIssue> {
	if is_valid_extension(ext) {
		Ok(())
	} else {
		Err(SyntaxIssue::InvalidExtension(ext.to_string()))
	}
}

/// Strip `ext` (lowercase ASCII) from the end of `file_name`, ignoring case.
/// The extension must be strictly shorter than the name.
fn strip_extension<'a>(file_name: &'a str, ext: &str) -> Option<&'a str> {
	if ext.len() >= file_name.len() {
		return None;
	}
	let split = file_name.len() - ext.len();
	let tail = file_name.get(split..)?;
	if tail.eq_ignore_ascii_case(ext) {
		Some(&file_name[..split])
	} else {
		None
	}
}

fn is_boundary(c: char) -> bool {
	std::path::is_separator(c) || (cfg!(windows) && c == ':')
}

/// Split a path string into its volume+directory part (keeping the trailing
/// separator) and its file name.
fn split_file_name(path: &str) -> (&str, &str) {
	match path.rfind(is_boundary) {
		Some(idx) => path.split_at(idx + 1),
		None => ("", path),
	}
}
