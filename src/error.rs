use std::path::PathBuf;

/// Library-level structured errors for pbtc.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum PbtcError {
	#[error("Failed to read pattern file: {path}")]
	PatternRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("{path}:{line}: {issue}: {text}")]
	Grammar {
		path: PathBuf,
		line: usize,
		text: String,
		issue: SyntaxIssue,
	},

	#[error("Pattern file has no records: {path}")]
	EmptyPatternFile { path: PathBuf },

	#[error("{path}:{line}: first record must name the program, found {kind} record")]
	FirstRecordKind {
		path: PathBuf,
		line: usize,
		kind: crate::pattern::RecordKind,
	},

	#[error("Failed to read file list: {path}")]
	FileListRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid value for `{key}` in config file: {path}")]
	InvalidConfigValue { path: PathBuf, key: String },

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,

	#[error("Build directory does not exist: {path}")]
	BuildDirNotFound { path: PathBuf },

	#[error("Build directory is not a directory: {path}")]
	BuildDirNotDirectory { path: PathBuf },

	#[error("Command not found: {command}")]
	CommandNotFound { command: String },

	#[error("Command execution failed: {command}")]
	CommandFailed {
		command: String,
		#[source]
		source: std::io::Error,
	},

	#[error("Command returned non-zero exit code: {command} (exit code: {exit_code})")]
	CommandExitedNonZero { command: String, exit_code: i32 },

	#[error("Failed to write command listing")]
	OutputWrite(#[source] std::io::Error),
}

/// What is wrong with a single pattern line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxIssue {
	#[error("input placeholder `%<` must stand alone on its line")]
	TrailingInputContent,

	#[error("unknown `%` directive (use `%%` for a literal percent sign)")]
	UnknownDirective,

	#[error("missing output extension after `:`")]
	MissingOutputExtension,

	#[error("invalid extension `{0}`")]
	InvalidExtension(String),
}

/// Result type alias using PbtcError.
pub type Result<T> = std::result::Result<T, PbtcError>;
