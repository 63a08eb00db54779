//! pbtc - batch transcoder for photo and video collections.
//!
//! This library provides the core functionality for pbtc, including:
//! - Pattern file parsing and command resolution
//! - File list loading and batch orchestration
//! - Command execution with proper stdio handling
//! - Configuration file parsing and cascade discovery
//!
//! # Example
//!
//! ```
//! use photobase_tc::pattern::PatternProgram;
//! use std::path::Path;
//!
//! let pattern = "ffmpeg\n-i\n%<\n-c:v\ncopy\n%> .mov .mp4 : .mp4\n";
//! let program = PatternProgram::parse_str(pattern, Path::new("copy.pattern")).unwrap();
//!
//! let command = program.resolve("/src/Clip1.MOV", "build/");
//! assert_eq!(command.program(), "ffmpeg");
//! assert_eq!(command.args().last().unwrap(), "build/Clip1.mp4");
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod pattern;

pub use error::{PbtcError, Result, SyntaxIssue};
