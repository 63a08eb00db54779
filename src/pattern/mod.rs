//! Pattern files for pbtc.
//!
//! This module handles:
//! - Classifying pattern lines (literal, escape, input, output)
//! - Output path derivation by extension stripping and appending
//! - Loading and validating whole pattern files
//! - Resolving a program into one command per input file

pub mod command;
pub mod line;
pub mod program;

pub use command::ResolvedCommand;
pub use line::{OutputSpec, PatternLine, RecordKind, is_valid_extension};
pub use program::{PatternProgram, PatternRecord};
