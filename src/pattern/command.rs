use std::fmt;

/// A fully resolved command line: one token per pattern record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCommand {
	tokens: Vec<String>,
}

impl ResolvedCommand {
	pub(crate) fn new(tokens: Vec<String>) -> Self {
		ResolvedCommand { tokens }
	}

	pub fn tokens(&self) -> &[String] {
		&self.tokens
	}

	/// The program to invoke (first token).
	pub fn program(&self) -> &str {
		self.tokens.first().map(String::as_str).unwrap_or_default()
	}

	/// Arguments passed to the program.
	pub fn args(&self) -> &[String] {
		self.tokens.get(1..).unwrap_or_default()
	}

	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}

	pub fn into_tokens(self) -> Vec<String> {
		self.tokens
	}
}

/// Space-joined, for one-line log and error messages.
impl fmt::Display for ResolvedCommand {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.tokens.join(" "))
	}
}
