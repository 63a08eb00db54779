use crate::error::{PbtcError, Result};
use std::path::Path;

/// Read a file list: one input path per line, blank lines ignored.
pub fn load_file_list(path: &Path) -> Result<Vec<String>> {
	let content = std::fs::read_to_string(path).map_err(|source| PbtcError::FileListRead {
		path: path.to_path_buf(),
		source,
	})?;

	Ok(parse_file_list(&content))
}

/// Parse file list text (useful for testing).
pub fn parse_file_list(content: &str) -> Vec<String> {
	content
		.lines()
		.map(str::trim)
		.filter(|line| !line.is_empty())
		.map(str::to_string)
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_file_list() {
		let files = parse_file_list("/a/one.jpg\r\n\r\n  /a/two.jpg  \n\n/a/three.mov");
		assert_eq!(files, vec!["/a/one.jpg", "/a/two.jpg", "/a/three.mov"]);
	}

	#[test]
	fn test_parse_empty_file_list() {
		assert!(parse_file_list("").is_empty());
		assert!(parse_file_list("\n \n").is_empty());
	}

	#[test]
	fn test_load_file_list() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("files.txt");
		std::fs::write(&path, "b.jpg\na.jpg\n").unwrap();

		assert_eq!(load_file_list(&path).unwrap(), vec!["b.jpg", "a.jpg"]);
	}

	#[test]
	fn test_load_missing_file_list() {
		let result = load_file_list(Path::new("/nonexistent/files.txt"));
		assert!(matches!(result, Err(PbtcError::FileListRead { .. })));
	}
}
