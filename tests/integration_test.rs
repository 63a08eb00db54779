#![allow(deprecated)] // assert_cmd::Command::cargo_bin is deprecated but replacement requires nightly

use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn pbtc_cmd() -> assert_cmd::Command {
	let mut cmd = assert_cmd::Command::cargo_bin("pbtc").unwrap();
	// Keep the developer's own ~/.pbtc.toml and log settings out of the tests
	cmd.env("PBTC_TEST_ISOLATE", "1").env_remove("PBTC_LOG");
	cmd
}

/// Write a root config so the cascade never leaves the temp dir.
fn write_root_config(dir: &Path, extra: &str) {
	fs::write(
		dir.join(".pbtc.toml"),
		format!("root = true\nroot-config-lookup-disable-env-var = \"PBTC_TEST_ISOLATE\"\n{extra}"),
	)
	.unwrap();
}

const COPY_PATTERN: &str = "ffmpeg\n-i\n%<\n-c:v\ncopy\n%> .mov .mp4 : .mp4\n";

// ============================================================================
// CLI flag tests
// ============================================================================

#[test]
fn test_help_flag() {
	pbtc_cmd()
		.arg("--help")
		.assert()
		.success()
		.stdout(predicate::str::contains("Batch transcoder"));
}

#[test]
fn test_version_flag() {
	pbtc_cmd()
		.arg("--version")
		.assert()
		.success()
		.stdout(predicate::str::contains("pbtc"));
}

#[test]
fn test_no_args_shows_help() {
	pbtc_cmd()
		.assert()
		.failure()
		.stderr(predicate::str::contains("Usage"));
}

// ============================================================================
// check tests
// ============================================================================

#[cfg(unix)]
#[test]
fn test_check_prints_resolved_commands() {
	let temp_dir = tempfile::tempdir().unwrap();
	let dir = temp_dir.path();
	write_root_config(dir, "");
	fs::write(dir.join("copy.pattern"), COPY_PATTERN).unwrap();
	fs::write(dir.join("files.txt"), "/src/Clip1.MOV\n\n/src/clip2.mp4\n").unwrap();

	pbtc_cmd()
		.args(["check", "build", "files.txt", "copy.pattern"])
		.current_dir(dir)
		.assert()
		.success()
		.stdout(
			"ffmpeg\n-i\n/src/Clip1.MOV\n-c:v\ncopy\nbuild/Clip1.mp4\n\n\
			 ffmpeg\n-i\n/src/clip2.mp4\n-c:v\ncopy\nbuild/clip2.mp4\n\n",
		);
}

#[test]
fn test_check_empty_file_list() {
	let temp_dir = tempfile::tempdir().unwrap();
	let dir = temp_dir.path();
	write_root_config(dir, "");
	fs::write(dir.join("copy.pattern"), COPY_PATTERN).unwrap();
	fs::write(dir.join("files.txt"), "\n").unwrap();

	pbtc_cmd()
		.args(["check", "build", "files.txt", "copy.pattern"])
		.current_dir(dir)
		.assert()
		.success()
		.stdout("");
}

#[cfg(unix)]
#[test]
fn test_check_uses_config_defaults() {
	let temp_dir = tempfile::tempdir().unwrap();
	// Canonicalize to handle macOS /var -> /private/var symlinks
	let temp_path = temp_dir.path().canonicalize().unwrap();
	let dir = temp_path.as_path();
	write_root_config(
		dir,
		"build-dir = \"out\"\nfile-list = \"files.txt\"\npattern = \"copy.pattern\"\n",
	);
	fs::write(dir.join("copy.pattern"), COPY_PATTERN).unwrap();
	fs::write(dir.join("files.txt"), "/src/a.mov\n").unwrap();

	// Config paths are resolved against the config file's directory
	let expected_output = format!("{}/out/a.mp4", dir.display());

	pbtc_cmd()
		.arg("check")
		.current_dir(dir)
		.assert()
		.success()
		.stdout(predicate::str::contains(expected_output));
}

#[test]
fn test_check_missing_arguments() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_root_config(temp_dir.path(), "");

	pbtc_cmd()
		.arg("check")
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("No build-dir given"));
}

#[test]
fn test_check_grammar_error_reports_line() {
	let temp_dir = tempfile::tempdir().unwrap();
	let dir = temp_dir.path();
	write_root_config(dir, "");
	fs::write(dir.join("bad.pattern"), "ffmpeg\n\n%<\n%bogus\n").unwrap();
	fs::write(dir.join("files.txt"), "a.mov\n").unwrap();

	pbtc_cmd()
		.args(["check", "build", "files.txt", "bad.pattern"])
		.current_dir(dir)
		.assert()
		.failure()
		.stderr(predicate::str::contains("bad.pattern:4"))
		.stderr(predicate::str::contains("%bogus"));
}

#[test]
fn test_check_first_record_error() {
	let temp_dir = tempfile::tempdir().unwrap();
	let dir = temp_dir.path();
	write_root_config(dir, "");
	fs::write(dir.join("bad.pattern"), "%<\nffmpeg\n").unwrap();
	fs::write(dir.join("files.txt"), "a.mov\n").unwrap();

	pbtc_cmd()
		.args(["check", "build", "files.txt", "bad.pattern"])
		.current_dir(dir)
		.assert()
		.failure()
		.stderr(predicate::str::contains("first record must name the program"));
}

#[test]
fn test_check_missing_file_list() {
	let temp_dir = tempfile::tempdir().unwrap();
	let dir = temp_dir.path();
	write_root_config(dir, "");
	fs::write(dir.join("copy.pattern"), COPY_PATTERN).unwrap();

	pbtc_cmd()
		.args(["check", "build", "missing.txt", "copy.pattern"])
		.current_dir(dir)
		.assert()
		.failure()
		.stderr(predicate::str::contains("Failed to load file list"));
}

// ============================================================================
// run tests (Unix only - these use sh)
// ============================================================================

#[cfg(unix)]
#[test]
fn test_run_creates_outputs() {
	let temp_dir = tempfile::tempdir().unwrap();
	let dir = temp_dir.path();
	write_root_config(dir, "");
	fs::create_dir(dir.join("build")).unwrap();
	fs::create_dir(dir.join("src")).unwrap();
	fs::write(dir.join("src/one.TXT"), "first").unwrap();
	fs::write(dir.join("src/two.txt"), "second").unwrap();
	fs::write(dir.join("files.txt"), "src/one.TXT\nsrc/two.txt\n").unwrap();
	fs::write(
		dir.join("copy.pattern"),
		"sh\n-c\ncp \"$0\" \"$1\"\n%<\n%> .txt : .out\n",
	)
	.unwrap();

	pbtc_cmd()
		.args(["run", "build", "files.txt", "copy.pattern"])
		.current_dir(dir)
		.assert()
		.success();

	assert_eq!(fs::read_to_string(dir.join("build/one.out")).unwrap(), "first");
	assert_eq!(fs::read_to_string(dir.join("build/two.out")).unwrap(), "second");
}

#[cfg(unix)]
#[test]
fn test_run_stops_at_first_failure() {
	let temp_dir = tempfile::tempdir().unwrap();
	let dir = temp_dir.path();
	write_root_config(dir, "");
	fs::create_dir(dir.join("build")).unwrap();
	fs::write(dir.join("files.txt"), "fail\nnext\n").unwrap();
	fs::write(
		dir.join("fail.pattern"),
		"sh\n-c\ntouch \"$1\"; test \"$0\" != fail\n%<\n%> : .done\n",
	)
	.unwrap();

	pbtc_cmd()
		.args(["run", "build", "files.txt", "fail.pattern"])
		.current_dir(dir)
		.assert()
		.failure()
		.stderr(predicate::str::contains("Command failed for input: fail"))
		.stderr(predicate::str::contains("[4] build/fail.done"));

	assert!(dir.join("build/fail.done").exists());
	assert!(
		!dir.join("build/next.done").exists(),
		"Commands after a failure should not run"
	);
}

#[test]
fn test_run_requires_build_dir() {
	let temp_dir = tempfile::tempdir().unwrap();
	let dir = temp_dir.path();
	write_root_config(dir, "");
	fs::write(dir.join("copy.pattern"), COPY_PATTERN).unwrap();
	fs::write(dir.join("files.txt"), "a.mov\n").unwrap();

	pbtc_cmd()
		.args(["run", "missing", "files.txt", "copy.pattern"])
		.current_dir(dir)
		.assert()
		.failure()
		.stderr(predicate::str::contains("Build directory does not exist"));

	fs::write(dir.join("plain"), "").unwrap();
	pbtc_cmd()
		.args(["run", "plain", "files.txt", "copy.pattern"])
		.current_dir(dir)
		.assert()
		.failure()
		.stderr(predicate::str::contains("not a directory"));
}

#[test]
fn test_run_command_not_found() {
	let temp_dir = tempfile::tempdir().unwrap();
	let dir = temp_dir.path();
	write_root_config(dir, "");
	fs::create_dir(dir.join("build")).unwrap();
	fs::write(dir.join("files.txt"), "a.mov\n").unwrap();
	fs::write(dir.join("x.pattern"), "nonexistent_command_12345\n%<\n").unwrap();

	pbtc_cmd()
		.args(["run", "build", "files.txt", "x.pattern"])
		.current_dir(dir)
		.assert()
		.failure()
		.stderr(predicate::str::contains("not found"));
}

#[cfg(unix)]
#[test]
fn test_run_echo_commands() {
	let temp_dir = tempfile::tempdir().unwrap();
	let dir = temp_dir.path();
	write_root_config(dir, "echo-commands = true\n");
	fs::create_dir(dir.join("build")).unwrap();
	fs::write(dir.join("files.txt"), "a\n").unwrap();
	fs::write(dir.join("t.pattern"), "true\n%<\n").unwrap();

	pbtc_cmd()
		.args(["run", "build", "files.txt", "t.pattern"])
		.current_dir(dir)
		.assert()
		.success()
		.stdout("true\na\n\n");
}

// ============================================================================
// validate tests
// ============================================================================

#[test]
fn test_validate_lists_records() {
	let temp_dir = tempfile::tempdir().unwrap();
	let dir = temp_dir.path();
	fs::write(dir.join("copy.pattern"), "ffmpeg\n\n%<\n%%x\n%> .mov : .mp4\n").unwrap();

	pbtc_cmd()
		.args(["validate", "copy.pattern"])
		.current_dir(dir)
		.assert()
		.success()
		.stdout(predicate::str::contains("(4 records)"))
		.stdout(predicate::str::contains("3: input"))
		.stdout(predicate::str::contains("4: escape"))
		.stdout(predicate::str::contains("5: output"));
}

#[test]
fn test_validate_empty_pattern() {
	let temp_dir = tempfile::tempdir().unwrap();
	let dir = temp_dir.path();
	fs::write(dir.join("empty.pattern"), "\n  \n").unwrap();

	pbtc_cmd()
		.args(["validate", "empty.pattern"])
		.current_dir(dir)
		.assert()
		.failure()
		.stderr(predicate::str::contains("no records"));
}

// ============================================================================
// config subcommand tests
// ============================================================================

#[test]
fn test_config_validate_valid_config() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_root_config(temp_dir.path(), "pattern = \"copy.pattern\"\n");

	pbtc_cmd()
		.args(["config", "validate"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("valid"));
}

#[test]
fn test_config_validate_invalid_config() {
	let temp_dir = tempfile::tempdir().unwrap();
	fs::write(temp_dir.path().join(".pbtc.toml"), "invalid toml [[[").unwrap();

	pbtc_cmd()
		.args(["config", "validate"])
		.current_dir(temp_dir.path())
		.assert()
		.failure();
}

#[test]
fn test_config_show_displays_config() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_root_config(temp_dir.path(), "build-dir = \"out\"\necho-commands = true\n");

	pbtc_cmd()
		.args(["config", "show"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("(root)"))
		.stdout(predicate::str::contains("build-dir ="))
		.stdout(predicate::str::contains("echo-commands = true"))
		.stdout(predicate::str::contains("# pattern not set"));
}
