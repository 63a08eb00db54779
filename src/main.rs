use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use photobase_tc::batch::{Batch, BatchFailure, ensure_build_dir, load_file_list};
use photobase_tc::config::{MergedConfig, Setting, load_merged_config, user_config_path};
use photobase_tc::logging::init_subscriber;
use photobase_tc::pattern::PatternProgram;

#[derive(Parser)]
#[command(name = "pbtc")]
#[command(
	author,
	version,
	about = "Batch transcoder: runs an external command built from a pattern file for every input file"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	/// Enable debug logging (overridden by PBTC_LOG)
	#[arg(short, long, global = true)]
	verbose: bool,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Print the resolved commands without running them
	Check(BatchArgs),
	/// Run the resolved command for every input file
	Run(BatchArgs),
	/// Check a pattern file for errors and list its records
	Validate {
		/// Pattern file (defaults to `pattern` from .pbtc.toml)
		pattern: Option<PathBuf>,
	},
	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

#[derive(Args)]
struct BatchArgs {
	/// Directory receiving output files (defaults to `build-dir` from .pbtc.toml)
	build_dir: Option<PathBuf>,

	/// File listing one input path per line (defaults to `file-list` from .pbtc.toml)
	file_list: Option<PathBuf>,

	/// Pattern file describing the command (defaults to `pattern` from .pbtc.toml)
	pattern: Option<PathBuf>,
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display merged effective configuration with source annotations
	Show,
	/// Check all config files for errors without running anything
	Validate,
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();
	init_subscriber(cli.verbose);

	match cli.command {
		Commands::Check(args) => handle_check(args),
		Commands::Run(args) => handle_run(args),
		Commands::Validate { pattern } => handle_validate(pattern),
		Commands::Config { action } => match action {
			ConfigAction::Show => handle_config_show(),
			ConfigAction::Validate => handle_config_validate(),
		},
	}
}

fn load_config() -> Result<MergedConfig> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	load_merged_config(&cwd).context("Failed to load configuration")
}

/// Take the command-line value, falling back to the config.
fn pick(arg: Option<PathBuf>, setting: Option<&Setting<PathBuf>>, key: &str) -> Result<PathBuf> {
	arg.or_else(|| setting.map(|s| s.value.clone()))
		.ok_or_else(|| {
			anyhow::anyhow!("No {key} given: pass it as an argument or set `{key}` in .pbtc.toml")
		})
}

fn load_batch(args: BatchArgs, config: &MergedConfig) -> Result<(Batch, PathBuf)> {
	let build_dir = pick(args.build_dir, config.build_dir.as_ref(), "build-dir")?;
	let file_list = pick(args.file_list, config.file_list.as_ref(), "file-list")?;
	let pattern = pick(args.pattern, config.pattern.as_ref(), "pattern")?;

	let program = PatternProgram::load(&pattern)
		.with_context(|| format!("Failed to load pattern file: {}", pattern.display()))?;
	let inputs = load_file_list(&file_list)
		.with_context(|| format!("Failed to load file list: {}", file_list.display()))?;

	Ok((Batch::new(program, inputs, &build_dir), build_dir))
}

fn handle_check(args: BatchArgs) -> Result<ExitCode> {
	let config = load_config()?;
	let (batch, _) = load_batch(args, &config)?;

	let stdout = std::io::stdout();
	batch.check(&mut stdout.lock())?;

	Ok(ExitCode::SUCCESS)
}

fn handle_run(args: BatchArgs) -> Result<ExitCode> {
	let config = load_config()?;
	let (batch, build_dir) = load_batch(args, &config)?;

	ensure_build_dir(&build_dir)?;

	let stdout = std::io::stdout();
	match batch.run(&mut stdout.lock(), config.echo_commands()) {
		Ok(_) => Ok(ExitCode::SUCCESS),
		Err(failure) => {
			report_failure(&failure);
			Err(failure.into())
		}
	}
}

/// Echo the failing command and its tokens to stderr.
fn report_failure(failure: &BatchFailure) {
	eprintln!("Command failed for input: {}", failure.input);
	eprintln!("  {}", failure.command);
	for (i, token) in failure.command.tokens().iter().enumerate() {
		eprintln!("  [{}] {}", i, token);
	}
}

fn handle_validate(pattern: Option<PathBuf>) -> Result<ExitCode> {
	let pattern = match pattern {
		Some(pattern) => pattern,
		None => {
			let config = load_config()?;
			pick(None, config.pattern.as_ref(), "pattern")?
		}
	};

	match PatternProgram::load(&pattern) {
		Ok(program) => {
			print_program(&program);
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Pattern error: {}", e);
			Ok(ExitCode::FAILURE)
		}
	}
}

fn print_program(program: &PatternProgram) {
	println!("{} ({} records)", program.path().display(), program.len());
	for record in program.records() {
		println!(
			"  {:>4}: {:<7} {}",
			record.line_number(),
			record.kind(),
			record.raw_text()
		);
	}
}

fn print_setting(key: &str, setting: Option<&Setting<PathBuf>>) {
	match setting {
		Some(s) => println!("{key} = {}  # from {}", s.value.display(), s.source.display()),
		None => println!("# {key} not set"),
	}
}

fn handle_config_show() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let configs =
		photobase_tc::config::discover_configs(&cwd).context("Failed to discover config files")?;

	if configs.is_empty() {
		println!("No configuration files found.");
	} else {
		println!("Configuration files (in cascade order):");
		for loaded in &configs {
			let marker = if loaded.config.root { " (root)" } else { "" };
			println!("  {}{}", loaded.path.display(), marker);
		}
		println!();

		let merged = photobase_tc::config::merge_configs(&configs);
		print_setting("build-dir", merged.build_dir.as_ref());
		print_setting("file-list", merged.file_list.as_ref());
		print_setting("pattern", merged.pattern.as_ref());
		match merged.echo_commands {
			Some(ref s) => {
				println!("echo-commands = {}  # from {}", s.value, s.source.display())
			}
			None => println!("# echo-commands not set"),
		}
		println!();
	}

	// Show user config path
	if let Ok(user_path) = user_config_path() {
		println!("User config path: {}", user_path.display());
		if user_path.exists() {
			println!("  (exists)");
		} else {
			println!("  (not found)");
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_config_validate() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;

	match photobase_tc::config::discover_configs(&cwd) {
		Ok(configs) => {
			if configs.is_empty() {
				println!("No configuration files found.");
			} else {
				println!("All configuration files are valid:");
				for loaded in &configs {
					println!("  {}", loaded.path.display());
				}
			}
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Configuration error: {}", e);
			Ok(ExitCode::FAILURE)
		}
	}
}
