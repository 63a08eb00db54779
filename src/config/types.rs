use crate::error::PbtcError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top-level configuration from a `.pbtc.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
	/// If true, stop directory cascade and jump directly to ~/.pbtc.toml.
	#[serde(default)]
	pub root: bool,

	/// Environment variable name that, if truthy, skips ~/.pbtc.toml lookup.
	/// Useful for CI environments.
	#[serde(default)]
	pub root_config_lookup_disable_env_var: Option<String>,

	/// Default build directory for `run` and `check`.
	pub build_dir: Option<PathBuf>,

	/// Default file list.
	pub file_list: Option<PathBuf>,

	/// Default pattern file.
	pub pattern: Option<PathBuf>,

	/// Print each command before running it.
	pub echo_commands: Option<bool>,
}

/// A loaded configuration with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration.
	pub config: Config,

	/// The path this config was loaded from.
	pub path: PathBuf,
}

impl LoadedConfig {
	/// Directory that relative paths in this config are resolved against.
	pub fn base_dir(&self) -> &Path {
		self.path.parent().unwrap_or_else(|| Path::new(""))
	}
}

/// A value together with the config file that set it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting<T> {
	pub value: T,
	pub source: PathBuf,
}

/// Effective configuration after merging the cascade.
///
/// Each key takes the value from the most specific file that sets it.
#[derive(Debug, Clone, Default)]
pub struct MergedConfig {
	pub build_dir: Option<Setting<PathBuf>>,
	pub file_list: Option<Setting<PathBuf>>,
	pub pattern: Option<Setting<PathBuf>>,
	pub echo_commands: Option<Setting<bool>>,
}

impl MergedConfig {
	pub fn echo_commands(&self) -> bool {
		self.echo_commands.as_ref().is_some_and(|s| s.value)
	}
}

impl Config {
	/// Reject path settings that are present but empty.
	pub fn validate(&self, path: &Path) -> Result<(), PbtcError> {
		let path_fields = [
			("build-dir", &self.build_dir),
			("file-list", &self.file_list),
			("pattern", &self.pattern),
		];

		for (key, value) in path_fields {
			if value.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
				return Err(PbtcError::InvalidConfigValue {
					path: path.to_path_buf(),
					key: key.to_string(),
				});
			}
		}

		if self
			.root_config_lookup_disable_env_var
			.as_ref()
			.is_some_and(|var| var.is_empty())
		{
			return Err(PbtcError::InvalidConfigValue {
				path: path.to_path_buf(),
				key: "root-config-lookup-disable-env-var".to_string(),
			});
		}

		Ok(())
	}
}
