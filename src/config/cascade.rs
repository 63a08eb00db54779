use crate::config::parser::parse_config_file;
use crate::config::types::{LoadedConfig, MergedConfig, Setting};
use crate::error::{PbtcError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the per-directory config file.
pub const CONFIG_FILE_NAME: &str = ".pbtc.toml";

/// Discover and load all config files in the cascade.
///
/// The cascade order is:
/// 1. Start from `start_dir` and look for `.pbtc.toml`
/// 2. If found and `root = true`, skip to user config only
/// 3. Otherwise, continue up the directory tree
/// 4. Finally, check ~/.pbtc.toml (unless disabled or already found)
///
/// Returns configs in cascade order (most specific first).
pub fn discover_configs(start_dir: &Path) -> Result<Vec<LoadedConfig>> {
	let mut configs = Vec::new();
	let mut current_dir = start_dir.to_path_buf();

	// Walk up the directory tree
	loop {
		let config_path = current_dir.join(CONFIG_FILE_NAME);

		if config_path.is_file() {
			debug!(path = %config_path.display(), "found config");
			let config = parse_config_file(&config_path)?;
			let is_root = config.root;

			configs.push(LoadedConfig {
				config,
				path: config_path,
			});

			if is_root {
				break;
			}
		}

		// Move to parent directory
		if let Some(parent) = current_dir.parent() {
			current_dir = parent.to_path_buf();
		} else {
			break;
		}
	}

	// Check user config unless disabled by env var
	if let Some(user_config) = load_user_config(&configs)? {
		configs.push(user_config);
	}

	Ok(configs)
}

/// Load the user's ~/.pbtc.toml if it exists and isn't disabled.
fn load_user_config(existing_configs: &[LoadedConfig]) -> Result<Option<LoadedConfig>> {
	// Check if any config disables user config lookup via env var
	for loaded in existing_configs {
		if let Some(ref env_var) = loaded.config.root_config_lookup_disable_env_var
			&& is_env_truthy(env_var)
		{
			return Ok(None);
		}
	}

	let user_config_path = user_config_path()?;

	// The directory walk may already have picked it up
	if existing_configs.iter().any(|c| c.path == user_config_path) {
		return Ok(None);
	}

	if user_config_path.is_file() {
		let config = parse_config_file(&user_config_path)?;
		Ok(Some(LoadedConfig {
			config,
			path: user_config_path,
		}))
	} else {
		Ok(None)
	}
}

/// Check if an environment variable is set to a truthy value.
fn is_env_truthy(var_name: &str) -> bool {
	match std::env::var(var_name) {
		Ok(value) => {
			let lower = value.to_lowercase();
			!value.is_empty() && lower != "0" && lower != "false" && lower != "no"
		}
		Err(_) => false,
	}
}

/// Keep the first (most specific) value seen for a key.
fn take_first<T>(slot: &mut Option<Setting<T>>, value: Option<T>, source: &Path) {
	if slot.is_none()
		&& let Some(value) = value
	{
		*slot = Some(Setting {
			value,
			source: source.to_path_buf(),
		});
	}
}

/// Merge multiple configs into a single effective config.
///
/// Configs must be in cascade order; the first file that sets a key wins.
/// Relative paths are resolved against the directory of the file that set them.
pub fn merge_configs(configs: &[LoadedConfig]) -> MergedConfig {
	let mut merged = MergedConfig::default();

	for loaded in configs {
		let base = loaded.base_dir();
		let config = &loaded.config;

		take_first(
			&mut merged.build_dir,
			config.build_dir.as_ref().map(|p| base.join(p)),
			&loaded.path,
		);
		take_first(
			&mut merged.file_list,
			config.file_list.as_ref().map(|p| base.join(p)),
			&loaded.path,
		);
		take_first(
			&mut merged.pattern,
			config.pattern.as_ref().map(|p| base.join(p)),
			&loaded.path,
		);
		take_first(&mut merged.echo_commands, config.echo_commands, &loaded.path);
	}

	merged
}

/// Convenience function to discover, load, and merge configs from a directory.
pub fn load_merged_config(start_dir: &Path) -> Result<MergedConfig> {
	let configs = discover_configs(start_dir)?;
	Ok(merge_configs(&configs))
}

/// Get the path to the user's config file.
pub fn user_config_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(PbtcError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(CONFIG_FILE_NAME))
}
