//! Runtime configuration
//!
//! Settings come from a YAML document and/or `FOLIO_*` environment variables. When
//! both are used the environment wins.

use serde::Deserialize;
use std::{path::PathBuf, str::FromStr, time::Duration};

use crate::prelude::*;

const ENV_PREFIX: &str = "FOLIO_";

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
	/// SQLite database file
	pub db_path: PathBuf,
	pub max_connections: u32,
	pub busy_timeout_secs: u64,
	/// Root directory of uploaded files, image references resolve under it
	pub file_root: PathBuf,
	/// Default tracing filter, `RUST_LOG` overrides it
	pub log_filter: Box<str>,
	/// Serialize sort order changing writes per user
	pub serialize_user_writes: bool,
	pub list_limit_default: u32,
	pub list_limit_max: u32,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			db_path: PathBuf::from("./data/folio.db"),
			max_connections: 5,
			busy_timeout_secs: 5,
			file_root: PathBuf::from("./data/files"),
			log_filter: "info".into(),
			serialize_user_writes: true,
			list_limit_default: 20,
			list_limit_max: 100,
		}
	}
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> FlResult<T> {
	value
		.trim()
		.parse()
		.map_err(|_| Error::ValidationError(format!("invalid value for {}{}", ENV_PREFIX, key)))
}

fn parse_bool(key: &str, value: &str) -> FlResult<bool> {
	match value.trim().to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Ok(true),
		"0" | "false" | "no" | "off" => Ok(false),
		_ => Err(Error::ValidationError(format!("invalid value for {}{}", ENV_PREFIX, key))),
	}
}

impl Settings {
	pub fn from_yaml_str(yaml: &str) -> FlResult<Self> {
		let settings: Settings =
			if yaml.trim().is_empty() { Settings::default() } else { serde_yaml::from_str(yaml)? };
		settings.check()?;
		Ok(settings)
	}

	/// Defaults overridden by the process environment
	pub fn from_env() -> FlResult<Self> {
		Settings::default().merge_env(std::env::vars())
	}

	/// Applies `FOLIO_*` variables on top of `self`. Unrelated variables are ignored.
	pub fn merge_env<I, K, V>(mut self, vars: I) -> FlResult<Self>
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: AsRef<str>,
	{
		for (key, value) in vars {
			let Some(key) = key.as_ref().strip_prefix(ENV_PREFIX) else {
				continue;
			};
			let value = value.as_ref();
			match key {
				"DB_PATH" => self.db_path = PathBuf::from(value),
				"MAX_CONNECTIONS" => self.max_connections = parse_env(key, value)?,
				"BUSY_TIMEOUT_SECS" => self.busy_timeout_secs = parse_env(key, value)?,
				"FILE_ROOT" => self.file_root = PathBuf::from(value),
				"LOG_FILTER" => self.log_filter = value.into(),
				"SERIALIZE_USER_WRITES" => self.serialize_user_writes = parse_bool(key, value)?,
				"LIST_LIMIT_DEFAULT" => self.list_limit_default = parse_env(key, value)?,
				"LIST_LIMIT_MAX" => self.list_limit_max = parse_env(key, value)?,
				_ => debug!("ignoring unknown setting {}{}", ENV_PREFIX, key),
			}
		}
		self.check()?;
		Ok(self)
	}

	pub fn busy_timeout(&self) -> Duration {
		Duration::from_secs(self.busy_timeout_secs)
	}

	fn check(&self) -> FlResult<()> {
		if self.max_connections == 0 {
			return Err(Error::ValidationError("max_connections must be positive".into()));
		}
		if self.list_limit_default == 0 || self.list_limit_default > self.list_limit_max {
			return Err(Error::ValidationError(
				"list_limit_default must be between 1 and list_limit_max".into(),
			));
		}
		Ok(())
	}
}


// vim: ts=4
