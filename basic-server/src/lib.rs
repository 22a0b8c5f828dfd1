//! Assembles a Folio [`App`] from [`Settings`] and the bundled adapters.
//!
//! The API layer embedding Folio calls [`load_settings`] and [`bootstrap`] once at
//! startup and hands the resulting app to its request handlers.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

use std::{path::Path, sync::Arc};

use folio_core::app::init_tracing;
use folio_core::prelude::*;
use folio_core::{AppBuilder, Settings};
use folio_file_adapter_fs::FileAdapterFs;
use folio_store_adapter_sqlite::{SqliteOptions, StoreAdapterSqlite};

/// Reads the YAML file at `config` if given, then applies `FOLIO_*` variables
pub async fn load_settings(config: Option<&Path>) -> FlResult<Settings> {
	let settings = match config {
		Some(path) => Settings::from_yaml_str(&tokio::fs::read_to_string(path).await?)?,
		None => Settings::default(),
	};
	settings.merge_env(std::env::vars())
}

pub fn sqlite_options(settings: &Settings) -> SqliteOptions {
	SqliteOptions {
		max_connections: settings.max_connections,
		busy_timeout: settings.busy_timeout(),
	}
}

/// Installs tracing, opens the store and the file root, and builds the app
pub async fn bootstrap(settings: Settings) -> FlResult<App> {
	init_tracing(&settings.log_filter);

	let store = StoreAdapterSqlite::with_options(&settings.db_path, sqlite_options(&settings)).await?;
	let files = FileAdapterFs::new(settings.file_root.clone().into_boxed_path()).await?;
	info!(
		db_path = %settings.db_path.display(),
		file_root = %settings.file_root.display(),
		"Adapters ready"
	);

	let mut builder = AppBuilder::new();
	builder.settings(settings).store_adapter(Arc::new(store)).file_adapter(Arc::new(files));
	builder.build()
}

// vim: ts=4
