//! App state type

use std::sync::Arc;

use folio_types::file_adapter::FileAdapter;
use folio_types::store_adapter::StoreAdapter;

use crate::lock::{UserLockGuard, UserLocks};
use crate::prelude::*;
use crate::settings::Settings;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `filter`. Later calls are no-ops.
pub fn init_tracing(filter: &str) {
	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
	let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init();
}

pub struct AppState {
	pub settings: Settings,
	pub store: Arc<dyn StoreAdapter>,
	pub files: Arc<dyn FileAdapter>,
	pub user_locks: UserLocks,
}

impl AppState {
	/// Serializes sort order changing writes of `user_id` when enabled in settings
	pub async fn lock_user(&self, user_id: UserId) -> Option<UserLockGuard> {
		if self.settings.serialize_user_writes {
			Some(self.user_locks.lock(user_id).await)
		} else {
			None
		}
	}
}

impl std::fmt::Debug for AppState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AppState")
			.field("settings", &self.settings)
			.field("store", &self.store)
			.field("files", &self.files)
			.finish_non_exhaustive()
	}
}

pub type App = Arc<AppState>;

pub struct Adapters {
	pub store: Option<Arc<dyn StoreAdapter>>,
	pub files: Option<Arc<dyn FileAdapter>>,
}

pub struct AppBuilder {
	settings: Settings,
	adapters: Adapters,
}

impl AppBuilder {
	pub fn new() -> Self {
		AppBuilder { settings: Settings::default(), adapters: Adapters { store: None, files: None } }
	}

	pub fn settings(&mut self, settings: Settings) -> &mut Self {
		self.settings = settings;
		self
	}

	// Adapters
	pub fn store_adapter(&mut self, store: Arc<dyn StoreAdapter>) -> &mut Self {
		self.adapters.store = Some(store);
		self
	}
	pub fn file_adapter(&mut self, files: Arc<dyn FileAdapter>) -> &mut Self {
		self.adapters.files = Some(files);
		self
	}

	pub fn build(self) -> FlResult<App> {
		let store =
			self.adapters.store.ok_or_else(|| Error::Internal("no store adapter".into()))?;
		let files = self.adapters.files.ok_or_else(|| Error::Internal("no file adapter".into()))?;
		info!("Folio V{}", VERSION);
		debug!("settings: {:?}", self.settings);

		Ok(Arc::new(AppState { settings: self.settings, store, files, user_locks: UserLocks::new() }))
	}
}

impl Default for AppBuilder {
	fn default() -> Self {
		Self::new()
	}
}


// vim: ts=4
