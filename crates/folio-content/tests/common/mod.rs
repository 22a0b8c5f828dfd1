//! Shared fixtures for content tests
#![allow(dead_code)]

use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;
use tempfile::TempDir;

use folio_content::{CreateContent, versioning};
use folio_core::{App, AppBuilder, Settings};
use folio_node::{CreateNode, node};
use folio_store_adapter_sqlite::StoreAdapterSqlite;
use folio_types::error::FlResult;
use folio_types::file_adapter::FileAdapter;
use folio_types::store_adapter::{Content, ContentNode};
use folio_types::types::{NodeId, UserId};

#[derive(Debug, Default)]
pub struct StaticFiles(pub Vec<&'static str>);

#[async_trait]
impl FileAdapter for StaticFiles {
	async fn exists(&self, url: &str) -> FlResult<bool> {
		Ok(self.0.iter().any(|known| *known == url))
	}
}

pub async fn create_test_app() -> (App, TempDir) {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let store = StoreAdapterSqlite::new(temp_dir.path().join("folio.db"))
		.await
		.expect("Failed to create store");

	let mut builder = AppBuilder::new();
	builder
		.settings(Settings { file_root: temp_dir.path().join("files"), ..Settings::default() })
		.store_adapter(Arc::new(store))
		.file_adapter(Arc::new(StaticFiles(vec!["/upload/cover.png"])));
	let app = builder.build().expect("Failed to build app");
	(app, temp_dir)
}

pub async fn create_node(app: &App, user_id: UserId, seo: &str) -> ContentNode {
	node::create(
		app,
		user_id,
		&CreateNode { seo: Some(seo.into()), name: seo.into(), ..Default::default() },
	)
	.await
	.expect("Failed to create node")
}

pub async fn create_content(app: &App, user_id: UserId, title: &str, node_id: NodeId) -> Content {
	versioning::create_content(
		app,
		user_id,
		&CreateContent {
			title: title.into(),
			body: format!("{} draft", title).into(),
			node_id,
			..Default::default()
		},
	)
	.await
	.expect("Failed to create content")
}

/// Runs a raw statement against the test database, next to the app's own pool
pub async fn exec_sql(temp_dir: &TempDir, sql: &str) {
	let url = format!("sqlite://{}", temp_dir.path().join("folio.db").display());
	let db = SqlitePool::connect(&url).await.expect("Failed to open test database");
	sqlx::query(sql).execute(&db).await.expect("Failed to run statement");
	db.close().await;
}

/// Makes statements matching `event` (e.g. `BEFORE DELETE ON content_nodes`) fail
pub async fn block_statement(temp_dir: &TempDir, name: &str, event: &str) {
	let sql = format!("CREATE TRIGGER {} {} BEGIN SELECT RAISE(ABORT, 'blocked'); END", name, event);
	exec_sql(temp_dir, &sql).await;
}

// vim: ts=4
