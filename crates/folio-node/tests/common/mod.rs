//! Test app builders and invariant checks
//!
//! Each test gets its own SQLite database inside a TempDir. The TempDir is
//! returned alongside the app so it lives until the end of the test.
#![allow(dead_code)]

use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;
use tempfile::TempDir;

use folio_core::{App, AppBuilder, Settings};
use folio_node::{CreateNode, node};
use folio_store_adapter_sqlite::StoreAdapterSqlite;
use folio_types::error::FlResult;
use folio_types::file_adapter::FileAdapter;
use folio_types::store_adapter::{ContentNode, ListNodeOptions, StoreAdapter};
use folio_types::types::{NodeId, UserId};

/// File store knowing a fixed set of urls
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
		.file_adapter(Arc::new(StaticFiles(vec!["/upload/cover.png", "/upload/other.png"])));
	let app = builder.build().expect("Failed to build app");
	(app, temp_dir)
}

pub async fn create_node(app: &App, user_id: UserId, seo: &str, parent: NodeId) -> ContentNode {
	node::create(
		app,
		user_id,
		&CreateNode {
			seo: Some(seo.into()),
			name: seo.into(),
			parent_node_id: parent,
			..Default::default()
		},
	)
	.await
	.expect("Failed to create node")
}

pub async fn all_nodes(app: &App, user_id: UserId) -> Vec<ContentNode> {
	app.store
		.list_nodes(&ListNodeOptions { user_id: Some(user_id), ..Default::default() })
		.await
		.expect("Failed to list nodes")
		.items
}

/// Sort numbers of a user are exactly `0..N`
pub async fn assert_dense(app: &App, user_id: UserId) {
	let mut sort_nums: Vec<u32> = all_nodes(app, user_id).await.iter().map(|n| n.sort_num).collect();
	sort_nums.sort_unstable();
	let expected: Vec<u32> = (0..sort_nums.len() as u32).collect();
	assert_eq!(sort_nums, expected, "sort numbers of user {} are not dense", user_id);
}

/// No child has children and levels agree with parents
pub async fn assert_depth(app: &App, user_id: UserId) {
	let nodes = all_nodes(app, user_id).await;
	for node in &nodes {
		assert_eq!(node.level, u8::from(!node.parent_node_id.is_root()), "level of {}", node.id);
		if node.level == 1 {
			assert!(
				!nodes.iter().any(|n| n.parent_node_id == node.id),
				"child node {} has children",
				node.id
			);
		}
	}
}

/// Sort number of the node with `seo`
pub async fn sort_of(app: &App, user_id: UserId, seo: &str) -> u32 {
	app.store
		.read_node_by_seo(user_id, seo)
		.await
		.expect("read")
		.expect("node exists")
		.sort_num
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
