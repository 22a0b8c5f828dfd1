//! Database schema initialization
//!
//! Creates tables and indexes. Every statement is idempotent so it runs on each
//! start.

use sqlx::SqlitePool;

pub(crate) const SCHEMA_VERSION: &str = "1";

/// Initialize the database schema with all required tables and indexes
pub(crate) async fn init_db(db: &SqlitePool) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS globals (
			key text NOT NULL,
			value text,
			PRIMARY KEY(key)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("INSERT OR IGNORE INTO globals (key, value) VALUES ('schema_version', ?)")
		.bind(SCHEMA_VERSION)
		.execute(&mut *tx)
		.await?;

	// Content nodes
	//***************
	// No unique index on sort_num: range updates shift it row by row, which would
	// trip a uniqueness check in the middle of the statement.
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS content_nodes (
		id integer NOT NULL,
		user_id integer NOT NULL,
		seo text,
		status integer NOT NULL DEFAULT 0,	-- 0: normal, 1: hidden
		name text NOT NULL,
		describe text NOT NULL DEFAULT '',
		image_path text,
		parent_node_id integer NOT NULL DEFAULT 0,
		level integer NOT NULL DEFAULT 0,	-- 0: root, 1: child
		sort_num integer NOT NULL,
		created_at datetime DEFAULT (unixepoch()),
		updated_at datetime,
		PRIMARY KEY(id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query(
		"CREATE UNIQUE INDEX IF NOT EXISTS idx_content_nodes_seo ON content_nodes(user_id, seo) WHERE seo IS NOT NULL",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query(
		"CREATE INDEX IF NOT EXISTS idx_content_nodes_sort ON content_nodes(user_id, sort_num)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query(
		"CREATE INDEX IF NOT EXISTS idx_content_nodes_parent ON content_nodes(user_id, parent_node_id)",
	)
	.execute(&mut *tx)
	.await?;

	// Contents
	//**********
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS contents (
		id integer NOT NULL,
		user_id integer NOT NULL,
		seo text,
		title text NOT NULL,
		node_id integer NOT NULL DEFAULT 0,
		node_seo text,
		status integer NOT NULL DEFAULT 0,	-- 0: normal, 1: hidden, 2: banned, 3: rubbish, 4: purged
		top boolean NOT NULL DEFAULT 0,
		describe text NOT NULL DEFAULT '',	-- published body
		pre_describe text NOT NULL DEFAULT '',	-- draft body
		pre_flush boolean NOT NULL DEFAULT 0,	-- 1: draft already published
		close_comment integer NOT NULL DEFAULT 1,	-- 0: closed, 1: open, 2: open direct
		version integer NOT NULL DEFAULT 0,
		image_path text,
		views integer NOT NULL DEFAULT 0,
		password text,
		created_at datetime DEFAULT (unixepoch()),
		updated_at datetime,
		PRIMARY KEY(id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query(
		"CREATE UNIQUE INDEX IF NOT EXISTS idx_contents_seo ON contents(user_id, seo) WHERE seo IS NOT NULL",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_contents_node ON contents(user_id, node_id)")
		.execute(&mut *tx)
		.await?;

	// History
	//*********
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS content_history (
		id integer NOT NULL,
		content_id integer NOT NULL,
		user_id integer NOT NULL,
		seo text,
		title text NOT NULL,
		node_id integer NOT NULL DEFAULT 0,
		describe text NOT NULL DEFAULT '',
		created_at datetime DEFAULT (unixepoch()),
		PRIMARY KEY(id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query(
		"CREATE INDEX IF NOT EXISTS idx_content_history_content ON content_history(content_id, created_at)",
	)
	.execute(&mut *tx)
	.await?;

	tx.commit().await?;

	Ok(())
}

// vim: ts=4
