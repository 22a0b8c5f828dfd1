//! Content storage
//!
//! Contents carry a published body (`describe`) and a draft body (`pre_describe`).
//! Status transitions are conditional updates so racing requests never apply the
//! same transition twice.

use sqlx::{QueryBuilder, Row, Sqlite, SqliteConnection, SqlitePool, sqlite::SqliteRow};

use crate::utils::*;
use folio::prelude::*;
use folio::store_adapter::*;
use folio::types::{CloseComment, ContentId, ContentStatus, NodeId};

const CONTENT_COLUMNS: &str = "id, user_id, seo, title, node_id, node_seo, status, top, describe, pre_describe, pre_flush, close_comment, version, image_path, views, password, created_at, updated_at";

const PURGED: i64 = 4;

pub(crate) fn content_from_row(row: &SqliteRow) -> Result<Content, sqlx::Error> {
	let status: i64 = row.try_get("status")?;
	let close_comment: i64 = row.try_get("close_comment")?;
	let version: i64 = row.try_get("version")?;
	let views: i64 = row.try_get("views")?;
	Ok(Content {
		id: ContentId(row.try_get("id")?),
		user_id: UserId(row.try_get("user_id")?),
		seo: row.try_get("seo")?,
		title: row.try_get("title")?,
		node_id: NodeId(row.try_get("node_id")?),
		node_seo: row.try_get("node_seo")?,
		status: ContentStatus::from_i64(status).map_err(decode_err)?,
		top: row.try_get("top")?,
		describe: row.try_get("describe")?,
		pre_describe: row.try_get("pre_describe")?,
		pre_flush: row.try_get("pre_flush")?,
		close_comment: CloseComment::from_i64(close_comment).map_err(decode_err)?,
		version: version as u32,
		image_path: row.try_get("image_path")?,
		views: views as u32,
		password: row.try_get("password")?,
		created_at: Timestamp(row.try_get("created_at")?),
		updated_at: row.try_get::<Option<i64>, _>("updated_at")?.map(Timestamp),
	})
}

/// Read a single content, optionally restricted to an owner
pub(crate) async fn read(
	db: &SqlitePool,
	owner: Option<UserId>,
	content_id: ContentId,
) -> FlResult<Option<Content>> {
	let mut query = QueryBuilder::new(format!("SELECT {} FROM contents WHERE id = ", CONTENT_COLUMNS));
	query.push_bind(content_id.0);
	if let Some(owner) = owner {
		query.push(" AND user_id = ").push_bind(owner.0);
	}
	let res = query.build().fetch_optional(db).await;

	map_opt(res, content_from_row)
}

pub(crate) async fn seo_exists(db: &SqlitePool, user_id: UserId, seo: &str) -> FlResult<bool> {
	let count: i64 =
		sqlx::query_scalar("SELECT COUNT(*) FROM contents WHERE user_id = ? AND seo = ?")
			.bind(user_id.0)
			.bind(seo)
			.fetch_one(db)
			.await
			.map_err(db_err)?;

	Ok(count > 0)
}

/// Count contents attached to a node: all of them, and the ones not purged
pub(crate) async fn count_by_node(
	db: &SqlitePool,
	user_id: UserId,
	node_id: NodeId,
) -> FlResult<NodeContentCount> {
	let row = sqlx::query(
		"SELECT COUNT(*) AS total, COALESCE(SUM(CASE WHEN status != ? THEN 1 ELSE 0 END), 0) AS active
		FROM contents WHERE user_id = ? AND node_id = ?",
	)
	.bind(PURGED)
	.bind(user_id.0)
	.bind(node_id.0)
	.fetch_one(db)
	.await
	.map_err(db_err)?;

	let total: i64 = row.try_get("total").map_err(db_err)?;
	let active: i64 = row.try_get("active").map_err(db_err)?;
	Ok(NodeContentCount { total: total as u64, active: active as u64 })
}

fn push_filters<'a>(query: &mut QueryBuilder<'a, Sqlite>, opts: &'a ListContentOptions) {
	query.push(" WHERE 1=1");
	if let Some(user_id) = opts.user_id {
		query.push(" AND user_id = ").push_bind(user_id.0);
	}
	if let Some(node_id) = opts.node_id {
		query.push(" AND node_id = ").push_bind(node_id.0);
	}
	if let Some(status) = opts.status {
		query.push(" AND status = ").push_bind(status.as_i64());
	}
	if !opts.include_purged {
		query.push(" AND status != ").push_bind(PURGED);
	}
	if let Some(seo) = &opts.seo {
		query.push(" AND seo = ").push_bind(&**seo);
	}
	if let Some(top) = opts.top {
		query.push(" AND top = ").push_bind(top);
	}
}

/// List contents, pinned ones first, then newest first
pub(crate) async fn list(db: &SqlitePool, opts: &ListContentOptions) -> FlResult<Page<Content>> {
	let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM contents");
	push_filters(&mut count_query, opts);
	let total: i64 =
		count_query.build_query_scalar::<i64>().fetch_one(db).await.map_err(db_err)?;

	let mut query = QueryBuilder::new(format!("SELECT {} FROM contents", CONTENT_COLUMNS));
	push_filters(&mut query, opts);
	query.push(" ORDER BY top DESC, created_at DESC, id DESC LIMIT ");
	query.push_bind(sql_limit(opts.limit));
	query.push(" OFFSET ");
	query.push_bind(i64::from(opts.offset));
	debug!("SQL: {}", query.sql());

	let rows = query.build().fetch_all(db).await.map_err(db_err)?;
	let items = collect_res(rows.iter().map(content_from_row))?;

	Ok(Page { items, total: total as u64 })
}

/// Insert a content with an unpublished draft
pub(crate) async fn create(
	conn: &mut SqliteConnection,
	data: &CreateContentData,
) -> FlResult<Content> {
	let sql = format!(
		"INSERT INTO contents (user_id, seo, title, node_id, node_seo, status, top, describe, pre_describe, pre_flush, close_comment, version, image_path, password, created_at)
		VALUES (?, ?, ?, ?, ?, ?, ?, '', ?, 0, ?, 0, ?, ?, unixepoch()) RETURNING {}",
		CONTENT_COLUMNS
	);
	let row = sqlx::query(&sql)
		.bind(data.user_id.0)
		.bind(data.seo.as_deref())
		.bind(&*data.title)
		.bind(data.node_id.0)
		.bind(data.node_seo.as_deref())
		.bind(data.status.as_i64())
		.bind(data.top)
		.bind(&*data.pre_describe)
		.bind(data.close_comment.as_i64())
		.bind(data.image_path.as_deref())
		.bind(data.password.as_deref())
		.fetch_one(&mut *conn)
		.await
		.map_err(write_err)?;

	content_from_row(&row).map_err(db_err)
}

/// Update content columns present in `data`
pub(crate) async fn update(
	conn: &mut SqliteConnection,
	owner: Option<UserId>,
	content_id: ContentId,
	data: &UpdateContentData,
) -> FlResult<u64> {
	let mut query = QueryBuilder::new("UPDATE contents SET ");
	let mut has_updates = false;

	has_updates = push_patch!(query, has_updates, "seo", &data.seo, |v| &**v);
	has_updates = push_patch!(query, has_updates, "title", &data.title, |v| &**v);
	has_updates = push_patch!(query, has_updates, "status", &data.status, |v| v.as_i64());
	has_updates = push_patch!(query, has_updates, "top", &data.top, |v| *v);
	has_updates = push_patch!(query, has_updates, "pre_describe", &data.pre_describe, |v| &**v);
	has_updates = push_patch!(query, has_updates, "pre_flush", &data.pre_flush, |v| *v);
	has_updates =
		push_patch!(query, has_updates, "close_comment", &data.close_comment, |v| v.as_i64());
	has_updates = push_patch!(query, has_updates, "image_path", &data.image_path, |v| &**v);
	has_updates = push_patch!(query, has_updates, "password", &data.password, |v| &**v);

	if let Some(node) = &data.node {
		if has_updates {
			query.push(", ");
		}
		query.push("node_id=").push_bind(node.node_id.0);
		query.push(", node_seo=").push_bind(node.node_seo.as_deref());
		has_updates = true;
	}

	if !has_updates {
		return Ok(0);
	}

	query.push(", updated_at=unixepoch() WHERE id=").push_bind(content_id.0);
	if let Some(owner) = owner {
		query.push(" AND user_id=").push_bind(owner.0);
	}

	let res = query.build().execute(&mut *conn).await.map_err(write_err)?;

	Ok(res.rows_affected())
}

/// Conditional status update, the guard is evaluated by the statement itself
pub(crate) async fn update_status(
	conn: &mut SqliteConnection,
	owner: Option<UserId>,
	content_id: ContentId,
	guard: StatusGuard,
	status: ContentStatus,
) -> FlResult<u64> {
	let mut query = QueryBuilder::new("UPDATE contents SET status=");
	query.push_bind(status.as_i64());
	query.push(", updated_at=unixepoch() WHERE id=").push_bind(content_id.0);
	if let Some(owner) = owner {
		query.push(" AND user_id=").push_bind(owner.0);
	}
	if let StatusGuard::Within(min, max) = guard {
		query.push(" AND status BETWEEN ").push_bind(min.as_i64());
		query.push(" AND ").push_bind(max.as_i64());
	}

	let res = query.build().execute(&mut *conn).await.map_err(db_err)?;

	Ok(res.rows_affected())
}

/// Publish a dirty draft: copy it to the published body and bump the version
pub(crate) async fn publish_draft(
	conn: &mut SqliteConnection,
	user_id: UserId,
	content_id: ContentId,
) -> FlResult<Option<Content>> {
	let sql = format!(
		"UPDATE contents SET describe = pre_describe, version = version + 1, pre_flush = 1, updated_at = unixepoch()
		WHERE user_id = ? AND id = ? AND pre_flush = 0 RETURNING {}",
		CONTENT_COLUMNS
	);
	let res = sqlx::query(&sql)
		.bind(user_id.0)
		.bind(content_id.0)
		.fetch_optional(&mut *conn)
		.await;

	map_opt(res, content_from_row)
}

/// Throw away a dirty draft. A draft reset to an existing published body counts
/// as flushed; a never published content stays unflushed.
pub(crate) async fn discard_draft(
	conn: &mut SqliteConnection,
	user_id: UserId,
	content_id: ContentId,
) -> FlResult<u64> {
	let res = sqlx::query(
		"UPDATE contents SET pre_describe = describe,
			pre_flush = CASE WHEN version > 0 THEN 1 ELSE 0 END,
			updated_at = unixepoch()
		WHERE user_id = ? AND id = ? AND pre_flush = 0",
	)
	.bind(user_id.0)
	.bind(content_id.0)
	.execute(&mut *conn)
	.await
	.map_err(db_err)?;

	Ok(res.rows_affected())
}

/// Rewrite the denormalized node seo of contents attached to a node
pub(crate) async fn update_node_seo(
	conn: &mut SqliteConnection,
	user_id: UserId,
	node_id: NodeId,
	node_seo: Option<&str>,
) -> FlResult<u64> {
	let res = sqlx::query("UPDATE contents SET node_seo = ? WHERE user_id = ? AND node_id = ?")
		.bind(node_seo)
		.bind(user_id.0)
		.bind(node_id.0)
		.execute(&mut *conn)
		.await
		.map_err(db_err)?;

	Ok(res.rows_affected())
}

// vim: ts=4
