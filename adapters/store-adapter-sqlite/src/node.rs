//! Content node storage
//!
//! Nodes form a per-user tree of at most two levels, ordered by a dense per-user
//! `sort_num`.

use sqlx::{Executor, QueryBuilder, Row, Sqlite, SqliteConnection, SqlitePool, sqlite::SqliteRow};

use crate::utils::*;
use folio::prelude::*;
use folio::store_adapter::*;
use folio::types::{NodeId, NodeStatus};

const NODE_COLUMNS: &str = "id, user_id, seo, status, name, describe, image_path, parent_node_id, level, sort_num, created_at, updated_at";

pub(crate) fn node_from_row(row: &SqliteRow) -> Result<ContentNode, sqlx::Error> {
	let status: i64 = row.try_get("status")?;
	let level: i64 = row.try_get("level")?;
	let sort_num: i64 = row.try_get("sort_num")?;
	Ok(ContentNode {
		id: NodeId(row.try_get("id")?),
		user_id: UserId(row.try_get("user_id")?),
		seo: row.try_get("seo")?,
		status: NodeStatus::from_i64(status).map_err(decode_err)?,
		name: row.try_get("name")?,
		describe: row.try_get("describe")?,
		image_path: row.try_get("image_path")?,
		parent_node_id: NodeId(row.try_get("parent_node_id")?),
		level: level as u8,
		sort_num: sort_num as u32,
		created_at: Timestamp(row.try_get("created_at")?),
		updated_at: row.try_get::<Option<i64>, _>("updated_at")?.map(Timestamp),
	})
}

/// Read a single node owned by `user_id`
pub(crate) async fn read<'e, E>(
	db: E,
	user_id: UserId,
	node_id: NodeId,
) -> FlResult<Option<ContentNode>>
where
	E: Executor<'e, Database = Sqlite>,
{
	let sql = format!("SELECT {} FROM content_nodes WHERE user_id = ? AND id = ?", NODE_COLUMNS);
	let res = sqlx::query(&sql).bind(user_id.0).bind(node_id.0).fetch_optional(db).await;

	map_opt(res, node_from_row)
}

/// Read a single node by its seo slug
pub(crate) async fn read_by_seo(
	db: &SqlitePool,
	user_id: UserId,
	seo: &str,
) -> FlResult<Option<ContentNode>> {
	let sql = format!("SELECT {} FROM content_nodes WHERE user_id = ? AND seo = ?", NODE_COLUMNS);
	let res = sqlx::query(&sql).bind(user_id.0).bind(seo).fetch_optional(db).await;

	map_opt(res, node_from_row)
}

/// Count all nodes of a user
pub(crate) async fn count<'e, E>(db: E, user_id: UserId) -> FlResult<u32>
where
	E: Executor<'e, Database = Sqlite>,
{
	let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM content_nodes WHERE user_id = ?")
		.bind(user_id.0)
		.fetch_one(db)
		.await
		.map_err(db_err)?;

	Ok(count as u32)
}

pub(crate) async fn seo_exists(db: &SqlitePool, user_id: UserId, seo: &str) -> FlResult<bool> {
	let count: i64 =
		sqlx::query_scalar("SELECT COUNT(*) FROM content_nodes WHERE user_id = ? AND seo = ?")
			.bind(user_id.0)
			.bind(seo)
			.fetch_one(db)
			.await
			.map_err(db_err)?;

	Ok(count > 0)
}

/// Count the direct children of a node
pub(crate) async fn count_children(
	db: &SqlitePool,
	user_id: UserId,
	node_id: NodeId,
) -> FlResult<u32> {
	let count: i64 = sqlx::query_scalar(
		"SELECT COUNT(*) FROM content_nodes WHERE user_id = ? AND parent_node_id = ?",
	)
	.bind(user_id.0)
	.bind(node_id.0)
	.fetch_one(db)
	.await
	.map_err(db_err)?;

	Ok(count as u32)
}

fn push_filters<'a>(query: &mut QueryBuilder<'a, Sqlite>, opts: &'a ListNodeOptions) {
	query.push(" WHERE 1=1");
	if let Some(user_id) = opts.user_id {
		query.push(" AND user_id = ").push_bind(user_id.0);
	}
	if let Some(parent_node_id) = opts.parent_node_id {
		query.push(" AND parent_node_id = ").push_bind(parent_node_id.0);
	}
	if let Some(level) = opts.level {
		query.push(" AND level = ").push_bind(i64::from(level));
	}
	if let Some(status) = opts.status {
		query.push(" AND status = ").push_bind(status.as_i64());
	}
	if let Some(seo) = &opts.seo {
		query.push(" AND seo = ").push_bind(&**seo);
	}
}

/// List nodes ordered by sort number
pub(crate) async fn list(db: &SqlitePool, opts: &ListNodeOptions) -> FlResult<Page<ContentNode>> {
	let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM content_nodes");
	push_filters(&mut count_query, opts);
	let total: i64 =
		count_query.build_query_scalar::<i64>().fetch_one(db).await.map_err(db_err)?;

	let mut query = QueryBuilder::new(format!("SELECT {} FROM content_nodes", NODE_COLUMNS));
	push_filters(&mut query, opts);
	query.push(" ORDER BY user_id, sort_num LIMIT ");
	query.push_bind(sql_limit(opts.limit));
	query.push(" OFFSET ");
	query.push_bind(i64::from(opts.offset));
	debug!("SQL: {}", query.sql());

	let rows = query.build().fetch_all(db).await.map_err(db_err)?;
	let items = collect_res(rows.iter().map(node_from_row))?;

	Ok(Page { items, total: total as u64 })
}

/// Insert a node
pub(crate) async fn create(
	conn: &mut SqliteConnection,
	data: &CreateNodeData,
) -> FlResult<ContentNode> {
	let sql = format!(
		"INSERT INTO content_nodes (user_id, seo, status, name, describe, image_path, parent_node_id, level, sort_num, created_at)
		VALUES (?, ?, 0, ?, ?, ?, ?, ?, ?, unixepoch()) RETURNING {}",
		NODE_COLUMNS
	);
	let row = sqlx::query(&sql)
		.bind(data.user_id.0)
		.bind(data.seo.as_deref())
		.bind(&*data.name)
		.bind(&*data.describe)
		.bind(data.image_path.as_deref())
		.bind(data.placement.parent_node_id().0)
		.bind(i64::from(data.placement.level()))
		.bind(i64::from(data.sort_num))
		.fetch_one(&mut *conn)
		.await
		.map_err(write_err)?;

	node_from_row(&row).map_err(db_err)
}

/// Update node columns present in `data`
pub(crate) async fn update(
	conn: &mut SqliteConnection,
	user_id: UserId,
	node_id: NodeId,
	data: &UpdateNodeData,
) -> FlResult<u64> {
	let mut query = QueryBuilder::new("UPDATE content_nodes SET ");
	let mut has_updates = false;

	has_updates = push_patch!(query, has_updates, "seo", &data.seo, |v| &**v);
	has_updates = push_patch!(query, has_updates, "name", &data.name, |v| &**v);
	has_updates = push_patch!(query, has_updates, "describe", &data.describe, |v| &**v);
	has_updates = push_patch!(query, has_updates, "image_path", &data.image_path, |v| &**v);
	has_updates = push_patch!(query, has_updates, "status", &data.status, |v| v.as_i64());

	if let Some(placement) = &data.placement {
		if has_updates {
			query.push(", ");
		}
		query.push("parent_node_id=").push_bind(placement.parent_node_id().0);
		query.push(", level=").push_bind(i64::from(placement.level()));
		has_updates = true;
	}
	if let Some(sort_num) = data.sort_num {
		if has_updates {
			query.push(", ");
		}
		query.push("sort_num=").push_bind(i64::from(sort_num));
		has_updates = true;
	}

	if !has_updates {
		return Ok(0);
	}

	query.push(", updated_at=unixepoch() WHERE user_id=").push_bind(user_id.0);
	query.push(" AND id=").push_bind(node_id.0);

	let res = query.build().execute(&mut *conn).await.map_err(write_err)?;

	Ok(res.rows_affected())
}

/// Add `delta` to every sort number of `user_id` inside `range`
pub(crate) async fn shift_sort_nums(
	conn: &mut SqliteConnection,
	user_id: UserId,
	range: SortRange,
	delta: i32,
) -> FlResult<u64> {
	let mut query = QueryBuilder::new("UPDATE content_nodes SET sort_num = sort_num + ");
	query.push_bind(i64::from(delta));
	query.push(" WHERE user_id = ").push_bind(user_id.0);
	query.push(" AND sort_num >= ").push_bind(i64::from(range.start));
	if let Some(end) = range.end {
		query.push(" AND sort_num <= ").push_bind(i64::from(end));
	}

	let res = query.build().execute(&mut *conn).await.map_err(db_err)?;

	Ok(res.rows_affected())
}

/// Delete a node row
pub(crate) async fn delete(
	conn: &mut SqliteConnection,
	user_id: UserId,
	node_id: NodeId,
) -> FlResult<u64> {
	let res = sqlx::query("DELETE FROM content_nodes WHERE user_id = ? AND id = ?")
		.bind(user_id.0)
		.bind(node_id.0)
		.execute(&mut *conn)
		.await
		.map_err(db_err)?;

	Ok(res.rows_affected())
}

// vim: ts=4
