//! Publish history storage

use sqlx::{QueryBuilder, Row, Sqlite, SqliteConnection, SqlitePool, sqlite::SqliteRow};

use crate::utils::*;
use folio::prelude::*;
use folio::store_adapter::*;
use folio::types::{ContentId, HistoryId, NodeId};

fn history_from_row(row: &SqliteRow, with_describe: bool) -> Result<ContentHistory, sqlx::Error> {
	Ok(ContentHistory {
		id: HistoryId(row.try_get("id")?),
		content_id: ContentId(row.try_get("content_id")?),
		user_id: UserId(row.try_get("user_id")?),
		seo: row.try_get("seo")?,
		title: row.try_get("title")?,
		node_id: NodeId(row.try_get("node_id")?),
		describe: if with_describe { Some(row.try_get("describe")?) } else { None },
		created_at: Timestamp(row.try_get("created_at")?),
	})
}

/// Snapshot a freshly published content
pub(crate) async fn create(
	conn: &mut SqliteConnection,
	content: &Content,
	created_at: Timestamp,
) -> FlResult<ContentHistory> {
	let row = sqlx::query(
		"INSERT INTO content_history (content_id, user_id, seo, title, node_id, describe, created_at)
		VALUES (?, ?, ?, ?, ?, ?, ?)
		RETURNING id, content_id, user_id, seo, title, node_id, describe, created_at",
	)
	.bind(content.id.0)
	.bind(content.user_id.0)
	.bind(content.seo.as_deref())
	.bind(&*content.title)
	.bind(content.node_id.0)
	.bind(&*content.describe)
	.bind(created_at.0)
	.fetch_one(&mut *conn)
	.await
	.map_err(db_err)?;

	history_from_row(&row, true).map_err(db_err)
}

/// Read a single history entry including its body
pub(crate) async fn read(
	db: &SqlitePool,
	owner: Option<UserId>,
	history_id: HistoryId,
) -> FlResult<Option<ContentHistory>> {
	let mut query = QueryBuilder::new(
		"SELECT id, content_id, user_id, seo, title, node_id, describe, created_at
		FROM content_history WHERE id = ",
	);
	query.push_bind(history_id.0);
	if let Some(owner) = owner {
		query.push(" AND user_id = ").push_bind(owner.0);
	}
	let res = query.build().fetch_optional(db).await;

	map_opt(res, |row| history_from_row(row, true))
}

fn push_filters(query: &mut QueryBuilder<'_, Sqlite>, opts: &ListHistoryOptions) {
	query.push(" WHERE content_id = ").push_bind(opts.content_id.0);
	if let Some(user_id) = opts.user_id {
		query.push(" AND user_id = ").push_bind(user_id.0);
	}
}

/// List the history of a content, newest first. Bodies are left out.
pub(crate) async fn list(
	db: &SqlitePool,
	opts: &ListHistoryOptions,
) -> FlResult<Page<ContentHistory>> {
	let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM content_history");
	push_filters(&mut count_query, opts);
	let total: i64 =
		count_query.build_query_scalar::<i64>().fetch_one(db).await.map_err(db_err)?;

	let mut query = QueryBuilder::new(
		"SELECT id, content_id, user_id, seo, title, node_id, created_at FROM content_history",
	);
	push_filters(&mut query, opts);
	query.push(" ORDER BY created_at DESC, id DESC LIMIT ");
	query.push_bind(sql_limit(opts.limit));
	query.push(" OFFSET ");
	query.push_bind(i64::from(opts.offset));

	let rows = query.build().fetch_all(db).await.map_err(db_err)?;
	let items = collect_res(rows.iter().map(|row| history_from_row(row, false)))?;

	Ok(Page { items, total: total as u64 })
}

// vim: ts=4
