//! Shared utilities for SQLite adapter
//!
//! Helper functions, macros, and error mapping utilities used across all domain
//! modules.

use folio::prelude::*;
use sqlx::sqlite::SqliteRow;

/// Applies a Patch field to an UPDATE query with proper binding.
/// Returns true if the field was added (for tracking has_updates)
macro_rules! push_patch {
	// For bindable values (strings, numbers, bools)
	($query:expr, $has_updates:expr, $field:literal, $patch:expr, |$v:ident| $convert:expr) => {{
		match $patch {
			Patch::Undefined => $has_updates,
			Patch::Null => {
				if $has_updates {
					$query.push(", ");
				}
				$query.push(concat!($field, "=NULL"));
				true
			}
			Patch::Value($v) => {
				if $has_updates {
					$query.push(", ");
				}
				$query.push(concat!($field, "=")).push_bind($convert);
				true
			}
		}
	}};
}

pub(crate) use push_patch;

/// Log database error for debugging
pub(crate) fn inspect(err: &sqlx::Error) {
	warn!("DB: {:#?}", err);
}

/// Translates a failed statement into the crate error
pub(crate) fn db_err(err: sqlx::Error) -> Error {
	if let sqlx::Error::RowNotFound = err {
		return Error::NotFound;
	}
	inspect(&err);
	Error::DbError
}

/// Like [`db_err`], but reports unique index violations (duplicate seo) as conflicts
pub(crate) fn write_err(err: sqlx::Error) -> Error {
	if let Some(db_err) = err.as_database_error() {
		if db_err.is_unique_violation() {
			debug!("DB: unique violation: {}", db_err.message());
			return Error::SeoConflict;
		}
	}
	db_err(err)
}

/// Map an optional single-row query result, translating SQL errors to FlResult
pub(crate) fn map_opt<T, F>(row: Result<Option<SqliteRow>, sqlx::Error>, f: F) -> FlResult<Option<T>>
where
	F: FnOnce(&SqliteRow) -> Result<T, sqlx::Error>,
{
	match row {
		Ok(Some(row)) => f(&row).map(Some).map_err(db_err),
		Ok(None) => Ok(None),
		Err(err) => Err(db_err(err)),
	}
}

/// Collect an iterator of query results, translating errors
pub(crate) fn collect_res<T>(
	iter: impl Iterator<Item = Result<T, sqlx::Error>> + Unpin,
) -> FlResult<Vec<T>> {
	let mut items = Vec::new();
	for item in iter {
		items.push(item.map_err(db_err)?);
	}
	Ok(items)
}

/// Wraps a domain decoding failure so it can travel through row mapping closures
pub(crate) fn decode_err(err: Error) -> sqlx::Error {
	sqlx::Error::Decode(Box::new(err))
}

/// SQLite reads `LIMIT -1` as "no limit"
pub(crate) fn sql_limit(limit: u32) -> i64 {
	if limit == 0 { -1 } else { i64::from(limit) }
}

// vim: ts=4
