//! Error type shared by every Folio crate.
//!
//! Callers receive a tagged result; the HTTP layer (not part of this workspace) maps
//! the variants to status codes through [`Error::code`].

use std::fmt;

pub type FlResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	/// Missing or malformed request fields
	ValidationError(String),
	/// Seo slug already used by the same owner
	SeoConflict,
	/// Parent candidate missing, not owned, or not a root node
	ParentNotFound,
	ContentNodeNotFound,
	/// Generic "not found" (content, history rows)
	NotFound,
	/// A node was designated as its own parent
	SelfParent,
	/// Reorder would nest a node inside itself or exceed the two-level depth
	ContentNodeSortConflict,
	ContentNodeHasChildren,
	ContentNodeHasContentCanNotDelete,
	PermissionDenied,
	/// Underlying store failure, the transaction was rolled back
	DbError,
	Internal(String),

	// externals
	Io(std::io::Error),
}

impl Error {
	/// Stable machine readable code
	pub fn code(&self) -> &'static str {
		match self {
			Error::ValidationError(_) => "E-CORE-VALIDATION",
			Error::SeoConflict => "E-CORE-SEOCONFLICT",
			Error::ParentNotFound => "E-NODE-PARENTNOTFOUND",
			Error::ContentNodeNotFound => "E-NODE-NOTFOUND",
			Error::NotFound => "E-CORE-NOTFOUND",
			Error::SelfParent => "E-NODE-SELFPARENT",
			Error::ContentNodeSortConflict => "E-NODE-SORTCONFLICT",
			Error::ContentNodeHasChildren => "E-NODE-HASCHILDREN",
			Error::ContentNodeHasContentCanNotDelete => "E-NODE-HASCONTENT",
			Error::PermissionDenied => "E-AUTH-NOPERM",
			Error::DbError => "E-CORE-DBERR",
			Error::Internal(_) | Error::Io(_) => "E-CORE-INTERNAL",
		}
	}
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Error::ValidationError(msg) => write!(f, "validation error: {}", msg),
			Error::SeoConflict => write!(f, "seo already in use"),
			Error::ParentNotFound => write!(f, "parent node not found"),
			Error::ContentNodeNotFound => write!(f, "content node not found"),
			Error::NotFound => write!(f, "not found"),
			Error::SelfParent => write!(f, "node can not be its own parent"),
			Error::ContentNodeSortConflict => write!(f, "content node sort conflict"),
			Error::ContentNodeHasChildren => write!(f, "content node has children"),
			Error::ContentNodeHasContentCanNotDelete => {
				write!(f, "content node has content, can not delete")
			}
			Error::PermissionDenied => write!(f, "permission denied"),
			Error::DbError => write!(f, "database error"),
			Error::Internal(msg) => write!(f, "internal error: {}", msg),
			Error::Io(err) => write!(f, "io error: {}", err),
		}
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Error::Io(err) => Some(err),
			_ => None,
		}
	}
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		tracing::warn!("json error: {}", err);
		Self::ValidationError(err.to_string())
	}
}

impl From<serde_yaml::Error> for Error {
	fn from(err: serde_yaml::Error) -> Self {
		tracing::warn!("yaml error: {}", err);
		Self::ValidationError(err.to_string())
	}
}


// vim: ts=4
