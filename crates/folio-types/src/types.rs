//! Common types used throughout Folio.

use serde::{Deserialize, Deserializer, Serialize};
use std::time::SystemTime;

use crate::prelude::*;

// Ids //
//*****//
macro_rules! id_type {
	($name:ident) => {
		#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(pub i64);

		impl std::fmt::Display for $name {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				write!(f, "{}", self.0)
			}
		}
	};
}

id_type!(UserId);
id_type!(NodeId);
id_type!(ContentId);
id_type!(HistoryId);

impl NodeId {
	/// Parent id of root nodes
	pub const ROOT: NodeId = NodeId(0);

	pub fn is_root(self) -> bool {
		self.0 == 0
	}
}

// Timestamp //
//***********//
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
	pub fn now() -> Timestamp {
		let res = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default();
		Timestamp(res.as_secs() as i64)
	}
}

impl std::fmt::Display for Timestamp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

// Patch //
//*******//
/// Tri-state field of a partial update.
///
/// - `Undefined`: leave the column alone
/// - `Null`: clear the column
/// - `Value(v)`: set the column to `v`
///
/// With `#[serde(default)]` a missing JSON field becomes `Undefined` and an explicit
/// `null` becomes `Null`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Patch<T> {
	#[default]
	Undefined,
	Null,
	Value(T),
}

impl<T> Patch<T> {
	pub fn is_undefined(&self) -> bool {
		matches!(self, Patch::Undefined)
	}
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		Ok(match Option::<T>::deserialize(deserializer)? {
			Some(v) => Patch::Value(v),
			None => Patch::Null,
		})
	}
}

// Status enums //
//**************//
/// Display status of a content node, independent of content status
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeStatus {
	#[default]
	Normal,
	Hidden,
}

impl NodeStatus {
	pub fn as_i64(self) -> i64 {
		match self {
			NodeStatus::Normal => 0,
			NodeStatus::Hidden => 1,
		}
	}

	pub fn from_i64(v: i64) -> FlResult<Self> {
		match v {
			0 => Ok(NodeStatus::Normal),
			1 => Ok(NodeStatus::Hidden),
			_ => Err(Error::ValidationError(format!("invalid node status: {}", v))),
		}
	}
}

/// Content status state machine
///
/// ```text
/// Normal(0) <-> Hidden(1)          owner edit
/// Normal|Hidden -> Rubbish(3)      trash
/// Rubbish -> Normal                restore
/// Banned(2)|Rubbish -> Purged(4)   delete forever
/// any -> any                       admin override
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentStatus {
	#[default]
	Normal,
	Hidden,
	Banned,
	Rubbish,
	Purged,
}

impl ContentStatus {
	pub fn as_i64(self) -> i64 {
		match self {
			ContentStatus::Normal => 0,
			ContentStatus::Hidden => 1,
			ContentStatus::Banned => 2,
			ContentStatus::Rubbish => 3,
			ContentStatus::Purged => 4,
		}
	}

	pub fn from_i64(v: i64) -> FlResult<Self> {
		match v {
			0 => Ok(ContentStatus::Normal),
			1 => Ok(ContentStatus::Hidden),
			2 => Ok(ContentStatus::Banned),
			3 => Ok(ContentStatus::Rubbish),
			4 => Ok(ContentStatus::Purged),
			_ => Err(Error::ValidationError(format!("invalid content status: {}", v))),
		}
	}

	/// Normal or Hidden
	pub fn is_active(self) -> bool {
		self.as_i64() <= 1
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CloseComment {
	Closed,
	#[default]
	Open,
	OpenDirect,
}

impl CloseComment {
	pub fn as_i64(self) -> i64 {
		match self {
			CloseComment::Closed => 0,
			CloseComment::Open => 1,
			CloseComment::OpenDirect => 2,
		}
	}

	pub fn from_i64(v: i64) -> FlResult<Self> {
		match v {
			0 => Ok(CloseComment::Closed),
			1 => Ok(CloseComment::Open),
			2 => Ok(CloseComment::OpenDirect),
			_ => Err(Error::ValidationError(format!("invalid close_comment: {}", v))),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Deserialize)]
	struct Probe {
		#[serde(default)]
		name: Patch<String>,
	}

	#[test]
	fn test_patch_deserialize_tristate() {
		let p: Probe = serde_json::from_str("{}").unwrap();
		assert_eq!(p.name, Patch::Undefined);
		let p: Probe = serde_json::from_str(r#"{"name":null}"#).unwrap();
		assert_eq!(p.name, Patch::Null);
		let p: Probe = serde_json::from_str(r#"{"name":"x"}"#).unwrap();
		assert_eq!(p.name, Patch::Value("x".to_string()));
	}

	#[test]
	fn test_content_status_order() {
		assert!(ContentStatus::Hidden.is_active());
		assert!(!ContentStatus::Rubbish.is_active());
		assert!(ContentStatus::Purged > ContentStatus::Banned);
		assert_eq!(ContentStatus::from_i64(3).unwrap(), ContentStatus::Rubbish);
		assert!(ContentStatus::from_i64(9).is_err());
	}
}

// vim: ts=4
