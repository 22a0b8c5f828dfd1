//! Acting user as resolved by the (external) session layer

use serde::{Deserialize, Serialize};

use crate::types::UserId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
	pub user_id: UserId,
	#[serde(default)]
	pub is_admin: bool,
}

impl Actor {
	pub fn user(user_id: UserId) -> Self {
		Self { user_id, is_admin: false }
	}

	pub fn admin(user_id: UserId) -> Self {
		Self { user_id, is_admin: true }
	}

	/// Ownership filter for store lookups. Admins are not restricted.
	pub fn owner_filter(&self) -> Option<UserId> {
		if self.is_admin { None } else { Some(self.user_id) }
	}
}


// vim: ts=4
