//! Per-user write serialization
//!
//! Node creation, deletion and reordering shift a user's whole sort sequence. Holding
//! the user's lock from the first precondition read until commit keeps two such
//! writes of the same user from interleaving. Different users never contend.

use parking_lot::Mutex;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::OwnedMutexGuard;

use folio_types::types::UserId;

/// Held while a user's sort sequence is being rewritten
pub type UserLockGuard = OwnedMutexGuard<()>;

#[derive(Debug, Default)]
pub struct UserLocks {
	locks: Mutex<HashMap<UserId, Arc<tokio::sync::Mutex<()>>>>,
}

impl UserLocks {
	pub fn new() -> Self {
		Self::default()
	}

	fn entry(&self, user_id: UserId) -> Arc<tokio::sync::Mutex<()>> {
		let mut locks = self.locks.lock();
		// Entries referenced only by the map are idle
		locks.retain(|_, lock| Arc::strong_count(lock) > 1);
		locks.entry(user_id).or_default().clone()
	}

	/// Waits until the user's lock is free
	pub async fn lock(&self, user_id: UserId) -> UserLockGuard {
		self.entry(user_id).lock_owned().await
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn try_lock(locks: &UserLocks, user_id: UserId) -> Option<UserLockGuard> {
		locks.entry(user_id).try_lock_owned().ok()
	}

	/// Users with a held or awaited lock
	fn held(locks: &UserLocks) -> usize {
		locks.locks.lock().values().filter(|lock| Arc::strong_count(lock) > 1).count()
	}

	#[test]
	fn test_same_user_excluded() {
		let locks = UserLocks::new();
		let guard = try_lock(&locks, UserId(1)).expect("first lock");
		assert!(try_lock(&locks, UserId(1)).is_none());
		assert!(try_lock(&locks, UserId(2)).is_some());
		drop(guard);
		assert!(try_lock(&locks, UserId(1)).is_some());
	}

	#[test]
	fn test_idle_entries_pruned() {
		let locks = UserLocks::new();
		{
			let _a = try_lock(&locks, UserId(1));
			let _b = try_lock(&locks, UserId(2));
			assert_eq!(held(&locks), 2);
		}
		assert_eq!(held(&locks), 0);
		let _c = try_lock(&locks, UserId(3));
		assert_eq!(locks.locks.lock().len(), 1);
	}

	#[tokio::test]
	async fn test_waiter_runs_after_release() {
		let locks = Arc::new(UserLocks::new());
		let guard = locks.lock(UserId(1)).await;
		let (tx, mut rx) = tokio::sync::oneshot::channel();

		let waiter = {
			let locks = locks.clone();
			tokio::spawn(async move {
				let _guard = locks.lock(UserId(1)).await;
				let _ = tx.send(());
			})
		};
		tokio::task::yield_now().await;
		assert!(rx.try_recv().is_err());

		drop(guard);
		waiter.await.expect("join");
		assert!(rx.try_recv().is_ok());
	}
}

// vim: ts=4
