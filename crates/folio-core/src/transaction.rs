//! Transaction completion helper

use folio_types::store_adapter::StoreTransaction;

use crate::prelude::*;

/// Commits `tx` when `res` is ok. Otherwise rolls it back and returns the original
/// error, a failing rollback is only logged.
pub async fn finish<T>(mut tx: Box<dyn StoreTransaction>, res: FlResult<T>) -> FlResult<T> {
	match res {
		Ok(val) => {
			tx.commit().await?;
			Ok(val)
		}
		Err(err) => {
			debug!("rolling back: {}", err);
			if let Err(rb_err) = tx.rollback().await {
				warn!("rollback failed: {}", rb_err);
			}
			Err(err)
		}
	}
}

// vim: ts=4
