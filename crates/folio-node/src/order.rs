//! Sort sequence changing operations: delete and move.
//!
//! Both rewrite a range of the user's sort numbers and then the node itself inside
//! one transaction, so the sequence stays `0..N` whatever fails.

use crate::node::load;
use crate::prelude::*;
use folio_core::transaction::finish;
use folio_types::store_adapter::{SortRange, UpdateNodeData};

/// Deletes a node without children or live contents and closes the gap it leaves
pub async fn delete(app: &App, user_id: UserId, node_id: NodeId) -> FlResult<()> {
	let _guard = app.lock_user(user_id).await;
	let node = load(app, user_id, node_id).await?;

	if app.store.count_children(user_id, node_id).await? > 0 {
		warn!(user_id = %user_id, node_id = %node_id, "Delete refused, node has children");
		return Err(Error::ContentNodeHasChildren);
	}
	if app.store.count_node_contents(user_id, node_id).await?.active > 0 {
		warn!(user_id = %user_id, node_id = %node_id, "Delete refused, node has contents");
		return Err(Error::ContentNodeHasContentCanNotDelete);
	}

	let mut tx = app.store.transaction().await?;
	let res = delete_in_tx(tx.as_mut(), &node).await;
	finish(tx, res).await?;

	info!(user_id = %user_id, node_id = %node_id, sort_num = node.sort_num, "Deleted content node");
	Ok(())
}

async fn delete_in_tx(tx: &mut dyn StoreTransaction, node: &ContentNode) -> FlResult<()> {
	tx.shift_sort_nums(node.user_id, SortRange::from(node.sort_num + 1), -1).await?;
	if tx.delete_node(node.user_id, node.id).await? == 0 {
		return Err(Error::ContentNodeNotFound);
	}
	Ok(())
}

/// Moves node `x` to the position of node `y`.
///
/// `x` lands on the sort number `y` had before the move and takes over `y`'s
/// parent, the nodes in between shift by one towards the gap `x` left.
pub async fn move_node(
	app: &App,
	user_id: UserId,
	node_id: NodeId,
	target_node_id: NodeId,
) -> FlResult<ContentNode> {
	let _guard = app.lock_user(user_id).await;
	let x = load(app, user_id, node_id).await?;
	let y = load(app, user_id, target_node_id).await?;

	if x.id == y.id || x.sort_num == y.sort_num {
		return Ok(x);
	}
	if y.parent_node_id == x.id {
		warn!(user_id = %user_id, node_id = %x.id, target_node_id = %y.id, "Move into own child");
		return Err(Error::ContentNodeSortConflict);
	}
	if y.level == 1 && app.store.count_children(user_id, x.id).await? > 0 {
		warn!(user_id = %user_id, node_id = %x.id, target_node_id = %y.id, "Move would nest children");
		return Err(Error::ContentNodeSortConflict);
	}

	let mut tx = app.store.transaction().await?;
	let res = move_in_tx(tx.as_mut(), &x, &y).await;
	finish(tx, res).await?;

	info!(
		user_id = %user_id,
		node_id = %x.id,
		from = x.sort_num,
		to = y.sort_num,
		parent_node_id = %y.parent_node_id,
		"Moved content node"
	);
	load(app, user_id, node_id).await
}

async fn move_in_tx(tx: &mut dyn StoreTransaction, x: &ContentNode, y: &ContentNode) -> FlResult<()> {
	let (range, delta) = if x.sort_num < y.sort_num {
		(SortRange::between(x.sort_num + 1, y.sort_num), -1)
	} else {
		(SortRange::between(y.sort_num, x.sort_num - 1), 1)
	};
	tx.shift_sort_nums(x.user_id, range, delta).await?;

	let data = UpdateNodeData {
		placement: Some(NodePlacement::of(y)),
		sort_num: Some(y.sort_num),
		..Default::default()
	};
	if tx.update_node(x.user_id, x.id, &data).await? == 0 {
		return Err(Error::ContentNodeNotFound);
	}
	Ok(())
}

// vim: ts=4
