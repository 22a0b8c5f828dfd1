//! Node creation, lookup and partial updates

use serde::Deserialize;

use crate::prelude::*;
use folio_core::{transaction::finish, validate};
use folio_types::auth::Actor;
use folio_types::store_adapter::{CreateNodeData, ListNodeOptions, Page, UpdateNodeData};
use folio_types::types::NodeStatus;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNode {
	pub seo: Option<Box<str>>,
	pub name: Box<str>,
	#[serde(default)]
	pub describe: Box<str>,
	pub image_path: Option<Box<str>>,
	/// 0 creates a root node
	#[serde(default)]
	pub parent_node_id: NodeId,
}

/// Lookup key of [`take`], `id` wins when both are given
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSelector {
	pub id: Option<NodeId>,
	pub seo: Option<Box<str>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNodes {
	/// Only honored for admins, others always list their own nodes
	pub user_id: Option<UserId>,
	pub parent_node_id: Option<NodeId>,
	pub level: Option<u8>,
	pub status: Option<NodeStatus>,
	pub seo: Option<Box<str>>,
	#[serde(default)]
	pub limit: u32,
	#[serde(default)]
	pub offset: u32,
}

/// Display fields of a node. `Undefined` keeps the stored value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNodeInfo {
	#[serde(default)]
	pub name: Patch<Box<str>>,
	#[serde(default)]
	pub describe: Patch<Box<str>>,
	#[serde(default)]
	pub image_path: Patch<Box<str>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParentChange {
	/// Promote to a root node
	Root,
	/// Attach under a root node
	Reparent(NodeId),
}

/// Loads a node owned by `user_id`
pub(crate) async fn load(app: &App, user_id: UserId, node_id: NodeId) -> FlResult<ContentNode> {
	app.store.read_node(user_id, node_id).await?.ok_or(Error::ContentNodeNotFound)
}

/// Placement under `parent_node_id`, which must be a root node of the same user
async fn parent_placement(
	app: &App,
	user_id: UserId,
	parent_node_id: NodeId,
) -> FlResult<NodePlacement> {
	if parent_node_id.is_root() {
		return Ok(NodePlacement::root());
	}
	match app.store.read_node(user_id, parent_node_id).await? {
		Some(parent) if parent.level == 0 => Ok(NodePlacement::under(parent.id)),
		_ => {
			warn!(user_id = %user_id, parent_node_id = %parent_node_id, "Parent node not usable");
			Err(Error::ParentNotFound)
		}
	}
}

async fn check_seo_free(app: &App, user_id: UserId, seo: &str) -> FlResult<()> {
	validate::seo(seo)?;
	if app.store.node_seo_exists(user_id, seo).await? {
		warn!(user_id = %user_id, seo = %seo, "Node seo already in use");
		return Err(Error::SeoConflict);
	}
	Ok(())
}

pub async fn create(app: &App, user_id: UserId, req: &CreateNode) -> FlResult<ContentNode> {
	validate::required("name", &req.name, validate::NAME_MAX_CHARS)?;
	validate::max_chars("describe", &req.describe, validate::DESCRIBE_MAX_CHARS)?;
	if let Some(image_path) = &req.image_path {
		validate::image_path(app.files.as_ref(), image_path).await?;
	}

	// The new node takes the next sort number
	let _guard = app.lock_user(user_id).await;
	if let Some(seo) = &req.seo {
		check_seo_free(app, user_id, seo).await?;
	}
	let placement = parent_placement(app, user_id, req.parent_node_id).await?;

	let mut tx = app.store.transaction().await?;
	let res = create_in_tx(tx.as_mut(), user_id, req, placement).await;
	let node = finish(tx, res).await?;

	info!(
		user_id = %user_id,
		node_id = %node.id,
		sort_num = node.sort_num,
		level = node.level,
		"Created content node"
	);
	Ok(node)
}

async fn create_in_tx(
	tx: &mut dyn StoreTransaction,
	user_id: UserId,
	req: &CreateNode,
	placement: NodePlacement,
) -> FlResult<ContentNode> {
	let sort_num = tx.count_nodes(user_id).await?;
	tx.create_node(&CreateNodeData {
		user_id,
		seo: req.seo.clone(),
		name: req.name.clone(),
		describe: req.describe.clone(),
		image_path: req.image_path.clone(),
		placement,
		sort_num,
	})
	.await
}

pub async fn take(app: &App, user_id: UserId, selector: &NodeSelector) -> FlResult<ContentNode> {
	let node = match (selector.id, selector.seo.as_deref()) {
		(Some(id), _) if !id.is_root() => app.store.read_node(user_id, id).await?,
		(_, Some(seo)) if !seo.is_empty() => app.store.read_node_by_seo(user_id, seo).await?,
		_ => return Err(Error::ValidationError("node id or seo required".into())),
	};
	node.ok_or(Error::ContentNodeNotFound)
}

pub async fn list(app: &App, actor: &Actor, query: &ListNodes) -> FlResult<Page<ContentNode>> {
	let user_id = if actor.is_admin { query.user_id } else { Some(actor.user_id) };
	let opts = ListNodeOptions {
		user_id,
		parent_node_id: query.parent_node_id,
		level: query.level,
		status: query.status,
		seo: query.seo.clone(),
		limit: validate::limit(&app.settings, query.limit),
		offset: query.offset,
	};
	app.store.list_nodes(&opts).await
}

/// Writes a single-statement node patch
async fn apply(
	app: &App,
	user_id: UserId,
	node_id: NodeId,
	data: &UpdateNodeData,
) -> FlResult<ContentNode> {
	let mut tx = app.store.transaction().await?;
	let res = tx.update_node(user_id, node_id, data).await;
	finish(tx, res).await?;
	load(app, user_id, node_id).await
}

/// Changes the seo of a node, contents attached to it follow along
pub async fn update_identity(
	app: &App,
	user_id: UserId,
	node_id: NodeId,
	seo: Option<&str>,
) -> FlResult<ContentNode> {
	let node = load(app, user_id, node_id).await?;
	if node.seo.as_deref() == seo {
		return Ok(node);
	}
	if let Some(seo) = seo {
		check_seo_free(app, user_id, seo).await?;
	}

	let data = UpdateNodeData {
		seo: seo.map_or(Patch::Null, |seo| Patch::Value(seo.into())),
		..Default::default()
	};
	let mut tx = app.store.transaction().await?;
	let res = async {
		tx.update_node(user_id, node_id, &data).await?;
		tx.update_contents_node_seo(user_id, node_id, seo).await
	}
	.await;
	let contents = finish(tx, res).await?;

	info!(user_id = %user_id, node_id = %node_id, contents, "Updated content node seo");
	load(app, user_id, node_id).await
}

pub async fn update_info(
	app: &App,
	user_id: UserId,
	node_id: NodeId,
	req: &UpdateNodeInfo,
) -> FlResult<ContentNode> {
	let node = load(app, user_id, node_id).await?;

	let name = match &req.name {
		Patch::Null => return Err(Error::ValidationError("name is required".into())),
		Patch::Value(name) => {
			validate::required("name", name, validate::NAME_MAX_CHARS)?;
			Patch::Value(name.clone())
		}
		Patch::Undefined => Patch::Undefined,
	};
	let describe = match &req.describe {
		Patch::Null => Patch::Value("".into()),
		Patch::Value(describe) => {
			validate::max_chars("describe", describe, validate::DESCRIBE_MAX_CHARS)?;
			Patch::Value(describe.clone())
		}
		Patch::Undefined => Patch::Undefined,
	};
	let image_path = match &req.image_path {
		Patch::Value(image_path) if node.image_path.as_ref() != Some(image_path) => {
			validate::image_path(app.files.as_ref(), image_path).await?;
			Patch::Value(image_path.clone())
		}
		Patch::Value(_) | Patch::Undefined => Patch::Undefined,
		Patch::Null => Patch::Null,
	};

	let data = UpdateNodeData { name, describe, image_path, ..Default::default() };
	if data.is_empty() {
		return Ok(node);
	}
	let node = apply(app, user_id, node_id, &data).await?;
	info!(user_id = %user_id, node_id = %node_id, "Updated content node info");
	Ok(node)
}

pub async fn update_status(
	app: &App,
	user_id: UserId,
	node_id: NodeId,
	status: NodeStatus,
) -> FlResult<ContentNode> {
	let node = load(app, user_id, node_id).await?;
	if node.status == status {
		return Ok(node);
	}

	let data = UpdateNodeData { status: Patch::Value(status), ..Default::default() };
	let node = apply(app, user_id, node_id, &data).await?;
	info!(user_id = %user_id, node_id = %node_id, status = ?status, "Updated content node status");
	Ok(node)
}

pub async fn update_parent(
	app: &App,
	user_id: UserId,
	node_id: NodeId,
	change: ParentChange,
) -> FlResult<ContentNode> {
	let node = load(app, user_id, node_id).await?;

	let placement = match change {
		ParentChange::Reparent(parent_node_id) if !parent_node_id.is_root() => {
			if parent_node_id == node.id {
				warn!(user_id = %user_id, node_id = %node_id, "Node set as its own parent");
				return Err(Error::SelfParent);
			}
			let placement = parent_placement(app, user_id, parent_node_id).await?;
			if placement == NodePlacement::of(&node) {
				return Ok(node);
			}
			// A child can not have children of its own
			if app.store.count_children(user_id, node_id).await? > 0 {
				warn!(user_id = %user_id, node_id = %node_id, "Node with children can not be reparented");
				return Err(Error::ContentNodeHasChildren);
			}
			placement
		}
		_ => {
			if node.level == 0 {
				return Ok(node);
			}
			NodePlacement::root()
		}
	};

	let data = UpdateNodeData { placement: Some(placement), ..Default::default() };
	let node = apply(app, user_id, node_id, &data).await?;
	info!(
		user_id = %user_id,
		node_id = %node_id,
		parent_node_id = %node.parent_node_id,
		"Updated content node parent"
	);
	Ok(node)
}

// vim: ts=4
