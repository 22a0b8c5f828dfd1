//! Status transitions, visibility of purged contents and listings

mod common;

use common::*;
use folio_content::lifecycle::{self, count_node_contents, list_contents, take_content};
use folio_content::{CreateContent, ListContents, StatusTransition, versioning};
use folio_types::auth::Actor;
use folio_types::error::Error;
use folio_types::types::{ContentStatus, NodeId, UserId};

const ALICE: UserId = UserId(1);
const BOB: UserId = UserId(2);

fn alice() -> Actor {
	Actor::user(ALICE)
}

fn admin() -> Actor {
	Actor::admin(UserId(99))
}

#[tokio::test]
async fn test_trash_and_restore() {
	let (app, _temp) = create_test_app().await;
	let content = create_content(&app, ALICE, "Hello", NodeId::ROOT).await;

	assert!(lifecycle::transition(&app, &alice(), content.id, StatusTransition::Trash).await.expect("trash"));
	let trashed = take_content(&app, &alice(), content.id).await.expect("take");
	assert_eq!(trashed.status, ContentStatus::Rubbish);

	// Second trash finds no active content and changes nothing
	assert!(!lifecycle::transition(&app, &alice(), content.id, StatusTransition::Trash).await.expect("trash"));

	assert!(lifecycle::transition(&app, &alice(), content.id, StatusTransition::Restore).await.expect("restore"));
	assert!(!lifecycle::transition(&app, &alice(), content.id, StatusTransition::Restore).await.expect("restore"));
	let restored = take_content(&app, &alice(), content.id).await.expect("take");
	assert_eq!(restored.status, ContentStatus::Normal);
}

#[tokio::test]
async fn test_hidden_content_can_be_trashed() {
	let (app, _temp) = create_test_app().await;
	let content = versioning::create_content(
		&app,
		ALICE,
		&CreateContent { title: "Secret".into(), status: ContentStatus::Hidden, ..Default::default() },
	)
	.await
	.expect("create");
	assert_eq!(content.status, ContentStatus::Hidden);

	assert!(lifecycle::transition(&app, &alice(), content.id, StatusTransition::Trash).await.expect("trash"));
	// Restore always goes back to Normal
	assert!(lifecycle::transition(&app, &alice(), content.id, StatusTransition::Restore).await.expect("restore"));
	let restored = take_content(&app, &alice(), content.id).await.expect("take");
	assert_eq!(restored.status, ContentStatus::Normal);
}

#[tokio::test]
async fn test_purge_requires_rubbish_or_banned() {
	let (app, _temp) = create_test_app().await;
	let content = create_content(&app, ALICE, "Hello", NodeId::ROOT).await;

	assert!(!lifecycle::transition(&app, &alice(), content.id, StatusTransition::Purge).await.expect("purge"));
	assert_eq!(take_content(&app, &alice(), content.id).await.expect("take").status, ContentStatus::Normal);

	lifecycle::transition(&app, &alice(), content.id, StatusTransition::Trash).await.expect("trash");
	assert!(lifecycle::transition(&app, &alice(), content.id, StatusTransition::Purge).await.expect("purge"));

	// Purged contents are gone for their owner, admins still see them
	let res = take_content(&app, &alice(), content.id).await;
	assert!(matches!(res, Err(Error::NotFound)));
	let purged = take_content(&app, &admin(), content.id).await.expect("admin take");
	assert_eq!(purged.status, ContentStatus::Purged);

	// Transitions do not reveal the purged row to its owner either
	for t in [StatusTransition::Purge, StatusTransition::Restore, StatusTransition::Trash] {
		let res = lifecycle::transition(&app, &alice(), content.id, t).await;
		assert!(matches!(res, Err(Error::NotFound)), "{:?}", t);
	}
	let restore = StatusTransition::Override(ContentStatus::Rubbish);
	assert!(lifecycle::transition(&app, &admin(), content.id, restore).await.expect("admin restore"));
}

#[tokio::test]
async fn test_override_is_admin_only() {
	let (app, _temp) = create_test_app().await;
	let content = create_content(&app, ALICE, "Hello", NodeId::ROOT).await;

	let ban = StatusTransition::Override(ContentStatus::Banned);
	let res = lifecycle::transition(&app, &alice(), content.id, ban).await;
	assert!(matches!(res, Err(Error::PermissionDenied)));

	assert!(lifecycle::transition(&app, &admin(), content.id, ban).await.expect("ban"));
	let banned = take_content(&app, &alice(), content.id).await.expect("take");
	assert_eq!(banned.status, ContentStatus::Banned);

	// Banned contents cannot be trashed or restored by the owner, only purged
	assert!(!lifecycle::transition(&app, &alice(), content.id, StatusTransition::Trash).await.expect("trash"));
	assert!(!lifecycle::transition(&app, &alice(), content.id, StatusTransition::Restore).await.expect("restore"));
	assert!(lifecycle::transition(&app, &alice(), content.id, StatusTransition::Purge).await.expect("purge"));

	// Admins can bring anything back
	let unpurge = StatusTransition::Override(ContentStatus::Normal);
	assert!(lifecycle::transition(&app, &admin(), content.id, unpurge).await.expect("override"));
	assert_eq!(take_content(&app, &alice(), content.id).await.expect("take").status, ContentStatus::Normal);
}

#[tokio::test]
async fn test_transition_of_foreign_content() {
	let (app, _temp) = create_test_app().await;
	let content = create_content(&app, ALICE, "Hello", NodeId::ROOT).await;

	let res = lifecycle::transition(&app, &Actor::user(BOB), content.id, StatusTransition::Trash).await;
	assert!(matches!(res, Err(Error::NotFound)));
	let res = take_content(&app, &Actor::user(BOB), content.id).await;
	assert!(matches!(res, Err(Error::NotFound)));

	// Admins act on any user's content
	assert!(lifecycle::transition(&app, &admin(), content.id, StatusTransition::Trash).await.expect("trash"));
}

#[tokio::test]
async fn test_list_contents() {
	let (app, _temp) = create_test_app().await;
	let news = create_node(&app, ALICE, "news").await;
	let first = create_content(&app, ALICE, "First", news.id).await;
	let second = create_content(&app, ALICE, "Second", news.id).await;
	let pinned = versioning::create_content(
		&app,
		ALICE,
		&CreateContent { title: "Pinned".into(), top: true, ..Default::default() },
	)
	.await
	.expect("create");
	create_content(&app, BOB, "Bobs", NodeId::ROOT).await;

	let page = list_contents(&app, &alice(), &ListContents::default()).await.expect("list");
	assert_eq!(page.total, 3);
	let ids: Vec<_> = page.items.iter().map(|c| c.id).collect();
	assert_eq!(ids, vec![pinned.id, second.id, first.id]);

	let query = ListContents { node_id: Some(news.id), limit: 1, ..Default::default() };
	let page = list_contents(&app, &alice(), &query).await.expect("list");
	assert_eq!((page.total, page.items.len()), (2, 1));

	lifecycle::transition(&app, &alice(), first.id, StatusTransition::Trash).await.expect("trash");
	lifecycle::transition(&app, &alice(), first.id, StatusTransition::Purge).await.expect("purge");

	let page = list_contents(&app, &alice(), &ListContents::default()).await.expect("list");
	assert_eq!(page.total, 2);
	let query = ListContents { status: Some(ContentStatus::Purged), ..Default::default() };
	assert_eq!(list_contents(&app, &alice(), &query).await.expect("list").total, 0);

	// Admins see purged contents and every user's contents
	assert_eq!(list_contents(&app, &admin(), &query).await.expect("list").total, 1);
	let page = list_contents(&app, &admin(), &ListContents::default()).await.expect("list");
	assert_eq!(page.total, 4);
	let query = ListContents { user_id: Some(BOB), ..Default::default() };
	assert_eq!(list_contents(&app, &admin(), &query).await.expect("list").total, 1);
	assert_eq!(list_contents(&app, &alice(), &query).await.expect("list").total, 2);

	let count = count_node_contents(&app, ALICE, news.id).await.expect("count");
	assert_eq!((count.total, count.active), (2, 1));
}

// vim: ts=4
