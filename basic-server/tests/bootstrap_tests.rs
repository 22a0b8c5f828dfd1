//! App assembly from a settings file

use std::time::Duration;
use tempfile::TempDir;

use folio_basic_server::{bootstrap, load_settings, sqlite_options};
use folio_node::{CreateNode, ListNodes, node};
use folio_types::auth::Actor;
use folio_types::error::Error;
use folio_types::types::UserId;

const ALICE: UserId = UserId(1);

async fn write_config(temp_dir: &TempDir) -> std::path::PathBuf {
	let root = temp_dir.path();
	let yaml = format!(
		"db_path: {}\nfile_root: {}\nmax_connections: 2\nbusy_timeout_secs: 1\nlog_filter: warn\nlist_limit_default: 3\n",
		root.join("db/folio.db").display(),
		root.join("files").display(),
	);
	let path = root.join("folio.yaml");
	tokio::fs::write(&path, yaml).await.expect("Failed to write config");
	path
}

#[tokio::test]
async fn test_settings_from_file() {
	let temp = TempDir::new().expect("Failed to create temp directory");
	let config = write_config(&temp).await;

	let settings = load_settings(Some(&config)).await.expect("load");
	assert_eq!(settings.db_path, temp.path().join("db/folio.db"));
	assert_eq!(&*settings.log_filter, "warn");
	assert_eq!(settings.list_limit_default, 3);

	let opts = sqlite_options(&settings);
	assert_eq!(opts.max_connections, 2);
	assert_eq!(opts.busy_timeout, Duration::from_secs(1));
}

#[tokio::test]
async fn test_missing_config_file() {
	let temp = TempDir::new().expect("Failed to create temp directory");

	let res = load_settings(Some(&temp.path().join("nope.yaml"))).await;
	assert!(matches!(res, Err(Error::Io(_))));
}

#[tokio::test]
async fn test_bootstrap_uses_settings() {
	let temp = TempDir::new().expect("Failed to create temp directory");
	let config = write_config(&temp).await;
	let app = bootstrap(load_settings(Some(&config)).await.expect("load")).await.expect("bootstrap");

	assert!(temp.path().join("db/folio.db").is_file());
	assert!(temp.path().join("files").is_dir());

	// Image references resolve under the configured file root
	tokio::fs::create_dir_all(temp.path().join("files/upload")).await.expect("mkdir");
	tokio::fs::write(temp.path().join("files/upload/cover.png"), b"png").await.expect("write");
	let req = CreateNode {
		name: "News".into(),
		image_path: Some("/upload/cover.png".into()),
		..Default::default()
	};
	node::create(&app, ALICE, &req).await.expect("create with image");
	let req = CreateNode {
		name: "Blog".into(),
		image_path: Some("/upload/missing.png".into()),
		..Default::default()
	};
	assert!(matches!(node::create(&app, ALICE, &req).await, Err(Error::ValidationError(_))));

	// Listings default to the configured page size
	for name in ["Blog", "Life", "Tech"] {
		let req = CreateNode { name: name.into(), ..Default::default() };
		node::create(&app, ALICE, &req).await.expect("create");
	}
	let page = node::list(&app, &Actor::user(ALICE), &ListNodes::default()).await.expect("list");
	assert_eq!((page.total, page.items.len()), (4, 3));
}

// vim: ts=4
