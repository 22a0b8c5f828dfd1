use std::{
	fmt::Debug,
	io::ErrorKind,
	path::{Component, Path, PathBuf},
};

use async_trait::async_trait;
use tokio::fs::{create_dir_all, metadata};

use folio::{file_adapter, prelude::*};

/// Maps a file url to a path under `base_dir`.
///
/// Absolute urls (`https://host/upload/a.png`) lose their scheme and host, query
/// strings are dropped. Returns `None` for urls escaping the base directory.
fn url_path(base_dir: &Path, url: &str) -> Option<PathBuf> {
	let path = match url.find("://") {
		Some(pos) => {
			let rest = &url[pos + 3..];
			&rest[rest.find('/')?..]
		}
		None => url,
	};
	let path = path.split(['?', '#']).next().unwrap_or_default();
	let path = Path::new(path.trim_start_matches('/'));

	let mut res = PathBuf::from(base_dir);
	let mut depth = 0;
	for component in path.components() {
		match component {
			Component::Normal(part) => {
				res.push(part);
				depth += 1;
			}
			Component::CurDir => {}
			_ => return None,
		}
	}
	if depth == 0 { None } else { Some(res) }
}

#[derive(Debug)]
pub struct FileAdapterFs {
	base_dir: Box<Path>,
}

impl FileAdapterFs {
	pub async fn new(base_dir: Box<Path>) -> Result<Self, Error> {
		create_dir_all(&base_dir).await?;
		Ok(Self { base_dir })
	}
}

#[async_trait]
impl file_adapter::FileAdapter for FileAdapterFs {
	async fn exists(&self, url: &str) -> FlResult<bool> {
		let Some(path) = url_path(&self.base_dir, url) else {
			debug!("file url rejected: {}", url);
			return Ok(false);
		};

		match metadata(&path).await {
			Ok(meta) => Ok(meta.is_file()),
			Err(err) if matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => Ok(false),
			Err(err) => Err(err.into()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_url_path() {
		let base = Path::new("/srv/files");
		assert_eq!(url_path(base, "/upload/a.png"), Some(PathBuf::from("/srv/files/upload/a.png")));
		assert_eq!(url_path(base, "upload/a.png?w=20"), Some(PathBuf::from("/srv/files/upload/a.png")));
		assert_eq!(
			url_path(base, "https://cdn.example.com/upload/a.png"),
			Some(PathBuf::from("/srv/files/upload/a.png"))
		);
		assert_eq!(url_path(base, "/upload/../../etc/passwd"), None);
		assert_eq!(url_path(base, "/"), None);
		assert_eq!(url_path(base, "https://cdn.example.com"), None);
	}
}

// vim: ts=4
