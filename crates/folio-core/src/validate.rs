//! Request field validation shared by the node and content managers.
//!
//! All checks run before a transaction is opened.

use folio_types::file_adapter::FileAdapter;

use crate::prelude::*;
use crate::settings::Settings;

pub const SEO_MIN_CHARS: usize = 4;
pub const SEO_MAX_CHARS: usize = 29;
pub const NAME_MAX_CHARS: usize = 99;
pub const TITLE_MAX_CHARS: usize = 99;
pub const DESCRIBE_MAX_CHARS: usize = 199;
pub const IMAGE_PATH_MAX_CHARS: usize = 699;

/// Seo slugs are 4 to 29 unicode letters or digits
pub fn seo(seo: &str) -> FlResult<()> {
	let len = seo.chars().count();
	if !(SEO_MIN_CHARS..=SEO_MAX_CHARS).contains(&len) {
		return Err(Error::ValidationError(format!(
			"seo must be {}-{} characters",
			SEO_MIN_CHARS, SEO_MAX_CHARS
		)));
	}
	if !seo.chars().all(char::is_alphanumeric) {
		return Err(Error::ValidationError("seo must be alphanumeric".into()));
	}
	Ok(())
}

/// Non-empty text of at most `max` characters
pub fn required(field: &str, value: &str, max: usize) -> FlResult<()> {
	if value.trim().is_empty() {
		return Err(Error::ValidationError(format!("{} is required", field)));
	}
	max_chars(field, value, max)
}

pub fn max_chars(field: &str, value: &str, max: usize) -> FlResult<()> {
	if value.chars().count() > max {
		return Err(Error::ValidationError(format!("{} is longer than {} characters", field, max)));
	}
	Ok(())
}

/// Image references must be short enough and point to an uploaded file
pub async fn image_path(files: &dyn FileAdapter, url: &str) -> FlResult<()> {
	max_chars("imagePath", url, IMAGE_PATH_MAX_CHARS)?;
	if !files.exists(url).await? {
		debug!("image not found: {}", url);
		return Err(Error::ValidationError("image url does not exist".into()));
	}
	Ok(())
}

/// Page size of a listing: 0 picks the default, larger values are capped
pub fn limit(settings: &Settings, limit: u32) -> u32 {
	match limit {
		0 => settings.list_limit_default,
		n => n.min(settings.list_limit_max),
	}
}


// vim: ts=4
