//! Asset identifiers, kinds and URL resolution.

use crate::config::{IMAGE_ROOT, VIDEO_ROOT};
use once_cell::sync::Lazy;
use regex::Regex;
use std::rc::Rc;

/// A resolved resource locator: a URL or an inline `data:` URI.
///
/// Shared so that every caller hitting the cache gets the same allocation.
pub type Locator = Rc<str>;

static VIDEO_SUFFIX_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(mp4|webm)$").unwrap());

/// Which loader (and which asset root) an identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Image,
    Video,
}

impl AssetKind {
    /// Classify an asset identifier by its filename suffix.
    pub fn from_path(path: &str) -> Self {
        if VIDEO_SUFFIX_REGEX.is_match(path) {
            AssetKind::Video
        } else {
            AssetKind::Image
        }
    }

    /// Directory below the base URL that holds assets of this kind.
    pub fn root(self) -> &'static str {
        match self {
            AssetKind::Image => IMAGE_ROOT,
            AssetKind::Video => VIDEO_ROOT,
        }
    }
}

/// Join `base_url`, the kind's root and the relative asset path.
pub fn asset_url(base_url: &str, kind: AssetKind, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if base.is_empty() {
        format!("{}/{}", kind.root(), path)
    } else {
        format!("{}/{}/{}", base, kind.root(), path)
    }
}
