//! Media cache & loader: cache-first resolution of images and videos.
//!
//! Images always resolve to something displayable: the cached locator, the
//! freshly loaded one, or a placeholder. Videos have no placeholder, so
//! `None` means "not ready". Load failures never leave this module; they are
//! logged and degraded.

use crate::asset::{AssetKind, Locator};
use crate::cache::{MediaCache, PendingLoad};
use crate::config::{PreloadConfig, DEFAULT_PLACEHOLDER_HEIGHT, DEFAULT_PLACEHOLDER_WIDTH};
use crate::error::AssetError;
use crate::placeholder::PlaceholderGenerator;
use crate::runtime::{AssetFetcher, Scheduler};
use futures::FutureExt;
use log::{debug, warn};
use std::rc::Rc;

/// Options for [`MediaLoader::resolve_image`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageOptions {
    /// Return the placeholder at once and load in the background.
    pub lazy: bool,
    pub width: u32,
    pub height: u32,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            lazy: false,
            width: DEFAULT_PLACEHOLDER_WIDTH,
            height: DEFAULT_PLACEHOLDER_HEIGHT,
        }
    }
}

impl ImageOptions {
    pub fn lazy() -> Self {
        Self {
            lazy: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VideoOptions {
    pub lazy: bool,
}

/// Outcome of an image resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedImage {
    /// The real asset (from cache or just loaded).
    Loaded(Locator),
    /// A synthesized stand-in; the real asset is missing or still loading.
    Placeholder(Locator),
}

impl ResolvedImage {
    pub fn locator(&self) -> &Locator {
        match self {
            ResolvedImage::Loaded(l) | ResolvedImage::Placeholder(l) => l,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, ResolvedImage::Placeholder(_))
    }
}

/// Cache-first loader shared by the whole application.
///
/// Cloning is cheap and every clone shares the same cache.
#[derive(Clone)]
pub struct MediaLoader {
    cache: MediaCache,
    fetcher: Rc<dyn AssetFetcher>,
    scheduler: Rc<dyn Scheduler>,
    placeholders: PlaceholderGenerator,
    idle_delay_ms: u32,
}

impl MediaLoader {
    pub fn new(
        fetcher: Rc<dyn AssetFetcher>,
        scheduler: Rc<dyn Scheduler>,
        config: &PreloadConfig,
    ) -> Self {
        Self {
            cache: MediaCache::new(config.cache_capacity),
            fetcher,
            scheduler,
            placeholders: PlaceholderGenerator::from_entropy(),
            idle_delay_ms: config.idle_delay_ms,
        }
    }

    /// Replace the placeholder colour source (tests use a seeded one).
    pub fn with_placeholders(mut self, placeholders: PlaceholderGenerator) -> Self {
        self.placeholders = placeholders;
        self
    }

    pub fn cache(&self) -> &MediaCache {
        &self.cache
    }

    pub fn placeholders(&self) -> &PlaceholderGenerator {
        &self.placeholders
    }

    pub fn scheduler(&self) -> &Rc<dyn Scheduler> {
        &self.scheduler
    }

    /// Cached locator for `path`, without starting a load.
    pub fn peek(&self, path: &str) -> Option<Locator> {
        self.cache.get(path)
    }

    /// Eager cache-first load that reports failure to the caller.
    ///
    /// Joins the running load for `path` if there is one.
    pub async fn load(&self, kind: AssetKind, path: &str) -> Result<Locator, AssetError> {
        if let Some(hit) = self.cache.get(path) {
            return Ok(hit);
        }
        self.pending_load(kind, path).await
    }

    /// The in-flight load for `path`, started here if none is running.
    fn pending_load(&self, kind: AssetKind, path: &str) -> PendingLoad {
        if let Some(pending) = self.cache.pending(path) {
            debug!("Joining running load for {}", path);
            return pending;
        }

        let cache = self.cache.clone();
        let fetch = self.fetcher.fetch(kind, path);
        let key = path.to_string();
        let pending = async move {
            let result = fetch.await.map(|locator| {
                debug!("Cached {:?} asset {}", kind, key);
                cache.insert_if_absent(&key, locator)
            });
            cache.finish_load(&key);
            result
        }
        .boxed_local()
        .shared();

        self.cache.begin_load(path, pending.clone());
        pending
    }

    /// Resolve an image, falling back to a placeholder.
    ///
    /// With `options.lazy` the real image is loaded in the background and the
    /// placeholder is returned without waiting.
    pub async fn resolve_image(
        &self,
        path: &str,
        fallback_label: Option<&str>,
        options: ImageOptions,
    ) -> ResolvedImage {
        if let Some(hit) = self.cache.get(path) {
            return ResolvedImage::Loaded(hit);
        }

        let label = match fallback_label {
            Some(text) => text.to_string(),
            None => format!("Loading: {}", path),
        };
        let placeholder = self.placeholders.generate(&label, options.width, options.height);

        if options.lazy {
            self.load_in_background(AssetKind::Image, path);
            return ResolvedImage::Placeholder(placeholder);
        }

        match self.load(AssetKind::Image, path).await {
            Ok(locator) => ResolvedImage::Loaded(locator),
            Err(err) => {
                warn!("Failed to load image: {}", err);
                ResolvedImage::Placeholder(placeholder)
            }
        }
    }

    /// Resolve a video. `None` means not loaded (yet).
    pub async fn resolve_video(&self, path: &str, options: VideoOptions) -> Option<Locator> {
        if let Some(hit) = self.cache.get(path) {
            return Some(hit);
        }

        if options.lazy {
            self.load_in_background(AssetKind::Video, path);
            return None;
        }

        match self.load(AssetKind::Video, path).await {
            Ok(locator) => Some(locator),
            Err(err) => {
                warn!("Failed to load video: {}", err);
                None
            }
        }
    }

    /// Fire-and-forget load that only updates the cache.
    fn load_in_background(&self, kind: AssetKind, path: &str) {
        if self.cache.is_loading(path) {
            debug!("Load for {} already running", path);
            return;
        }
        let pending = self.pending_load(kind, path);
        self.scheduler.spawn(Box::pin(async move {
            if let Err(err) = pending.await {
                warn!("Background load failed: {}", err);
            }
        }));
    }

    /// Start a background load for `path` unless it is cached already.
    /// The asset kind is taken from the file suffix.
    pub fn prefetch(&self, path: &str) {
        if self.cache.contains(path) {
            return;
        }
        self.load_in_background(AssetKind::from_path(path), path);
    }

    /// Lazily load commonly used assets once the page has gone idle.
    pub fn preload_common_images(&self, paths: &[String]) {
        if paths.is_empty() {
            return;
        }
        let loader = self.clone();
        let paths = paths.to_vec();
        let idle = self.scheduler.delay(self.idle_delay_ms);
        self.scheduler.spawn(Box::pin(async move {
            idle.await;
            for path in &paths {
                loader.prefetch(path);
            }
        }));
    }

    /// Numbered placeholders for project cards whose data is not in yet.
    pub fn generate_project_placeholders(&self, count: usize) -> Vec<Locator> {
        self.placeholders.project_placeholders(count)
    }
}

/// Loaders are equal when they share a cache.
impl PartialEq for MediaLoader {
    fn eq(&self, other: &Self) -> bool {
        self.cache.ptr_eq(&other.cache)
    }
}
