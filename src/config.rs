//! Application-level configuration constants.

use std::num::NonZeroUsize;

// Asset roots, relative to the site base URL
pub const IMAGE_ROOT: &str = "images";
pub const VIDEO_ROOT: &str = "videos";
pub const DEFAULT_BASE_URL: &str = "assets";

// Placeholder defaults
pub const DEFAULT_PLACEHOLDER_WIDTH: u32 = 800;
pub const DEFAULT_PLACEHOLDER_HEIGHT: u32 = 600;
pub const PLACEHOLDER_FONT_SIZE_PX: u32 = 24;

// Preload scheduling (milliseconds)
pub const IDLE_PRELOAD_DELAY_MS: u32 = 1_000;
pub const SECONDARY_IMAGE_DELAY_MS: u32 = 1_000;
pub const NEIGHBOR_PREFETCH_DELAY_MS: u32 = 2_000;

/// Assets the first screen cannot do without.
pub const CRITICAL_ASSETS: &[&str] = &["profile.jpg"];

/// HTML, CSS, JS and fonts counted into the start-up estimate.
pub const BASE_ASSET_COUNT: usize = 5;

// Browser integration
pub const PROGRESS_EVENT_NAME: &str = "mediaLoaded";
pub const ROUTE_TABLE_CSV: &str = include_str!("route_assets.csv");
pub const PROJECTS_JSON: &str = include_str!("projects.json");

/// How `preload_for_route` reports progress for a group of assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouteProgressMode {
    /// Each asset records one unit when its load settles.
    #[default]
    OnCompletion,
    /// The whole group is recorded as soon as it is dispatched.
    AtDispatch,
}

/// Tunables for the preloading subsystem.
#[derive(Debug, Clone, PartialEq)]
pub struct PreloadConfig {
    pub base_url: String,
    pub base_asset_count: usize,
    pub idle_delay_ms: u32,
    pub secondary_delay_ms: u32,
    pub neighbor_delay_ms: u32,
    pub route_progress: RouteProgressMode,
    /// `None` keeps every entry for the whole session.
    pub cache_capacity: Option<NonZeroUsize>,
}

impl Default for PreloadConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            base_asset_count: BASE_ASSET_COUNT,
            idle_delay_ms: IDLE_PRELOAD_DELAY_MS,
            secondary_delay_ms: SECONDARY_IMAGE_DELAY_MS,
            neighbor_delay_ms: NEIGHBOR_PREFETCH_DELAY_MS,
            route_progress: RouteProgressMode::default(),
            cache_capacity: None,
        }
    }
}
