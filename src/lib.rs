//! Asset preloading for the portfolio site.
//!
//! Three layers, leaf first:
//! - [`media::MediaLoader`] resolves asset paths to locators through a
//!   session cache, handing out placeholders while real images load.
//! - [`progress::ProgressTracker`] counts expected vs. completed loads and
//!   broadcasts [`progress::ProgressEvent`]s.
//! - [`preload::Preloader`] decides what to load for start-up, routes,
//!   project pages and neighbouring projects.
//!
//! The environment (HTTP, timers, task spawning) sits behind the traits in
//! [`runtime`]; [`web`] provides the browser implementations.

pub mod asset;
pub mod cache;
pub mod config;
pub mod error;
pub mod media;
pub mod placeholder;
pub mod preload;
pub mod progress;
pub mod routes;
pub mod runtime;
pub mod session;
pub mod web;

#[cfg(test)]
pub(crate) mod testing;

pub use asset::{AssetKind, Locator};
pub use config::{PreloadConfig, RouteProgressMode};
pub use error::{AssetError, RouteTableError};
pub use media::{ImageOptions, MediaLoader, ResolvedImage, VideoOptions};
pub use preload::Preloader;
pub use progress::{ProgressEvent, ProgressTracker};
pub use routes::{read_projects_from_json, ProjectId, ProjectRecord, RoutePreloadTable};
