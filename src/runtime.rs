//! Seams between the preloading logic and the environment it runs in.
//!
//! The browser build plugs in `web::BrowserFetcher` and
//! `web::BrowserScheduler`; tests plug in in-memory doubles. Everything is
//! single-threaded, so futures are `!Send` and boxed as `LocalBoxFuture`.

use crate::asset::{AssetKind, Locator};
use crate::error::AssetError;
use futures::future::LocalBoxFuture;

/// Fetches the real resource behind an asset identifier.
pub trait AssetFetcher {
    /// Resolve `path` to a locator, or report why it is unavailable.
    fn fetch(&self, kind: AssetKind, path: &str) -> LocalBoxFuture<'static, Result<Locator, AssetError>>;
}

/// Runs detached tasks and provides timers.
pub trait Scheduler {
    /// Run `task` to completion in the background. The caller is not suspended.
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);

    /// A future that resolves after `ms` milliseconds.
    fn delay(&self, ms: u32) -> LocalBoxFuture<'static, ()>;
}
