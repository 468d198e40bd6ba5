//! Browser implementations of the runtime seams, plus DOM glue.

use crate::asset::{asset_url, AssetKind, Locator};
use crate::config::{PreloadConfig, PROGRESS_EVENT_NAME};
use crate::error::AssetError;
use crate::media::MediaLoader;
use crate::preload::Preloader;
use crate::progress::{ProgressEvent, ProgressTracker};
use crate::routes::RoutePreloadTable;
use crate::runtime::{AssetFetcher, Scheduler};
use futures::future::LocalBoxFuture;
use gloo_timers::future::TimeoutFuture;
use log::{warn, Level, LevelFilter, Log, Metadata, Record};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{console, CustomEvent, CustomEventInit, RequestInit, Response};

/// Checks asset availability with a `HEAD` request below `base_url`.
pub struct BrowserFetcher {
    base_url: String,
}

impl BrowserFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

fn describe_js_error(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

impl AssetFetcher for BrowserFetcher {
    fn fetch(&self, kind: AssetKind, path: &str) -> LocalBoxFuture<'static, Result<Locator, AssetError>> {
        let url = asset_url(&self.base_url, kind, path);
        let path = path.to_string();
        Box::pin(async move {
            let init = RequestInit::new();
            init.set_method("HEAD");
            let promise: js_sys::Promise = gloo_utils::window().fetch_with_str_and_init(&url, &init);

            let value = JsFuture::from(promise)
                .await
                .map_err(|e| AssetError::Transport {
                    path: path.clone(),
                    reason: describe_js_error(&e),
                })?;
            let response: Response = value.dyn_into().map_err(|_| AssetError::Transport {
                path: path.clone(),
                reason: "fetch did not return a Response".to_string(),
            })?;

            if response.ok() {
                Ok(Locator::from(url))
            } else {
                Err(AssetError::NotFound {
                    path,
                    status: Some(response.status()),
                })
            }
        })
    }
}

/// Runs tasks on the browser event loop.
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }

    fn delay(&self, ms: u32) -> LocalBoxFuture<'static, ()> {
        Box::pin(TimeoutFuture::new(ms))
    }
}

/// Re-broadcast a progress event as a `mediaLoaded` DOM `CustomEvent`.
pub fn dispatch_progress_event(event: &ProgressEvent) -> Result<(), JsValue> {
    let detail = serde_wasm_bindgen::to_value(event)?;
    let init = CustomEventInit::new();
    init.set_detail(&detail);
    let custom = CustomEvent::new_with_event_init_dict(PROGRESS_EVENT_NAME, &init)?;
    gloo_utils::window().dispatch_event(&custom)?;
    Ok(())
}

/// Wire loader, tracker and preloader for the browser.
///
/// Progress is also mirrored to `window` as `mediaLoaded` events.
pub fn browser_preloader(config: PreloadConfig, routes: RoutePreloadTable) -> Preloader {
    let fetcher = Rc::new(BrowserFetcher::new(config.base_url.clone()));
    let loader = MediaLoader::new(fetcher, Rc::new(BrowserScheduler), &config);
    let tracker = ProgressTracker::new();
    tracker.subscribe(|event| {
        if let Err(err) = dispatch_progress_event(event) {
            warn!("Could not dispatch {}: {}", PROGRESS_EVENT_NAME, describe_js_error(&err));
        }
    });
    Preloader::new(loader, tracker, routes, config)
}

struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => console::error_1(&line),
            Level::Warn => console::warn_1(&line),
            Level::Info => console::info_1(&line),
            Level::Debug | Level::Trace => console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

/// Route `log` output to the browser console. Later calls are ignored.
pub fn init_logging(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
