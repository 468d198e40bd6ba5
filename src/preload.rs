//! Route and context preloading.
//!
//! Decides which assets to request for a navigation target and when:
//! critical and primary assets are dispatched right away, secondary project
//! images and neighbouring projects after a fixed delay so they do not
//! compete with what is on screen.
//!
//! Every call is fire-and-forget. Loads run as detached tasks on the
//! loader's scheduler and report to the progress tracker when they settle.
//! Delayed work checks the tracker generation before dispatching, so a
//! `reset` (a new `initialize_load`) cancels anything still waiting.
//!
//! The session-wide estimate declared at start-up counts routes the visitor
//! may never open, so it rarely reaches 100%. Whether the first screen is
//! ready is tracked separately: the critical assets plus the landing
//! route's assets form the start-up set, and [`Preloader::startup_settled`]
//! turns true once each of them has reported.

use crate::asset::AssetKind;
use crate::config::{PreloadConfig, RouteProgressMode};
use crate::media::MediaLoader;
use crate::progress::{Generation, ProgressTracker};
use crate::routes::{ProjectId, ProjectRecord, RoutePreloadTable};
use log::{debug, info, warn};
use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

/// Outstanding loads of the start-up set, for one generation.
#[derive(Debug, Clone, Copy, Default)]
struct StartupGate {
    generation: Option<Generation>,
    remaining: usize,
}

#[derive(Clone)]
pub struct Preloader {
    loader: MediaLoader,
    tracker: ProgressTracker,
    routes: Rc<RoutePreloadTable>,
    config: Rc<PreloadConfig>,
    startup: Rc<Cell<StartupGate>>,
}

impl Preloader {
    pub fn new(
        loader: MediaLoader,
        tracker: ProgressTracker,
        routes: RoutePreloadTable,
        config: PreloadConfig,
    ) -> Self {
        Self {
            loader,
            tracker,
            routes: Rc::new(routes),
            config: Rc::new(config),
            startup: Rc::new(Cell::new(StartupGate::default())),
        }
    }

    pub fn loader(&self) -> &MediaLoader {
        &self.loader
    }

    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    /// Start a full page load: reset progress, declare an estimate for the
    /// whole session and load the critical assets.
    ///
    /// The estimate is every route table entry, the critical assets and a
    /// fixed number of base assets (HTML, CSS, JS, fonts).
    ///
    /// The critical assets open the start-up set.
    pub fn initialize_load<S: AsRef<str>>(&self, critical_assets: &[S]) {
        let generation = self.tracker.reset();
        self.startup.set(StartupGate {
            generation: Some(generation),
            remaining: critical_assets.len(),
        });
        let estimated =
            self.routes.total_assets() + critical_assets.len() + self.config.base_asset_count;
        self.tracker.declare(estimated);
        self.tracker.record_and_emit("Initializing application...", 0);

        for asset in critical_assets {
            let asset = asset.as_ref();
            let message = match AssetKind::from_path(asset) {
                AssetKind::Video => format!("Loading video: {}", asset),
                AssetKind::Image => format!("Loading image: {}", asset),
            };
            self.spawn_tracked_load(generation, asset.to_string(), message, true);
        }
    }

    /// [`initialize_load`](Self::initialize_load) followed by a route preload
    /// for the page the visitor landed on, whose assets join the start-up set.
    pub fn initialize_with_route<S: AsRef<str>>(&self, critical_assets: &[S], landing_path: &str) {
        self.initialize_load(critical_assets);
        self.preload_route(landing_path, true);
    }

    /// Preload the assets the route table lists for `path`.
    ///
    /// Unknown routes are a no-op.
    pub fn preload_for_route(&self, path: &str) {
        self.preload_route(path, false);
    }

    /// Whether every load of the current start-up set has reported.
    ///
    /// `false` before the first `initialize_load`.
    pub fn startup_settled(&self) -> bool {
        let gate = self.startup.get();
        gate.generation == Some(self.tracker.generation()) && gate.remaining == 0
    }

    fn preload_route(&self, path: &str, startup: bool) {
        let assets = match self.routes.assets_for(path) {
            Some(assets) if !assets.is_empty() => assets.to_vec(),
            _ => {
                debug!("No preload assets for route {}", path);
                return;
            }
        };
        let generation = self.tracker.generation();
        let count = assets.len();

        // Announced before the route's assets join the expected total
        self.tracker
            .record_and_emit(format!("Loading assets for {}", path), 0);
        self.tracker.declare(count);

        match self.config.route_progress {
            RouteProgressMode::OnCompletion => {
                if startup {
                    self.hold_startup(generation, count);
                }
                self.after_delay(generation, self.config.idle_delay_ms, move |this| {
                    for asset in assets {
                        let message = format!("Preloaded {}", asset);
                        this.spawn_tracked_load(generation, asset, message, startup);
                    }
                });
            }
            RouteProgressMode::AtDispatch => {
                self.after_delay(generation, self.config.idle_delay_ms, move |this| {
                    for asset in &assets {
                        this.loader.prefetch(asset);
                    }
                });
                self.tracker
                    .record_and_emit(format!("Loaded route: {}", path), count);
            }
        }
    }

    /// Preload a project detail page: the cover image now, the rest later.
    pub fn preload_for_project(&self, project: &ProjectRecord) {
        let primary = match project.primary_image() {
            Some(image) => image.to_string(),
            None => return,
        };
        let generation = self.tracker.generation();
        let title = project.title.clone();

        self.tracker.declare(project.images.len());
        self.tracker
            .record_and_emit(format!("Loading project: {}", title), 0);

        self.spawn_tracked_load(
            generation,
            primary,
            format!("Loaded main image for {}", title),
            false,
        );

        let secondary = project.secondary_images().to_vec();
        if secondary.is_empty() {
            return;
        }
        self.after_delay(generation, self.config.secondary_delay_ms, move |this| {
            for image in secondary {
                this.spawn_tracked_load(
                    generation,
                    image,
                    format!("Loaded image for {}", title),
                    false,
                );
            }
        });
    }

    /// Prefetch the cover images of the projects before and after
    /// `current_id` in list order.
    pub fn preload_neighbors(&self, projects: &[ProjectRecord], current_id: impl Into<ProjectId>) {
        let current_id = current_id.into();
        let index = match projects.iter().position(|p| p.id == current_id) {
            Some(index) => index,
            None => {
                debug!("Project {} not in list, no neighbours to prefetch", current_id);
                return;
            }
        };

        let previous = index.checked_sub(1).and_then(|i| projects.get(i));
        let next = projects.get(index + 1);
        let covers: Vec<String> = [previous, next]
            .into_iter()
            .flatten()
            .filter_map(|p| p.primary_image().map(str::to_string))
            .collect();

        self.tracker.declare(covers.len());
        if covers.is_empty() {
            return;
        }

        let generation = self.tracker.generation();
        self.after_delay(generation, self.config.neighbor_delay_ms, move |this| {
            for cover in covers {
                this.spawn_tracked_load(
                    generation,
                    cover,
                    "Pre-loaded neighboring project".to_string(),
                    false,
                );
            }
        });
    }

    /// Load `asset` in the background and record one unit when it settles.
    ///
    /// With `startup` the load also counts down the start-up set.
    fn spawn_tracked_load(
        &self,
        generation: Generation,
        asset: String,
        success_message: String,
        startup: bool,
    ) {
        let this = self.clone();
        self.spawn(async move {
            let kind = AssetKind::from_path(&asset);
            let message = match this.loader.load(kind, &asset).await {
                Ok(_) => success_message,
                Err(err) => {
                    warn!("Preload failed: {}", err);
                    format!("Failed to load: {}", asset)
                }
            };
            if startup {
                this.release_startup(generation);
            }
            this.tracker.record_for(generation, message, 1);
        });
    }

    fn hold_startup(&self, generation: Generation, count: usize) {
        let mut gate = self.startup.get();
        if gate.generation == Some(generation) {
            gate.remaining += count;
            self.startup.set(gate);
        }
    }

    /// Count one start-up load as reported. Must run before the matching
    /// record so listeners already see the settled state.
    fn release_startup(&self, generation: Generation) {
        let mut gate = self.startup.get();
        if gate.generation != Some(generation) || gate.remaining == 0 {
            return;
        }
        gate.remaining -= 1;
        self.startup.set(gate);
        if gate.remaining == 0 {
            info!("Start-up assets settled");
        }
    }

    /// Run `dispatch` after `ms`, unless the tracker was reset meanwhile.
    fn after_delay(
        &self,
        generation: Generation,
        ms: u32,
        dispatch: impl FnOnce(Preloader) + 'static,
    ) {
        let delay = self.loader.scheduler().delay(ms);
        let this = self.clone();
        self.spawn(async move {
            delay.await;
            if this.tracker.generation() != generation {
                debug!("Load cycle changed, dropping delayed preload");
                return;
            }
            dispatch(this);
        });
    }

    fn spawn(&self, task: impl Future<Output = ()> + 'static) {
        self.loader.scheduler().spawn(Box::pin(task));
    }
}

impl PartialEq for Preloader {
    fn eq(&self, other: &Self) -> bool {
        self.loader == other.loader && self.tracker == other.tracker
    }
}
