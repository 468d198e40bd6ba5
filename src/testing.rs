//! In-memory fetcher, manual clock and executor harness for unit tests.

use crate::asset::{asset_url, AssetKind, Locator};
use crate::config::PreloadConfig;
use crate::error::AssetError;
use crate::media::MediaLoader;
use crate::placeholder::PlaceholderGenerator;
use crate::runtime::{AssetFetcher, Scheduler};
use futures::channel::oneshot;
use futures::executor::{LocalPool, LocalSpawner};
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::future::Future;
use std::rc::Rc;

/// Fetcher backed by a set of "existing" paths. Records every request.
pub struct MockFetcher {
    available: RefCell<HashSet<String>>,
    calls: RefCell<Vec<String>>,
    pending: Cell<bool>,
    waiters: RefCell<Vec<oneshot::Sender<()>>>,
}

impl MockFetcher {
    pub fn new(available: &[&str]) -> Self {
        Self {
            available: RefCell::new(available.iter().map(|p| p.to_string()).collect()),
            calls: RefCell::new(Vec::new()),
            pending: Cell::new(false),
            waiters: RefCell::new(Vec::new()),
        }
    }

    pub fn make_available(&self, path: &str) {
        self.available.borrow_mut().insert(path.to_string());
    }

    /// Paths requested so far, in request order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn sorted_calls(&self) -> Vec<String> {
        let mut calls = self.calls();
        calls.sort();
        calls
    }

    /// While set, fetches stay pending until [`MockFetcher::release_all`].
    pub fn set_pending(&self, pending: bool) {
        self.pending.set(pending);
    }

    pub fn release_all(&self) {
        for waiter in self.waiters.borrow_mut().drain(..) {
            let _ = waiter.send(());
        }
    }
}

impl AssetFetcher for MockFetcher {
    fn fetch(&self, kind: AssetKind, path: &str) -> LocalBoxFuture<'static, Result<Locator, AssetError>> {
        self.calls.borrow_mut().push(path.to_string());
        let result = if self.available.borrow().contains(path) {
            Ok(Locator::from(asset_url("", kind, path)))
        } else {
            Err(AssetError::NotFound {
                path: path.to_string(),
                status: Some(404),
            })
        };

        if self.pending.get() {
            let (tx, rx) = oneshot::channel();
            self.waiters.borrow_mut().push(tx);
            Box::pin(async move {
                let _ = rx.await;
                result
            })
        } else {
            Box::pin(async move { result })
        }
    }
}

/// Scheduler on a `LocalPool` with a clock that only moves when told to.
pub struct ManualScheduler {
    spawner: LocalSpawner,
    now: Cell<u64>,
    timers: RefCell<Vec<(u64, oneshot::Sender<()>)>>,
}

impl ManualScheduler {
    pub fn new(spawner: LocalSpawner) -> Self {
        Self {
            spawner,
            now: Cell::new(0),
            timers: RefCell::new(Vec::new()),
        }
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    fn advance_clock(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }

    /// Wake every timer whose deadline has passed. Returns how many fired.
    fn fire_due(&self) -> usize {
        let now = self.now.get();
        let due: Vec<_> = {
            let mut timers = self.timers.borrow_mut();
            let (due, rest): (Vec<_>, Vec<_>) = timers.drain(..).partition(|(at, _)| *at <= now);
            *timers = rest;
            due
        };
        let fired = due.len();
        for (_, tx) in due {
            let _ = tx.send(());
        }
        fired
    }
}

impl Scheduler for ManualScheduler {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        self.spawner
            .spawn_local(task)
            .expect("test executor shut down");
    }

    fn delay(&self, ms: u32) -> LocalBoxFuture<'static, ()> {
        let (tx, rx) = oneshot::channel();
        self.timers.borrow_mut().push((self.now.get() + ms as u64, tx));
        Box::pin(async move {
            let _ = rx.await;
        })
    }
}

/// Executor, doubles and a loader wired together.
pub struct Harness {
    pub pool: LocalPool,
    pub fetcher: Rc<MockFetcher>,
    pub scheduler: Rc<ManualScheduler>,
    pub loader: MediaLoader,
}

impl Harness {
    pub fn new(available: &[&str]) -> Self {
        Self::with_fetcher(MockFetcher::new(available))
    }

    pub fn with_fetcher(fetcher: MockFetcher) -> Self {
        let pool = LocalPool::new();
        let fetcher = Rc::new(fetcher);
        let scheduler = Rc::new(ManualScheduler::new(pool.spawner()));
        let loader = MediaLoader::new(
            fetcher.clone(),
            scheduler.clone(),
            &PreloadConfig::default(),
        )
        .with_placeholders(PlaceholderGenerator::seeded(0xC0FFEE));
        Self {
            pool,
            fetcher,
            scheduler,
            loader,
        }
    }

    pub fn block_on<F: Future>(&mut self, future: F) -> F::Output {
        self.pool.run_until(future)
    }

    pub fn run_until_stalled(&mut self) {
        self.pool.run_until_stalled();
    }

    /// Move the clock forward by `ms` and run everything that becomes ready.
    pub fn advance(&mut self, ms: u64) {
        self.pool.run_until_stalled();
        self.scheduler.advance_clock(ms);
        loop {
            let fired = self.scheduler.fire_due();
            self.pool.run_until_stalled();
            if fired == 0 {
                break;
            }
        }
    }
}
