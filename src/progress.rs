//! Load progress counters and broadcast.
//!
//! The tracker keeps two counters for the current load cycle: how many
//! assets are expected and how many have finished (successfully or not).
//! Each record call broadcasts a [`ProgressEvent`] to all listeners; the
//! loading overlay is one of them, the `mediaLoaded` DOM event another.
//!
//! `reset` starts a new generation. Work dispatched in an older generation
//! carries its generation along and is ignored when it reports back late.

use log::debug;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// Payload broadcast after every recorded step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub message: String,
    /// Percentage in `0..=100`.
    pub progress: u8,
    pub loaded: usize,
    pub total: usize,
}

/// Identifies one load cycle (the span between two resets).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Generation(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressSnapshot {
    pub expected_total: usize,
    pub completed: usize,
    pub generation: Generation,
}

pub type ListenerId = u64;
type Listener = Rc<dyn Fn(&ProgressEvent)>;

#[derive(Default)]
struct TrackerState {
    expected_total: usize,
    completed: usize,
    generation: u64,
    next_listener_id: ListenerId,
    listeners: Vec<(ListenerId, Listener)>,
}

/// `round(100 * completed / max(expected_total, 1))`, clamped to `0..=100`.
pub fn progress_percent(completed: usize, expected_total: usize) -> u8 {
    let total = expected_total.max(1) as f64;
    (100.0 * completed as f64 / total).round().clamp(0.0, 100.0) as u8
}

/// Shared progress counters. Clones share state.
#[derive(Clone, Default)]
pub struct ProgressTracker {
    state: Rc<RefCell<TrackerState>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero both counters and start a new generation.
    pub fn reset(&self) -> Generation {
        let mut state = self.state.borrow_mut();
        state.expected_total = 0;
        state.completed = 0;
        state.generation += 1;
        debug!("Progress reset, generation {}", state.generation);
        Generation(state.generation)
    }

    pub fn generation(&self) -> Generation {
        Generation(self.state.borrow().generation)
    }

    /// Add `count` to the expected total.
    pub fn declare(&self, count: usize) {
        self.state.borrow_mut().expected_total += count;
    }

    /// Add `delta` completed loads and broadcast the new progress.
    pub fn record_and_emit(&self, message: impl Into<String>, delta: usize) -> ProgressEvent {
        let (event, listeners) = {
            let mut state = self.state.borrow_mut();
            state.completed += delta;
            let event = ProgressEvent {
                message: message.into(),
                progress: progress_percent(state.completed, state.expected_total),
                loaded: state.completed,
                total: state.expected_total,
            };
            let listeners: Vec<Listener> = state.listeners.iter().map(|(_, l)| l.clone()).collect();
            (event, listeners)
        };

        // Borrow released: listeners may call back into the tracker
        for listener in listeners {
            listener(&event);
        }
        event
    }

    /// Like [`record_and_emit`](Self::record_and_emit), but only while
    /// `generation` is still current.
    pub fn record_for(
        &self,
        generation: Generation,
        message: impl Into<String>,
        delta: usize,
    ) -> Option<ProgressEvent> {
        if self.generation() != generation {
            debug!("Dropping progress from stale generation {:?}", generation);
            return None;
        }
        Some(self.record_and_emit(message, delta))
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        let state = self.state.borrow();
        ProgressSnapshot {
            expected_total: state.expected_total,
            completed: state.completed,
            generation: Generation(state.generation),
        }
    }

    pub fn percent(&self) -> u8 {
        let state = self.state.borrow();
        progress_percent(state.completed, state.expected_total)
    }

    /// No outstanding work: `completed >= expected_total`.
    pub fn is_settled(&self) -> bool {
        let state = self.state.borrow();
        state.completed >= state.expected_total
    }

    pub fn subscribe(&self, listener: impl Fn(&ProgressEvent) + 'static) -> ListenerId {
        let mut state = self.state.borrow_mut();
        let id = state.next_listener_id;
        state.next_listener_id += 1;
        state.listeners.push((id, Rc::new(listener)));
        id
    }

    /// Returns `false` if no listener had this id.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut state = self.state.borrow_mut();
        let before = state.listeners.len();
        state.listeners.retain(|(listener_id, _)| *listener_id != id);
        state.listeners.len() != before
    }
}

impl PartialEq for ProgressTracker {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_events(tracker: &ProgressTracker) -> Rc<RefCell<Vec<ProgressEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        tracker.subscribe(move |e| sink.borrow_mut().push(e.clone()));
        events
    }

    #[test]
    fn percent_is_clamped_and_rounded() {
        assert_eq!(progress_percent(0, 0), 0);
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 67);
        assert_eq!(progress_percent(1, 8), 13); // 12.5 rounds up
        assert_eq!(progress_percent(9, 3), 100);
        assert_eq!(progress_percent(4, 0), 100);
    }

    #[test]
    fn three_single_steps_reach_one_hundred() {
        let tracker = ProgressTracker::new();
        let events = collect_events(&tracker);
        tracker.declare(3);
        for i in 0..3 {
            tracker.record_and_emit(format!("step {}", i), 1);
        }

        let events = events.borrow();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].progress, 33);
        assert_eq!(
            events[2],
            ProgressEvent {
                message: "step 2".into(),
                progress: 100,
                loaded: 3,
                total: 3,
            }
        );
        assert!(tracker.is_settled());
    }

    #[test]
    fn reset_declare_record_n_gives_full_progress() {
        let tracker = ProgressTracker::new();
        tracker.declare(2);
        tracker.record_and_emit("old", 1);
        tracker.reset();
        tracker.declare(7);
        let event = tracker.record_and_emit("all", 7);
        assert_eq!(event.progress, 100);
        assert_eq!((event.loaded, event.total), (7, 7));
    }

    #[test]
    fn overshoot_never_exceeds_one_hundred() {
        let tracker = ProgressTracker::new();
        tracker.declare(1);
        tracker.record_and_emit("a", 1);
        let event = tracker.record_and_emit("b", 4);
        assert_eq!(event.progress, 100);
        assert_eq!(event.loaded, 5);
        assert_eq!(event.total, 1);
    }

    #[test]
    fn zero_delta_reports_without_counting() {
        let tracker = ProgressTracker::new();
        tracker.declare(4);
        let event = tracker.record_and_emit("Initializing application...", 0);
        assert_eq!(event.progress, 0);
        assert_eq!(event.loaded, 0);
        assert!(!tracker.is_settled());
    }

    #[test]
    fn stale_generation_is_ignored() {
        let tracker = ProgressTracker::new();
        let old = tracker.reset();
        tracker.declare(2);
        let current = tracker.reset();
        tracker.declare(2);

        assert!(tracker.record_for(old, "late", 1).is_none());
        assert_eq!(tracker.snapshot().completed, 0);

        let event = tracker.record_for(current, "fresh", 1).unwrap();
        assert_eq!(event.progress, 50);
        assert_eq!(tracker.snapshot().generation, current);
    }

    #[test]
    fn unsubscribed_listener_stops_receiving() {
        let tracker = ProgressTracker::new();
        let count = Rc::new(RefCell::new(0));
        let c = count.clone();
        let id = tracker.subscribe(move |_| *c.borrow_mut() += 1);
        tracker.record_and_emit("one", 1);
        assert!(tracker.unsubscribe(id));
        assert!(!tracker.unsubscribe(id));
        tracker.record_and_emit("two", 1);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn listener_can_reenter_tracker() {
        let tracker = ProgressTracker::new();
        let seen = Rc::new(RefCell::new(None));
        let (t, s) = (tracker.clone(), seen.clone());
        tracker.subscribe(move |_| *s.borrow_mut() = Some(t.percent()));
        tracker.declare(2);
        tracker.record_and_emit("half", 1);
        assert_eq!(*seen.borrow(), Some(50));
    }

    #[test]
    fn event_serializes_with_dom_field_names() {
        let event = ProgressEvent {
            message: "Loading image: profile.jpg".into(),
            progress: 40,
            loaded: 2,
            total: 5,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["progress"], 40);
        assert_eq!(json["loaded"], 2);
        assert_eq!(json["total"], 5);
    }
}
