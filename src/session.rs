//! Thread-local session state.
//!
//! Lives as long as the page: it survives client-side navigation and is
//! gone after a reload. Thread-local to avoid synchronization overhead in WASM.

use serde::Serialize;
use std::cell::RefCell;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionState {
    /// Whether the visitor has interacted with the site during this session.
    pub has_interacted: bool,
}

thread_local! {
    static SESSION: RefCell<SessionState> = RefCell::new(SessionState::default());
}

pub fn session_state() -> SessionState {
    SESSION.with(|s| *s.borrow())
}

pub fn mark_user_interaction() {
    SESSION.with(|s| s.borrow_mut().has_interacted = true);
}

pub fn has_user_interacted() -> bool {
    SESSION.with(|s| s.borrow().has_interacted)
}
