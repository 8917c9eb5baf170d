//! Shared connectivity flag.
//!
//! A single boolean read by every write path and mutated only through the
//! connectivity-control endpoint. The flag is owned state passed by handle,
//! not an ambient global, and the reconnect edge is detected atomically so
//! that concurrent togglers observe it exactly once.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Which edge (if any) a [`set_disconnected`](ConnectivityState::set_disconnected)
/// call produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// false → true: the station went offline.
    Disconnected,
    /// true → false: the station came back — the only edge that triggers
    /// backlog replay.
    Reconnected,
    /// The flag already held the requested value.
    Unchanged,
}

/// Shared connectivity state.
///
/// Starts connected (`disconnected == false`). Cheaply cloneable; all
/// clones share the flag. The state is not persisted — after a restart the
/// station is connected again regardless of how it went down.
#[derive(Debug, Clone, Default)]
pub struct ConnectivityState {
    disconnected: Arc<AtomicBool>,
}

impl ConnectivityState {
    /// Creates a new state in the connected position.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the station is currently marked disconnected.
    #[must_use]
    pub fn is_disconnected(&self) -> bool {
        self.disconnected.load(Ordering::Acquire)
    }

    /// Sets the flag and reports which edge occurred.
    ///
    /// Idempotent: setting the already-held value returns
    /// [`Transition::Unchanged`] and has no other effect. The swap is
    /// atomic, so two racing reconnects yield exactly one
    /// [`Transition::Reconnected`].
    pub fn set_disconnected(&self, disconnected: bool) -> Transition {
        let previous = self.disconnected.swap(disconnected, Ordering::AcqRel);
        match (previous, disconnected) {
            (false, true) => Transition::Disconnected,
            (true, false) => Transition::Reconnected,
            _ => Transition::Unchanged,
        }
    }
}
