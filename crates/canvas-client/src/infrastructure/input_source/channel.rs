//! Channel-backed input source.
//!
//! Serves as the in-process input source for the headless binary and as the
//! injectable source for tests: occurrences pushed with
//! [`ChannelInputSource::inject`] are delivered to whichever listeners are
//! currently attached for their kind. A production build replaces this with
//! a windowing-backend source implementing the same trait.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use canvas_core::protocol::messages::EventKind;
use tokio::sync::mpsc;

use super::{DispatchTarget, InputSource, ListenerId};
use crate::domain::occurrence::Occurrence;

struct Registration {
    target: DispatchTarget,
    kind: EventKind,
    sender: mpsc::Sender<Occurrence>,
}

/// An [`InputSource`] whose occurrences are injected programmatically.
#[derive(Default)]
pub struct ChannelInputSource {
    next_id: AtomicU64,
    active: Mutex<HashMap<ListenerId, Registration>>,
    detach_count: Mutex<usize>,
    context_menu_suppressed: AtomicBool,
}

impl ChannelInputSource {
    pub fn new() -> ChannelInputSource {
        ChannelInputSource::default()
    }

    /// Delivers `occurrence` to every listener attached for its kind.
    /// Returns how many listeners received it.
    pub fn inject(&self, occurrence: Occurrence) -> usize {
        let kind = occurrence.kind();
        let active = self.active.lock().expect("lock poisoned");
        let mut delivered = 0;
        for registration in active.values() {
            if registration.kind == kind
                && registration.sender.try_send(occurrence.clone()).is_ok()
            {
                delivered += 1;
            }
        }
        delivered
    }

    /// The `(target, kind)` pairs currently attached, in no particular order.
    pub fn attached(&self) -> Vec<(DispatchTarget, EventKind)> {
        self.active
            .lock()
            .expect("lock poisoned")
            .values()
            .map(|r| (r.target, r.kind))
            .collect()
    }

    /// Number of listeners currently attached.
    pub fn attached_count(&self) -> usize {
        self.active.lock().expect("lock poisoned").len()
    }

    /// Total number of `unlisten` calls that removed a listener.
    pub fn detach_count(&self) -> usize {
        *self.detach_count.lock().expect("lock poisoned")
    }

    pub fn context_menu_suppressed(&self) -> bool {
        self.context_menu_suppressed.load(Ordering::Relaxed)
    }
}

impl InputSource for ChannelInputSource {
    fn listen(
        &self,
        target: DispatchTarget,
        kind: EventKind,
        occurrences: mpsc::Sender<Occurrence>,
    ) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.active.lock().expect("lock poisoned").insert(
            id,
            Registration {
                target,
                kind,
                sender: occurrences,
            },
        );
        id
    }

    fn unlisten(&self, id: ListenerId) {
        if self
            .active
            .lock()
            .expect("lock poisoned")
            .remove(&id)
            .is_some()
        {
            *self.detach_count.lock().expect("lock poisoned") += 1;
        }
    }

    fn suppress_context_menu(&self) {
        self.context_menu_suppressed.store(true, Ordering::Relaxed);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
