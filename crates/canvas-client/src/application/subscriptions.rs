//! Event subscription management for one connection activation.
//!
//! Given the configured [`EventMask`], attaches exactly the selected event
//! kinds to their dispatch targets (keyboard kinds at the document level,
//! everything else on the surface) and starts the clipboard poll when its
//! bit is set. All occurrences funnel into one channel the lifecycle
//! controller consumes.
//!
//! The returned [`ListenerRegistry`] scopes everything to the activation:
//! teardown detaches every listener and stops the poll, exactly once.

use std::sync::Arc;
use std::time::Duration;

use canvas_core::protocol::messages::{EventKind, EventMask};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::domain::occurrence::Occurrence;
use crate::infrastructure::clipboard::ClipboardSink;
use crate::infrastructure::input_source::{DispatchTarget, InputSource, ListenerId};

/// How often the clipboard sink is polled for changes.
pub const CLIPBOARD_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// The listeners and poll task belonging to one connection activation.
pub struct ListenerRegistry {
    listeners: Vec<(EventKind, ListenerId)>,
    clipboard_poll: Option<JoinHandle<()>>,
}

/// Resolves the dispatch target for an event kind: keyboard-kind (and any
/// future composition-kind) events attach at the document level so the
/// surface does not need focus; all others attach on the surface itself.
pub fn dispatch_target(kind: EventKind) -> DispatchTarget {
    if kind.is_keyboard() {
        DispatchTarget::Document
    } else {
        DispatchTarget::Surface
    }
}

/// Attaches listeners for every kind selected by `mask`.
///
/// The clipboard-change bit does not attach a listener: it spawns the poll
/// task instead, with change-detection state scoped to this activation (the
/// last observed value starts empty on every attach, never carried across
/// reconnects).
pub fn attach_listeners(
    mask: EventMask,
    input: &dyn InputSource,
    clipboard: Arc<dyn ClipboardSink>,
    occurrences: mpsc::Sender<Occurrence>,
) -> ListenerRegistry {
    let mut listeners = Vec::new();
    let mut clipboard_poll = None;

    for kind in mask.kinds() {
        if kind == EventKind::ClipboardChange {
            clipboard_poll = Some(spawn_clipboard_poll(
                clipboard.clone(),
                occurrences.clone(),
            ));
        } else {
            let id = input.listen(dispatch_target(kind), kind, occurrences.clone());
            listeners.push((kind, id));
        }
    }

    ListenerRegistry {
        listeners,
        clipboard_poll,
    }
}

fn spawn_clipboard_poll(
    clipboard: Arc<dyn ClipboardSink>,
    occurrences: mpsc::Sender<Occurrence>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(CLIPBOARD_POLL_INTERVAL);
        ticker.tick().await; // the first tick fires immediately; skip it
        let mut last_observed = String::new();
        loop {
            ticker.tick().await;
            let Some(text) = clipboard.read_text() else {
                continue;
            };
            if text != last_observed {
                last_observed.clone_from(&text);
                if occurrences
                    .send(Occurrence::ClipboardChange { text })
                    .await
                    .is_err()
                {
                    break;
                }
            }
        }
    })
}

impl ListenerRegistry {
    /// Detaches every registered listener and stops the clipboard poll.
    ///
    /// Idempotent: a second call finds nothing left to detach and does
    /// nothing.
    pub fn teardown(&mut self, input: &dyn InputSource) {
        for (kind, id) in self.listeners.drain(..) {
            debug!("detaching {kind:?} listener");
            input.unlisten(id);
        }
        if let Some(handle) = self.clipboard_poll.take() {
            handle.abort();
        }
    }

    /// The kinds currently registered as listeners (the clipboard poll is
    /// tracked separately).
    pub fn listener_kinds(&self) -> Vec<EventKind> {
        self.listeners.iter().map(|(kind, _)| *kind).collect()
    }

    /// Whether the clipboard poll is running.
    pub fn clipboard_poll_active(&self) -> bool {
        self.clipboard_poll.is_some()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
