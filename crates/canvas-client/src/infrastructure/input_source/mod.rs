//! The source of raw input occurrences.
//!
//! The host environment raises pointer, keyboard, and touch occurrences; the
//! client attaches per-kind listeners and receives occurrences over a channel
//! (listener callbacks become channel sends, so the controller consumes input
//! as ordinary awaited receives).

pub mod channel;

pub use channel::ChannelInputSource;

use canvas_core::protocol::messages::EventKind;
use tokio::sync::mpsc;

use crate::domain::occurrence::Occurrence;

/// Where a listener is attached.
///
/// Keyboard-kind occurrences are dispatched at the document level so the
/// surface does not need input focus; everything else is dispatched on the
/// surface itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchTarget {
    Surface,
    Document,
}

/// Handle identifying one attached listener, consumed by teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Abstraction over the host's input-occurrence dispatch.
pub trait InputSource: Send + Sync {
    /// Attaches a listener for `kind` on `target`. Matching occurrences are
    /// delivered on `occurrences` until [`InputSource::unlisten`] is called
    /// with the returned id.
    fn listen(
        &self,
        target: DispatchTarget,
        kind: EventKind,
        occurrences: mpsc::Sender<Occurrence>,
    ) -> ListenerId;

    /// Detaches a listener. Unknown ids are ignored, so teardown stays
    /// idempotent.
    fn unlisten(&self, id: ListenerId);

    /// Suppresses the context menu over the surface. Installed once per
    /// surface at configuration time, independent of connection lifecycle.
    fn suppress_context_menu(&self);
}
