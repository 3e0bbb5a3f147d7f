//! In-memory clipboard used by the headless binary and tests.

use std::sync::Mutex;

use super::ClipboardSink;

/// A process-local clipboard. Tests simulate the user copying text by
/// calling [`MemoryClipboard::set_text`] directly.
#[derive(Default)]
pub struct MemoryClipboard {
    text: Mutex<Option<String>>,
    write_count: Mutex<usize>,
}

impl MemoryClipboard {
    pub fn new() -> MemoryClipboard {
        MemoryClipboard::default()
    }

    /// Sets the clipboard content out of band, as a user copy would.
    pub fn set_text(&self, text: &str) {
        *self.text.lock().expect("lock poisoned") = Some(text.to_string());
    }

    /// Number of times the peer wrote to this clipboard.
    pub fn write_count(&self) -> usize {
        *self.write_count.lock().expect("lock poisoned")
    }
}

impl ClipboardSink for MemoryClipboard {
    fn read_text(&self) -> Option<String> {
        self.text.lock().expect("lock poisoned").clone()
    }

    fn write_text(&self, text: &str) {
        *self.text.lock().expect("lock poisoned") = Some(text.to_string());
        *self.write_count.lock().expect("lock poisoned") += 1;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
