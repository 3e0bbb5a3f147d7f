//! The local clipboard the client reads from and writes to.

pub mod memory;

pub use memory::MemoryClipboard;

/// Abstraction over the host clipboard.
///
/// Reads are polled (there is no change notification in the host interface),
/// writes happen when the peer pushes a clipboard-set command.
#[cfg_attr(test, mockall::automock)]
pub trait ClipboardSink: Send + Sync {
    /// Current clipboard text, or `None` when it cannot be read (permission
    /// denied, non-text content). A failed read skips one poll cycle.
    fn read_text(&self) -> Option<String>;

    /// Replaces the clipboard text.
    fn write_text(&self, text: &str);
}
