//! Logical input occurrences as delivered by the host environment.
//!
//! An occurrence carries device-space coordinates and raw event state; it is
//! what the input source hands to an attached listener, before debouncing,
//! viewport normalization, and encoding turn it into a wire message.

use canvas_core::protocol::messages::{EventKind, KeyKind, Modifiers, PointerKind, TouchKind};

/// One touch contact in device space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchContact {
    /// Stable identifier for this contact across its lifetime.
    pub id: u32,
    pub client_x: f64,
    pub client_y: f64,
}

/// A raw local input occurrence.
#[derive(Debug, Clone, PartialEq)]
pub enum Occurrence {
    Pointer {
        kind: PointerKind,
        buttons: u8,
        client_x: f64,
        client_y: f64,
        modifiers: Modifiers,
    },
    Wheel {
        buttons: u8,
        client_x: f64,
        client_y: f64,
        modifiers: Modifiers,
        delta_x: f64,
        delta_y: f64,
        delta_z: f64,
        delta_mode: u8,
    },
    Key {
        kind: KeyKind,
        key: String,
        modifiers: Modifiers,
    },
    Touch {
        kind: TouchKind,
        touches: Vec<TouchContact>,
        changed: Vec<TouchContact>,
        target: Vec<TouchContact>,
        modifiers: Modifiers,
    },
    /// Synthesized by the clipboard poll when the sink's text changes.
    ClipboardChange { text: String },
}

impl Occurrence {
    /// The logical event kind this occurrence belongs to.
    pub fn kind(&self) -> EventKind {
        match self {
            Occurrence::Pointer { kind, .. } => match kind {
                PointerKind::Move => EventKind::PointerMove,
                PointerKind::Down => EventKind::PointerDown,
                PointerKind::Up => EventKind::PointerUp,
                PointerKind::Click => EventKind::Click,
                PointerKind::DoubleClick => EventKind::DoubleClick,
                PointerKind::AuxClick => EventKind::AuxClick,
            },
            Occurrence::Wheel { .. } => EventKind::Wheel,
            Occurrence::Key { kind, .. } => match kind {
                KeyKind::Down => EventKind::KeyDown,
                KeyKind::Up => EventKind::KeyUp,
            },
            Occurrence::Touch { kind, .. } => match kind {
                TouchKind::Start => EventKind::TouchStart,
                TouchKind::Move => EventKind::TouchMove,
                TouchKind::End => EventKind::TouchEnd,
                TouchKind::Cancel => EventKind::TouchCancel,
            },
            Occurrence::ClipboardChange { .. } => EventKind::ClipboardChange,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
