//! Turns raw input occurrences into outbound wire messages.
//!
//! The forwarder owns the two pieces of per-activation state the encoding
//! path needs: the [`ViewportMapping`] (device → logical coordinates) and
//! the pointer-move debounce clock. Everything else is a pure translation
//! from [`Occurrence`] to [`InputMessage`].
//!
//! Pointer-move occurrences under the debounce threshold are dropped
//! entirely: not encoded, not queued. All other kinds always pass.

use std::time::Duration;

use canvas_core::protocol::messages::{
    ClipboardMessage, InputMessage, KeyMessage, PointerKind, PointerMessage, TouchMessage,
    TouchPoint, WheelMessage,
};
use canvas_core::ViewportMapping;
use tokio::time::Instant;

use crate::domain::occurrence::{Occurrence, TouchContact};

/// Minimum interval between two sent pointer-move messages.
pub const POINTER_MOVE_DEBOUNCE: Duration = Duration::from_millis(25);

/// Per-activation input translation state.
pub struct InputForwarder {
    viewport: ViewportMapping,
    last_pointer_move: Option<Instant>,
}

impl InputForwarder {
    pub fn new(viewport: ViewportMapping) -> InputForwarder {
        InputForwarder {
            viewport,
            last_pointer_move: None,
        }
    }

    /// Translates an occurrence into the message to send, or `None` when the
    /// occurrence is debounced away.
    ///
    /// The debounce clock only advances when a pointer-move is actually sent,
    /// so a burst of moves yields one message per threshold window and the
    /// first move of an activation always passes.
    pub fn message_for(&mut self, occurrence: Occurrence, now: Instant) -> Option<InputMessage> {
        match occurrence {
            Occurrence::Pointer {
                kind,
                buttons,
                client_x,
                client_y,
                modifiers,
            } => {
                if kind == PointerKind::Move {
                    if let Some(last) = self.last_pointer_move {
                        if now.duration_since(last) < POINTER_MOVE_DEBOUNCE {
                            return None;
                        }
                    }
                    self.last_pointer_move = Some(now);
                }
                let (x, y) = self.viewport.to_logical(client_x, client_y);
                Some(InputMessage::Pointer(PointerMessage {
                    kind,
                    buttons,
                    x,
                    y,
                    modifiers,
                }))
            }
            Occurrence::Wheel {
                buttons,
                client_x,
                client_y,
                modifiers,
                delta_x,
                delta_y,
                delta_z,
                delta_mode,
            } => {
                let (x, y) = self.viewport.to_logical(client_x, client_y);
                Some(InputMessage::Wheel(WheelMessage {
                    buttons,
                    x,
                    y,
                    modifiers,
                    delta_x,
                    delta_y,
                    delta_z,
                    delta_mode,
                }))
            }
            Occurrence::Key {
                kind,
                key,
                modifiers,
            } => Some(InputMessage::Key(KeyMessage {
                kind,
                modifiers,
                key,
            })),
            Occurrence::Touch {
                kind,
                touches,
                changed,
                target,
                modifiers,
            } => Some(InputMessage::Touch(TouchMessage {
                kind,
                touches: self.map_contacts(&touches),
                changed: self.map_contacts(&changed),
                target: self.map_contacts(&target),
                modifiers,
            })),
            Occurrence::ClipboardChange { text } => {
                Some(InputMessage::Clipboard(ClipboardMessage { text }))
            }
        }
    }

    fn map_contacts(&self, contacts: &[TouchContact]) -> Vec<TouchPoint> {
        contacts
            .iter()
            .map(|contact| {
                let (x, y) = self.viewport.to_logical(contact.client_x, contact.client_y);
                TouchPoint {
                    id: contact.id,
                    x,
                    y,
                }
            })
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_core::protocol::messages::{KeyKind, Modifiers, TouchKind};

    fn identity_viewport() -> ViewportMapping {
        ViewportMapping {
            origin_x: 0.0,
            origin_y: 0.0,
            display_width: 1024.0,
            display_height: 768.0,
            logical_width: 1024,
            logical_height: 768,
        }
    }

    fn pointer(kind: PointerKind, x: f64, y: f64) -> Occurrence {
        Occurrence::Pointer {
            kind,
            buttons: 0,
            client_x: x,
            client_y: y,
            modifiers: Modifiers::default(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_moves_under_threshold_yield_one_message() {
        // Arrange
        let mut forwarder = InputForwarder::new(identity_viewport());
        let t0 = Instant::now();

        // Act: two moves 10 ms apart
        let first = forwarder.message_for(pointer(PointerKind::Move, 1.0, 1.0), t0);
        let second = forwarder.message_for(
            pointer(PointerKind::Move, 2.0, 2.0),
            t0 + Duration::from_millis(10),
        );

        // Assert
        assert!(first.is_some(), "first move always passes");
        assert!(second.is_none(), "move inside the window is dropped");
    }

    #[tokio::test(start_paused = true)]
    async fn test_moves_at_or_past_threshold_both_send() {
        let mut forwarder = InputForwarder::new(identity_viewport());
        let t0 = Instant::now();

        let first = forwarder.message_for(pointer(PointerKind::Move, 1.0, 1.0), t0);
        let second = forwarder.message_for(
            pointer(PointerKind::Move, 2.0, 2.0),
            t0 + POINTER_MOVE_DEBOUNCE,
        );

        assert!(first.is_some());
        assert!(second.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_clock_only_advances_on_send() {
        // A dropped move must not push the window forward: three moves at
        // t=0, 20 ms, 30 ms send the first and the third (30 ms ≥ 25 ms
        // after the last SENT move, even though only 10 ms after the drop).
        let mut forwarder = InputForwarder::new(identity_viewport());
        let t0 = Instant::now();

        let a = forwarder.message_for(pointer(PointerKind::Move, 0.0, 0.0), t0);
        let b = forwarder.message_for(
            pointer(PointerKind::Move, 0.0, 0.0),
            t0 + Duration::from_millis(20),
        );
        let c = forwarder.message_for(
            pointer(PointerKind::Move, 0.0, 0.0),
            t0 + Duration::from_millis(30),
        );

        assert!(a.is_some());
        assert!(b.is_none());
        assert!(c.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_move_pointer_kinds_are_never_debounced() {
        let mut forwarder = InputForwarder::new(identity_viewport());
        let t0 = Instant::now();

        let down = forwarder.message_for(pointer(PointerKind::Down, 1.0, 1.0), t0);
        let up = forwarder.message_for(
            pointer(PointerKind::Up, 1.0, 1.0),
            t0 + Duration::from_millis(1),
        );
        let click = forwarder.message_for(
            pointer(PointerKind::Click, 1.0, 1.0),
            t0 + Duration::from_millis(2),
        );

        assert!(down.is_some());
        assert!(up.is_some());
        assert!(click.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pointer_coordinates_go_through_the_viewport() {
        // Surface shown at half size and offset by (10, 20).
        let mut forwarder = InputForwarder::new(ViewportMapping {
            origin_x: 10.0,
            origin_y: 20.0,
            display_width: 512.0,
            display_height: 384.0,
            logical_width: 1024,
            logical_height: 768,
        });

        let message = forwarder
            .message_for(pointer(PointerKind::Down, 266.0, 212.0), Instant::now())
            .expect("pointer-down always passes");

        let InputMessage::Pointer(p) = message else {
            panic!("expected a pointer message");
        };
        assert_eq!((p.x, p.y), (512, 384));
    }

    #[tokio::test(start_paused = true)]
    async fn test_touch_contacts_are_normalized_individually() {
        let mut forwarder = InputForwarder::new(ViewportMapping {
            origin_x: 100.0,
            origin_y: 0.0,
            display_width: 1024.0,
            display_height: 768.0,
            logical_width: 1024,
            logical_height: 768,
        });

        let message = forwarder
            .message_for(
                Occurrence::Touch {
                    kind: TouchKind::Start,
                    touches: vec![TouchContact {
                        id: 3,
                        client_x: 150.0,
                        client_y: 60.0,
                    }],
                    changed: vec![TouchContact {
                        id: 3,
                        client_x: 150.0,
                        client_y: 60.0,
                    }],
                    target: vec![],
                    modifiers: Modifiers::default(),
                },
                Instant::now(),
            )
            .expect("touch events always pass");

        let InputMessage::Touch(t) = message else {
            panic!("expected a touch message");
        };
        assert_eq!(t.touches, vec![TouchPoint { id: 3, x: 50, y: 60 }]);
        assert_eq!(t.changed, t.touches);
        assert!(t.target.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_key_and_clipboard_pass_through_untouched() {
        let mut forwarder = InputForwarder::new(identity_viewport());
        let now = Instant::now();

        let key = forwarder.message_for(
            Occurrence::Key {
                kind: KeyKind::Down,
                key: "Escape".to_string(),
                modifiers: Modifiers::default(),
            },
            now,
        );
        let clip = forwarder.message_for(
            Occurrence::ClipboardChange {
                text: "yanked".to_string(),
            },
            now,
        );

        assert_eq!(
            key,
            Some(InputMessage::Key(KeyMessage {
                kind: KeyKind::Down,
                modifiers: Modifiers::default(),
                key: "Escape".to_string(),
            }))
        );
        assert_eq!(
            clip,
            Some(InputMessage::Clipboard(ClipboardMessage {
                text: "yanked".to_string(),
            }))
        );
    }
}
