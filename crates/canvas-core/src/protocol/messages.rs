//! All remote-canvas wire message types.
//!
//! Outbound messages ([`InputMessage`]) travel from the client to the draw
//! host; inbound commands ([`DrawCommand`]) travel the other way. Every
//! message starts with a one-byte kind tag; multi-byte integers and floats
//! are big-endian.

use serde::{Deserialize, Serialize};

// ── Kind tags ─────────────────────────────────────────────────────────────────

/// Inbound draw-command tag: paint an RGBA pixel block.
pub const DRAW_BLIT: u8 = 0x01;

/// Inbound draw-command tag: replace the local clipboard text.
pub const DRAW_SET_CLIPBOARD: u8 = 0x02;

/// Fixed size of a pointer event on the wire.
pub const POINTER_EVENT_LEN: usize = 11;

/// Fixed size of a wheel event on the wire (pointer header + three f64 deltas
/// + delta mode byte).
pub const WHEEL_EVENT_LEN: usize = 36;

/// Bytes per encoded touch point: `[identifier:u32][x:u32][y:u32]`.
pub const TOUCH_POINT_LEN: usize = 12;

// ── Logical event kinds ───────────────────────────────────────────────────────

/// All logical event kinds the client can forward, in wire-tag order.
///
/// The discriminant of each variant IS its outbound kind tag, and the bit
/// selecting it in an [`EventMask`] is `1 << (tag - 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EventKind {
    PointerMove = 1,
    PointerDown = 2,
    PointerUp = 3,
    KeyDown = 4,
    KeyUp = 5,
    Click = 6,
    DoubleClick = 7,
    AuxClick = 8,
    Wheel = 9,
    TouchStart = 10,
    TouchMove = 11,
    TouchEnd = 12,
    TouchCancel = 13,
    ClipboardChange = 14,
}

impl EventKind {
    /// Every kind, in tag order. Used to iterate an [`EventMask`].
    pub const ALL: [EventKind; 14] = [
        EventKind::PointerMove,
        EventKind::PointerDown,
        EventKind::PointerUp,
        EventKind::KeyDown,
        EventKind::KeyUp,
        EventKind::Click,
        EventKind::DoubleClick,
        EventKind::AuxClick,
        EventKind::Wheel,
        EventKind::TouchStart,
        EventKind::TouchMove,
        EventKind::TouchEnd,
        EventKind::TouchCancel,
        EventKind::ClipboardChange,
    ];

    /// The outbound wire tag for this kind.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// The [`EventMask`] bit selecting this kind.
    pub fn mask_bit(self) -> u16 {
        1 << (self as u8 - 1)
    }

    /// Keyboard-kind events are dispatched at the document level rather than
    /// the surface, so the surface does not need input focus. Composition
    /// kinds, when added, belong here too.
    pub fn is_keyboard(self) -> bool {
        matches!(self, EventKind::KeyDown | EventKind::KeyUp)
    }
}

impl TryFrom<u8> for EventKind {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        match value {
            1 => Ok(EventKind::PointerMove),
            2 => Ok(EventKind::PointerDown),
            3 => Ok(EventKind::PointerUp),
            4 => Ok(EventKind::KeyDown),
            5 => Ok(EventKind::KeyUp),
            6 => Ok(EventKind::Click),
            7 => Ok(EventKind::DoubleClick),
            8 => Ok(EventKind::AuxClick),
            9 => Ok(EventKind::Wheel),
            10 => Ok(EventKind::TouchStart),
            11 => Ok(EventKind::TouchMove),
            12 => Ok(EventKind::TouchEnd),
            13 => Ok(EventKind::TouchCancel),
            14 => Ok(EventKind::ClipboardChange),
            _ => Err(()),
        }
    }
}

// ── Event mask ────────────────────────────────────────────────────────────────

/// Bitset selecting which logical event kinds are forwarded.
///
/// Bit `1 << (tag - 1)` selects the kind with that wire tag, so bit 0 is
/// pointer-move and bit 13 is clipboard-change. A mask is immutable for the
/// lifetime of one connection instance; a reconnect builds a fresh instance
/// from the same configured value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventMask(pub u16);

impl EventMask {
    /// No events forwarded (the configuration default).
    pub const NONE: EventMask = EventMask(0);

    /// All fourteen kinds.
    pub const ALL: EventMask = EventMask(0x3FFF);

    /// Returns `true` if `kind` is selected.
    pub fn contains(self, kind: EventKind) -> bool {
        self.0 & kind.mask_bit() != 0
    }

    /// Returns a copy with `kind` selected. Convenient for building masks in
    /// tests and configuration code.
    pub fn with(self, kind: EventKind) -> EventMask {
        EventMask(self.0 | kind.mask_bit())
    }

    /// Iterates the selected kinds in tag order.
    pub fn kinds(self) -> impl Iterator<Item = EventKind> {
        EventKind::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

// ── Modifier keys ─────────────────────────────────────────────────────────────

/// Modifier-key state carried by pointer, wheel, key, and touch messages.
///
/// Wire layout is a single byte: bit 0 = Alt, bit 1 = Shift, bit 2 = Ctrl,
/// bit 3 = Meta. Zero means no modifier pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub alt: bool,
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const ALT: u8 = 1 << 0;
    pub const SHIFT: u8 = 1 << 1;
    pub const CTRL: u8 = 1 << 2;
    pub const META: u8 = 1 << 3;

    /// Packs the modifier state into its wire byte.
    pub fn bits(self) -> u8 {
        let mut bits = 0;
        if self.alt {
            bits |= Self::ALT;
        }
        if self.shift {
            bits |= Self::SHIFT;
        }
        if self.ctrl {
            bits |= Self::CTRL;
        }
        if self.meta {
            bits |= Self::META;
        }
        bits
    }

    /// Unpacks a wire byte. Bits above 3 are ignored.
    pub fn from_bits(bits: u8) -> Modifiers {
        Modifiers {
            alt: bits & Self::ALT != 0,
            shift: bits & Self::SHIFT != 0,
            ctrl: bits & Self::CTRL != 0,
            meta: bits & Self::META != 0,
        }
    }
}

// ── Per-message kind enums ────────────────────────────────────────────────────

/// The six pointer message kinds sharing the fixed 11-byte layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PointerKind {
    Move = 1,
    Down = 2,
    Up = 3,
    Click = 6,
    DoubleClick = 7,
    AuxClick = 8,
}

impl TryFrom<u8> for PointerKind {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        match value {
            1 => Ok(PointerKind::Move),
            2 => Ok(PointerKind::Down),
            3 => Ok(PointerKind::Up),
            6 => Ok(PointerKind::Click),
            7 => Ok(PointerKind::DoubleClick),
            8 => Ok(PointerKind::AuxClick),
            _ => Err(()),
        }
    }
}

/// Key press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum KeyKind {
    Down = 4,
    Up = 5,
}

impl TryFrom<u8> for KeyKind {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        match value {
            4 => Ok(KeyKind::Down),
            5 => Ok(KeyKind::Up),
            _ => Err(()),
        }
    }
}

/// The four touch message kinds sharing the variable three-list layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TouchKind {
    Start = 10,
    Move = 11,
    End = 12,
    Cancel = 13,
}

impl TryFrom<u8> for TouchKind {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        match value {
            10 => Ok(TouchKind::Start),
            11 => Ok(TouchKind::Move),
            12 => Ok(TouchKind::End),
            13 => Ok(TouchKind::Cancel),
            _ => Err(()),
        }
    }
}

// ── Outbound message payloads ─────────────────────────────────────────────────

/// Pointer event: `[kind:u8][buttons:u8][x:u32][y:u32][modifiers:u8]`,
/// 11 bytes. Coordinates are logical surface pixels (already normalized
/// through the [`crate::ViewportMapping`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerMessage {
    pub kind: PointerKind,
    /// Button state bitmask as reported by the input source.
    pub buttons: u8,
    pub x: u32,
    pub y: u32,
    pub modifiers: Modifiers,
}

/// Wheel event (kind 9): the pointer header followed by
/// `[delta_x:f64][delta_y:f64][delta_z:f64][delta_mode:u8]`, 36 bytes total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelMessage {
    pub buttons: u8,
    pub x: u32,
    pub y: u32,
    pub modifiers: Modifiers,
    pub delta_x: f64,
    pub delta_y: f64,
    pub delta_z: f64,
    /// Scroll unit (pixel / line / page) as reported by the input source.
    pub delta_mode: u8,
}

/// Key event: `[kind:u8][modifiers:u8][len:u32][key name UTF-8]`.
///
/// The key name is the logical key text ("Enter", "a", "ArrowLeft"), not a
/// scan code or single character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMessage {
    pub kind: KeyKind,
    pub modifiers: Modifiers,
    pub key: String,
}

/// One touch point inside a [`TouchMessage`] list: 12 bytes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchPoint {
    /// Stable identifier for this contact across its start/move/end lifetime.
    pub id: u32,
    pub x: u32,
    pub y: u32,
}

/// Touch event: `[kind:u8]` then three touch lists in fixed order (active
/// touches, changed touches, target touches), each `[count:u8]` + entries,
/// then a trailing `[modifiers:u8]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TouchMessage {
    pub kind: TouchKind,
    pub touches: Vec<TouchPoint>,
    pub changed: Vec<TouchPoint>,
    pub target: Vec<TouchPoint>,
    pub modifiers: Modifiers,
}

/// Clipboard change (kind 14): `[14][len:u32][text UTF-8]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardMessage {
    pub text: String,
}

/// All outbound messages, discriminated by kind tag.
#[derive(Debug, Clone, PartialEq)]
pub enum InputMessage {
    Pointer(PointerMessage),
    Wheel(WheelMessage),
    Key(KeyMessage),
    Touch(TouchMessage),
    Clipboard(ClipboardMessage),
}

impl InputMessage {
    /// Returns the leading wire tag for this message.
    pub fn kind_tag(&self) -> u8 {
        match self {
            InputMessage::Pointer(m) => m.kind as u8,
            InputMessage::Wheel(_) => EventKind::Wheel.tag(),
            InputMessage::Key(m) => m.kind as u8,
            InputMessage::Touch(m) => m.kind as u8,
            InputMessage::Clipboard(_) => EventKind::ClipboardChange.tag(),
        }
    }
}

// ── Inbound draw commands ─────────────────────────────────────────────────────

/// Framebuffer blit: paint `width`×`height` RGBA pixels at `(x, y)`.
///
/// `pixels` holds exactly `width * height * 4` bytes, row-major, unclamped
/// 8-bit channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlitCommand {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// All inbound commands, discriminated by the leading byte.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Kind 1: paint a pixel block onto the rendering surface.
    Blit(BlitCommand),
    /// Kind 2: replace the local clipboard text.
    SetClipboard(String),
    /// Any unrecognized kind: consumes only its tag byte and has no side
    /// effect, so newer hosts can speak to older clients.
    Unknown(u8),
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_tags_match_wire_table() {
        assert_eq!(EventKind::PointerMove.tag(), 1);
        assert_eq!(EventKind::KeyDown.tag(), 4);
        assert_eq!(EventKind::Wheel.tag(), 9);
        assert_eq!(EventKind::TouchCancel.tag(), 13);
        assert_eq!(EventKind::ClipboardChange.tag(), 14);
    }

    #[test]
    fn test_event_kind_mask_bits() {
        // Arrange / Act / Assert: bit is 1 << (tag - 1)
        assert_eq!(EventKind::PointerMove.mask_bit(), 1);
        assert_eq!(EventKind::PointerDown.mask_bit(), 2);
        assert_eq!(EventKind::KeyDown.mask_bit(), 8);
        assert_eq!(EventKind::ClipboardChange.mask_bit(), 8192);
    }

    #[test]
    fn test_event_kind_round_trips_through_tag() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::try_from(kind.tag()), Ok(kind));
        }
    }

    #[test]
    fn test_event_kind_rejects_unknown_tags() {
        assert!(EventKind::try_from(0).is_err());
        assert!(EventKind::try_from(15).is_err());
        assert!(EventKind::try_from(255).is_err());
    }

    #[test]
    fn test_keyboard_kinds_are_exactly_key_down_and_key_up() {
        let keyboard: Vec<EventKind> = EventKind::ALL
            .into_iter()
            .filter(|k| k.is_keyboard())
            .collect();
        assert_eq!(keyboard, vec![EventKind::KeyDown, EventKind::KeyUp]);
    }

    #[test]
    fn test_event_mask_none_selects_nothing() {
        assert_eq!(EventMask::NONE.kinds().count(), 0);
    }

    #[test]
    fn test_event_mask_all_selects_all_fourteen_kinds() {
        assert_eq!(EventMask::ALL.kinds().count(), 14);
    }

    #[test]
    fn test_event_mask_contains_only_set_bits() {
        // Arrange
        let mask = EventMask::NONE
            .with(EventKind::PointerMove)
            .with(EventKind::KeyUp)
            .with(EventKind::ClipboardChange);

        // Assert
        assert!(mask.contains(EventKind::PointerMove));
        assert!(mask.contains(EventKind::KeyUp));
        assert!(mask.contains(EventKind::ClipboardChange));
        assert!(!mask.contains(EventKind::PointerDown));
        assert!(!mask.contains(EventKind::Wheel));
        assert_eq!(mask.0, 1 | 16 | 8192);
    }

    #[test]
    fn test_event_mask_kinds_iterates_in_tag_order() {
        let mask = EventMask::NONE
            .with(EventKind::TouchEnd)
            .with(EventKind::PointerUp)
            .with(EventKind::Wheel);
        let kinds: Vec<EventKind> = mask.kinds().collect();
        assert_eq!(
            kinds,
            vec![EventKind::PointerUp, EventKind::Wheel, EventKind::TouchEnd]
        );
    }

    #[test]
    fn test_modifiers_bits_round_trip() {
        let all = Modifiers {
            alt: true,
            shift: true,
            ctrl: true,
            meta: true,
        };
        assert_eq!(all.bits(), 0b1111);
        assert_eq!(Modifiers::from_bits(0b1111), all);
        assert_eq!(Modifiers::default().bits(), 0);
    }

    #[test]
    fn test_modifiers_from_bits_ignores_high_bits() {
        let m = Modifiers::from_bits(0xF2);
        assert_eq!(
            m,
            Modifiers {
                alt: false,
                shift: true,
                ctrl: false,
                meta: false,
            }
        );
    }

    #[test]
    fn test_pointer_kind_tags_skip_key_range() {
        // Pointer kinds 1-3 and 6-8 bracket the key kinds 4-5.
        assert_eq!(PointerKind::Up as u8, 3);
        assert_eq!(PointerKind::Click as u8, 6);
        assert!(PointerKind::try_from(4).is_err());
        assert!(PointerKind::try_from(5).is_err());
    }

    #[test]
    fn test_input_message_kind_tags() {
        let pointer = InputMessage::Pointer(PointerMessage {
            kind: PointerKind::DoubleClick,
            buttons: 0,
            x: 0,
            y: 0,
            modifiers: Modifiers::default(),
        });
        assert_eq!(pointer.kind_tag(), 7);

        let clip = InputMessage::Clipboard(ClipboardMessage {
            text: String::new(),
        });
        assert_eq!(clip.kind_tag(), 14);
    }
}
