//! Binary codec for remote-canvas wire messages.
//!
//! Wire formats (all integers and floats big-endian):
//! ```text
//! pointer   [kind:1][buttons:1][x:4][y:4][modifiers:1]              = 11 bytes
//! wheel     pointer header + [dx:8][dy:8][dz:8][delta_mode:1]       = 36 bytes
//! key       [kind:1][modifiers:1][len:4][key name UTF-8]            = 6 + len
//! touch     [kind:1] 3 × ([count:1][id:4][x:4][y:4]…) [modifiers:1]
//! clipboard [14][len:4][text UTF-8]                                 = 5 + len
//! blit      [1][x:4][y:4][w:4][h:4][RGBA, w*h*4 bytes]              = 17 + w*h*4
//! set-clip  [2][len:4][text UTF-8]                                  = 5 + len
//! ```
//!
//! Encoding is infallible: buffers are sized exactly from input cardinality.
//! Decoding never trusts a peer-declared length: every read goes through a
//! bounds-checked accessor and a length that overruns the buffer is a
//! [`DecodeError`], not a panic.

use thiserror::Error;

use crate::protocol::messages::{
    BlitCommand, ClipboardMessage, DrawCommand, InputMessage, KeyKind, KeyMessage, Modifiers,
    PointerKind, PointerMessage, TouchKind, TouchMessage, TouchPoint, WheelMessage, DRAW_BLIT,
    DRAW_SET_CLIPBOARD, POINTER_EVENT_LEN, TOUCH_POINT_LEN, WHEEL_EVENT_LEN,
};

/// Errors that can occur while decoding a wire message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The buffer ends before the message (or its declared payload) does.
    #[error("truncated message: need at least {needed} bytes, got {available}")]
    Truncated { needed: usize, available: usize },

    /// A declared pixel block is too large to address.
    #[error("pixel block of {width}x{height} overflows addressable length")]
    LengthOverflow { width: u32, height: u32 },

    /// A length-prefixed text payload is not valid UTF-8.
    #[error("text payload is not valid UTF-8: {0}")]
    InvalidText(#[from] std::str::Utf8Error),

    /// The leading byte of an input event is not a known kind tag.
    #[error("unrecognized input kind tag: {0}")]
    UnknownInputKind(u8),
}

// ── Input event encoding ──────────────────────────────────────────────────────

/// Encodes an [`InputMessage`] into its exact wire bytes.
///
/// Never fails; oversized touch lists are not validated (the count byte
/// truncates, mirroring the wire layout's u8 cardinality).
pub fn encode_input(msg: &InputMessage) -> Vec<u8> {
    match msg {
        InputMessage::Pointer(m) => encode_pointer(m),
        InputMessage::Wheel(m) => encode_wheel(m),
        InputMessage::Key(m) => encode_key(m),
        InputMessage::Touch(m) => encode_touch(m),
        InputMessage::Clipboard(m) => encode_clipboard(m),
    }
}

fn encode_pointer(m: &PointerMessage) -> Vec<u8> {
    let mut buf = Vec::with_capacity(POINTER_EVENT_LEN);
    write_pointer_header(&mut buf, m.kind as u8, m.buttons, m.x, m.y, m.modifiers);
    buf
}

fn encode_wheel(m: &WheelMessage) -> Vec<u8> {
    let mut buf = Vec::with_capacity(WHEEL_EVENT_LEN);
    write_pointer_header(
        &mut buf,
        crate::protocol::messages::EventKind::Wheel.tag(),
        m.buttons,
        m.x,
        m.y,
        m.modifiers,
    );
    buf.extend_from_slice(&m.delta_x.to_be_bytes());
    buf.extend_from_slice(&m.delta_y.to_be_bytes());
    buf.extend_from_slice(&m.delta_z.to_be_bytes());
    buf.push(m.delta_mode);
    buf
}

fn write_pointer_header(
    buf: &mut Vec<u8>,
    kind: u8,
    buttons: u8,
    x: u32,
    y: u32,
    modifiers: Modifiers,
) {
    buf.push(kind);
    buf.push(buttons);
    buf.extend_from_slice(&x.to_be_bytes());
    buf.extend_from_slice(&y.to_be_bytes());
    buf.push(modifiers.bits());
}

fn encode_key(m: &KeyMessage) -> Vec<u8> {
    let key_bytes = m.key.as_bytes();
    let mut buf = Vec::with_capacity(6 + key_bytes.len());
    buf.push(m.kind as u8);
    buf.push(m.modifiers.bits());
    buf.extend_from_slice(&(key_bytes.len() as u32).to_be_bytes());
    buf.extend_from_slice(key_bytes);
    buf
}

fn encode_touch(m: &TouchMessage) -> Vec<u8> {
    let total = 1
        + (1 + m.touches.len() * TOUCH_POINT_LEN)
        + (1 + m.changed.len() * TOUCH_POINT_LEN)
        + (1 + m.target.len() * TOUCH_POINT_LEN)
        + 1;
    let mut buf = Vec::with_capacity(total);
    buf.push(m.kind as u8);
    write_touch_list(&mut buf, &m.touches);
    write_touch_list(&mut buf, &m.changed);
    write_touch_list(&mut buf, &m.target);
    buf.push(m.modifiers.bits());
    buf
}

fn write_touch_list(buf: &mut Vec<u8>, points: &[TouchPoint]) {
    buf.push(points.len() as u8);
    for point in points {
        buf.extend_from_slice(&point.id.to_be_bytes());
        buf.extend_from_slice(&point.x.to_be_bytes());
        buf.extend_from_slice(&point.y.to_be_bytes());
    }
}

fn encode_clipboard(m: &ClipboardMessage) -> Vec<u8> {
    let text_bytes = m.text.as_bytes();
    let mut buf = Vec::with_capacity(5 + text_bytes.len());
    buf.push(crate::protocol::messages::EventKind::ClipboardChange.tag());
    buf.extend_from_slice(&(text_bytes.len() as u32).to_be_bytes());
    buf.extend_from_slice(text_bytes);
    buf
}

// ── Input event decoding (host side and round-trip tests) ─────────────────────

/// Decodes one [`InputMessage`] from the beginning of `bytes`.
///
/// Returns the message and the number of bytes consumed so a host can drive
/// this from a running offset.
///
/// # Errors
///
/// Returns [`DecodeError`] for truncated buffers, unknown kind tags, or
/// malformed UTF-8 in text payloads.
pub fn decode_input(bytes: &[u8]) -> Result<(InputMessage, usize), DecodeError> {
    let tag = read_u8(bytes, 0)?;
    match tag {
        1..=3 | 6..=8 => {
            let kind = PointerKind::try_from(tag).expect("tag range checked above");
            require_len(bytes, POINTER_EVENT_LEN)?;
            let msg = PointerMessage {
                kind,
                buttons: bytes[1],
                x: read_u32(bytes, 2)?,
                y: read_u32(bytes, 6)?,
                modifiers: Modifiers::from_bits(bytes[10]),
            };
            Ok((InputMessage::Pointer(msg), POINTER_EVENT_LEN))
        }
        9 => {
            require_len(bytes, WHEEL_EVENT_LEN)?;
            let msg = WheelMessage {
                buttons: bytes[1],
                x: read_u32(bytes, 2)?,
                y: read_u32(bytes, 6)?,
                modifiers: Modifiers::from_bits(bytes[10]),
                delta_x: read_f64(bytes, 11)?,
                delta_y: read_f64(bytes, 19)?,
                delta_z: read_f64(bytes, 27)?,
                delta_mode: read_u8(bytes, 35)?,
            };
            Ok((InputMessage::Wheel(msg), WHEEL_EVENT_LEN))
        }
        4 | 5 => {
            let kind = KeyKind::try_from(tag).expect("tag range checked above");
            let modifiers = Modifiers::from_bits(read_u8(bytes, 1)?);
            let (key, end) = read_string(bytes, 2)?;
            Ok((InputMessage::Key(KeyMessage { kind, modifiers, key }), end))
        }
        10..=13 => {
            let kind = TouchKind::try_from(tag).expect("tag range checked above");
            let mut offset = 1;
            let touches = read_touch_list(bytes, &mut offset)?;
            let changed = read_touch_list(bytes, &mut offset)?;
            let target = read_touch_list(bytes, &mut offset)?;
            let modifiers = Modifiers::from_bits(read_u8(bytes, offset)?);
            offset += 1;
            let msg = TouchMessage {
                kind,
                touches,
                changed,
                target,
                modifiers,
            };
            Ok((InputMessage::Touch(msg), offset))
        }
        14 => {
            let (text, end) = read_string(bytes, 1)?;
            Ok((InputMessage::Clipboard(ClipboardMessage { text }), end))
        }
        other => Err(DecodeError::UnknownInputKind(other)),
    }
}

fn read_touch_list(bytes: &[u8], offset: &mut usize) -> Result<Vec<TouchPoint>, DecodeError> {
    let count = read_u8(bytes, *offset)? as usize;
    *offset += 1;
    let mut points = Vec::with_capacity(count);
    for _ in 0..count {
        let point = TouchPoint {
            id: read_u32(bytes, *offset)?,
            x: read_u32(bytes, *offset + 4)?,
            y: read_u32(bytes, *offset + 8)?,
        };
        *offset += TOUCH_POINT_LEN;
        points.push(point);
    }
    Ok(points)
}

// ── Draw command decoding ─────────────────────────────────────────────────────

/// Decodes one [`DrawCommand`] from the beginning of `bytes`.
///
/// Returns the command and the number of bytes it consumed. Unrecognized
/// kind tags consume exactly their tag byte and decode to
/// [`DrawCommand::Unknown`], so the stream stays in sync across protocol
/// additions.
///
/// # Errors
///
/// Returns [`DecodeError`] when a declared length exceeds the buffer or a
/// clipboard payload is not UTF-8. A failed command leaves no partial side
/// effect; callers are expected to drop the connection.
pub fn decode_draw(bytes: &[u8]) -> Result<(DrawCommand, usize), DecodeError> {
    let kind = read_u8(bytes, 0)?;
    match kind {
        DRAW_BLIT => {
            let x = read_u32(bytes, 1)?;
            let y = read_u32(bytes, 5)?;
            let width = read_u32(bytes, 9)?;
            let height = read_u32(bytes, 13)?;
            let payload_len = (width as usize)
                .checked_mul(height as usize)
                .and_then(|n| n.checked_mul(4))
                .ok_or(DecodeError::LengthOverflow { width, height })?;
            let pixels = read_bytes(bytes, 17, payload_len)?.to_vec();
            let cmd = BlitCommand {
                x,
                y,
                width,
                height,
                pixels,
            };
            Ok((DrawCommand::Blit(cmd), 17 + payload_len))
        }
        DRAW_SET_CLIPBOARD => {
            let (text, end) = read_string(bytes, 1)?;
            Ok((DrawCommand::SetClipboard(text), end))
        }
        other => Ok((DrawCommand::Unknown(other), 1)),
    }
}

/// Iterator driving [`decode_draw`] from a running offset, so one transport
/// frame may carry any number of commands back to back.
///
/// Yields each decoded command in order; a decode error is yielded once and
/// ends the stream (the remaining bytes cannot be trusted to realign).
pub struct DrawStream<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> DrawStream<'a> {
    pub fn new(buf: &'a [u8]) -> DrawStream<'a> {
        DrawStream { buf, offset: 0 }
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl Iterator for DrawStream<'_> {
    type Item = Result<DrawCommand, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.buf.len() {
            return None;
        }
        match decode_draw(&self.buf[self.offset..]) {
            Ok((cmd, consumed)) => {
                self.offset += consumed;
                Some(Ok(cmd))
            }
            Err(e) => {
                self.offset = self.buf.len();
                Some(Err(e))
            }
        }
    }
}

// ── Draw command encoding (host side and tests) ───────────────────────────────

/// Encodes a [`DrawCommand`] into its exact wire bytes.
///
/// [`DrawCommand::Blit`] trusts `pixels` to hold `width * height * 4` bytes;
/// building the command is the host's responsibility.
pub fn encode_draw(cmd: &DrawCommand) -> Vec<u8> {
    match cmd {
        DrawCommand::Blit(b) => {
            let mut buf = Vec::with_capacity(17 + b.pixels.len());
            buf.push(DRAW_BLIT);
            buf.extend_from_slice(&b.x.to_be_bytes());
            buf.extend_from_slice(&b.y.to_be_bytes());
            buf.extend_from_slice(&b.width.to_be_bytes());
            buf.extend_from_slice(&b.height.to_be_bytes());
            buf.extend_from_slice(&b.pixels);
            buf
        }
        DrawCommand::SetClipboard(text) => {
            let text_bytes = text.as_bytes();
            let mut buf = Vec::with_capacity(5 + text_bytes.len());
            buf.push(DRAW_SET_CLIPBOARD);
            buf.extend_from_slice(&(text_bytes.len() as u32).to_be_bytes());
            buf.extend_from_slice(text_bytes);
            buf
        }
        DrawCommand::Unknown(kind) => vec![*kind],
    }
}

// ── Bounds-checked accessors ──────────────────────────────────────────────────

fn require_len(buf: &[u8], needed: usize) -> Result<(), DecodeError> {
    if buf.len() < needed {
        Err(DecodeError::Truncated {
            needed,
            available: buf.len(),
        })
    } else {
        Ok(())
    }
}

fn read_u8(buf: &[u8], offset: usize) -> Result<u8, DecodeError> {
    buf.get(offset).copied().ok_or(DecodeError::Truncated {
        needed: offset + 1,
        available: buf.len(),
    })
}

fn read_u32(buf: &[u8], offset: usize) -> Result<u32, DecodeError> {
    let bytes = read_bytes(buf, offset, 4)?;
    Ok(u32::from_be_bytes(bytes.try_into().expect("4-byte slice")))
}

fn read_f64(buf: &[u8], offset: usize) -> Result<f64, DecodeError> {
    let bytes = read_bytes(buf, offset, 8)?;
    Ok(f64::from_be_bytes(bytes.try_into().expect("8-byte slice")))
}

fn read_bytes(buf: &[u8], offset: usize, len: usize) -> Result<&[u8], DecodeError> {
    let end = offset.checked_add(len).ok_or(DecodeError::Truncated {
        needed: usize::MAX,
        available: buf.len(),
    })?;
    buf.get(offset..end).ok_or(DecodeError::Truncated {
        needed: end,
        available: buf.len(),
    })
}

/// Reads a 4-byte length prefix and that many UTF-8 bytes. Returns the text
/// and the offset of the byte after it.
fn read_string(buf: &[u8], offset: usize) -> Result<(String, usize), DecodeError> {
    let len = read_u32(buf, offset)? as usize;
    let start = offset + 4;
    let bytes = read_bytes(buf, start, len)?;
    let text = std::str::from_utf8(bytes)?.to_string();
    Ok((text, start + len))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
