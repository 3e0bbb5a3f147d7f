//! Integration tests for the canvas-core wire codec.
//!
//! Exercises the public API end to end: byte-exact layouts for each message
//! kind, encode/decode round trips, and stream decoding of multi-command
//! frames.

use canvas_core::protocol::messages::{
    BlitCommand, ClipboardMessage, KeyKind, KeyMessage, Modifiers, PointerKind, PointerMessage,
    TouchKind, TouchMessage, TouchPoint, WheelMessage,
};
use canvas_core::{
    decode_draw, decode_input, encode_draw, encode_input, DecodeError, DrawCommand, DrawStream,
    InputMessage,
};

fn roundtrip(msg: InputMessage) -> InputMessage {
    let bytes = encode_input(&msg);
    let (decoded, consumed) = decode_input(&bytes).expect("decode must succeed");
    assert_eq!(consumed, bytes.len(), "all bytes must be consumed");
    decoded
}

#[test]
fn test_roundtrip_pointer_message() {
    let original = InputMessage::Pointer(PointerMessage {
        kind: PointerKind::Click,
        buttons: 1,
        x: 312,
        y: 640,
        modifiers: Modifiers {
            ctrl: true,
            shift: true,
            ..Modifiers::default()
        },
    });

    assert_eq!(original, roundtrip(original.clone()));
}

#[test]
fn test_roundtrip_wheel_message() {
    let original = InputMessage::Wheel(WheelMessage {
        buttons: 0,
        x: 10,
        y: 10,
        modifiers: Modifiers::default(),
        delta_x: 0.0,
        delta_y: -120.0,
        delta_z: 0.0,
        delta_mode: 0,
    });

    assert_eq!(original, roundtrip(original.clone()));
}

#[test]
fn test_roundtrip_key_message() {
    let original = InputMessage::Key(KeyMessage {
        kind: KeyKind::Down,
        modifiers: Modifiers {
            alt: true,
            ..Modifiers::default()
        },
        key: "ArrowLeft".to_string(),
    });

    assert_eq!(original, roundtrip(original.clone()));
}

#[test]
fn test_roundtrip_touch_message() {
    let original = InputMessage::Touch(TouchMessage {
        kind: TouchKind::Move,
        touches: vec![
            TouchPoint { id: 0, x: 5, y: 6 },
            TouchPoint { id: 1, x: 7, y: 8 },
        ],
        changed: vec![TouchPoint { id: 0, x: 5, y: 6 }],
        target: vec![
            TouchPoint { id: 0, x: 5, y: 6 },
            TouchPoint { id: 1, x: 7, y: 8 },
        ],
        modifiers: Modifiers::default(),
    });

    assert_eq!(original, roundtrip(original.clone()));
}

#[test]
fn test_roundtrip_clipboard_message() {
    let original = InputMessage::Clipboard(ClipboardMessage {
        text: "copied over the wire".to_string(),
    });

    assert_eq!(original, roundtrip(original.clone()));
}

// ── Byte-exact vectors from the wire specification ────────────────────────────

#[test]
fn test_pointer_down_wire_vector() {
    // pointer-down, buttons=1, (x, y) = (66051, 197121), alt held.
    let msg = InputMessage::Pointer(PointerMessage {
        kind: PointerKind::Down,
        buttons: 1,
        x: 0x0001_0203,
        y: 0x0003_0201,
        modifiers: Modifiers {
            alt: true,
            ..Modifiers::default()
        },
    });

    let bytes = encode_input(&msg);

    assert_eq!(bytes, vec![2, 1, 0, 1, 2, 3, 0, 3, 2, 1, 1]);

    // A mock peer decoding the same bytes recovers every field.
    let (decoded, consumed) = decode_input(&bytes).expect("decode must succeed");
    assert_eq!(consumed, 11);
    assert_eq!(decoded, msg);
}

#[test]
fn test_blit_wire_vector_paints_two_by_one() {
    let mut frame = vec![1u8];
    frame.extend_from_slice(&8u32.to_be_bytes()); // x
    frame.extend_from_slice(&9u32.to_be_bytes()); // y
    frame.extend_from_slice(&2u32.to_be_bytes()); // width
    frame.extend_from_slice(&1u32.to_be_bytes()); // height
    frame.extend_from_slice(&[255, 0, 0, 255, 0, 255, 0, 255]);

    let (cmd, consumed) = decode_draw(&frame).expect("decode must succeed");

    assert_eq!(consumed, 25);
    let DrawCommand::Blit(blit) = cmd else {
        panic!("expected a blit command");
    };
    assert_eq!((blit.x, blit.y), (8, 9));
    assert_eq!((blit.width, blit.height), (2, 1));
    assert_eq!(blit.pixels, vec![255, 0, 0, 255, 0, 255, 0, 255]);
}

#[test]
fn test_set_clipboard_wire_vector() {
    let mut frame = vec![2u8];
    frame.extend_from_slice(&5u32.to_be_bytes());
    frame.extend_from_slice(b"hello");

    let (cmd, consumed) = decode_draw(&frame).expect("decode must succeed");

    assert_eq!(consumed, 10);
    assert_eq!(cmd, DrawCommand::SetClipboard("hello".to_string()));
}

// ── Stream decoding ───────────────────────────────────────────────────────────

#[test]
fn test_draw_stream_consumes_batched_frame_fully() {
    let mut frame = encode_draw(&DrawCommand::Blit(BlitCommand {
        x: 0,
        y: 0,
        width: 2,
        height: 2,
        pixels: vec![7; 16],
    }));
    frame.extend_from_slice(&encode_draw(&DrawCommand::SetClipboard("batched".into())));
    frame.extend_from_slice(&encode_draw(&DrawCommand::Unknown(0x40)));

    let mut stream = DrawStream::new(&frame);
    let commands: Vec<DrawCommand> = stream
        .by_ref()
        .collect::<Result<_, _>>()
        .expect("stream must decode");

    assert_eq!(commands.len(), 3);
    assert_eq!(stream.offset(), frame.len());
}

#[test]
fn test_draw_stream_surfaces_truncation_mid_frame() {
    let mut frame = encode_draw(&DrawCommand::SetClipboard("first".into()));
    // Second command declares a 4-byte text but the frame ends early.
    frame.push(2);
    frame.extend_from_slice(&4u32.to_be_bytes());
    frame.push(b'x');

    let results: Vec<Result<DrawCommand, DecodeError>> = DrawStream::new(&frame).collect();

    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(DecodeError::Truncated { .. })));
}
