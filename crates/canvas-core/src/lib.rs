//! # canvas-core
//!
//! Shared library for the remote-canvas client containing the wire protocol
//! codec, the event-subscription mask, and the viewport coordinate mapping.
//!
//! This crate is the protocol foundation: it knows how input events and draw
//! commands look on the wire, and nothing else. It has zero dependencies on
//! OS APIs, network sockets, or async runtimes, so it can be reused verbatim
//! by a host-side implementation or fuzzed in isolation.
//!
//! The protocol itself is a thin duplex stream. One direction carries input
//! events (pointer, keyboard, touch, clipboard) from the client to the host
//! that owns the actual machine; the other carries draw commands (pixel
//! blits, clipboard updates) back. Every message is a compact big-endian
//! binary record starting with a one-byte kind tag.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `canvas_core::InputMessage` instead of the full module path.
pub use domain::viewport::ViewportMapping;
pub use protocol::codec::{
    decode_draw, decode_input, encode_draw, encode_input, DecodeError, DrawStream,
};
pub use protocol::messages::{
    DrawCommand, EventKind, EventMask, InputMessage, Modifiers,
};
