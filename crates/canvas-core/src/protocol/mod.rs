//! Protocol module containing message types and the binary codec.

pub mod codec;
pub mod messages;

pub use codec::{decode_draw, decode_input, encode_draw, encode_input, DecodeError, DrawStream};
pub use messages::*;
