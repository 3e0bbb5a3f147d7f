//! Collaborator seams to the host environment.
//!
//! Each submodule declares the trait the application layer consumes plus the
//! implementations shipped with the client: an in-memory variant used by the
//! headless binary and the test suite, and (for the transport) the real
//! WebSocket connector.

pub mod clipboard;
pub mod input_source;
pub mod surface;
pub mod transport;
