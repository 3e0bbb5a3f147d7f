//! The duplex transport the draw protocol runs over.
//!
//! The controller sees only two small traits: a connector that opens a
//! session against an endpoint, and the session itself with send/recv/close.
//! Listener-style open/error/close/message callbacks become plain awaited
//! futures: `recv` yields `Some(Ok(frame))` per message, `Some(Err(_))` for a
//! transport error, and `None` once the peer closes.

pub mod mock;
pub mod ws;

pub use mock::{MockConnector, MockSession, MockSessionDriver};
pub use ws::WsConnector;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// Errors surfaced by the transport layer.
///
/// The lifecycle controller does not distinguish error kinds (any transport
/// error collapses to an immediate close), but the variants keep log output
/// useful.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The connection could not be established.
    #[error("failed to connect to {url}: {message}")]
    ConnectFailed { url: String, message: String },

    /// An I/O error occurred on the established connection.
    #[error("connection I/O error: {0}")]
    Io(String),

    /// The connection is closed.
    #[error("connection closed")]
    Closed,
}

/// Opens duplex sessions against a draw endpoint.
#[async_trait]
pub trait DuplexConnector: Send + Sync {
    async fn connect(&self, endpoint: &Url) -> Result<Box<dyn DuplexSession>, TransportError>;
}

/// One established message-oriented duplex connection.
#[async_trait]
pub trait DuplexSession: Send {
    /// Sends one binary frame. The transport preserves send order.
    async fn send(&mut self, frame: Vec<u8>) -> Result<(), TransportError>;

    /// Receives the next inbound binary frame. `None` means the peer closed
    /// the connection.
    async fn recv(&mut self) -> Option<Result<Vec<u8>, TransportError>>;

    /// Closes the connection. Idempotent; errors during close are ignored.
    async fn close(&mut self);
}
