//! WebSocket transport over tokio-tungstenite.
//!
//! One logical message per WebSocket frame, binary frames only. Protocol
//! ping/pong is handled by tokio-tungstenite itself; text frames are not
//! part of the draw protocol and are skipped.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    connect_async,
    tungstenite::Message as WsMessage,
    MaybeTlsStream, WebSocketStream,
};
use tracing::debug;
use url::Url;

use super::{DuplexConnector, DuplexSession, TransportError};

/// Production connector: dials `ws://` / `wss://` endpoints.
#[derive(Debug, Default)]
pub struct WsConnector;

impl WsConnector {
    pub fn new() -> WsConnector {
        WsConnector
    }
}

#[async_trait]
impl DuplexConnector for WsConnector {
    async fn connect(&self, endpoint: &Url) -> Result<Box<dyn DuplexSession>, TransportError> {
        // `connect_async` performs the TCP connect plus the WebSocket
        // upgrade handshake; awaiting it yields to the runtime while the
        // network round trips are in flight.
        let (stream, _response) =
            connect_async(endpoint.as_str())
                .await
                .map_err(|e| TransportError::ConnectFailed {
                    url: endpoint.to_string(),
                    message: e.to_string(),
                })?;
        Ok(Box::new(WsSession { stream }))
    }
}

/// An established WebSocket session.
pub struct WsSession {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl DuplexSession for WsSession {
    async fn send(&mut self, frame: Vec<u8>) -> Result<(), TransportError> {
        self.stream
            .send(WsMessage::Binary(frame))
            .await
            .map_err(|e| TransportError::Io(e.to_string()))
    }

    async fn recv(&mut self) -> Option<Result<Vec<u8>, TransportError>> {
        loop {
            return match self.stream.next().await? {
                Ok(WsMessage::Binary(frame)) => Some(Ok(frame)),
                Ok(WsMessage::Close(_)) => None,
                Ok(other) => {
                    // Text/ping/pong frames are not draw-protocol traffic.
                    debug!("ignoring non-binary WebSocket frame: {other:?}");
                    continue;
                }
                Err(e) => Some(Err(TransportError::Io(e.to_string()))),
            };
        }
    }

    async fn close(&mut self) {
        let _ = self.stream.close(None).await;
    }
}
