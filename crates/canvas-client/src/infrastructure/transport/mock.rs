//! Scripted transport for lifecycle tests.
//!
//! Each connect attempt pops the next scripted session; when the script runs
//! dry the attempt fails, which exercises the connect-failure path of the
//! controller. The paired [`MockSessionDriver`] plays the remote host: it
//! feeds inbound frames, observes outbound frames, and closes the session by
//! dropping its inbound sender.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;
use url::Url;

use super::{DuplexConnector, DuplexSession, TransportError};

/// Connector handing out pre-scripted sessions in order.
#[derive(Default)]
pub struct MockConnector {
    scripts: Mutex<VecDeque<MockSession>>,
    attempts: AtomicUsize,
    endpoints: Mutex<Vec<Url>>,
}

impl MockConnector {
    pub fn new() -> MockConnector {
        MockConnector::default()
    }

    /// Queues a session for the next connect attempt.
    pub fn push_session(&self, session: MockSession) {
        self.scripts
            .lock()
            .expect("lock poisoned")
            .push_back(session);
    }

    /// Number of connect attempts made so far (successful or not).
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::Relaxed)
    }

    /// The endpoint passed to each connect attempt, in order.
    pub fn endpoints(&self) -> Vec<Url> {
        self.endpoints.lock().expect("lock poisoned").clone()
    }
}

#[async_trait]
impl DuplexConnector for MockConnector {
    async fn connect(&self, endpoint: &Url) -> Result<Box<dyn DuplexSession>, TransportError> {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        self.endpoints
            .lock()
            .expect("lock poisoned")
            .push(endpoint.clone());
        match self.scripts.lock().expect("lock poisoned").pop_front() {
            Some(session) => Ok(Box::new(session)),
            None => Err(TransportError::ConnectFailed {
                url: endpoint.to_string(),
                message: "no scripted session left".to_string(),
            }),
        }
    }
}

/// The client-facing half of a scripted connection.
pub struct MockSession {
    inbound: mpsc::UnboundedReceiver<Result<Vec<u8>, TransportError>>,
    outbound: mpsc::UnboundedSender<Vec<u8>>,
    closed: Arc<AtomicBool>,
}

/// The host-facing half: what the test script drives.
pub struct MockSessionDriver {
    /// Send `Ok(frame)` to deliver a draw frame, `Err(_)` to fault the
    /// transport; drop the sender to close the connection from the peer side.
    pub inbound: mpsc::UnboundedSender<Result<Vec<u8>, TransportError>>,
    /// Receives every frame the client sends.
    pub outbound: mpsc::UnboundedReceiver<Vec<u8>>,
    closed: Arc<AtomicBool>,
}

impl MockSession {
    /// Creates a connected session/driver pair.
    pub fn pair() -> (MockSession, MockSessionDriver) {
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let closed = Arc::new(AtomicBool::new(false));
        (
            MockSession {
                inbound: inbound_rx,
                outbound: outbound_tx,
                closed: Arc::clone(&closed),
            },
            MockSessionDriver {
                inbound: inbound_tx,
                outbound: outbound_rx,
                closed,
            },
        )
    }
}

impl MockSessionDriver {
    /// Whether the client has called `close` on its half.
    pub fn client_closed(&self) -> bool {
        self.closed.load(Ordering::Relaxed)
    }

    /// Delivers a draw frame to the client.
    pub fn send_frame(&self, frame: Vec<u8>) {
        let _ = self.inbound.send(Ok(frame));
    }

    /// Injects a transport error on the client's receive path.
    pub fn send_error(&self) {
        let _ = self.inbound.send(Err(TransportError::Io("injected fault".to_string())));
    }

    /// Closes the connection from the peer side: once delivered frames
    /// drain, the client's `recv` returns `None`.
    pub fn close_from_peer(&mut self) {
        let (disconnected, _) = mpsc::unbounded_channel();
        self.inbound = disconnected;
    }
}

#[async_trait]
impl DuplexSession for MockSession {
    async fn send(&mut self, frame: Vec<u8>) -> Result<(), TransportError> {
        self.outbound
            .send(frame)
            .map_err(|_| TransportError::Closed)
    }

    async fn recv(&mut self) -> Option<Result<Vec<u8>, TransportError>> {
        self.inbound.recv().await
    }

    async fn close(&mut self) {
        self.closed.store(true, Ordering::Relaxed);
        self.inbound.close();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
