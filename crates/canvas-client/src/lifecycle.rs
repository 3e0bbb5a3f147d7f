//! Connection lifecycle controller.
//!
//! One [`SurfaceController`] owns the duplex connection for one rendering
//! surface and drives the `Connecting → Active → Closed` state machine, with
//! the optional `Closed → Connecting` self-transition when a reconnect
//! interval is configured.
//!
//! The controller is a single sequential task: an activation's teardown
//! always completes before the reconnect delay starts, so at most one
//! reconnect timer is ever outstanding per surface and a new attempt can
//! never overlap a previous activation's cleanup. All per-activation state
//! (the viewport mapping, the listener registry, the input forwarder's
//! debounce clock, the clipboard poll) is rebuilt from scratch each time;
//! only the immutable [`SurfaceConfig`] is shared across activations.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use canvas_core::{encode_input, ViewportMapping};

use crate::application::forward_input::InputForwarder;
use crate::application::subscriptions::attach_listeners;
use crate::application::apply_draw::apply_draw_frame;
use crate::domain::config::SurfaceConfig;
use crate::domain::occurrence::Occurrence;
use crate::infrastructure::clipboard::ClipboardSink;
use crate::infrastructure::input_source::InputSource;
use crate::infrastructure::surface::RenderSurface;
use crate::infrastructure::transport::DuplexConnector;

/// Connection state, published on a watch channel for observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Active,
    Closed,
}

/// Drives the connection lifecycle for one surface.
pub struct SurfaceController {
    config: SurfaceConfig,
    surface: Arc<dyn RenderSurface>,
    input: Arc<dyn InputSource>,
    clipboard: Arc<dyn ClipboardSink>,
    connector: Arc<dyn DuplexConnector>,
    state_tx: watch::Sender<ConnectionState>,
}

impl SurfaceController {
    pub fn new(
        config: SurfaceConfig,
        surface: Arc<dyn RenderSurface>,
        input: Arc<dyn InputSource>,
        clipboard: Arc<dyn ClipboardSink>,
        connector: Arc<dyn DuplexConnector>,
    ) -> SurfaceController {
        let (state_tx, _) = watch::channel(ConnectionState::Closed);
        SurfaceController {
            config,
            surface,
            input,
            clipboard,
            connector,
            state_tx,
        }
    }

    /// Returns a receiver observing state transitions.
    pub fn state(&self) -> watch::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }

    /// Runs the controller until the connection closes with reconnection
    /// disabled.
    ///
    /// Context-menu suppression is installed once here, at configuration
    /// time: it belongs to the surface, not to any one connection, so a
    /// reconnect cannot lose it.
    pub async fn run(self) {
        if self.config.suppress_context_menu {
            self.input.suppress_context_menu();
        }
        loop {
            self.run_activation().await;
            if self.config.reconnect_interval.is_zero() {
                debug!("reconnect disabled; controller stays closed");
                break;
            }
            debug!(
                "reconnecting to {} in {:?}",
                self.config.endpoint, self.config.reconnect_interval
            );
            tokio::time::sleep(self.config.reconnect_interval).await;
        }
    }

    /// One full pass through Connecting → Active → Closed.
    async fn run_activation(&self) {
        let _ = self.state_tx.send(ConnectionState::Connecting);
        let mut session = match self.connector.connect(&self.config.endpoint).await {
            Ok(session) => session,
            Err(e) => {
                // A failed connect is treated like any other close.
                warn!("could not connect to {}: {e}", self.config.endpoint);
                let _ = self.state_tx.send(ConnectionState::Closed);
                return;
            }
        };

        info!("connected to {}", self.config.endpoint);
        let _ = self.state_tx.send(ConnectionState::Active);

        // The viewport is derived fresh on every activation; layout may
        // have changed while the connection was down.
        let rect = self.surface.bounding_rect();
        let (logical_width, logical_height) = self.surface.logical_size();
        let mut forwarder = InputForwarder::new(ViewportMapping {
            origin_x: rect.left,
            origin_y: rect.top,
            display_width: rect.width,
            display_height: rect.height,
            logical_width,
            logical_height,
        });

        // `occurrence_tx` stays alive for the whole activation so an empty
        // event mask leaves the channel open rather than ending the select
        // loop immediately.
        let (occurrence_tx, mut occurrence_rx) = mpsc::channel::<Occurrence>(128);
        let mut registry = attach_listeners(
            self.config.event_mask,
            &*self.input,
            Arc::clone(&self.clipboard),
            occurrence_tx.clone(),
        );

        loop {
            tokio::select! {
                occurrence = occurrence_rx.recv() => {
                    let Some(occurrence) = occurrence else { break };
                    if let Some(message) = forwarder.message_for(occurrence, Instant::now()) {
                        if let Err(e) = session.send(encode_input(&message)).await {
                            warn!("send failed: {e}");
                            break;
                        }
                    }
                }
                frame = session.recv() => {
                    match frame {
                        Some(Ok(bytes)) => {
                            if let Err(e) =
                                apply_draw_frame(&bytes, &*self.surface, &*self.clipboard)
                            {
                                warn!("malformed draw stream: {e}; closing connection");
                                break;
                            }
                        }
                        Some(Err(e)) => {
                            warn!("transport error: {e}");
                            break;
                        }
                        None => {
                            info!("connection to {} closed by peer", self.config.endpoint);
                            break;
                        }
                    }
                }
            }
        }

        registry.teardown(&*self.input);
        session.close().await;
        let _ = self.state_tx.send(ConnectionState::Closed);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
//
// Fine-grained lifecycle behavior (reconnect timing, mask attachment,
// teardown idempotence, end-to-end frames) lives in
// `tests/lifecycle_integration.rs`; these unit tests cover construction and
// state publication.
