//! # canvas-client
//!
//! The client half of the remote-canvas protocol: paints pixel blocks pushed
//! by a remote draw host onto a rendering surface, and forwards local input
//! occurrences (pointer, keyboard, touch, clipboard changes) back to the
//! host as compact binary messages on the same duplex connection.
//!
//! # Architecture
//!
//! ```text
//! SurfaceController (lifecycle.rs)     -- one per configured surface
//!  ├─ DuplexConnector / DuplexSession  -- WebSocket transport seam
//!  ├─ ListenerRegistry (application)   -- attaches masked event kinds
//!  │    └─ clipboard poll task         -- 1 s change detection
//!  ├─ InputForwarder (application)     -- debounce + viewport + encode
//!  └─ apply_draw (application)         -- DrawStream → surface / clipboard
//! ```
//!
//! The host environment is represented by trait seams in `infrastructure`:
//! the rendering surface, the input-occurrence source, the clipboard sink,
//! and the duplex transport. In-memory implementations back the headless
//! binary and the test suite; the WebSocket connector is the production
//! transport.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod lifecycle;

pub use domain::config::{PageConfig, SurfaceConfig};
pub use lifecycle::{ConnectionState, SurfaceController};
