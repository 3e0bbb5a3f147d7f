//! Application use cases: subscription management, input forwarding, and
//! draw-command application.

pub mod apply_draw;
pub mod forward_input;
pub mod subscriptions;

pub use apply_draw::apply_draw_frame;
pub use forward_input::InputForwarder;
pub use subscriptions::{attach_listeners, ListenerRegistry};
