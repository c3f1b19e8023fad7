//! Host glue.
//!
//! A [`ShadowNode`] lives exactly as long as the frame it decorates. It keeps
//! the geometry in sync with the host's frame through an explicit
//! subscribe/notify interface and exposes global-space bounds, damage region
//! and a per-pass render entry point.
//!
//! # Lifecycle
//!
//! 1. [`ShadowNode::new`] subscribes to [`FrameEvent::GeometryChanged`] and
//!    [`FrameEvent::ActivationChanged`] and builds the renderer.
//! 2. The host forwards each event to [`ShadowNode::handle_event`].
//! 3. [`ShadowNode::destroy`] unsubscribes both events and releases GPU
//!    resources inside the caller's GPU scope.

mod host;
mod shadow;

pub use host::{FrameEvent, FrameHost, Subscription, Subscriptions};
pub use shadow::ShadowNode;
