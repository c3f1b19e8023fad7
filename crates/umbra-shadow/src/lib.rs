//! Umbra shadow crate.
//!
//! Drop-shadow and glow decoration for compositor window frames: the pure
//! geometry engine that sizes the effect and its damage region, and the wgpu
//! pipeline that draws it with premultiplied alpha.
//!
//! Typical host flow:
//! 1. Create a [`device::GpuContext`] (or wrap the compositor's device).
//! 2. Build a [`ShadowNode`] per frame inside a [`device::ContextGuard`].
//! 3. Forward frame events, option reloads and compositing passes to it.

pub mod config;
pub mod coords;
pub mod device;
pub mod geometry;
pub mod node;
pub mod paint;
pub mod render;

pub mod logging;
mod error;

pub use config::{LightType, ShadowConfig};
pub use error::{ShadowError, ShadowResult};
pub use geometry::{GeometrySnapshot, ShadowGeometry};
pub use node::{FrameEvent, FrameHost, ShadowNode};
