//! GPU device management.
//!
//! This module is responsible for:
//! - owning the wgpu Device/Queue the shadow renderer draws with
//! - scoping every resource mutation and draw inside a [`ContextGuard`]
//! - creating offscreen render targets for headless hosts and tests

mod context;
mod init;
mod target;

pub use context::{ContextGuard, GpuContext};
pub use init::GpuInit;
pub use target::OffscreenTarget;
