//! Geometry engine.
//!
//! Pure derivation of the effect's nested rectangles and damage region from a
//! frame size and a [`ShadowConfig`](crate::config::ShadowConfig). No GPU state.
//!
//! Every rectangle lives in frame-local space: `(0, 0)` is the frame's
//! top-left corner.

mod snapshot;

pub use snapshot::{GeometrySnapshot, ShadowGeometry};
