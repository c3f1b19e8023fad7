//! Color handling.
//!
//! Options carry straight-alpha colors; the shader consumes premultiplied
//! ones so the `One, OneMinusSrcAlpha` blend state can mix normal and
//! additive contributions in a single pass.

mod color;

pub use color::{ColorRgba, PremulColor};
