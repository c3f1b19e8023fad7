//! Shadow options.
//!
//! Storage and loading belong to the host; this module only defines the value
//! set, its defaults and how a live reload should be acted upon.

mod light;
mod options;

pub use light::LightType;
pub use options::{ConfigChanges, ShadowConfig};
