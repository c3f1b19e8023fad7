//! Coordinate and geometry types shared by the geometry engine, the renderer
//! and the host glue.
//!
//! Canonical space:
//! - Integer pixels
//! - Origin top-left
//! - +X right, +Y down
//!
//! Shadow geometry is expressed relative to the frame's top-left corner; the
//! node translates it into global (compositor) space before handing it out.

mod point;
mod rect;
mod region;
mod viewport;

pub use point::Point;
pub use rect::Rect;
pub use region::Region;
pub use viewport::Viewport;
