use super::{Point, Rect};

/// Render-target placement in global (compositor) pixels.
///
/// `origin` is the global position of the target's top-left texel, so a global
/// coordinate `p` lands at texel `p - origin`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    pub origin: Point,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { origin: Point::zero(), width, height }
    }

    #[inline]
    pub const fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Target area in global coordinates.
    #[inline]
    pub fn global_rect(self) -> Rect {
        Rect::new(
            self.origin.x,
            self.origin.y,
            self.width.min(i32::MAX as u32) as i32,
            self.height.min(i32::MAX as u32) as i32,
        )
    }

    /// Converts a global damage rect into wgpu scissor arguments `(x, y, w, h)`
    /// in target texels, clamped to the target.
    ///
    /// Returns `None` when nothing of `rect` is visible (caller skips the draw).
    pub fn scissor_for(self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let visible = rect.intersect(self.global_rect())?;
        let local = visible - self.origin;
        Some((
            local.x as u32,
            local.y as u32,
            local.width as u32,
            local.height as u32,
        ))
    }
}
