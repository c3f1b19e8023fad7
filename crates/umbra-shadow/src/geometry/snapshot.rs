use crate::config::ShadowConfig;
use crate::coords::{Point, Rect, Region};

/// The five rectangles bounding the effect, plus the clip flag the damage
/// region depends on.
///
/// Nesting: `frame → shadow_projection → {shadow, glow} → outer`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct GeometrySnapshot {
    /// The frame itself at `(0, 0)`.
    pub frame: Rect,
    /// `frame` inflated by the overscale and moved by the offset.
    pub shadow_projection: Rect,
    /// `shadow_projection` grown by the shadow radius.
    pub shadow: Rect,
    /// `shadow_projection` grown by the glow radius limit (zero when glow is off).
    pub glow: Rect,
    /// Bounding union of `shadow` and `glow`.
    pub outer: Rect,
    /// Copied from the config; selects XOR clipping of the frame in the region.
    pub clip_shadow_inside: bool,
}

impl GeometrySnapshot {
    /// Derives the snapshot for a `width × height` frame.
    pub fn compute(config: &ShadowConfig, width: i32, height: i32) -> Self {
        let frame = Rect::from_size(width, height);

        let overscale = config.overscale / 100.0;
        let offset = Point::new(config.horizontal_offset, config.vertical_offset);
        let shadow_projection = frame.inflate(overscale) + offset;

        let shadow = shadow_projection.expand_uniform(config.shadow_radius);
        let glow = shadow_projection.expand_uniform(config.effective_glow_radius());
        let outer = shadow.bounding_union(glow);

        Self {
            frame,
            shadow_projection,
            shadow,
            glow,
            outer,
            clip_shadow_inside: config.clip_shadow_inside,
        }
    }

    /// Pixels the effect may touch, as non-overlapping rectangles.
    ///
    /// `shadow ∪ glow`, XORed with `frame` when clipping is on. The XOR keeps
    /// frame pixels that stick out of the effect area.
    pub fn region(&self) -> Region {
        let mut region = Region::from(self.shadow) | self.glow;
        if self.clip_shadow_inside {
            region ^= self.frame;
        }
        region
    }
}

/// Holds the current frame size and the snapshot derived from it.
#[derive(Debug, Clone, Default)]
pub struct ShadowGeometry {
    width: i32,
    height: i32,
    snapshot: GeometrySnapshot,
}

impl ShadowGeometry {
    pub fn new(config: &ShadowConfig, width: i32, height: i32) -> Self {
        let mut geometry = Self::default();
        geometry.resize(config, width, height);
        geometry
    }

    /// Recomputes every rectangle for a new frame size.
    pub fn resize(&mut self, config: &ShadowConfig, width: i32, height: i32) -> GeometrySnapshot {
        self.width = width;
        self.height = height;
        self.snapshot = GeometrySnapshot::compute(config, width, height);
        self.snapshot
    }

    /// Recomputes with the last known frame size (after an option change).
    pub fn refresh(&mut self, config: &ShadowConfig) -> GeometrySnapshot {
        self.resize(config, self.width, self.height)
    }

    #[inline]
    pub fn snapshot(&self) -> &GeometrySnapshot {
        &self.snapshot
    }

    #[inline]
    pub fn frame_size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    pub fn calculate_region(&self) -> Region {
        self.snapshot.region()
    }

    /// Conservative frame-local bound of everything the renderer may touch.
    #[inline]
    pub fn bounding_box(&self) -> Rect {
        self.snapshot.outer
    }
}
