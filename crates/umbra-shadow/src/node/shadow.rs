use crate::config::{ConfigChanges, ShadowConfig};
use crate::coords::{Point, Rect, Region};
use crate::device::ContextGuard;
use crate::error::ShadowResult;
use crate::geometry::{GeometrySnapshot, ShadowGeometry};
use crate::render::{DrawParams, PipelineState, RenderTarget, ShadowRenderer};

use super::{FrameEvent, FrameHost, Subscriptions};

// ── ShadowNode ────────────────────────────────────────────────────────────

/// The shadow effect attached to one frame.
pub struct ShadowNode {
    layout: NodeLayout,
    renderer: ShadowRenderer,
    subscriptions: Subscriptions,
}

impl ShadowNode {
    /// Builds the renderer, computes the initial geometry and subscribes to
    /// the frame's events.
    ///
    /// Nothing is subscribed when the renderer fails to build.
    pub fn new<H: FrameHost + ?Sized>(
        guard: &mut ContextGuard<'_>,
        host: &mut H,
        config: ShadowConfig,
    ) -> ShadowResult<Self> {
        let renderer = ShadowRenderer::new(guard, config.light_type)?;
        let layout = NodeLayout::new(config, host.frame_geometry());
        let subscriptions = Subscriptions::subscribe_all(host);

        Ok(Self { layout, renderer, subscriptions })
    }

    #[inline]
    pub fn config(&self) -> &ShadowConfig {
        &self.layout.config
    }

    /// Frame-local rectangles.
    #[inline]
    pub fn geometry(&self) -> &GeometrySnapshot {
        self.layout.geometry.snapshot()
    }

    /// Global-space conservative bound of every pixel the effect may touch.
    #[inline]
    pub fn bounding_box(&self) -> Rect {
        self.layout.bounding_box
    }

    /// Global-space damage region.
    #[inline]
    pub fn region(&self) -> &Region {
        &self.layout.region
    }

    #[inline]
    pub fn pipeline_state(&self) -> PipelineState {
        self.renderer.state()
    }

    /// Reacts to a subscribed event.
    pub fn handle_event<H: FrameHost + ?Sized>(&mut self, host: &mut H, event: FrameEvent) {
        self.layout.handle_event(host, event);
    }

    /// Applies a live option reload.
    ///
    /// Geometry-affecting changes recompute the rectangles, a light model
    /// change recompiles the programs, and any change repaints the old and
    /// new bounds. A failed recompile is returned after the damage is
    /// scheduled; the node then draws nothing until a later reload succeeds.
    pub fn apply_config<H: FrameHost + ?Sized>(
        &mut self,
        guard: &mut ContextGuard<'_>,
        host: &mut H,
        config: ShadowConfig,
    ) -> ShadowResult<ConfigChanges> {
        let changes = self.layout.apply_config(host, config);
        if changes.shaders {
            self.renderer.recompile(guard, self.layout.config.light_type)?;
        }
        Ok(changes)
    }

    /// Draws the effect for one compositing pass.
    ///
    /// `damage` holds global rectangles; each is clipped to the effect region
    /// and the target before drawing. `focused` gates the glow.
    pub fn render<I>(
        &mut self,
        guard: &mut ContextGuard<'_>,
        target: &RenderTarget<'_>,
        damage: I,
        focused: bool,
    ) where
        I: IntoIterator<Item = Rect>,
    {
        let params = DrawParams::new(
            &self.layout.config,
            self.layout.geometry.snapshot(),
            self.layout.frame_origin,
            target.viewport,
            focused,
        );
        let scissors = self.layout.clip_damage(damage);
        self.renderer.render_damage(guard, target, &params, scissors);
    }

    /// Tears the node down with its frame: unsubscribes and releases GPU
    /// resources inside `guard`.
    pub fn destroy<H: FrameHost + ?Sized>(mut self, guard: &mut ContextGuard<'_>, host: &mut H) {
        self.subscriptions.release(host);
        self.renderer.destroy(guard);
    }
}

impl Drop for ShadowNode {
    fn drop(&mut self) {
        if !self.subscriptions.is_empty() {
            log::warn!("shadow node dropped while still subscribed to its frame");
        }
    }
}

// ── NodeLayout ────────────────────────────────────────────────────────────

/// CPU-side state of a node: options, frame placement and derived bounds.
#[derive(Debug, Clone)]
struct NodeLayout {
    config: ShadowConfig,
    geometry: ShadowGeometry,
    /// Global position of the frame's top-left corner.
    frame_origin: Point,
    /// `outer` in global space.
    bounding_box: Rect,
    /// Damage region in global space.
    region: Region,
}

impl NodeLayout {
    fn new(config: ShadowConfig, frame: Rect) -> Self {
        let geometry = ShadowGeometry::new(&config, frame.width, frame.height);
        let mut layout = Self {
            config,
            geometry,
            frame_origin: frame.origin(),
            bounding_box: Rect::default(),
            region: Region::new(),
        };
        layout.place();
        layout
    }

    fn handle_event<H: FrameHost + ?Sized>(&mut self, host: &mut H, event: FrameEvent) {
        match event {
            FrameEvent::GeometryChanged => {
                let old = self.bounding_box;
                self.update_geometry(host.frame_geometry());
                damage_bounds(host, old, self.bounding_box);
            }
            FrameEvent::ActivationChanged => {
                log::trace!("frame activation now {}", host.is_activated());
                host.damage(self.bounding_box);
            }
        }
    }

    fn apply_config<H: FrameHost + ?Sized>(&mut self, host: &mut H, config: ShadowConfig) -> ConfigChanges {
        let changes = config.changes_since(&self.config);
        if changes.is_empty() {
            return changes;
        }

        let old = self.bounding_box;
        self.config = config;
        if changes.geometry {
            self.geometry.refresh(&self.config);
            self.place();
        }
        damage_bounds(host, old, self.bounding_box);
        changes
    }

    fn update_geometry(&mut self, frame: Rect) {
        self.geometry.resize(&self.config, frame.width, frame.height);
        self.frame_origin = frame.origin();
        self.place();
    }

    /// Moves the frame-local snapshot into global space.
    fn place(&mut self) {
        self.bounding_box = self.geometry.bounding_box() + self.frame_origin;
        self.region = self.geometry.calculate_region().translated(self.frame_origin);
    }

    /// Splits global damage into the parts that overlap the effect region.
    fn clip_damage<I: IntoIterator<Item = Rect>>(&self, damage: I) -> Vec<Rect> {
        damage
            .into_iter()
            .flat_map(|rect| self.region.clone() & rect)
            .collect()
    }
}

fn damage_bounds<H: FrameHost + ?Sized>(host: &mut H, old: Rect, new: Rect) {
    host.damage(old);
    if new != old {
        host.damage(new);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LightType;
    use crate::node::host::tests::MockHost;

    fn config() -> ShadowConfig {
        ShadowConfig {
            shadow_radius: 10,
            clip_shadow_inside: true,
            glow_enabled: false,
            ..Default::default()
        }
    }

    #[test]
    fn bounds_are_global() {
        let layout = NodeLayout::new(config(), Rect::new(100, 50, 200, 100));
        assert_eq!(layout.bounding_box, Rect::new(90, 40, 220, 120));
        assert_eq!(layout.region.extents(), Some(layout.bounding_box));
        assert!(!layout.region.contains(Point::new(150, 100)));
    }

    #[test]
    fn geometry_event_recomputes_and_damages_old_and_new() {
        let mut host = MockHost::with_geometry(Rect::new(0, 0, 200, 100));
        let mut layout = NodeLayout::new(config(), host.geometry);

        host.geometry = Rect::new(30, 40, 100, 60);
        layout.handle_event(&mut host, FrameEvent::GeometryChanged);

        assert_eq!(layout.frame_origin, Point::new(30, 40));
        assert_eq!(layout.geometry.frame_size(), (100, 60));
        assert_eq!(
            host.damaged,
            vec![Rect::new(-10, -10, 220, 120), Rect::new(20, 30, 120, 80)],
        );
    }

    #[test]
    fn activation_event_only_damages() {
        let mut host = MockHost::with_geometry(Rect::new(0, 0, 200, 100));
        let mut layout = NodeLayout::new(config(), host.geometry);
        let before = *layout.geometry.snapshot();

        host.activated = true;
        layout.handle_event(&mut host, FrameEvent::ActivationChanged);

        assert_eq!(layout.geometry.snapshot(), &before);
        assert_eq!(host.damaged, vec![Rect::new(-10, -10, 220, 120)]);
    }

    #[test]
    fn config_reload_grows_bounds_for_glow() {
        let mut host = MockHost::with_geometry(Rect::new(0, 0, 200, 100));
        let mut layout = NodeLayout::new(config(), host.geometry);

        let glowing = ShadowConfig { glow_enabled: true, glow_radius_limit: 20, ..config() };
        let changes = layout.apply_config(&mut host, glowing);

        assert!(changes.geometry);
        assert_eq!(layout.bounding_box, Rect::new(-20, -20, 240, 140));
        assert_eq!(host.damaged.len(), 2);
    }

    #[test]
    fn color_reload_keeps_geometry_and_repaints_once() {
        let mut host = MockHost::with_geometry(Rect::new(0, 0, 200, 100));
        let mut layout = NodeLayout::new(config(), host.geometry);

        let recolored = ShadowConfig { glow_spread: 3.0, ..config() };
        let changes = layout.apply_config(&mut host, recolored);

        assert!(!changes.geometry && !changes.shaders && changes.repaint);
        assert_eq!(host.damaged, vec![Rect::new(-10, -10, 220, 120)]);
    }

    #[test]
    fn unchanged_reload_is_silent() {
        let mut host = MockHost::with_geometry(Rect::new(0, 0, 200, 100));
        let mut layout = NodeLayout::new(config(), host.geometry);

        let changes = layout.apply_config(&mut host, config());
        assert!(changes.is_empty());
        assert!(host.damaged.is_empty());
    }

    #[test]
    fn light_change_is_reported_for_recompile() {
        let mut host = MockHost::with_geometry(Rect::new(0, 0, 10, 10));
        let mut layout = NodeLayout::new(config(), host.geometry);

        let linear = ShadowConfig { light_type: LightType::Linear, ..config() };
        let changes = layout.apply_config(&mut host, linear);
        assert!(changes.shaders);
        assert_eq!(layout.config.light_type, LightType::Linear);
    }

    #[test]
    fn damage_is_clipped_to_region() {
        let layout = NodeLayout::new(config(), Rect::new(0, 0, 200, 100));

        // Damage fully inside the frame touches nothing with clipping on.
        assert!(layout.clip_damage([Rect::new(50, 20, 10, 10)]).is_empty());

        // Damage straddling the left edge keeps only the shadow strip.
        let clipped = layout.clip_damage([Rect::new(-20, 20, 40, 10)]);
        assert_eq!(clipped, vec![Rect::new(-10, 20, 10, 10)]);
    }
}
