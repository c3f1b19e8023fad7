//! Drives the renderer on a real wgpu device.
//!
//! Skips (with a note on stderr) when the machine exposes no adapter.

use umbra_shadow::coords::{Point, Rect};
use umbra_shadow::device::{GpuContext, GpuInit, OffscreenTarget};
use umbra_shadow::logging::{init_logging, LoggingConfig};
use umbra_shadow::node::Subscription;
use umbra_shadow::paint::ColorRgba;
use umbra_shadow::render::{PipelineState, RenderTarget};
use umbra_shadow::{FrameEvent, FrameHost, LightType, ShadowConfig, ShadowError, ShadowNode};

const WIDTH: u32 = 256;
const HEIGHT: u32 = 128;

#[derive(Default)]
struct TestFrame {
    geometry: Rect,
    activated: bool,
    next_id: u64,
    live: Vec<Subscription>,
    damaged: Vec<Rect>,
}

impl FrameHost for TestFrame {
    fn frame_geometry(&self) -> Rect {
        self.geometry
    }

    fn is_activated(&self) -> bool {
        self.activated
    }

    fn subscribe(&mut self, event: FrameEvent) -> Subscription {
        self.next_id += 1;
        let s = Subscription { event, id: self.next_id };
        self.live.push(s);
        s
    }

    fn unsubscribe(&mut self, subscription: Subscription) {
        self.live.retain(|s| *s != subscription);
    }

    fn damage(&mut self, rect: Rect) {
        self.damaged.push(rect);
    }
}

fn context() -> Option<GpuContext> {
    init_logging(LoggingConfig { is_test: true, ..Default::default() });

    let fallback = GpuInit {
        force_fallback_adapter: true,
        ..Default::default()
    };
    let ctx = GpuContext::headless_blocking(fallback)
        .or_else(|_| GpuContext::headless_blocking(GpuInit::default()));
    match ctx {
        Ok(ctx) => Some(ctx),
        Err(err) => {
            eprintln!("skipping headless test: {err:#}");
            None
        }
    }
}

fn alpha_at(pixels: &[u8], x: u32, y: u32) -> u8 {
    pixels[((y * WIDTH + x) * 4 + 3) as usize]
}

fn config() -> ShadowConfig {
    ShadowConfig {
        shadow_radius: 10,
        glow_radius_limit: 10,
        ..Default::default()
    }
}

#[test]
fn draws_shadow_outside_frame_only() {
    let Some(mut ctx) = context() else { return };
    let mut frame = TestFrame {
        geometry: Rect::new(28, 14, 200, 100),
        ..Default::default()
    };

    let mut guard = ctx.acquire();
    let target = OffscreenTarget::new(&mut guard, WIDTH, HEIGHT);
    let mut node = ShadowNode::new(&mut guard, &mut frame, config()).expect("node");
    assert_eq!(frame.live.len(), 2);
    assert_eq!(node.pipeline_state(), PipelineState::Ready);
    assert_eq!(node.bounding_box(), Rect::new(18, 4, 220, 120));

    let rt = RenderTarget::new(&target.view, target.viewport);
    node.render(&mut guard, &rt, [target.viewport.global_rect()], false);
    let pixels = target.read_pixels(&mut guard).expect("readback");

    // Two texels left of the frame sit inside the penumbra.
    assert!(alpha_at(&pixels, 26, 64) > 0);
    // The frame interior is clipped out of the region.
    assert_eq!(alpha_at(&pixels, 128, 64), 0);
    // Beyond the effect bounds nothing is touched.
    assert_eq!(alpha_at(&pixels, 2, 2), 0);

    node.destroy(&mut guard, &mut frame);
    assert!(frame.live.is_empty());
}

#[test]
fn dithered_texels_stay_premultiplied() {
    let Some(mut ctx) = context() else { return };
    let mut frame = TestFrame {
        geometry: Rect::new(28, 14, 200, 100),
        ..Default::default()
    };
    let tinted = ShadowConfig {
        shadow_color: ColorRgba::from_u8(255, 128, 0, 0x30),
        ..config()
    };

    let mut guard = ctx.acquire();
    let target = OffscreenTarget::new(&mut guard, WIDTH, HEIGHT);
    let mut node = ShadowNode::new(&mut guard, &mut frame, tinted).expect("node");

    let rt = RenderTarget::new(&target.view, target.viewport);
    node.render(&mut guard, &rt, [target.viewport.global_rect()], false);
    let pixels = target.read_pixels(&mut guard).expect("readback");

    assert!(pixels.chunks(4).any(|px| px[3] > 0));
    for px in pixels.chunks(4) {
        let a = px[3];
        assert!(px[0] <= a && px[1] <= a && px[2] <= a, "{px:?} is not premultiplied");
    }

    node.destroy(&mut guard, &mut frame);
}

#[test]
fn calls_in_one_scope_draw_each_viewport() {
    let Some(mut ctx) = context() else { return };
    let mut frame = TestFrame {
        geometry: Rect::new(28, 14, 200, 100),
        ..Default::default()
    };

    let mut guard = ctx.acquire();
    let left = OffscreenTarget::new(&mut guard, WIDTH, HEIGHT);
    let mut right = OffscreenTarget::new(&mut guard, WIDTH, HEIGHT);
    right.viewport = right.viewport.with_origin(Point::new(100, 0));
    let mut node = ShadowNode::new(&mut guard, &mut frame, config()).expect("node");

    for target in [&left, &right] {
        let rt = RenderTarget::new(&target.view, target.viewport);
        node.render(&mut guard, &rt, [target.viewport.global_rect()], false);
    }

    // Right edge of the frame is at x = 228; the strip past it belongs to
    // the left target's own draw.
    let pixels = left.read_pixels(&mut guard).expect("readback");
    assert!(alpha_at(&pixels, 230, 64) > 0);

    // The same global strip lands at x = 130 in the shifted target.
    let pixels = right.read_pixels(&mut guard).expect("readback");
    assert!(alpha_at(&pixels, 130, 64) > 0);
    assert_eq!(alpha_at(&pixels, 60, 64), 0);

    node.destroy(&mut guard, &mut frame);
}

#[test]
fn damage_outside_region_leaves_target_untouched() {
    let Some(mut ctx) = context() else { return };
    let mut frame = TestFrame {
        geometry: Rect::new(28, 14, 200, 100),
        ..Default::default()
    };

    let mut guard = ctx.acquire();
    let target = OffscreenTarget::new(&mut guard, WIDTH, HEIGHT);
    let mut node = ShadowNode::new(&mut guard, &mut frame, config()).expect("node");

    let rt = RenderTarget::new(&target.view, target.viewport);
    node.render(&mut guard, &rt, [Rect::new(60, 40, 20, 20)], false);
    let pixels = target.read_pixels(&mut guard).expect("readback");
    assert!(pixels.iter().all(|&b| b == 0));

    node.destroy(&mut guard, &mut frame);
}

#[test]
fn focus_reload_and_teardown() {
    let Some(mut ctx) = context() else { return };
    let mut frame = TestFrame {
        geometry: Rect::new(28, 14, 200, 100),
        ..Default::default()
    };

    let mut guard = ctx.acquire();
    let target = OffscreenTarget::new(&mut guard, WIDTH, HEIGHT);
    let mut node = ShadowNode::new(&mut guard, &mut frame, config()).expect("node");
    let rt = RenderTarget::new(&target.view, target.viewport);

    // Glow grows the bounds once enabled.
    let glowing = ShadowConfig { glow_enabled: true, glow_radius_limit: 20, ..config() };
    let changes = node.apply_config(&mut guard, &mut frame, glowing).expect("reload");
    assert!(changes.geometry);
    assert_eq!(node.bounding_box(), Rect::new(8, -6, 240, 140));

    frame.activated = true;
    node.handle_event(&mut frame, FrameEvent::ActivationChanged);
    node.render(&mut guard, &rt, [target.viewport.global_rect()], frame.activated);

    for light in LightType::ALL {
        let next = ShadowConfig { light_type: light, ..node.config().clone() };
        node.apply_config(&mut guard, &mut frame, next).expect("recompile");
        assert_eq!(node.pipeline_state(), PipelineState::Ready);
        node.render(&mut guard, &rt, [target.viewport.global_rect()], true);
    }

    frame.geometry = Rect::new(40, 20, 100, 60);
    node.handle_event(&mut frame, FrameEvent::GeometryChanged);
    assert_eq!(node.geometry().frame, Rect::new(0, 0, 100, 60));

    let pixels = target.read_pixels(&mut guard).expect("readback");
    assert_eq!(pixels.len(), (WIDTH * HEIGHT * 4) as usize);

    node.destroy(&mut guard, &mut frame);
    assert!(frame.live.is_empty());
}

#[test]
fn destroyed_renderer_refuses_recompile() {
    let Some(mut ctx) = context() else { return };
    let mut guard = ctx.acquire();

    let mut renderer =
        umbra_shadow::render::ShadowRenderer::new(&mut guard, LightType::Box).expect("renderer");
    renderer.destroy(&mut guard);
    renderer.destroy(&mut guard);

    assert_eq!(renderer.state(), PipelineState::Destroyed);
    assert!(matches!(
        renderer.recompile(&mut guard, LightType::Linear),
        Err(ShadowError::PipelineDestroyed)
    ));
}
