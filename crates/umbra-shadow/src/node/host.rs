use crate::coords::Rect;

/// Edge-triggered notifications a node can subscribe to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum FrameEvent {
    /// Frame moved or resized.
    GeometryChanged,
    /// Frame gained or lost focus.
    ActivationChanged,
}

impl FrameEvent {
    pub const ALL: [FrameEvent; 2] = [FrameEvent::GeometryChanged, FrameEvent::ActivationChanged];
}

/// Token returned by [`FrameHost::subscribe`]; hand it back to unsubscribe.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Subscription {
    pub event: FrameEvent,
    pub id: u64,
}

/// What the shadow needs from the compositor's representation of a frame.
///
/// Queries are pulled on demand; changes are announced through subscribed
/// [`FrameEvent`]s which the host delivers to
/// [`ShadowNode::handle_event`](super::ShadowNode::handle_event).
pub trait FrameHost {
    /// Frame bounds in global coordinates.
    fn frame_geometry(&self) -> Rect;

    /// Whether the frame currently has focus.
    fn is_activated(&self) -> bool;

    fn subscribe(&mut self, event: FrameEvent) -> Subscription;

    fn unsubscribe(&mut self, subscription: Subscription);

    /// Schedules a repaint of a global rectangle.
    fn damage(&mut self, rect: Rect);
}

/// Subscriptions held by one node, released exactly once.
#[derive(Debug, Default)]
pub struct Subscriptions {
    active: Vec<Subscription>,
}

impl Subscriptions {
    /// Subscribes to every [`FrameEvent`].
    pub fn subscribe_all<H: FrameHost + ?Sized>(host: &mut H) -> Self {
        Self {
            active: FrameEvent::ALL.into_iter().map(|e| host.subscribe(e)).collect(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, Subscription> {
        self.active.iter()
    }

    /// Unsubscribes everything; a second call does nothing.
    pub fn release<H: FrameHost + ?Sized>(&mut self, host: &mut H) {
        for subscription in self.active.drain(..) {
            host.unsubscribe(subscription);
        }
    }
}
