pub mod desktop;

use std::time::Duration;

use crate::dom::{ListenerId, NodeRef, Selector};
use crate::error::PlatformError;

/// Handle for a pending timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Capabilities the widget needs from its host environment.
///
/// Everything here is called from the host's UI thread; implementations use
/// interior mutability rather than `&mut self` so the host and the widget can
/// share one instance through `Rc`.
pub trait Platform {
    /// Current viewport width in pixels.
    fn viewport_width(&self) -> u32;

    /// Resolve a selector against the host document.
    fn query_selector(&self, selector: &Selector) -> Option<NodeRef>;

    /// Start delivering window resize notifications to the listener. The
    /// host forwards them through `OrderTracking::handle_resize`.
    fn add_resize_listener(&self, id: ListenerId);

    fn remove_resize_listener(&self, id: ListenerId);

    /// Schedule a one-shot timeout. The host reports expiry through
    /// `OrderTracking::handle_timer`.
    fn set_timeout(&self, delay: Duration) -> TimerId;

    fn clear_timeout(&self, id: TimerId);

    /// Open `url` in a new browsing context.
    fn open_external(&self, url: &str) -> Result<(), PlatformError>;
}
