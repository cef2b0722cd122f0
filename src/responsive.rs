use std::time::Duration;

use crate::platform::{Platform, TimerId};

pub const DEFAULT_MOBILE_BREAKPOINT: u32 = 700;

/// Quiet period after the last resize before the layout is recomputed.
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    Desktop,
    Mobile,
}

impl LayoutMode {
    /// Mobile at or below the breakpoint.
    pub fn detect(viewport_width: u32, breakpoint: u32) -> Self {
        if viewport_width <= breakpoint {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }

    pub fn is_mobile(self) -> bool {
        self == Self::Mobile
    }
}

/// Single-slot debounce timer: scheduling cancels whatever is pending, so at
/// most one recompute is ever outstanding.
#[derive(Debug, Default)]
pub struct ResizeDebounce {
    pending: Option<TimerId>,
}

impl ResizeDebounce {
    pub fn schedule(&mut self, platform: &dyn Platform) -> TimerId {
        self.cancel(platform);
        let id = platform.set_timeout(RESIZE_DEBOUNCE);
        self.pending = Some(id);
        id
    }

    /// Claim an expired timer. False for anything but the pending one.
    pub fn fire(&mut self, id: TimerId) -> bool {
        if self.pending == Some(id) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn cancel(&mut self, platform: &dyn Platform) {
        if let Some(id) = self.pending.take() {
            platform.clear_timeout(id);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
