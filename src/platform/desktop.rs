use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashSet};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::dom::{self, ListenerId, NodeRef, Selector};
use crate::error::PlatformError;
use crate::platform::{Platform, TimerId};

/// Platform backing the desktop host.
///
/// Timeouts are queued here and turned into async sleeps by the host after
/// each update; the host asks [`DesktopPlatform::consume_timer`] before
/// delivering an expiry so cleared timeouts never reach the widget.
pub struct DesktopPlatform {
    document: NodeRef,
    width: Cell<u32>,
    next_timer: Cell<u64>,
    scheduled: RefCell<Vec<(TimerId, Duration)>>,
    live_timers: RefCell<HashSet<TimerId>>,
    resize_listeners: RefCell<BTreeSet<ListenerId>>,
}

impl DesktopPlatform {
    pub fn new(document: NodeRef, width: u32) -> Self {
        Self {
            document,
            width: Cell::new(width),
            next_timer: Cell::new(1),
            scheduled: RefCell::new(Vec::new()),
            live_timers: RefCell::new(HashSet::new()),
            resize_listeners: RefCell::new(BTreeSet::new()),
        }
    }

    pub fn set_viewport_width(&self, width: u32) {
        self.width.set(width);
    }

    pub fn has_resize_listeners(&self) -> bool {
        !self.resize_listeners.borrow().is_empty()
    }

    /// Drain timeouts scheduled since the last call.
    pub fn take_scheduled(&self) -> Vec<(TimerId, Duration)> {
        std::mem::take(&mut *self.scheduled.borrow_mut())
    }

    /// Mark a timeout as expired. Returns false if it was cleared meanwhile.
    pub fn consume_timer(&self, id: TimerId) -> bool {
        self.live_timers.borrow_mut().remove(&id)
    }
}

impl Platform for DesktopPlatform {
    fn viewport_width(&self) -> u32 {
        self.width.get()
    }

    fn query_selector(&self, selector: &Selector) -> Option<NodeRef> {
        dom::query_selector(&self.document, selector)
    }

    fn add_resize_listener(&self, id: ListenerId) {
        self.resize_listeners.borrow_mut().insert(id);
    }

    fn remove_resize_listener(&self, id: ListenerId) {
        self.resize_listeners.borrow_mut().remove(&id);
    }

    fn set_timeout(&self, delay: Duration) -> TimerId {
        let id = TimerId(self.next_timer.get());
        self.next_timer.set(id.0 + 1);
        self.live_timers.borrow_mut().insert(id);
        self.scheduled.borrow_mut().push((id, delay));
        id
    }

    fn clear_timeout(&self, id: TimerId) {
        self.live_timers.borrow_mut().remove(&id);
        self.scheduled.borrow_mut().retain(|(t, _)| *t != id);
    }

    fn open_external(&self, url: &str) -> Result<(), PlatformError> {
        let mut command = opener_command(url);
        tracing::info!("Opening {} with {:?}", url, command.get_program());

        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|child| {
                reap(child);
            })
            .map_err(|source| PlatformError::Open {
                url: url.to_string(),
                source,
            })
    }
}

/// Wait for the opener on a background thread. Unwaited children stay
/// zombies until the host exits.
fn reap(mut child: Child) -> Option<JoinHandle<()>> {
    let spawned = thread::Builder::new()
        .name("opener-reaper".to_string())
        .spawn(move || match child.wait() {
            Ok(status) if !status.success() => {
                tracing::warn!("Opener exited with {}", status);
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("Failed to wait for opener: {}", e),
        });
    match spawned {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!("Failed to start opener reaper: {}", e);
            None
        }
    }
}

/// The system command that hands a URL to the default browser.
fn opener_command(url: &str) -> Command {
    if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(url);
        cmd
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        // `start` treats the first quoted argument as a window title
        cmd.args(["/C", "start", ""]).arg(url);
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(url);
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;

    fn platform() -> DesktopPlatform {
        let document = Element::new("body")
            .with_child(Element::new("div").with_attr("id", "root"))
            .into_ref();
        DesktopPlatform::new(document, 1024)
    }

    #[test]
    fn test_cleared_timeouts_are_not_delivered() {
        let platform = platform();
        let first = platform.set_timeout(Duration::from_millis(150));
        let second = platform.set_timeout(Duration::from_millis(150));
        platform.clear_timeout(first);

        assert_eq!(
            platform.take_scheduled(),
            vec![(second, Duration::from_millis(150))]
        );
        assert!(platform.take_scheduled().is_empty());

        assert!(!platform.consume_timer(first));
        assert!(platform.consume_timer(second));
        assert!(!platform.consume_timer(second));
    }

    #[test]
    fn test_resize_listener_registration() {
        let platform = platform();
        let id = ListenerId::next();
        assert!(!platform.has_resize_listeners());
        platform.add_resize_listener(id);
        assert!(platform.has_resize_listeners());
        platform.remove_resize_listener(id);
        assert!(!platform.has_resize_listeners());
    }

    #[test]
    fn test_query_and_width() {
        let platform = platform();
        assert!(platform.query_selector(&"#root".parse().unwrap()).is_some());
        assert_eq!(platform.viewport_width(), 1024);
        platform.set_viewport_width(640);
        assert_eq!(platform.viewport_width(), 640);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_finished_opener_is_waited_for() {
        let child = Command::new("true").spawn().unwrap();
        let pid = child.id();
        reap(child).unwrap().join().unwrap();

        // A reaped child no longer exists, not even as a zombie.
        assert!(!std::path::Path::new(&format!("/proc/{pid}")).exists());
    }
}
