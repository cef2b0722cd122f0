//! The order tracking widget.
//!
//! Lifecycle: [`OrderTracking::new`] resolves options and mounts (render,
//! wire listeners, mark ready, refresh UI, listen for resizes). Events from
//! the host come in through [`OrderTracking::dispatch`],
//! [`OrderTracking::handle_resize`] and [`OrderTracking::handle_timer`].
//! [`OrderTracking::destroy`] undoes the mount and may be followed by
//! [`OrderTracking::init`] to mount again.

pub mod events;
pub mod render;


use std::rc::Rc;
use std::sync::Arc;

use crate::api::{self, ApiReply, TrackingApi};
use crate::dom::{self, DomEvent, ListenerId, NodeRef, Selector};
use crate::error::{ConfigError, FetchError, TrackingError};
use crate::options::{normalize_breakpoint, Callbacks, ConfigUpdate, Options, ResolvedConfig};
use crate::platform::{Platform, TimerId};
use crate::responsive::{LayoutMode, ResizeDebounce};
use crate::search::{self, Failure, SearchPhase, SearchRequest, Verdict};

use events::{Handler, Listeners};
use render::{Role, SEARCH_BOX_ERROR_CLASS, VISIBLE_CLASS};

pub struct OrderTracking {
    config: ResolvedConfig,
    callbacks: Callbacks,
    platform: Rc<dyn Platform>,
    api: Arc<dyn TrackingApi>,

    order_id: String,
    /// Empty when no error is shown.
    error_message: String,
    layout: LayoutMode,
    ready: bool,
    phase: SearchPhase,
    next_ticket: u64,

    listeners: Listeners,
    resize_listener: Option<ListenerId>,
    debounce: ResizeDebounce,
}

impl OrderTracking {
    /// Resolve `options` and mount into the container. Nothing is rendered
    /// if the options are invalid.
    pub fn new(
        options: Options,
        platform: Rc<dyn Platform>,
        api: Arc<dyn TrackingApi>,
    ) -> Result<Self, ConfigError> {
        let (config, callbacks) = options.resolve(platform.as_ref())?;
        let layout = LayoutMode::detect(platform.viewport_width(), config.mobile_breakpoint);

        let mut widget = Self {
            config,
            callbacks,
            platform,
            api,
            order_id: String::new(),
            error_message: String::new(),
            layout,
            ready: false,
            phase: SearchPhase::Idle,
            next_ticket: 0,
            listeners: Listeners::default(),
            resize_listener: None,
            debounce: ResizeDebounce::default(),
        };
        widget.init();
        Ok(widget)
    }

    /// Mount: render, wire, mark ready, refresh, listen for resizes.
    pub fn init(&mut self) {
        self.layout = LayoutMode::detect(self.platform.viewport_width(), self.config.mobile_breakpoint);
        self.render();
        self.listeners.attach(&self.config.container);
        self.ready = true;
        self.update_ui();

        if self.resize_listener.is_none() {
            let id = ListenerId::next();
            self.platform.add_resize_listener(id);
            self.resize_listener = Some(id);
        }
        tracing::info!(
            "Order tracking mounted ({:?} layout, breakpoint {}px)",
            self.layout,
            self.config.mobile_breakpoint
        );
    }

    /// Replace the container's content with fresh markup. Listeners on the
    /// old subtree are gone afterwards; callers re-wire.
    pub fn render(&mut self) {
        self.listeners.detach();
        let markup = render::markup(&self.config.texts, self.layout, &self.order_id);
        self.config
            .container
            .borrow_mut()
            .replace_children(vec![markup.into_ref()]);
        tracing::debug!("Rendered {:?} layout", self.layout);
    }

    fn rewire(&mut self) {
        self.render();
        self.listeners.attach(&self.config.container);
        self.update_ui();
    }

    /// Route a host event to the handler wired on `target`. Returns the
    /// request to run when the event started a search.
    pub fn dispatch(&mut self, target: &NodeRef, event: &DomEvent) -> Option<SearchRequest> {
        let handler = self.listeners.resolve(target, event.kind())?;
        match (handler, event) {
            (Handler::InputChange, DomEvent::Input { value }) => {
                self.handle_input_change(value);
                None
            }
            (Handler::KeyPress, DomEvent::KeyPress { key }) if key == "Enter" => self.begin_search(),
            (Handler::Clear, _) => {
                self.clear_input();
                None
            }
            (Handler::Search, _) => self.begin_search(),
            _ => None,
        }
    }

    pub fn handle_input_change(&mut self, value: &str) {
        self.order_id = value.to_string();
        if !self.error_message.is_empty() {
            self.error_message.clear();
        }
        self.update_ui();
    }

    /// Run the whole search workflow: validate, request, apply the outcome.
    /// Failures end up in the error slot and the error callback, never in
    /// the return value.
    pub async fn handle_search(&mut self) {
        let Some(request) = self.begin_search() else {
            return;
        };
        let result = self.api.fetch(&request.url).await;
        self.complete_search(request.ticket, result);
    }

    /// Validate the input and move to `Requesting`. The UI is refreshed
    /// before the request is handed back, so the error slot is already
    /// clear while it is in flight.
    pub fn begin_search(&mut self) -> Option<SearchRequest> {
        let order_id = match search::validate(&self.order_id) {
            Ok(order_id) => order_id.to_string(),
            Err(failure) => {
                self.show_failure(failure);
                return None;
            }
        };

        self.error_message.clear();
        self.update_ui();

        if let SearchPhase::Requesting { ticket, .. } = &self.phase {
            tracing::debug!("Superseding pending search #{}", ticket);
        }
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        let url = api::order_url(&self.config.api_url, &order_id);
        tracing::info!("Tracking order {} (#{})", order_id, ticket);

        self.phase = SearchPhase::Requesting {
            order_id: order_id.clone(),
            ticket,
        };
        Some(SearchRequest { ticket, order_id, url })
    }

    /// Apply the result of the request started by `begin_search`. Results
    /// for superseded or torn-down searches are dropped.
    pub fn complete_search(&mut self, ticket: u64, result: Result<ApiReply, FetchError>) {
        match &self.phase {
            SearchPhase::Requesting { ticket: current, .. } if *current == ticket => {}
            _ => {
                tracing::debug!("Discarding result of stale search #{}", ticket);
                return;
            }
        }
        self.phase = SearchPhase::Idle;

        match result {
            Ok(reply) => match search::classify(&reply) {
                Verdict::Delivered { delivery_id } => {
                    let url = api::tracking_url(&delivery_id);
                    tracing::info!("Order shipped as {}", delivery_id);
                    if let Err(e) = self.platform.open_external(&url) {
                        tracing::warn!("Failed to open tracking page: {}", e);
                    }
                    (self.callbacks.on_success)(&reply.body);
                }
                Verdict::NotShipped => {
                    let message = self.show_failure(Failure::NotShipped);
                    (self.callbacks.on_error)(&TrackingError::NotShipped(message));
                }
                Verdict::NotFound => {
                    tracing::debug!("Order lookup answered {}", reply.status);
                    let message = self.show_failure(Failure::NotFound);
                    (self.callbacks.on_error)(&TrackingError::NotFound(message));
                }
            },
            Err(err) => {
                tracing::error!("Order tracking error: {}", err);
                self.show_failure(search::classify_fetch_error(&err));
                (self.callbacks.on_error)(&TrackingError::Request(err));
            }
        }
    }

    /// Set the error slot to the failure's label and refresh. Returns the
    /// message shown.
    fn show_failure(&mut self, failure: Failure) -> String {
        self.error_message = failure.message(&self.config.texts).to_string();
        self.update_ui();
        self.error_message.clone()
    }

    pub fn clear_input(&mut self) {
        self.order_id.clear();
        self.error_message.clear();
        if let Some(input) = self.find(Role::SearchInput) {
            input.borrow_mut().set_attr("value", "");
        }
        self.update_ui();
    }

    /// Project state onto the rendered elements: error class on the search
    /// box, text and visibility of the error slot, clear button display.
    pub fn update_ui(&self) {
        let has_error = !self.error_message.is_empty();

        if let Some(search_box) = self.find(Role::SearchBox) {
            search_box
                .borrow_mut()
                .toggle_class(SEARCH_BOX_ERROR_CLASS, has_error);
        }

        if let Some(slot) = self.find(Role::ErrorMessage) {
            let mut slot = slot.borrow_mut();
            slot.set_text(self.error_message.as_str());
            slot.toggle_class(VISIBLE_CLASS, has_error);
        }

        if let Some(clear) = self.find(Role::ClearButton) {
            let display = if self.order_id.is_empty() { "none" } else { "flex" };
            clear.borrow_mut().set_style("display", display);
        }
    }

    /// Window resize notification. Recomputes the layout once resizes stop
    /// for the debounce period.
    pub fn handle_resize(&mut self) {
        if self.resize_listener.is_none() {
            return;
        }
        self.debounce.schedule(self.platform.as_ref());
    }

    /// Timer expiry from the host.
    pub fn handle_timer(&mut self, id: TimerId) {
        if self.debounce.fire(id) {
            self.relayout();
        }
    }

    /// Re-render only when the layout mode actually flips.
    fn relayout(&mut self) -> bool {
        let layout = LayoutMode::detect(self.platform.viewport_width(), self.config.mobile_breakpoint);
        if layout == self.layout {
            return false;
        }
        tracing::info!("Layout changed: {:?} -> {:?}", self.layout, layout);
        self.layout = layout;
        if self.ready {
            self.rewire();
        }
        true
    }

    /// Unmount. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        self.listeners.detach();
        if let Some(id) = self.resize_listener.take() {
            self.platform.remove_resize_listener(id);
        }
        self.debounce.cancel(self.platform.as_ref());
        self.phase = SearchPhase::Idle;
        self.config.container.borrow_mut().clear_children();
        if self.ready {
            tracing::info!("Order tracking destroyed");
        }
        self.ready = false;
    }

    /// Apply a partial configuration change. A new breakpoint re-renders
    /// immediately if it flips the layout; new labels always re-render, in
    /// the layout the current viewport calls for.
    pub fn update_config(&mut self, update: ConfigUpdate) {
        if let Some(url) = update.api_url.filter(|u| !u.is_empty()) {
            self.config.api_url = url;
        }
        if let Some(callback) = update.on_success {
            self.callbacks.on_success = callback;
        }
        if let Some(callback) = update.on_error {
            self.callbacks.on_error = callback;
        }

        let texts_changed = update
            .texts
            .as_ref()
            .is_some_and(|texts| self.config.texts.merge(texts));

        if let Some(breakpoint) = update.mobile_breakpoint {
            self.config.mobile_breakpoint = normalize_breakpoint(Some(breakpoint));
        }
        // Label changes recompute the layout as well; a pending resize may
        // already have moved the viewport across the breakpoint.
        if update.mobile_breakpoint.is_none() && !texts_changed {
            return;
        }
        let rerendered = self.relayout();
        if texts_changed && !rerendered && self.ready {
            self.rewire();
        }
    }

    // ---- Accessors ----

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    pub fn is_mobile(&self) -> bool {
        self.layout.is_mobile()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn phase(&self) -> &SearchPhase {
        &self.phase
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn container(&self) -> &NodeRef {
        &self.config.container
    }

    /// The transport, for hosts that run requests from `begin_search`
    /// themselves.
    pub fn api(&self) -> Arc<dyn TrackingApi> {
        Arc::clone(&self.api)
    }

    /// Look up a rendered element by role inside the container.
    pub fn find(&self, role: Role) -> Option<NodeRef> {
        dom::query_selector(&self.config.container, &Selector::data_role(role.as_str()))
    }
}

impl Drop for OrderTracking {
    fn drop(&mut self) {
        if let Some(id) = self.resize_listener.take() {
            self.platform.remove_resize_listener(id);
        }
        self.debounce.cancel(self.platform.as_ref());
        self.listeners.detach();
    }
}
