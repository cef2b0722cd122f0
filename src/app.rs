use std::rc::Rc;
use std::sync::Arc;

use iced::widget::{container, text, Column};
use iced::window;
use iced::{Element, Fill, Padding, Size, Subscription, Task, Theme};

use crate::api::{ApiReply, HttpTrackingApi, TrackingApi};
use crate::config::Config;
use crate::dom::{self, DomEvent};
use crate::error::FetchError;
use crate::options::Options;
use crate::platform::desktop::DesktopPlatform;
use crate::platform::{Platform, TimerId};
use crate::search::SearchRequest;
use crate::ui::{markup, theme};
use crate::widget::render::Role;
use crate::widget::OrderTracking;

/// Id of the element the widget mounts into.
const CONTAINER_ID: &str = "order-tracking";

pub struct State {
    platform: Rc<DesktopPlatform>,
    widget: Option<OrderTracking>,
    /// Set when the widget could not be mounted
    startup_error: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Message {
    /// An event on a rendered element, identified by its `data-role`.
    Dom { role: Role, event: DomEvent },
    Resized(Size),
    TimerFired(TimerId),
    SearchFinished {
        ticket: u64,
        result: Result<ApiReply, FetchError>,
    },
}

impl State {
    pub fn new(config: Config) -> (Self, Task<Message>) {
        let document = dom::Element::new("body")
            .with_child(dom::Element::new("div").with_attr("id", CONTAINER_ID))
            .into_ref();
        let platform = Rc::new(DesktopPlatform::new(
            document,
            config.window.width as u32,
        ));
        let api: Arc<dyn TrackingApi> = Arc::new(HttpTrackingApi::new());

        let mut options = Options::new()
            .api_url(config.api_url)
            .container(format!("#{CONTAINER_ID}"))
            .texts(config.texts)
            .on_success(|body| tracing::info!("Tracking page opened for {}", body))
            .on_error(|err| tracing::info!("Tracking failed: {}", err));
        if let Some(breakpoint) = config.mobile_breakpoint {
            options = options.mobile_breakpoint(breakpoint);
        }

        let shared: Rc<dyn Platform> = platform.clone();
        let (widget, startup_error) = match OrderTracking::new(options, shared, api) {
            Ok(widget) => (Some(widget), None),
            Err(e) => {
                tracing::error!("Failed to mount order tracking: {}", e);
                (None, Some(e.to_string()))
            }
        };

        let state = Self {
            platform,
            widget,
            startup_error,
        };
        let timers = state.timer_tasks();
        (
            state,
            Task::batch([timers, iced::widget::operation::focus(markup::SEARCH_INPUT_ID)]),
        )
    }

    pub fn title(&self) -> String {
        String::from("Order Tracking")
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        let Some(widget) = self.widget.as_mut() else {
            return Task::none();
        };

        let request = match message {
            Message::Dom { role, event } => {
                let Some(target) = widget.find(role) else {
                    return Task::none();
                };
                // iced inputs are controlled; keep the element's value in
                // step the way a browser would.
                if let DomEvent::Input { value } = &event {
                    target.borrow_mut().set_attr("value", value.as_str());
                }
                widget.dispatch(&target, &event)
            }
            Message::Resized(size) => {
                self.platform.set_viewport_width(size.width as u32);
                widget.handle_resize();
                None
            }
            Message::TimerFired(id) => {
                if self.platform.consume_timer(id) {
                    widget.handle_timer(id);
                }
                None
            }
            Message::SearchFinished { ticket, result } => {
                widget.complete_search(ticket, result);
                None
            }
        };

        let search = match request {
            Some(request) => Self::request_task(widget.api(), request),
            None => Task::none(),
        };
        Task::batch([search, self.timer_tasks()])
    }

    pub fn view(&self) -> Element<'_, Message> {
        let content: Element<'_, Message> = match (&self.widget, &self.startup_error) {
            (Some(widget), _) => Column::with_children(
                widget
                    .container()
                    .borrow()
                    .children()
                    .iter()
                    .filter_map(markup::view),
            )
            .width(Fill)
            .into(),
            (None, error) => text(format!(
                "Order tracking is unavailable: {}",
                error.as_deref().unwrap_or("not mounted")
            ))
            .style(theme::error_text)
            .into(),
        };

        let main = container(content)
            .padding(Padding::new(24.0))
            .width(Fill)
            .height(Fill)
            .style(theme::main_container);

        container(main).width(Fill).height(Fill).into()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        // Resize events only matter while the widget listens for them
        if self.platform.has_resize_listeners() {
            window::resize_events().map(|(_id, size)| Message::Resized(size))
        } else {
            Subscription::none()
        }
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    // ---- Helpers ----

    fn request_task(api: Arc<dyn TrackingApi>, request: SearchRequest) -> Task<Message> {
        let SearchRequest { ticket, url, .. } = request;
        Task::perform(api.fetch(&url), move |result| Message::SearchFinished {
            ticket,
            result,
        })
    }

    /// Turn timeouts the widget scheduled during the last update into
    /// sleeps. Cleared ones are filtered out again when they fire.
    fn timer_tasks(&self) -> Task<Message> {
        Task::batch(
            self.platform
                .take_scheduled()
                .into_iter()
                .map(|(id, delay)| {
                    Task::perform(
                        async move { tokio::time::sleep(delay).await },
                        move |_| Message::TimerFired(id),
                    )
                }),
        )
    }
}
