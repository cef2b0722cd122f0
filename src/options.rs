//! Construction options and their resolution into a complete configuration.

use std::fmt;

use serde::Deserialize;

use crate::dom::{NodeRef, Selector};
use crate::error::{ConfigError, TrackingError};
use crate::platform::Platform;
use crate::responsive::DEFAULT_MOBILE_BREAKPOINT;

pub type SuccessCallback = Box<dyn FnMut(&serde_json::Value)>;
pub type ErrorCallback = Box<dyn FnMut(&TrackingError)>;

/// Where to mount the widget.
#[derive(Debug, Clone)]
pub enum ContainerRef {
    /// Resolved against the host document at construction.
    Selector(String),
    /// An element handle supplied by the host. `None` models a host ref
    /// that has not been attached yet.
    Element(Option<NodeRef>),
}

impl From<&str> for ContainerRef {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.to_string())
    }
}

impl From<String> for ContainerRef {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}

impl From<NodeRef> for ContainerRef {
    fn from(element: NodeRef) -> Self {
        Self::Element(Some(element))
    }
}

impl From<Option<NodeRef>> for ContainerRef {
    fn from(element: Option<NodeRef>) -> Self {
        Self::Element(element)
    }
}

/// Partial label overrides. Unset or empty entries keep their default.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TextOverrides {
    pub title: Option<String>,
    pub placeholder: Option<String>,
    pub track_button: Option<String>,
    pub error_empty: Option<String>,
    pub error_not_found: Option<String>,
    pub error_not_shipped: Option<String>,
    pub error_generic: Option<String>,
}

/// Fully resolved labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLabels {
    pub title: String,
    pub placeholder: String,
    pub track_button: String,
    pub error_empty: String,
    pub error_not_found: String,
    pub error_not_shipped: String,
    pub error_generic: String,
}

impl Default for TextLabels {
    fn default() -> Self {
        Self {
            title: "Order Tracking".to_string(),
            placeholder: "Enter your order number".to_string(),
            track_button: "Track".to_string(),
            error_empty: "Please enter an order number".to_string(),
            error_not_found: "Could Not Find Order".to_string(),
            error_not_shipped:
                "This order has not been shipped yet. Please check again after it has been shipped"
                    .to_string(),
            error_generic: "An error occurred while tracking your order".to_string(),
        }
    }
}

impl TextLabels {
    pub fn resolve(overrides: &TextOverrides) -> Self {
        let mut labels = Self::default();
        labels.merge(overrides);
        labels
    }

    /// Apply overrides in place. Returns whether any label changed.
    pub fn merge(&mut self, overrides: &TextOverrides) -> bool {
        let mut changed = false;
        let mut apply = |slot: &mut String, value: &Option<String>| {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                if *slot != value {
                    *slot = value.to_string();
                    changed = true;
                }
            }
        };
        apply(&mut self.title, &overrides.title);
        apply(&mut self.placeholder, &overrides.placeholder);
        apply(&mut self.track_button, &overrides.track_button);
        apply(&mut self.error_empty, &overrides.error_empty);
        apply(&mut self.error_not_found, &overrides.error_not_found);
        apply(&mut self.error_not_shipped, &overrides.error_not_shipped);
        apply(&mut self.error_generic, &overrides.error_generic);
        changed
    }
}

/// Zero and unset both mean "use the default".
pub fn normalize_breakpoint(breakpoint: Option<u32>) -> u32 {
    breakpoint
        .filter(|b| *b > 0)
        .unwrap_or(DEFAULT_MOBILE_BREAKPOINT)
}

/// Host callbacks. Both default to no-ops.
pub struct Callbacks {
    pub on_success: SuccessCallback,
    pub on_error: ErrorCallback,
}

impl Default for Callbacks {
    fn default() -> Self {
        Self {
            on_success: Box::new(|_| {}),
            on_error: Box::new(|_| {}),
        }
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callbacks")
    }
}

/// Builder for a new widget.
///
/// ```
/// use order_tracking::options::{Options, TextOverrides};
///
/// let options = Options::new()
///     .api_url("https://shop.example/api/common/order_tracking")
///     .container("#order-tracking")
///     .mobile_breakpoint(768)
///     .texts(TextOverrides {
///         title: Some("Track Your Order".to_string()),
///         ..TextOverrides::default()
///     })
///     .on_error(|err| eprintln!("tracking failed: {err}"));
/// ```
#[derive(Default)]
pub struct Options {
    api_url: Option<String>,
    container: Option<ContainerRef>,
    mobile_breakpoint: Option<u32>,
    texts: TextOverrides,
    on_error: Option<ErrorCallback>,
    on_success: Option<SuccessCallback>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    pub fn container(mut self, container: impl Into<ContainerRef>) -> Self {
        self.container = Some(container.into());
        self
    }

    pub fn mobile_breakpoint(mut self, pixels: u32) -> Self {
        self.mobile_breakpoint = Some(pixels);
        self
    }

    pub fn texts(mut self, texts: TextOverrides) -> Self {
        self.texts = texts;
        self
    }

    pub fn on_error(mut self, callback: impl FnMut(&TrackingError) + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    pub fn on_success(mut self, callback: impl FnMut(&serde_json::Value) + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    /// Validate and default everything. Touches no element.
    pub fn resolve(self, platform: &dyn Platform) -> Result<(ResolvedConfig, Callbacks), ConfigError> {
        let api_url = self
            .api_url
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingApiUrl)?;

        let container = match self.container.ok_or(ConfigError::MissingContainer)? {
            ContainerRef::Selector(raw) => {
                let selector: Selector = raw.parse()?;
                platform
                    .query_selector(&selector)
                    .ok_or(ConfigError::ContainerNotFound(raw))?
            }
            ContainerRef::Element(element) => element.ok_or(ConfigError::NullContainer)?,
        };

        let defaults = Callbacks::default();
        let callbacks = Callbacks {
            on_success: self.on_success.unwrap_or(defaults.on_success),
            on_error: self.on_error.unwrap_or(defaults.on_error),
        };

        let config = ResolvedConfig {
            api_url,
            container,
            mobile_breakpoint: normalize_breakpoint(self.mobile_breakpoint),
            texts: TextLabels::resolve(&self.texts),
        };
        Ok((config, callbacks))
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("api_url", &self.api_url)
            .field("container", &self.container)
            .field("mobile_breakpoint", &self.mobile_breakpoint)
            .field("texts", &self.texts)
            .field("on_error", &self.on_error.is_some())
            .field("on_success", &self.on_success.is_some())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub api_url: String,
    /// Host-owned element the widget renders into.
    pub container: NodeRef,
    pub mobile_breakpoint: u32,
    pub texts: TextLabels,
}

/// Partial update applied by `OrderTracking::update_config`.
#[derive(Default)]
pub struct ConfigUpdate {
    pub(crate) api_url: Option<String>,
    pub(crate) mobile_breakpoint: Option<u32>,
    pub(crate) texts: Option<TextOverrides>,
    pub(crate) on_error: Option<ErrorCallback>,
    pub(crate) on_success: Option<SuccessCallback>,
}

impl ConfigUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty URLs are ignored.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    pub fn mobile_breakpoint(mut self, pixels: u32) -> Self {
        self.mobile_breakpoint = Some(pixels);
        self
    }

    pub fn texts(mut self, texts: TextOverrides) -> Self {
        self.texts = Some(texts);
        self
    }

    pub fn on_error(mut self, callback: impl FnMut(&TrackingError) + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    pub fn on_success(mut self, callback: impl FnMut(&serde_json::Value) + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use super::*;
    use crate::dom::{self, Element, ListenerId};
    use crate::error::PlatformError;
    use crate::platform::TimerId;

    struct Document(NodeRef);

    impl Platform for Document {
        fn viewport_width(&self) -> u32 {
            1024
        }
        fn query_selector(&self, selector: &Selector) -> Option<NodeRef> {
            dom::query_selector(&self.0, selector)
        }
        fn add_resize_listener(&self, _id: ListenerId) {}
        fn remove_resize_listener(&self, _id: ListenerId) {}
        fn set_timeout(&self, _delay: Duration) -> TimerId {
            TimerId(0)
        }
        fn clear_timeout(&self, _id: TimerId) {}
        fn open_external(&self, _url: &str) -> Result<(), PlatformError> {
            Ok(())
        }
    }

    fn document() -> Document {
        Document(
            Element::new("body")
                .with_child(Element::new("div").with_attr("id", "tracker"))
                .into_ref(),
        )
    }

    #[test]
    fn test_missing_api_url_is_rejected() {
        let doc = document();
        let err = Options::new().container("#tracker").resolve(&doc).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiUrl));

        let err = Options::new()
            .api_url("")
            .container("#tracker")
            .resolve(&doc)
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiUrl));
    }

    #[test]
    fn test_missing_or_unresolvable_container_is_rejected() {
        let doc = document();
        let err = Options::new().api_url("/api/t").resolve(&doc).unwrap_err();
        assert!(matches!(err, ConfigError::MissingContainer));

        let err = Options::new()
            .api_url("/api/t")
            .container("#nowhere")
            .resolve(&doc)
            .unwrap_err();
        assert!(matches!(err, ConfigError::ContainerNotFound(ref s) if s == "#nowhere"));

        let err = Options::new()
            .api_url("/api/t")
            .container(None::<NodeRef>)
            .resolve(&doc)
            .unwrap_err();
        assert!(matches!(err, ConfigError::NullContainer));

        let err = Options::new()
            .api_url("/api/t")
            .container("div > p")
            .resolve(&doc)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSelector(_)));
    }

    #[test]
    fn test_defaults_are_filled_in() {
        let doc = document();
        let (config, _) = Options::new()
            .api_url("/api/t")
            .container("#tracker")
            .resolve(&doc)
            .unwrap();

        assert_eq!(config.api_url, "/api/t");
        assert_eq!(config.mobile_breakpoint, 700);
        assert_eq!(config.texts, TextLabels::default());
        assert_eq!(config.container.borrow().attr("id"), Some("tracker"));
    }

    #[test]
    fn test_element_container_is_used_as_is() {
        let doc = document();
        let element = Element::new("section").into_ref();
        let (config, _) = Options::new()
            .api_url("/api/t")
            .container(Rc::clone(&element))
            .mobile_breakpoint(0)
            .resolve(&doc)
            .unwrap();

        assert!(Rc::ptr_eq(&config.container, &element));
        assert_eq!(config.mobile_breakpoint, 700);
    }

    #[test]
    fn test_label_overrides_fall_back_per_key() {
        let labels = TextLabels::resolve(&TextOverrides {
            title: Some("Track Your Order".to_string()),
            track_button: Some(String::new()),
            ..TextOverrides::default()
        });

        assert_eq!(labels.title, "Track Your Order");
        assert_eq!(labels.track_button, "Track");
        assert_eq!(labels.placeholder, "Enter your order number");
        assert_eq!(labels.error_not_found, "Could Not Find Order");
    }

    #[test]
    fn test_merge_reports_changes() {
        let mut labels = TextLabels::default();
        assert!(!labels.merge(&TextOverrides::default()));
        assert!(!labels.merge(&TextOverrides {
            title: Some("Order Tracking".to_string()),
            ..TextOverrides::default()
        }));
        assert!(labels.merge(&TextOverrides {
            error_generic: Some("Oops".to_string()),
            ..TextOverrides::default()
        }));
        assert_eq!(labels.error_generic, "Oops");
    }

    #[test]
    fn test_custom_callbacks_are_kept() {
        let doc = document();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let (_, mut callbacks) = Options::new()
            .api_url("/api/t")
            .container("#tracker")
            .on_error(move |err| sink.borrow_mut().push(err.to_string()))
            .resolve(&doc)
            .unwrap();

        (callbacks.on_error)(&TrackingError::NotFound("gone".to_string()));
        (callbacks.on_success)(&serde_json::json!({}));
        assert_eq!(*seen.borrow(), vec!["gone".to_string()]);
    }
}
