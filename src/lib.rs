//! Embeddable order tracking search widget.
//!
//! The widget renders into a retained element tree ([`dom`]), talks to its
//! host through [`platform::Platform`] and to the order endpoint through
//! [`api::TrackingApi`]. [`app`] is the iced desktop host built on top.

pub mod api;
pub mod app;
pub mod config;
pub mod dom;
pub mod error;
pub mod options;
pub mod platform;
pub mod responsive;
pub mod search;
pub mod ui;
pub mod widget;

pub use api::{ApiReply, HttpTrackingApi, TrackingApi};
pub use error::{ConfigError, FetchError, PlatformError, TrackingError};
pub use options::{ConfigUpdate, Options, TextOverrides};
pub use widget::OrderTracking;
