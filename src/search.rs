//! Search workflow states and the pure decisions between them.
//!
//! ```text
//! Idle --trigger--> Validating --empty--> Error(EmptyInput) --> Idle
//!                        |
//!                        +--ok--> Requesting --reply/failure--> Success | Error(..) --> Idle
//! ```
//!
//! Only `Idle` and `Requesting` persist between events; validation and the
//! classification of a reply are computed here and applied by the widget.

use serde_json::Value;

use crate::api::ApiReply;
use crate::error::FetchError;
use crate::options::TextLabels;

/// Failures whose text contains this are reported as "not found".
pub const NOT_FOUND_PHRASE: &str = "Could Not Find Order";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    /// A request is in flight. Only a completion carrying `ticket` is
    /// applied; a newer search replaces the ticket.
    Requesting { order_id: String, ticket: u64 },
}

/// Work for the host to run when a search passes validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub ticket: u64,
    pub order_id: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    EmptyInput,
    NotFound,
    NotShipped,
    Generic,
}

impl Failure {
    pub fn message(self, labels: &TextLabels) -> &str {
        match self {
            Self::EmptyInput => &labels.error_empty,
            Self::NotFound => &labels.error_not_found,
            Self::NotShipped => &labels.error_not_shipped,
            Self::Generic => &labels.error_generic,
        }
    }
}

/// How a completed request is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Delivered { delivery_id: String },
    NotShipped,
    NotFound,
}

/// Trimmed order id, or the empty-input failure.
pub fn validate(input: &str) -> Result<&str, Failure> {
    let order_id = input.trim();
    if order_id.is_empty() {
        Err(Failure::EmptyInput)
    } else {
        Ok(order_id)
    }
}

/// Shipped orders answer 2xx with `{status: 200, data: {delivery_id}}`.
/// Any other non-empty 2xx body means the order exists but has not shipped.
pub fn classify(reply: &ApiReply) -> Verdict {
    if reply.is_ok() {
        if let Some(delivery_id) = delivery_id(&reply.body) {
            return Verdict::Delivered { delivery_id };
        }
        if is_truthy(&reply.body) {
            return Verdict::NotShipped;
        }
    }
    Verdict::NotFound
}

pub fn classify_fetch_error(err: &FetchError) -> Failure {
    if err.to_string().contains(NOT_FOUND_PHRASE) {
        Failure::NotFound
    } else {
        Failure::Generic
    }
}

fn delivery_id(body: &Value) -> Option<String> {
    if body.get("status").and_then(Value::as_f64) != Some(200.0) {
        return None;
    }
    let id = body
        .get("data")
        .filter(|d| is_truthy(d))?
        .get("delivery_id")
        .filter(|id| is_truthy(id))?;
    Some(match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// Loose truthiness as endpoint payloads use it: null, false, zero and the
/// empty string count as absent.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
