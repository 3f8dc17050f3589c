//! Response envelope and the values that feed it.
//!
//! Every reply the gateway writes, success or failure and whichever transport
//! served it, is a [`ResponseEnvelope`]. Adapters report success as a
//! [`Delivery`]; the dispatcher turns either into a [`Reply`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message used when a failure is constructed with an empty message.
const GENERIC_FAILURE_MESSAGE: &str = "request failed";

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// The canonical `{ error, message, data }` reply body.
///
/// Fields are private so the two invariants cannot be broken after
/// construction:
///
/// - `error == true` implies `data` is absent.
/// - `message` is non-empty when `error == true`.
///
/// Deserialisation enforces the same rules and rejects bodies that violate
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireEnvelope")]
pub struct ResponseEnvelope {
    error: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl ResponseEnvelope {
    /// Creates a success envelope.
    ///
    /// A JSON `null` in `data` is treated as absent so the envelope reads back
    /// identically after a round trip.
    pub fn success(message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            error: false,
            message: message.into(),
            data: data.filter(|value| !value.is_null()),
        }
    }

    /// Creates a failure envelope. Never carries data.
    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            error: true,
            message: if message.is_empty() {
                GENERIC_FAILURE_MESSAGE.to_owned()
            } else {
                message
            },
            data: None,
        }
    }

    /// Returns `true` for failure envelopes.
    pub fn is_error(&self) -> bool {
        self.error
    }

    /// Human-readable outcome; never empty on failure.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Success payload, if any. Always `None` on failure.
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }
}

/// Lenient shape used only as the deserialisation source for
/// [`ResponseEnvelope`].
#[derive(Deserialize)]
struct WireEnvelope {
    #[serde(default)]
    error: bool,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

impl TryFrom<WireEnvelope> for ResponseEnvelope {
    type Error = String;

    fn try_from(wire: WireEnvelope) -> Result<Self, Self::Error> {
        if wire.error {
            if wire.data.is_some() {
                return Err("an error envelope must not carry data".to_owned());
            }
            if wire.message.is_empty() {
                return Err("an error envelope must carry a message".to_owned());
            }
            return Ok(Self::failure(wire.message));
        }
        Ok(Self::success(wire.message, wire.data))
    }
}

// ---------------------------------------------------------------------------
// Adapter success values
// ---------------------------------------------------------------------------

/// How far a successful delivery is known to have progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Confirmation {
    /// The downstream service processed the request and answered.
    Confirmed,
    /// An intermediary (the queue broker) accepted the request; the downstream
    /// service has not necessarily seen it yet.
    Accepted,
}

/// What an adapter returns when its transport call succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    /// Human-readable success message for the caller.
    pub message: String,
    /// Optional data forwarded to the caller (e.g. the authenticated identity).
    pub data: Option<Value>,
    /// Delivery guarantee achieved.
    pub confirmation: Confirmation,
}

impl Delivery {
    /// A delivery confirmed by the downstream service.
    pub fn confirmed(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
            confirmation: Confirmation::Confirmed,
        }
    }

    /// A delivery only accepted by an intermediary.
    pub fn accepted(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
            confirmation: Confirmation::Accepted,
        }
    }

    /// Attaches data to forward to the caller.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

// ---------------------------------------------------------------------------
// Reply
// ---------------------------------------------------------------------------

/// Outer status the gateway endpoint writes alongside the envelope.
///
/// Kept transport-neutral here; the endpoint maps it onto an HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplyStatus {
    /// 200: completed and confirmed.
    Ok,
    /// 202: accepted for asynchronous delivery.
    Accepted,
    /// 400: unknown action or payload not matching the action.
    BadRequest,
    /// 401: the identity service rejected the credentials.
    Unauthorized,
    /// 500: the gateway could not hand the request off (queue publish failed).
    InternalError,
    /// 502: a downstream service failed or could not be reached.
    BadGateway,
}

impl ReplyStatus {
    /// Returns the numeric HTTP status code.
    pub fn as_u16(self) -> u16 {
        match self {
            ReplyStatus::Ok => 200,
            ReplyStatus::Accepted => 202,
            ReplyStatus::BadRequest => 400,
            ReplyStatus::Unauthorized => 401,
            ReplyStatus::InternalError => 500,
            ReplyStatus::BadGateway => 502,
        }
    }
}

/// The dispatcher's complete answer to one inbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: ReplyStatus,
    pub envelope: ResponseEnvelope,
}

impl Reply {
    /// Builds a success reply from an adapter delivery.
    pub fn from_delivery(delivery: Delivery) -> Self {
        let status = match delivery.confirmation {
            Confirmation::Confirmed => ReplyStatus::Ok,
            Confirmation::Accepted => ReplyStatus::Accepted,
        };
        Self {
            status,
            envelope: ResponseEnvelope::success(delivery.message, delivery.data),
        }
    }

    /// Builds a failure reply.
    pub fn failure(status: ReplyStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            envelope: ResponseEnvelope::failure(message),
        }
    }
}
