//! Error taxonomy for the gateway dispatch domain.
//!
//! Three layers of error exist, each owned by the stage that produces it:
//!
//! - [`DecodeError`]: the codec could not turn the inbound body into an
//!   [`crate::InboundRequest`].
//! - [`AdapterError`]: a transport adapter failed to reach or get a usable
//!   answer from a downstream service.
//! - [`DispatchError`]: everything that can end a request with a failure
//!   envelope. It knows the outer status and the caller-facing message for
//!   each case.
//!
//! Caller-facing messages are fixed strings. Underlying causes (dial errors,
//! deadline expiry, downstream messages) are carried in the error for
//! operator logs and never copied into an envelope.

use thiserror::Error;

use crate::ReplyStatus;

// ---------------------------------------------------------------------------
// Codec errors
// ---------------------------------------------------------------------------

/// The inbound body could not be decoded into a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The body is not well-formed JSON of the request shape.
    #[error("malformed request body: {reason}")]
    Malformed {
        /// Parser message describing what was wrong.
        reason: String,
    },

    /// The body names an action outside the fixed set.
    #[error("unknown action '{action}'")]
    UnknownAction {
        /// The action string as it appeared on the wire.
        action: String,
    },
}

// ---------------------------------------------------------------------------
// Adapter errors
// ---------------------------------------------------------------------------

/// A transport adapter's typed failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    /// The downstream answered with an explicit "unauthorized" status.
    #[error("downstream '{service}' rejected the credentials")]
    Unauthorized {
        /// Downstream service name, for logs.
        service: String,
    },

    /// The downstream was reached but reported failure: a non-2xx status, an
    /// undecodable body, or its own envelope with `error = true`.
    #[error("downstream '{service}' failed: {reason}")]
    DownstreamFailure {
        /// Downstream service name, for logs.
        service: String,
        /// What the downstream reported.
        reason: String,
    },

    /// The downstream could not be reached or did not answer in time.
    ///
    /// Dial failures, protocol failures, remote procedure errors and deadline
    /// expiry are deliberately not distinguished.
    #[error("transport to '{service}' failed: {reason}")]
    Transport {
        /// Downstream service name, for logs.
        service: String,
        /// Underlying cause.
        reason: String,
    },

    /// The message broker did not accept a publish.
    #[error("publish to topic '{topic}' failed: {reason}")]
    Publish {
        /// Destination topic.
        topic: String,
        /// Underlying cause.
        reason: String,
    },
}

impl AdapterError {
    /// Convenience constructor for [`AdapterError::Unauthorized`].
    pub fn unauthorized(service: impl Into<String>) -> Self {
        Self::Unauthorized {
            service: service.into(),
        }
    }

    /// Convenience constructor for [`AdapterError::DownstreamFailure`].
    pub fn downstream(service: impl Into<String>, reason: impl ToString) -> Self {
        Self::DownstreamFailure {
            service: service.into(),
            reason: reason.to_string(),
        }
    }

    /// Convenience constructor for [`AdapterError::Transport`].
    pub fn transport(service: impl Into<String>, reason: impl ToString) -> Self {
        Self::Transport {
            service: service.into(),
            reason: reason.to_string(),
        }
    }

    /// Convenience constructor for [`AdapterError::Publish`].
    pub fn publish(topic: impl Into<String>, reason: impl ToString) -> Self {
        Self::Publish {
            topic: topic.into(),
            reason: reason.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatch errors
// ---------------------------------------------------------------------------

/// Every way a request can terminate with a failure envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The declared action is not one the gateway serves.
    #[error("invalid action '{action}'")]
    InvalidAction {
        /// The action string as received.
        action: String,
    },

    /// The body was malformed or its payload does not match the action.
    #[error("malformed payload: {reason}")]
    MalformedPayload {
        /// Description of the mismatch.
        reason: String,
    },

    /// The bound adapter failed.
    #[error(transparent)]
    Adapter(#[from] AdapterError),
}

impl DispatchError {
    /// Outer status written with the failure envelope.
    pub fn status(&self) -> ReplyStatus {
        match self {
            DispatchError::InvalidAction { .. } | DispatchError::MalformedPayload { .. } => {
                ReplyStatus::BadRequest
            }
            DispatchError::Adapter(AdapterError::Unauthorized { .. }) => ReplyStatus::Unauthorized,
            DispatchError::Adapter(AdapterError::DownstreamFailure { .. })
            | DispatchError::Adapter(AdapterError::Transport { .. }) => ReplyStatus::BadGateway,
            DispatchError::Adapter(AdapterError::Publish { .. }) => ReplyStatus::InternalError,
        }
    }

    /// Fixed, caller-safe message for the failure envelope.
    pub fn public_message(&self) -> &'static str {
        match self {
            DispatchError::InvalidAction { .. } => "invalid action",
            DispatchError::MalformedPayload { .. } => "malformed request payload",
            DispatchError::Adapter(AdapterError::Unauthorized { .. }) => "invalid credentials",
            DispatchError::Adapter(AdapterError::DownstreamFailure { .. }) => {
                "downstream service failed"
            }
            DispatchError::Adapter(AdapterError::Transport { .. }) => {
                "downstream service unavailable"
            }
            DispatchError::Adapter(AdapterError::Publish { .. }) => "failed to publish log entry",
        }
    }
}

impl From<DecodeError> for DispatchError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::UnknownAction { action } => DispatchError::InvalidAction { action },
            DecodeError::Malformed { reason } => DispatchError::MalformedPayload { reason },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_bad_request() {
        let invalid = DispatchError::from(DecodeError::UnknownAction {
            action: "bogus".to_owned(),
        });
        assert_eq!(invalid.status(), ReplyStatus::BadRequest);
        assert_eq!(invalid.public_message(), "invalid action");

        let malformed = DispatchError::from(DecodeError::Malformed {
            reason: "EOF".to_owned(),
        });
        assert_eq!(malformed.status(), ReplyStatus::BadRequest);
    }

    #[test]
    fn adapter_errors_map_to_documented_statuses() {
        let cases = [
            (AdapterError::unauthorized("identity"), ReplyStatus::Unauthorized),
            (AdapterError::downstream("mail", "500"), ReplyStatus::BadGateway),
            (AdapterError::transport("log", "refused"), ReplyStatus::BadGateway),
            (AdapterError::publish("logs_topic", "timed out"), ReplyStatus::InternalError),
        ];
        for (err, status) in cases {
            assert_eq!(DispatchError::from(err).status(), status);
        }
    }

    #[test]
    fn public_message_never_contains_the_cause() {
        let err = DispatchError::from(AdapterError::transport("log", "dial tcp 10.0.0.7:5001"));
        assert!(!err.public_message().contains("10.0.0.7"));
    }
}
