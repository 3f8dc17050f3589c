//! Actions and canonical request payloads.
//!
//! An inbound call goes through two shapes:
//!
//! 1. [`InboundRequest`]: what the codec produces. The action is known to be
//!    one of the fixed set, but the payload members are still optional because
//!    the wire format allows any combination of them.
//! 2. [`Request`]: the validated tagged variant. Exactly one payload exists
//!    and it matches the action by construction. Only the dispatcher builds
//!    these.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// The capability an inbound request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Verify credentials against the identity service.
    Auth,
    /// Record a log entry in the log-storage service.
    Log,
    /// Hand a message to the mail service.
    Mail,
}

impl Action {
    /// Every action the gateway accepts, in wire order.
    pub const ALL: [Action; 3] = [Action::Auth, Action::Log, Action::Mail];

    /// Returns the wire name of the action.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Auth => "auth",
            Action::Log => "log",
            Action::Mail => "mail",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known [`Action`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| UnknownAction(s.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Credentials forwarded to the identity service.
///
/// `Debug` is implemented by hand so the password never reaches a log line.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthPayload {
    /// Account e-mail address.
    pub email: String,
    /// Cleartext password as submitted by the caller.
    pub password: String,
}

impl std::fmt::Debug for AuthPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthPayload")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A log record: an identifying tag and its body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogPayload {
    /// Tag identifying the kind of record (e.g. `"auth"`, `"event"`).
    pub name: String,
    /// Record body.
    pub data: String,
}

/// A message for the mail service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailPayload {
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
    pub subject: String,
    /// Plain-text body.
    pub message: String,
}

// ---------------------------------------------------------------------------
// Request shapes
// ---------------------------------------------------------------------------

/// A decoded but not yet validated inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundRequest {
    /// The declared action; already known to be one of [`Action::ALL`].
    pub action: Action,
    /// `auth` member of the body, if present.
    pub auth: Option<AuthPayload>,
    /// `log` member of the body, if present.
    pub log: Option<LogPayload>,
    /// `mail` member of the body, if present.
    pub mail: Option<MailPayload>,
}

impl InboundRequest {
    /// Creates a request that declares `action` and carries no payload yet.
    pub fn new(action: Action) -> Self {
        Self {
            action,
            auth: None,
            log: None,
            mail: None,
        }
    }

    /// Sets the `auth` member.
    #[must_use]
    pub fn with_auth(mut self, auth: AuthPayload) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Sets the `log` member.
    #[must_use]
    pub fn with_log(mut self, log: LogPayload) -> Self {
        self.log = Some(log);
        self
    }

    /// Sets the `mail` member.
    #[must_use]
    pub fn with_mail(mut self, mail: MailPayload) -> Self {
        self.mail = Some(mail);
        self
    }
}

/// A validated request: one action, one matching payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Verify credentials with the identity service.
    Auth(AuthPayload),
    /// Record an entry in the log service.
    Log(LogPayload),
    /// Hand a message to the mail service.
    Mail(MailPayload),
}

impl Request {
    /// Returns the action this request targets.
    pub fn action(&self) -> Action {
        match self {
            Request::Auth(_) => Action::Auth,
            Request::Log(_) => Action::Log,
            Request::Mail(_) => Action::Mail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_names_round_trip_through_from_str() {
        for action in Action::ALL {
            assert_eq!(action.as_str().parse::<Action>(), Ok(action));
        }
    }

    #[test]
    fn unknown_action_keeps_the_offending_name() {
        assert_eq!(
            "bogus".parse::<Action>(),
            Err(UnknownAction("bogus".to_owned()))
        );
        // Matching is case-sensitive, like the wire format.
        assert!("AUTH".parse::<Action>().is_err());
    }

    #[test]
    fn auth_payload_debug_redacts_password() {
        let auth = AuthPayload {
            email: "a@b.com".to_owned(),
            password: "secret".to_owned(),
        };
        let rendered = format!("{auth:?}");
        assert!(rendered.contains("a@b.com"));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn request_reports_its_action() {
        let log = Request::Log(LogPayload {
            name: "event".to_owned(),
            data: "body".to_owned(),
        });
        assert_eq!(log.action(), Action::Log);
    }
}
