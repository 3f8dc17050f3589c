//! The action dispatcher.
//!
//! One inbound request moves through four states and never goes back:
//!
//! ```text
//! Received ──validate──▶ Validated ──invoke adapter──▶ Dispatched ──normalise──▶ Completed
//!     │                      │
//!     └── 400 envelope ◀─────┘   (no adapter is called)
//! ```
//!
//! The dispatcher holds no per-request state and performs no retries. Every
//! failure, including adapter failures, ends as a [`Reply`] carrying a failure
//! envelope; nothing here can bring the process down.

use tracing::Instrument;

use crate::{
    codec, Action, AdapterError, Adapters, Delivery, DispatchError, InboundRequest, Reply,
    Request, TransportBinding,
};

/// Routes validated requests to the adapter bound to their action.
#[derive(Clone)]
pub struct Dispatcher {
    adapters: Adapters,
    binding: TransportBinding,
}

impl Dispatcher {
    /// Creates a dispatcher over the given capability bundle.
    pub fn new(adapters: Adapters) -> Self {
        let binding = adapters.binding();
        Self { adapters, binding }
    }

    /// Decodes a raw request body and dispatches it.
    pub async fn handle(&self, body: &[u8]) -> Reply {
        match codec::decode(body) {
            Ok(inbound) => self.dispatch(inbound).await,
            Err(err) => reject(DispatchError::from(err)),
        }
    }

    /// Validates and dispatches an already-decoded request.
    pub async fn dispatch(&self, inbound: InboundRequest) -> Reply {
        let action = inbound.action;
        let transport = self.binding.transport_for(action);
        let span = tracing::info_span!("dispatch", %action, %transport);

        async move {
            match self.run(inbound).await {
                Ok(delivery) => {
                    tracing::info!(confirmation = ?delivery.confirmation, "request completed");
                    Reply::from_delivery(delivery)
                }
                Err(err) => reject(err),
            }
        }
        .instrument(span)
        .await
    }

    async fn run(&self, inbound: InboundRequest) -> Result<Delivery, DispatchError> {
        let request = validate(inbound)?;
        Ok(self.invoke(&request).await?)
    }

    async fn invoke(&self, request: &Request) -> Result<Delivery, AdapterError> {
        match request {
            Request::Auth(credentials) => self.adapters.identity.authenticate(credentials).await,
            Request::Log(entry) => self.adapters.log.write_log(entry).await,
            Request::Mail(mail) => self.adapters.mail.send_mail(mail).await,
        }
    }
}

/// Checks that exactly the payload member matching the action is present and
/// builds the tagged [`Request`].
///
/// An explicit JSON `null` counts as absent.
///
/// # Errors
///
/// [`DispatchError::MalformedPayload`] when the matching member is absent or
/// a member for another action is present.
pub fn validate(inbound: InboundRequest) -> Result<Request, DispatchError> {
    let action = inbound.action;
    let populated = [
        (Action::Auth, inbound.auth.is_some()),
        (Action::Log, inbound.log.is_some()),
        (Action::Mail, inbound.mail.is_some()),
    ];
    if let Some((extra, _)) = populated.iter().find(|(other, present)| *present && *other != action) {
        return Err(DispatchError::MalformedPayload {
            reason: format!("action '{action}' does not accept a '{extra}' member"),
        });
    }

    let request = match action {
        Action::Auth => inbound.auth.map(Request::Auth),
        Action::Log => inbound.log.map(Request::Log),
        Action::Mail => inbound.mail.map(Request::Mail),
    };
    request.ok_or_else(|| DispatchError::MalformedPayload {
        reason: format!("action '{0}' requires a '{0}' member", action),
    })
}

fn reject(err: DispatchError) -> Reply {
    match &err {
        DispatchError::InvalidAction { .. } | DispatchError::MalformedPayload { .. } => {
            tracing::info!(error = %err, "rejected request");
        }
        DispatchError::Adapter(AdapterError::Unauthorized { .. }) => {
            tracing::info!(error = %err, "credentials rejected");
        }
        DispatchError::Adapter(_) => {
            tracing::warn!(error = %err, "downstream call failed");
        }
    }
    Reply::failure(err.status(), err.public_message())
}
