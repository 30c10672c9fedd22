//! Best-effort push registration: service worker, permission, delivery token,
//! then `PATCH /user/fcm-token`.

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::WebPushProvider;

use crate::session::Session;
use async_trait::async_trait;
use serde::Deserialize;

/// Script the browser provider registers as the messaging service worker.
pub const SERVICE_WORKER_PATH: &str = "/firebase-messaging-sw.js";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PermissionState {
    Granted,
    Denied,
    NotDetermined,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PushError {
    #[error("push messaging is not supported: {0}")]
    Unsupported(String),
    #[error("service worker registration failed: {0}")]
    Registration(String),
    #[error("service worker never became active: {0}")]
    Activation(String),
    #[error("notification permission request failed: {0}")]
    Permission(String),
    #[error("could not obtain a push token: {0}")]
    Token(String),
}

/// How registration ended. None of these are fatal to the app.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PushOutcome {
    Registered,
    NotSignedIn,
    PermissionNotGranted(PermissionState),
    NoToken,
    Failed(String),
}

/// A push the service worker forwarded to open pages.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct PushMessage {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Deserialize)]
struct WorkerEnvelope {
    kind: String,
    #[serde(flatten)]
    message: PushMessage,
}

impl PushMessage {
    /// Decodes a worker `postMessage` payload. Anything that is not a
    /// forwarded push yields `None`.
    pub fn from_worker_json(raw: &str) -> Option<Self> {
        let envelope: WorkerEnvelope = serde_json::from_str(raw).ok()?;
        (envelope.kind == "push").then_some(envelope.message)
    }
}

#[async_trait(?Send)]
pub trait PushProvider {
    type Registration;

    async fn register_worker(&self) -> Result<Self::Registration, PushError>;
    async fn wait_until_active(&self, registration: &Self::Registration) -> Result<(), PushError>;
    async fn request_permission(&self) -> Result<PermissionState, PushError>;
    async fn obtain_token(
        &self,
        registration: &Self::Registration,
    ) -> Result<Option<String>, PushError>;
}

async fn obtain_token<P: PushProvider>(provider: &P) -> Result<Option<String>, PushOutcome> {
    let registration = provider.register_worker().await.map_err(failed)?;
    tracing::debug!("service worker registered");
    provider
        .wait_until_active(&registration)
        .await
        .map_err(failed)?;

    match provider.request_permission().await.map_err(failed)? {
        PermissionState::Granted => {}
        other => return Err(PushOutcome::PermissionNotGranted(other)),
    }

    provider.obtain_token(&registration).await.map_err(failed)
}

fn failed(e: PushError) -> PushOutcome {
    PushOutcome::Failed(e.to_string())
}

/// Runs the whole registration and attaches the token to the signed-in user.
/// Every failure is logged and reported, never raised.
pub async fn register_push_token<P: PushProvider>(provider: &P, session: &mut Session) -> PushOutcome {
    if !session.is_authenticated() {
        return PushOutcome::NotSignedIn;
    }

    let outcome = match obtain_token(provider).await {
        Err(outcome) => outcome,
        Ok(None) => PushOutcome::NoToken,
        Ok(Some(token)) => match session.attach_push_token(&token).await {
            Ok(()) => PushOutcome::Registered,
            Err(e) => PushOutcome::Failed(e.to_string()),
        },
    };

    match &outcome {
        PushOutcome::Registered => tracing::info!("push token registered"),
        PushOutcome::Failed(reason) => tracing::warn!(%reason, "push registration failed"),
        other => tracing::info!(outcome = ?other, "push registration skipped"),
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::storage::TokenStore;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeProvider {
        fail_registration: bool,
        permission: Option<PermissionState>,
        token: Option<String>,
        calls: RefCell<Vec<&'static str>>,
    }

    #[async_trait(?Send)]
    impl PushProvider for FakeProvider {
        type Registration = ();

        async fn register_worker(&self) -> Result<(), PushError> {
            self.calls.borrow_mut().push("register");
            if self.fail_registration {
                return Err(PushError::Registration("blocked".to_string()));
            }
            Ok(())
        }

        async fn wait_until_active(&self, _: &()) -> Result<(), PushError> {
            self.calls.borrow_mut().push("active");
            Ok(())
        }

        async fn request_permission(&self) -> Result<PermissionState, PushError> {
            self.calls.borrow_mut().push("permission");
            Ok(self.permission.unwrap_or(PermissionState::Granted))
        }

        async fn obtain_token(&self, _: &()) -> Result<Option<String>, PushError> {
            self.calls.borrow_mut().push("token");
            Ok(self.token.clone())
        }
    }

    #[test]
    fn test_worker_message_decoding() {
        let msg = PushMessage::from_worker_json(
            r#"{"kind": "push", "title": "Hearing listed", "body": "WP 1/2024 on 3 June", "data": {}}"#,
        );
        assert_eq!(
            msg,
            Some(PushMessage {
                title: "Hearing listed".to_string(),
                body: "WP 1/2024 on 3 June".to_string(),
            })
        );
        assert_eq!(PushMessage::from_worker_json(r#"{"kind": "ping"}"#), None);
        assert_eq!(PushMessage::from_worker_json("not json"), None);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[tokio::test]
    async fn test_steps_run_in_order_until_token() {
        let provider = FakeProvider::default();
        assert_eq!(obtain_token(&provider).await, Ok(None));
        assert_eq!(
            *provider.calls.borrow(),
            vec!["register", "active", "permission", "token"]
        );
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[tokio::test]
    async fn test_denied_permission_stops_before_token() {
        let provider = FakeProvider {
            permission: Some(PermissionState::Denied),
            token: Some("t".to_string()),
            ..Default::default()
        };
        assert_eq!(
            obtain_token(&provider).await,
            Err(PushOutcome::PermissionNotGranted(PermissionState::Denied))
        );
        assert!(!provider.calls.borrow().contains(&"token"));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[tokio::test]
    async fn test_registration_failure_is_reported_not_raised() {
        let provider = FakeProvider {
            fail_registration: true,
            ..Default::default()
        };
        assert_eq!(
            obtain_token(&provider).await,
            Err(PushOutcome::Failed(
                "service worker registration failed: blocked".to_string()
            ))
        );
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[tokio::test]
    async fn test_signed_out_session_is_skipped() {
        let provider = FakeProvider::default();
        let mut session =
            Session::new(ApiClient::new("http://127.0.0.1:9"), TokenStore::in_memory());
        assert_eq!(
            register_push_token(&provider, &mut session).await,
            PushOutcome::NotSignedIn
        );
        assert!(provider.calls.borrow().is_empty());
    }
}
