//! Session context: token lifecycle, profile hydration and the 401 guard.

mod token;

pub use token::{decode_expiry, is_expired, TokenError};

use crate::api::{ApiClient, ApiError, ApiErrorKind, ApiResult, ContactField};
use crate::models::{ProfileUpdate, RegisterRequest, User, UserRole};
use crate::storage::TokenStore;

pub const INVALID_CREDENTIALS: &str =
    "Invalid credentials. Please check your login information and try again.";
pub const ACCOUNT_NOT_FOUND: &str = "Account not found. Please check your information or sign up.";
pub const NETWORK_ERROR: &str = "Network error. Please check your connection and try again.";
pub const PROFILE_UNAVAILABLE: &str = "Failed to fetch user data";

const NO_ACCESS_TOKEN: &str = "No access token received";
const LOGIN_FAILED: &str = "Login failed";
const REGISTRATION_FAILED: &str = "Registration failed";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Authenticating,
    Authenticated,
    /// The held token passed its `exp` while the app was open. Behaves like
    /// `Unauthenticated`; kept apart so the login page can say why.
    Expired,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginOutcome {
    pub success: bool,
    pub status: Option<u16>,
    pub error: Option<String>,
    pub kind: Option<ApiErrorKind>,
}

impl LoginOutcome {
    fn succeeded() -> Self {
        Self {
            success: true,
            status: None,
            error: None,
            kind: None,
        }
    }

    fn rejected(error: &ApiError, fallback: &str) -> Self {
        Self {
            success: false,
            status: error.status,
            error: Some(
                error
                    .server_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| fallback.to_string()),
            ),
            kind: Some(error.kind.clone()),
        }
    }

    fn failed(message: &str) -> Self {
        Self {
            success: false,
            status: None,
            error: Some(message.to_string()),
            kind: None,
        }
    }

    /// Copy for the login page. `None` on success.
    pub fn user_message(&self) -> Option<String> {
        if self.success {
            return None;
        }
        let message = match (self.status, &self.kind) {
            (Some(401), _) => INVALID_CREDENTIALS.to_string(),
            (Some(404), _) => ACCOUNT_NOT_FOUND.to_string(),
            (_, Some(ApiErrorKind::Network)) => NETWORK_ERROR.to_string(),
            _ => self.error.clone().unwrap_or_else(|| LOGIN_FAILED.to_string()),
        };
        Some(message)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterOutcome {
    pub success: bool,
    /// Whether the server logged the new user in right away.
    pub signed_in: bool,
    pub error: Option<String>,
    pub conflict: Option<ContactField>,
}

#[derive(Clone, Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Failed to fetch user data")]
    ProfileUnavailable(#[source] ApiError),
}

/// Profile update failure, split so the form can mark the offending field.
#[derive(Clone, Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("{message}")]
    FieldConflict { field: ContactField, message: String },
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Everything a page needs to act on the user's behalf. Lives in `AppState`
/// and is handed to the operations that need it.
#[derive(Clone, Debug)]
pub struct Session {
    api: ApiClient,
    tokens: TokenStore,
    state: SessionState,
    user: Option<User>,
    error: Option<String>,
}

impl Session {
    pub fn new(api: ApiClient, tokens: TokenStore) -> Self {
        Self {
            api,
            tokens,
            state: SessionState::Unauthenticated,
            user: None,
            error: None,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user
            .as_ref()
            .map(|u| u.user_id.as_str())
            .filter(|id| !id.is_empty())
    }

    pub fn has_role(&self, role: UserRole) -> bool {
        self.user.as_ref().is_some_and(|u| u.role == role)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub async fn initialize(&mut self) {
        self.initialize_at(crate::util::now_secs()).await;
    }

    /// Restores a stored session. Anything but a readable, unexpired token
    /// leaves both stores empty.
    pub async fn initialize_at(&mut self, now_secs: i64) {
        let Some(token) = self
            .tokens
            .get_token()
            .filter(|t| !is_expired(t, now_secs))
        else {
            tracing::debug!("no usable stored token");
            self.clear_local();
            return;
        };

        self.api.set_token(Some(token));
        self.state = SessionState::Authenticated;
        if let Err(e) = self.fetch_current_user().await {
            tracing::info!(error = %e, "stored session could not be restored");
        }
    }

    /// Hydrates the user from `GET /user/profile`. Failure clears the tokens.
    pub async fn fetch_current_user(&mut self) -> Result<User, SessionError> {
        match self.api.get_profile().await {
            Ok(profile) => {
                let user = User::from(profile);
                self.user = Some(user.clone());
                self.state = SessionState::Authenticated;
                Ok(user)
            }
            Err(e) => {
                self.clear_local();
                self.error = Some(PROFILE_UNAVAILABLE.to_string());
                Err(SessionError::ProfileUnavailable(e))
            }
        }
    }

    pub async fn login(&mut self, identifier: &str, password: &str, remember_me: bool) -> LoginOutcome {
        self.state = SessionState::Authenticating;
        self.error = None;

        let outcome = match self.api.login(identifier.trim(), password).await {
            Err(e) => LoginOutcome::rejected(&e, LOGIN_FAILED),
            Ok(res) => match res.access_token.filter(|t| !t.trim().is_empty()) {
                None => LoginOutcome::failed(NO_ACCESS_TOKEN),
                Some(token) => {
                    self.tokens.set_token(&token, remember_me);
                    self.api.set_token(Some(token));
                    match self.fetch_current_user().await {
                        Ok(_) => LoginOutcome::succeeded(),
                        Err(_) => LoginOutcome::failed(PROFILE_UNAVAILABLE),
                    }
                }
            },
        };

        if outcome.success {
            tracing::info!("signed in");
        } else {
            self.clear_local();
            self.error = outcome.error.clone();
            tracing::info!(status = ?outcome.status, "sign-in failed");
        }
        outcome
    }

    /// A returned token is stored in the ephemeral slot only.
    pub async fn register(&mut self, request: &RegisterRequest) -> RegisterOutcome {
        self.error = None;
        let res = match self.api.register(request).await {
            Ok(res) => res,
            Err(e) => {
                let message = e
                    .server_message()
                    .unwrap_or(REGISTRATION_FAILED)
                    .to_string();
                self.error = Some(message.clone());
                return RegisterOutcome {
                    success: false,
                    signed_in: false,
                    error: Some(message),
                    conflict: e.conflict_field(),
                };
            }
        };

        let Some(token) = res.access_token.filter(|t| !t.trim().is_empty()) else {
            return RegisterOutcome {
                success: true,
                signed_in: false,
                error: None,
                conflict: None,
            };
        };

        self.tokens.set_token(&token, false);
        self.api.set_token(Some(token));
        let signed_in = self.fetch_current_user().await.is_ok();
        RegisterOutcome {
            success: true,
            signed_in,
            error: self.error.clone(),
            conflict: None,
        }
    }

    pub async fn logout(&mut self) {
        if self.api.token().is_some() {
            if let Err(e) = self.api.logout().await {
                tracing::warn!(error = %e, "logout request failed");
            }
        }
        self.clear_local();
        self.error = None;
        tracing::info!("signed out");
    }

    /// Passes `result` through, ending the session when the server rejected
    /// the token.
    pub fn guard<T>(&mut self, result: ApiResult<T>) -> ApiResult<T> {
        if let Err(e) = &result {
            if e.is_unauthorized() && self.api.token().is_some() {
                tracing::info!("token rejected by server, clearing session");
                self.clear_local();
            }
        }
        result
    }

    /// Moves an authenticated session to `Expired` once the held token's
    /// `exp` has passed, without asking the server. Returns whether the
    /// session is still usable.
    pub fn check_expiry(&mut self, now_secs: i64) -> bool {
        if self.state != SessionState::Authenticated {
            return false;
        }
        match self.api.token() {
            Some(token) if !is_expired(token, now_secs) => true,
            _ => {
                tracing::info!("session token expired");
                self.clear_local();
                self.state = SessionState::Expired;
                false
            }
        }
    }

    pub async fn update_profile(&mut self, update: &ProfileUpdate) -> Result<User, ProfileError> {
        let res = self.api.update_profile(update).await;
        if let Err(e) = self.guard(res) {
            return Err(match e.conflict_field() {
                Some(field) => ProfileError::FieldConflict {
                    field,
                    message: e.message,
                },
                None => ProfileError::Api(e),
            });
        }
        self.fetch_current_user()
            .await
            .map_err(|SessionError::ProfileUnavailable(e)| ProfileError::Api(e))
    }

    pub async fn update_password(&mut self, current: &str, new_password: &str) -> ApiResult<()> {
        let res = self.api.update_password(current, new_password).await;
        self.guard(res).map(|_| ())
    }

    pub async fn delete_account(&mut self) -> ApiResult<()> {
        let res = self.api.delete_account().await;
        self.guard(res)?;
        self.clear_local();
        tracing::info!("account deleted");
        Ok(())
    }

    pub async fn attach_push_token(&mut self, token: &str) -> ApiResult<()> {
        let res = self.api.patch_fcm_token(token).await;
        self.guard(res).map(|_| ())
    }

    fn clear_local(&mut self) {
        self.tokens.clear_tokens();
        self.api.set_token(None);
        self.user = None;
        self.state = SessionState::Unauthenticated;
    }
}

#[cfg(test)]
mod tests {
    use super::token::make_jwt;
    use super::*;
    use serde_json::json;

    const NOW: i64 = 1_700_000_000;

    fn session() -> Session {
        // Nothing listens here; every request fails as a network error.
        Session::new(ApiClient::new("http://127.0.0.1:9"), TokenStore::in_memory())
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[tokio::test]
    async fn test_initialize_with_expired_token_clears_both_stores() {
        let mut s = session();
        s.tokens().set_token(&make_jwt(&json!({"exp": NOW - 10})), true);

        s.initialize_at(NOW).await;

        assert_eq!(s.state(), SessionState::Unauthenticated);
        assert!(s.tokens().durable_token().is_none());
        assert!(s.tokens().ephemeral_token().is_none());
        assert!(s.api().token().is_none());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[tokio::test]
    async fn test_initialize_with_garbage_token_is_unauthenticated() {
        let mut s = session();
        s.tokens().set_token("garbage", false);
        s.initialize_at(NOW).await;
        assert_eq!(s.state(), SessionState::Unauthenticated);
        assert!(s.tokens().get_token().is_none());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[tokio::test]
    async fn test_initialize_hydration_failure_clears_tokens() {
        let mut s = session();
        s.tokens().set_token(&make_jwt(&json!({"exp": NOW + 3600})), true);

        s.initialize_at(NOW).await;

        assert_eq!(s.state(), SessionState::Unauthenticated);
        assert!(s.tokens().get_token().is_none());
        assert_eq!(s.error(), Some(PROFILE_UNAVAILABLE));
        s.clear_error();
        assert!(s.error().is_none());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[tokio::test]
    async fn test_login_network_failure_stores_nothing() {
        let mut s = session();
        let outcome = s.login("user@example.com", "pw", true).await;
        assert!(!outcome.success);
        assert_eq!(outcome.kind, Some(ApiErrorKind::Network));
        assert_eq!(outcome.user_message().as_deref(), Some(NETWORK_ERROR));
        assert_eq!(s.state(), SessionState::Unauthenticated);
        assert!(s.tokens().get_token().is_none());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[tokio::test]
    async fn test_logout_clears_even_when_server_is_down() {
        let mut s = session();
        s.tokens().set_token("tok", true);
        s.api.set_token(Some("tok".to_string()));
        s.state = SessionState::Authenticated;

        s.logout().await;

        assert_eq!(s.state(), SessionState::Unauthenticated);
        assert!(s.tokens().get_token().is_none());
        assert!(s.user().is_none());
    }

    #[test]
    fn test_guard_clears_session_on_unauthorized_only() {
        let mut s = session();
        s.tokens().set_token("tok", false);
        s.api.set_token(Some("tok".to_string()));
        s.state = SessionState::Authenticated;

        let server_error: ApiResult<()> =
            Err(ApiError::from_response(500, json!({"error": "boom"})));
        assert!(s.guard(server_error).is_err());
        assert!(s.is_authenticated());

        let rejected: ApiResult<()> =
            Err(ApiError::from_response(401, json!({"error": "expired"})));
        let err = s.guard(rejected).unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(s.state(), SessionState::Unauthenticated);
        assert!(s.tokens().get_token().is_none());
    }

    #[test]
    fn test_check_expiry_marks_session_expired() {
        let mut s = session();
        let token = make_jwt(&json!({"exp": NOW + 5}));
        s.tokens().set_token(&token, true);
        s.api.set_token(Some(token));
        s.state = SessionState::Authenticated;

        assert!(s.check_expiry(NOW));
        assert!(!s.check_expiry(NOW + 6));
        assert_eq!(s.state(), SessionState::Expired);
        assert!(!s.is_authenticated());
        assert!(s.tokens().get_token().is_none());
    }

    #[test]
    fn test_has_role() {
        let mut s = session();
        assert!(!s.has_role(UserRole::User));
        s.user = Some(User {
            role: UserRole::Advocate,
            ..Default::default()
        });
        assert!(s.has_role(UserRole::Advocate));
        assert!(!s.has_role(UserRole::User));
    }

    #[test]
    fn test_login_outcome_copy() {
        let unauthorized = LoginOutcome::rejected(
            &ApiError::from_response(401, json!({"error": "Invalid credentials"})),
            LOGIN_FAILED,
        );
        assert_eq!(unauthorized.error.as_deref(), Some("Invalid credentials"));
        assert_eq!(unauthorized.user_message().as_deref(), Some(INVALID_CREDENTIALS));

        let missing = LoginOutcome::rejected(&ApiError::from_response(404, json!({})), LOGIN_FAILED);
        assert_eq!(missing.error.as_deref(), Some(LOGIN_FAILED));
        assert_eq!(missing.user_message().as_deref(), Some(ACCOUNT_NOT_FOUND));

        let other = LoginOutcome::rejected(
            &ApiError::from_response(403, json!({"error": "Account locked"})),
            LOGIN_FAILED,
        );
        assert_eq!(other.user_message().as_deref(), Some("Account locked"));

        assert_eq!(
            LoginOutcome::failed(NO_ACCESS_TOKEN).user_message().as_deref(),
            Some("No access token received")
        );
        assert!(LoginOutcome::succeeded().user_message().is_none());
    }
}
