use super::{Access, ApiClient, ApiResult};
use crate::models::{LoginRequest, RegisterRequest, TokenResponse};
use serde_json::{json, Value};

impl ApiClient {
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<TokenResponse> {
        self.post(
            "/auth/login",
            Some(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            }),
            Access::Public,
        )
        .await
    }

    /// Sends the current token along so the server can revoke it; callers
    /// clear local state whatever the outcome.
    pub async fn logout(&self) -> ApiResult<Value> {
        self.post::<Value, ()>("/auth/logout", None, Access::Bearer)
            .await
    }

    pub async fn register(&self, req: &RegisterRequest) -> ApiResult<TokenResponse> {
        // Registration may succeed with an empty body (no immediate login).
        let value: Value = self.post("/user/register", Some(req), Access::Public).await?;
        if value.is_null() || value.is_string() {
            return Ok(TokenResponse::default());
        }
        serde_json::from_value(value).map_err(super::ApiError::parse)
    }

    pub async fn send_contact_verification_otp(&self, contact: &str) -> ApiResult<Value> {
        self.post(
            "/user/send-contact-verification-otp",
            Some(&json!({ "contact": contact })),
            Access::Public,
        )
        .await
    }

    pub async fn verify_contact_verification_otp(&self, contact: &str, otp: &str) -> ApiResult<Value> {
        self.post(
            "/user/verify-contact-verification-otp",
            Some(&json!({ "contact": contact, "otp": otp })),
            Access::Public,
        )
        .await
    }

    pub async fn send_password_reset_otp(&self, contact: &str) -> ApiResult<Value> {
        self.post(
            "/user/send-password-reset-otp",
            Some(&json!({ "contact": contact })),
            Access::Public,
        )
        .await
    }

    pub async fn verify_password_reset_otp(&self, contact: &str, otp: &str) -> ApiResult<Value> {
        self.post(
            "/user/verify-password-reset-otp",
            Some(&json!({ "contact": contact, "otp": otp })),
            Access::Public,
        )
        .await
    }

    pub async fn reset_password(&self, contact: &str, new_password: &str) -> ApiResult<Value> {
        self.post(
            "/user/reset-password",
            Some(&json!({ "contact": contact, "newPassword": new_password })),
            Access::Public,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{LoginRequest, TokenResponse};

    #[test]
    fn test_login_contract() {
        let req = LoginRequest {
            username: "user@example.com".to_string(),
            password: "pass".to_string(),
        };
        let v = serde_json::to_value(req).expect("should serialize");
        assert_eq!(v["username"], "user@example.com");
        assert_eq!(v["password"], "pass");

        let res: TokenResponse =
            serde_json::from_str(r#"{"accessToken": "jwt-token"}"#).expect("should parse");
        assert_eq!(res.access_token.as_deref(), Some("jwt-token"));

        let res: TokenResponse = serde_json::from_str(r#"{"message": "ok"}"#).unwrap();
        assert!(res.access_token.is_none());
    }
}
