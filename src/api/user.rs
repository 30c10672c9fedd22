use super::{Access, ApiClient, ApiResult};
use crate::models::{ProfileResponse, ProfileUpdate};
use serde_json::{json, Value};

impl ApiClient {
    pub async fn get_profile(&self) -> ApiResult<ProfileResponse> {
        self.get("/user/profile", Access::Bearer).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<Value> {
        self.put("/user/profile", Some(update), Access::Bearer).await
    }

    pub async fn update_password(&self, current_password: &str, new_password: &str) -> ApiResult<Value> {
        self.post(
            "/user/update-password",
            Some(&json!({
                "currentPassword": current_password,
                "newPassword": new_password,
            })),
            Access::Bearer,
        )
        .await
    }

    pub async fn delete_account(&self) -> ApiResult<Value> {
        self.delete("/user/account", Access::Bearer).await
    }

    /// Attaches a push delivery token to the user's profile.
    pub async fn patch_fcm_token(&self, fcm_token: &str) -> ApiResult<Value> {
        self.patch(
            "/user/fcm-token",
            &json!({ "fcmToken": fcm_token }),
            Access::Bearer,
        )
        .await
    }
}
