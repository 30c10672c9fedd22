use super::{require_id, Access, ApiClient, ApiError, ApiResult};
use crate::models::{Notification, UnreadCount};
use serde_json::Value;

impl ApiClient {
    pub async fn list_notifications(&self, user_id: &str) -> ApiResult<Vec<Notification>> {
        let user_id = require_id(user_id, "User ID")?;
        let data: Value = self
            .get(&format!("/notifications/user/{user_id}"), Access::Bearer)
            .await?;
        if data.is_null() {
            return Ok(Vec::new());
        }
        serde_json::from_value(data).map_err(ApiError::parse)
    }

    pub async fn mark_as_read(&self, notification_id: &str) -> ApiResult<Value> {
        let id = require_id(notification_id, "Notification ID")?;
        self.put::<Value, ()>(&format!("/notifications/{id}/read"), None, Access::Bearer)
            .await
    }

    pub async fn mark_all_as_read(&self, user_id: &str) -> ApiResult<Value> {
        let user_id = require_id(user_id, "User ID")?;
        self.put::<Value, ()>(
            &format!("/notifications/user/{user_id}/read-all"),
            None,
            Access::Bearer,
        )
        .await
    }

    pub async fn get_unread_count(&self, user_id: &str) -> ApiResult<u64> {
        let user_id = require_id(user_id, "User ID")?;
        let data: Value = self
            .get(
                &format!("/notifications/user/{user_id}/unread-count"),
                Access::Bearer,
            )
            .await?;
        parse_unread_count(data)
    }
}

/// Accepts `{"count": n}`, a bare `n`, or a numeric text body.
pub(crate) fn parse_unread_count(data: Value) -> ApiResult<u64> {
    if let Value::String(text) = &data {
        return text
            .trim()
            .parse::<u64>()
            .map_err(|_| ApiError::parse(format!("unexpected unread count: {text}")));
    }
    serde_json::from_value::<UnreadCount>(data)
        .map(|count| count.value())
        .map_err(ApiError::parse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unread_count_shapes() {
        assert_eq!(parse_unread_count(json!({"count": 3})).unwrap(), 3);
        assert_eq!(parse_unread_count(json!(5)).unwrap(), 5);
        assert_eq!(parse_unread_count(json!({"count": 0})).unwrap(), 0);
        assert_eq!(parse_unread_count(json!(" 7 ")).unwrap(), 7);
    }

    #[test]
    fn test_unread_count_rejects_other_shapes() {
        assert!(parse_unread_count(json!({"total": 3})).is_err());
        assert!(parse_unread_count(json!("many")).is_err());
        assert!(parse_unread_count(Value::Null).is_err());
    }
}
