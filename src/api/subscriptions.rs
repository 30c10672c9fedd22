use super::{require_id, Access, ApiClient, ApiResult};
use crate::models::{Subscription, SubscriptionMode};
use crate::subscription::SubscriptionPayload;
use serde_json::Value;

impl ApiClient {
    pub async fn create_subscription(
        &self,
        mode: SubscriptionMode,
        payload: &SubscriptionPayload,
    ) -> ApiResult<Value> {
        tracing::debug!(%mode, endpoint = mode.endpoint(), "creating subscription");
        self.post(mode.endpoint(), Some(payload), Access::Bearer)
            .await
    }

    pub async fn list_subscriptions(&self, user_id: &str) -> ApiResult<Vec<Subscription>> {
        let user_id = require_id(user_id, "User ID")?;
        let data: Value = self
            .get(&format!("/subscriptions/user/{user_id}"), Access::Bearer)
            .await?;
        parse_subscription_list(data)
    }

    pub async fn delete_subscription(&self, subscription_id: &str) -> ApiResult<Value> {
        let id = require_id(subscription_id, "Subscription ID")?;
        self.delete(&format!("/subscriptions/{id}"), Access::Bearer)
            .await
    }
}

/// The list endpoint has been seen returning a bare object instead of an
/// array when the user has a single subscription.
pub(crate) fn parse_subscription_list(data: Value) -> ApiResult<Vec<Subscription>> {
    match data {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(super::ApiError::parse))
            .collect(),
        single => Ok(vec![
            serde_json::from_value(single).map_err(super::ApiError::parse)?
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_accepts_array_and_single_object() {
        let list = parse_subscription_list(json!([
            {"id": 1, "courtLevel": "HIGH_COURT", "state": "Kerala", "caseNo": "WP 1/2024"},
            {"id": 2, "courtLevel": "SUPREME_COURT", "caseNo": "SLP 9/2023", "status": "inactive"}
        ]))
        .unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].status, "active");
        assert_eq!(list[1].court_type_label(), "Supreme Court");

        let single = parse_subscription_list(json!({"id": 3, "caseNo": "OS 4/2022"})).unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].id_string(), "3");

        assert!(parse_subscription_list(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_list_keeps_rows_with_null_status() {
        let list = parse_subscription_list(json!([
            {"id": 1, "courtLevel": "HIGH_COURT", "caseNo": "WP 1/2024", "status": null},
            {"id": 2, "caseNo": "OS 4/2022", "status": "inactive"}
        ]))
        .unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].status, "active");
        assert_eq!(list[1].status, "inactive");
    }

    #[test]
    fn test_list_rejects_garbage() {
        assert!(parse_subscription_list(json!("nope")).is_err());
    }
}
