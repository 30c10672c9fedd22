//! In-app notification feed and the unread badge.

use crate::api::ApiResult;
use crate::models::Notification;
use crate::session::Session;
use strum::{Display, EnumIter};

/// Sections of the home page. Every switch refreshes the unread badge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Section {
    #[default]
    #[strum(serialize = "Notifications")]
    Notifications,
    #[strum(serialize = "New Subscription")]
    NewSubscription,
    #[strum(serialize = "My Subscriptions")]
    MySubscriptions,
    #[strum(serialize = "Profile")]
    Profile,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NotificationFeed {
    items: Vec<Notification>,
    error: Option<String>,
}

impl NotificationFeed {
    pub fn new(items: Vec<Notification>) -> Self {
        Self { items, error: None }
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn unread_local(&self) -> usize {
        self.items.iter().filter(|n| !n.is_read).count()
    }

    /// Flips one local flag. Returns false when the id is not in the feed.
    pub fn apply_mark_read(&mut self, id: &str) -> bool {
        match self.items.iter_mut().find(|n| n.id_string() == id) {
            Some(n) => {
                n.is_read = true;
                true
            }
            None => false,
        }
    }

    pub fn apply_mark_all_read(&mut self) {
        for n in &mut self.items {
            n.is_read = true;
        }
    }

    pub async fn load(&mut self, session: &mut Session) {
        let Some(user_id) = session.user_id().map(str::to_string) else {
            return;
        };
        let res = session.api().list_notifications(&user_id).await;
        match session.guard(res) {
            Ok(items) => {
                self.items = items;
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load notifications");
                self.error = Some(e.message);
            }
        }
    }

    pub fn record_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// The flag flips before the request and stays flipped if it fails.
    pub async fn mark_as_read(&mut self, session: &mut Session, id: &str) {
        self.apply_mark_read(id);
        if let Err(e) = send_mark_as_read(session, id).await {
            self.record_error(e.message);
        }
    }

    pub async fn mark_all_as_read(&mut self, session: &mut Session) {
        self.apply_mark_all_read();
        if let Err(e) = send_mark_all_as_read(session).await {
            self.record_error(e.message);
        }
    }
}

/// Server half of [`NotificationFeed::mark_as_read`], for callers that have
/// already flipped the flag in their own copy of the feed.
pub async fn send_mark_as_read(session: &mut Session, id: &str) -> ApiResult<()> {
    let res = session.api().mark_as_read(id).await;
    let res = session.guard(res).map(|_| ());
    if let Err(e) = &res {
        tracing::warn!(id, error = %e, "failed to mark notification as read");
    }
    res
}

pub async fn send_mark_all_as_read(session: &mut Session) -> ApiResult<()> {
    let user_id = session.user_id().unwrap_or_default().to_string();
    let res = session.api().mark_all_as_read(&user_id).await;
    let res = session.guard(res).map(|_| ());
    if let Err(e) = &res {
        tracing::warn!(error = %e, "failed to mark all notifications as read");
    }
    res
}

/// Server-side unread count for the badge. `None` when signed out or when the
/// request failed; the badge then keeps its last value.
pub async fn fetch_unread_count(session: &mut Session) -> Option<u64> {
    if !session.check_expiry(crate::util::now_secs()) {
        return None;
    }
    let user_id = session.user_id()?.to_string();
    let res = session.api().get_unread_count(&user_id).await;
    match session.guard(res) {
        Ok(count) => Some(count),
        Err(e) => {
            tracing::warn!(error = %e, "failed to fetch unread count");
            None
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UnreadBadge {
    count: u64,
}

impl UnreadBadge {
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Responses are applied in arrival order; the last one wins.
    pub fn apply(&mut self, count: Option<u64>) {
        if let Some(count) = count {
            self.count = count;
        }
    }

    pub async fn on_section_change(&mut self, section: Section, session: &mut Session) {
        tracing::debug!(%section, "section changed");
        self.apply(fetch_unread_count(session).await);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::storage::TokenStore;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn feed() -> NotificationFeed {
        NotificationFeed::new(
            serde_json::from_value(json!([
                {"id": 1, "caseRef": "WP 1/2024", "isRead": false},
                {"id": 2, "caseRef": "OS 5/2023", "isRead": true},
                {"id": "n-3", "caseRef": "CC 7/2022"}
            ]))
            .unwrap(),
        )
    }

    #[test]
    fn test_unread_local_and_mark_read() {
        let mut f = feed();
        assert_eq!(f.unread_local(), 2);
        assert!(f.apply_mark_read("n-3"));
        assert_eq!(f.unread_local(), 1);
        assert!(!f.apply_mark_read("missing"));
        f.apply_mark_all_read();
        assert_eq!(f.unread_local(), 0);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[tokio::test]
    async fn test_failed_mark_read_keeps_local_flag_and_sets_error() {
        let mut session =
            Session::new(ApiClient::new("http://127.0.0.1:9"), TokenStore::in_memory());
        let mut f = feed();

        f.mark_as_read(&mut session, "1").await;

        assert!(f.items()[0].is_read);
        assert!(f.error().is_some());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[tokio::test]
    async fn test_failed_mark_all_read_keeps_every_flag_and_sets_error() {
        let mut session =
            Session::new(ApiClient::new("http://127.0.0.1:9"), TokenStore::in_memory());
        let mut f = feed();
        assert_eq!(f.unread_local(), 2);

        f.mark_all_as_read(&mut session).await;

        assert!(f.items().iter().all(|n| n.is_read));
        assert_eq!(f.unread_local(), 0);
        assert!(f.error().is_some());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[tokio::test]
    async fn test_unread_count_skipped_when_signed_out() {
        let mut session =
            Session::new(ApiClient::new("http://127.0.0.1:9"), TokenStore::in_memory());
        let mut badge = UnreadBadge::default();
        badge.apply(Some(4));

        badge.on_section_change(Section::Profile, &mut session).await;
        assert_eq!(badge.count(), 4);
    }

    #[test]
    fn test_badge_last_response_wins() {
        let mut badge = UnreadBadge::default();
        badge.apply(Some(7));
        badge.apply(Some(2));
        badge.apply(None);
        assert_eq!(badge.count(), 2);
    }

    #[test]
    fn test_section_labels() {
        assert_eq!(Section::NewSubscription.to_string(), "New Subscription");
        assert_eq!(Section::default(), Section::Notifications);
    }
}
