use crate::api::ApiClient;
use crate::config::EnvConfig;
use crate::notifications::{NotificationFeed, Section, UnreadBadge};
use crate::session::Session;
use crate::storage::TokenStore;
use crate::subscription::SubscriptionList;
use leptos::prelude::*;

#[derive(Clone, Copy)]
pub(crate) struct AppState {
    pub config: StoredValue<EnvConfig>,
    pub session: RwSignal<Session>,

    /// True until the stored session has been checked on startup.
    pub restoring: RwSignal<bool>,

    pub section: RwSignal<Section>,
    pub badge: RwSignal<UnreadBadge>,

    pub feed: RwSignal<NotificationFeed>,
    pub subscriptions: RwSignal<SubscriptionList>,
}

impl AppState {
    pub fn new() -> Self {
        let config = EnvConfig::new();
        let session = Session::new(ApiClient::from_config(&config), TokenStore::browser());

        Self {
            config: StoredValue::new(config),
            session: RwSignal::new(session),
            restoring: RwSignal::new(true),
            section: RwSignal::new(Section::default()),
            badge: RwSignal::new(UnreadBadge::default()),
            feed: RwSignal::new(NotificationFeed::default()),
            subscriptions: RwSignal::new(SubscriptionList::default()),
        }
    }

    /// Writes a session copy back after an async operation, but only when
    /// the operation changed who is signed in. Overlapping requests then
    /// cannot resurrect a session another task already ended.
    pub fn commit_session(&self, before: &Session, after: Session) {
        if before.state() != after.state() || before.user() != after.user() {
            self.session.set(after);
        }
    }

    /// Drops everything tied to the previous user.
    pub fn reset_user_data(&self) {
        self.section.set(Section::default());
        self.badge.set(UnreadBadge::default());
        self.feed.set(NotificationFeed::default());
        self.subscriptions.set(SubscriptionList::default());
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext(pub AppState);
