use crate::models::Subscription;
use crate::session::Session;
use std::collections::BTreeSet;

/// The "My Subscriptions" table: loaded rows, search text and checked ids.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubscriptionList {
    items: Vec<Subscription>,
    search: String,
    selected: BTreeSet<String>,
    error: Option<String>,
}

fn matches(sub: &Subscription, needle: &str) -> bool {
    let label = sub.court_type_label();
    // Bound to a local so the borrowed array drops before `label`.
    #[allow(clippy::let_and_return)]
    let hit = [
        sub.case_no.as_deref(),
        sub.litigant_name.as_deref(),
        sub.advocate_name.as_deref(),
        Some(label.as_str()),
        sub.state.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(needle));
    hit
}

impl SubscriptionList {
    pub fn new(items: Vec<Subscription>) -> Self {
        Self {
            items,
            ..Default::default()
        }
    }

    pub fn items(&self) -> &[Subscription] {
        &self.items
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, search: &str) {
        self.search = search.to_string();
    }

    /// Rows matching the search text, case-insensitively.
    pub fn filtered(&self) -> Vec<&Subscription> {
        let needle = self.search.trim().to_lowercase();
        self.items
            .iter()
            .filter(|sub| needle.is_empty() || matches(sub, &needle))
            .collect()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn selected_ids(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }

    pub fn toggle_selection(&mut self, id: &str) {
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
    }

    pub fn all_filtered_selected(&self) -> bool {
        let visible = self.filtered();
        !visible.is_empty() && visible.iter().all(|s| self.selected.contains(&s.id_string()))
    }

    /// Selects every visible row, or clears the selection when all of them
    /// are already selected.
    pub fn toggle_select_all(&mut self) {
        if self.all_filtered_selected() {
            self.selected.clear();
        } else {
            self.selected = self.filtered().iter().map(|s| s.id_string()).collect();
        }
    }

    /// Drops deleted rows from the table and the selection.
    pub fn remove(&mut self, ids: &[String]) {
        self.items.retain(|s| !ids.contains(&s.id_string()));
        for id in ids {
            self.selected.remove(id);
        }
    }

    pub async fn load(&mut self, session: &mut Session) {
        let Some(user_id) = session.user_id().map(str::to_string) else {
            return;
        };
        let res = session.api().list_subscriptions(&user_id).await;
        match session.guard(res) {
            Ok(items) => {
                self.items = items;
                self.selected.retain(|id| self.items.iter().any(|s| &s.id_string() == id));
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load subscriptions");
                self.error = Some(e.message);
            }
        }
    }

    /// Deletes the given ids one by one. Rows the server confirmed are removed
    /// even if a later delete fails.
    pub async fn delete(&mut self, session: &mut Session, ids: &[String]) {
        let mut deleted = Vec::with_capacity(ids.len());
        self.error = None;
        for id in ids {
            let res = session.api().delete_subscription(id).await;
            match session.guard(res) {
                Ok(_) => deleted.push(id.clone()),
                Err(e) => {
                    tracing::warn!(id, error = %e, "failed to delete subscription");
                    self.error = Some(e.message);
                    break;
                }
            }
        }
        self.remove(&deleted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn list() -> SubscriptionList {
        let items: Vec<Subscription> = serde_json::from_value(json!([
            {"id": 1, "courtLevel": "HIGH_COURT", "state": "Kerala", "caseNo": "WP 10/2024", "litigantName": "Meena"},
            {"id": 2, "courtLevel": "DISTRICT_COURT", "state": "Karnataka", "caseNo": "OS 12/2023", "advocateName": "A. Rao"},
            {"id": "s-3", "courtLevel": "SUPREME_COURT", "caseNo": "SLP 9/2023", "caseType": "Civil"}
        ]))
        .unwrap();
        SubscriptionList::new(items)
    }

    fn ids(rows: Vec<&Subscription>) -> Vec<String> {
        rows.into_iter().map(|s| s.id_string()).collect()
    }

    #[test]
    fn test_search_covers_case_parties_label_and_state() {
        let mut l = list();
        assert_eq!(l.filtered().len(), 3);

        l.set_search("meena");
        assert_eq!(ids(l.filtered()), vec!["1"]);
        l.set_search("rao");
        assert_eq!(ids(l.filtered()), vec!["2"]);
        l.set_search("supreme");
        assert_eq!(ids(l.filtered()), vec!["s-3"]);
        l.set_search("KARNATAKA");
        assert_eq!(ids(l.filtered()), vec!["2"]);
        l.set_search("/2023");
        assert_eq!(ids(l.filtered()), vec!["2", "s-3"]);
    }

    #[test]
    fn test_select_all_applies_to_filtered_rows() {
        let mut l = list();
        l.set_search("2023");
        l.toggle_select_all();
        assert_eq!(l.selected_ids(), vec!["2", "s-3"]);
        assert!(l.all_filtered_selected());

        l.toggle_select_all();
        assert!(l.selected_ids().is_empty());
    }

    #[test]
    fn test_toggle_and_remove() {
        let mut l = list();
        l.toggle_selection("1");
        l.toggle_selection("2");
        l.toggle_selection("2");
        assert!(l.is_selected("1"));
        assert!(!l.is_selected("2"));

        l.remove(&["1".to_string()]);
        assert_eq!(l.items().len(), 2);
        assert!(l.selected_ids().is_empty());
    }
}
