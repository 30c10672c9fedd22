use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Push-messaging credentials. Opaque to the client core; only the VAPID key
/// is read by the browser push provider.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct PushConfig {
    pub api_key: Option<String>,
    pub auth_domain: Option<String>,
    pub project_id: Option<String>,
    pub sender_id: Option<String>,
    pub app_id: Option<String>,
    pub vapid_key: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct EnvConfig {
    pub api_url: String,
    pub push: PushConfig,
}

impl EnvConfig {
    /// Builds the config from a key lookup. Blank values count as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = get("API_BASE_URL")
            .or_else(|| get("api_url"))
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Self {
            api_url,
            push: PushConfig {
                api_key: get("PUSH_API_KEY"),
                auth_domain: get("PUSH_AUTH_DOMAIN"),
                project_id: get("PUSH_PROJECT_ID"),
                sender_id: get("PUSH_SENDER_ID"),
                app_id: get("PUSH_APP_ID"),
                vapid_key: get("PUSH_VAPID_KEY"),
            },
        }
    }

    /// Reads `window.ENV` in the browser. Both `API_BASE_URL` (documented)
    /// and `api_url` (legacy) are accepted.
    #[cfg(target_arch = "wasm32")]
    pub fn new() -> Self {
        let env = web_sys::window()
            .and_then(|w| w.get("ENV"))
            .filter(|env| !env.is_undefined() && env.is_object());

        Self::from_lookup(|key| {
            let env = env.as_ref()?;
            js_sys::Reflect::get(env, &key.into()).ok()?.as_string()
        })
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn new() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_configured() {
        let cfg = EnvConfig::from_lookup(|_| None);
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.push, PushConfig::default());
    }

    #[test]
    fn test_documented_key_wins_over_legacy_key() {
        let cfg = EnvConfig::from_lookup(lookup_from(&[
            ("API_BASE_URL", "https://courts.example/api/"),
            ("api_url", "http://legacy"),
        ]));
        assert_eq!(cfg.api_url, "https://courts.example/api");
    }

    #[test]
    fn test_legacy_key_and_blank_values() {
        let cfg = EnvConfig::from_lookup(lookup_from(&[
            ("API_BASE_URL", "  "),
            ("api_url", "http://legacy"),
            ("PUSH_VAPID_KEY", "BPk"),
            ("PUSH_APP_ID", ""),
        ]));
        assert_eq!(cfg.api_url, "http://legacy");
        assert_eq!(cfg.push.vapid_key.as_deref(), Some("BPk"));
        assert!(cfg.push.app_id.is_none());
    }
}
