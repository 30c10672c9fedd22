pub(crate) fn now_ms() -> i64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now().round() as i64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }
}

pub(crate) fn now_secs() -> i64 {
    now_ms() / 1000
}

/// Trims a user-entered value, treating blank input as absent.
pub(crate) fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank("  a b "), Some("a b".to_string()));
        assert_eq!(non_blank(" \t"), None);
    }

    #[test]
    fn test_now_secs_is_after_2020() {
        assert!(now_secs() > 1_577_836_800);
    }
}
