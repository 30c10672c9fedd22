use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::Deserialize;

#[derive(Deserialize)]
struct Claims {
    #[serde(default)]
    exp: Option<f64>,
}

/// Reads the `exp` claim (seconds since epoch) from a JWT payload. The
/// signature is not checked.
///
/// `Err` means the token could not be decoded at all; `Ok(None)` means it
/// decoded but carries no expiry.
pub fn decode_expiry(token: &str) -> Result<Option<i64>, TokenError> {
    let payload = token.split('.').nth(1).ok_or(TokenError::Malformed)?;
    let payload = payload.trim_end_matches('=');

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD_NO_PAD.decode(payload))
        .map_err(|_| TokenError::Encoding)?;
    let claims: Claims = serde_json::from_slice(&bytes).map_err(|_| TokenError::Claims)?;

    Ok(claims.exp.map(|exp| exp as i64))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token is not a three-part JWT")]
    Malformed,
    #[error("token payload is not valid base64")]
    Encoding,
    #[error("token payload is not a JSON claims object")]
    Claims,
}

/// Undecodable tokens count as expired. Tokens without `exp` never expire
/// locally; the server still has the last word.
pub fn is_expired(token: &str, now_secs: i64) -> bool {
    match decode_expiry(token) {
        Ok(Some(exp)) => exp < now_secs,
        Ok(None) => false,
        Err(e) => {
            tracing::debug!(error = %e, "stored token is unreadable");
            true
        }
    }
}

#[cfg(test)]
pub(crate) fn make_jwt(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NOW: i64 = 1_700_000_000;

    #[test]
    fn test_expiry_is_compared_against_now() {
        assert!(!is_expired(&make_jwt(&json!({"exp": NOW + 60})), NOW));
        assert!(is_expired(&make_jwt(&json!({"exp": NOW - 1})), NOW));
        assert!(!is_expired(&make_jwt(&json!({"exp": NOW})), NOW));
    }

    #[test]
    fn test_missing_exp_is_not_expired() {
        let token = make_jwt(&json!({"sub": "u-1"}));
        assert_eq!(decode_expiry(&token), Ok(None));
        assert!(!is_expired(&token, NOW));
    }

    #[test]
    fn test_garbage_is_expired() {
        assert_eq!(decode_expiry("not-a-jwt"), Err(TokenError::Malformed));
        assert_eq!(decode_expiry("a.!!!.c"), Err(TokenError::Encoding));
        assert!(is_expired("", NOW));
        assert!(is_expired("a.!!!.c", NOW));
    }

    #[test]
    fn test_padded_payload_is_accepted() {
        let payload = URL_SAFE_NO_PAD.encode(br#"{"exp":1}"#);
        let token = format!("h.{payload}==.s");
        assert_eq!(decode_expiry(&token), Ok(Some(1)));
    }
}
