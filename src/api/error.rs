use serde_json::Value;

/// Which contact field a conflict refers to, for field-level form errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactField {
    Email,
    Mobile,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 401. Outside the login flow this ends the session.
    Unauthorized,
    NotFound,
    Conflict(Option<ContactField>),
    /// Transport failure; nothing came back from the server.
    Network,
    /// Any other non-2xx answer.
    Server,
    /// A 2xx answer whose body did not match the expected shape.
    Parse,
    /// Rejected locally before any request was made.
    InvalidInput,
}

/// Server messages that identify a duplicate contact.
const KNOWN_CONFLICTS: &[(&str, ContactField)] = &[
    ("Email already registered", ContactField::Email),
    ("Mobile number already registered", ContactField::Mobile),
];

#[derive(Clone, Debug, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    /// HTTP status, when a response was received.
    pub status: Option<u16>,
    pub message: String,
    /// Parsed error body (`{"error": ...}` for non-JSON bodies).
    pub data: Option<Value>,
}

impl ApiError {
    pub(crate) fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            status: None,
            message: e.to_string(),
            data: None,
        }
    }

    pub(crate) fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            status: None,
            message: e.to_string(),
            data: None,
        }
    }

    pub(crate) fn invalid_input(message: &str) -> Self {
        Self {
            kind: ApiErrorKind::InvalidInput,
            status: None,
            message: message.to_string(),
            data: None,
        }
    }

    /// Classifies a non-2xx response by status code and known server codes.
    pub(crate) fn from_response(status: u16, data: Value) -> Self {
        let message = data
            .get("error")
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.to_string())
            .unwrap_or_else(|| format!("HTTP error {status}"));

        let known_conflict = KNOWN_CONFLICTS
            .iter()
            .find(|(code, _)| message.contains(code))
            .map(|(_, field)| *field);

        let kind = match status {
            401 => ApiErrorKind::Unauthorized,
            404 => ApiErrorKind::NotFound,
            409 => ApiErrorKind::Conflict(known_conflict),
            _ if known_conflict.is_some() => ApiErrorKind::Conflict(known_conflict),
            _ => ApiErrorKind::Server,
        };

        Self {
            kind,
            status: Some(status),
            message,
            data: Some(data),
        }
    }

    /// The `error` text the server sent, if any.
    pub fn server_message(&self) -> Option<&str> {
        self.data
            .as_ref()?
            .get("error")?
            .as_str()
            .filter(|s| !s.trim().is_empty())
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ApiErrorKind::Unauthorized
    }

    pub fn is_network(&self) -> bool {
        self.kind == ApiErrorKind::Network
    }

    pub fn conflict_field(&self) -> Option<ContactField> {
        match self.kind {
            ApiErrorKind::Conflict(field) => field,
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_classification() {
        let e = ApiError::from_response(401, json!({"error": "Invalid credentials"}));
        assert_eq!(e.kind, ApiErrorKind::Unauthorized);
        assert_eq!(e.status, Some(401));
        assert_eq!(e.to_string(), "Invalid credentials");

        let e = ApiError::from_response(404, json!({"error": "User not found"}));
        assert_eq!(e.kind, ApiErrorKind::NotFound);

        let e = ApiError::from_response(500, json!({}));
        assert_eq!(e.kind, ApiErrorKind::Server);
        assert_eq!(e.message, "HTTP error 500");
        assert!(e.server_message().is_none());
    }

    #[test]
    fn test_known_conflicts_map_to_fields() {
        let e = ApiError::from_response(400, json!({"error": "Email already registered"}));
        assert_eq!(e.kind, ApiErrorKind::Conflict(Some(ContactField::Email)));
        assert_eq!(e.conflict_field(), Some(ContactField::Email));

        let e = ApiError::from_response(
            409,
            json!({"error": "Mobile number already registered with another account"}),
        );
        assert_eq!(e.conflict_field(), Some(ContactField::Mobile));

        let e = ApiError::from_response(409, json!({"error": "Duplicate subscription"}));
        assert_eq!(e.kind, ApiErrorKind::Conflict(None));
    }

    #[test]
    fn test_blank_error_text_uses_status_fallback() {
        let e = ApiError::from_response(502, json!({"error": "  "}));
        assert_eq!(e.message, "HTTP error 502");
        assert!(e.server_message().is_none());
    }
}
