use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Judicial tier of a subscription.
///
/// The backend speaks the SCREAMING_SNAKE wire names; the form works with the
/// human labels (`Display`/`FromStr`), e.g. "District / Taluk Court".
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, EnumIter,
)]
pub enum CourtLevel {
    #[serde(rename = "HIGH_COURT")]
    #[strum(serialize = "High Court")]
    HighCourt,
    #[serde(rename = "DISTRICT_COURT")]
    #[strum(serialize = "District / Taluk Court")]
    DistrictCourt,
    #[serde(rename = "SUPREME_COURT")]
    #[strum(serialize = "Supreme Court")]
    SupremeCourt,
}

impl CourtLevel {
    pub fn label(&self) -> String {
        self.to_string()
    }

    pub fn from_label(label: &str) -> Option<Self> {
        label.parse().ok()
    }

    pub fn wire_name(&self) -> &'static str {
        match self {
            CourtLevel::HighCourt => "HIGH_COURT",
            CourtLevel::DistrictCourt => "DISTRICT_COURT",
            CourtLevel::SupremeCourt => "SUPREME_COURT",
        }
    }

    pub fn from_wire(name: &str) -> Option<Self> {
        CourtLevel::iter().find(|level| level.wire_name() == name)
    }

    pub fn requires_state(&self) -> bool {
        matches!(self, CourtLevel::HighCourt | CourtLevel::DistrictCourt)
    }

    pub fn requires_district(&self) -> bool {
        matches!(self, CourtLevel::DistrictCourt)
    }
}

/// How a subscription identifies its case. Not persisted; implied by which
/// fields the server returns.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SubscriptionMode {
    Advocate,
    Litigant,
    Dataset,
}

impl SubscriptionMode {
    pub fn endpoint(&self) -> &'static str {
        match self {
            SubscriptionMode::Advocate => "/subscriptions/advocate",
            SubscriptionMode::Litigant => "/subscriptions/litigant",
            SubscriptionMode::Dataset => "/subscriptions/case-details",
        }
    }
}

/// Serialized upper-case as the register endpoint expects; read back in any case.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "lowercase")]
pub enum UserRole {
    #[default]
    #[serde(alias = "user", alias = "User")]
    User,
    #[serde(alias = "advocate", alias = "Advocate")]
    Advocate,
}

impl UserRole {
    /// The server sends roles in any case ("ADVOCATE", "Advocate"...).
    /// This is the only place roles get normalized.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|r| r.trim().to_lowercase()).as_deref() {
            Some("advocate") => UserRole::Advocate,
            _ => UserRole::User,
        }
    }
}

/// Raw `GET /user/profile` body.
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[serde(default)]
    pub user_id: Option<serde_json::Value>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub mobile_no: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub advocate_name: Option<String>,
    #[serde(default)]
    pub is_verified: Option<bool>,
}

/// The authenticated user, hydrated from the profile endpoint.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    pub username: String,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub role: UserRole,
    pub advocate_name: Option<String>,
    pub is_verified: bool,
}

impl From<ProfileResponse> for User {
    fn from(p: ProfileResponse) -> Self {
        // Backends have been seen sending numeric ids as well as strings.
        let user_id = match p.user_id {
            Some(serde_json::Value::String(s)) => s,
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };

        Self {
            user_id,
            username: p.username.unwrap_or_default(),
            email: p.email,
            mobile: p.mobile_no.or(p.mobile),
            role: UserRole::parse(p.role.as_deref()),
            advocate_name: p.advocate_name,
            is_verified: p.is_verified.unwrap_or(false),
        }
    }
}

impl User {
    pub fn is_advocate(&self) -> bool {
        self.role == UserRole::Advocate
    }
}

fn default_status() -> String {
    "active".to_string()
}

/// A `null` or blank status reads as active, same as a missing one.
fn status_or_active<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(default_status))
}

fn null_as_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// A subscription as returned by `GET /subscriptions/user/{userId}`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: serde_json::Value,
    #[serde(default)]
    pub subscription_type: Option<String>,
    /// Kept as the raw wire string so unknown tiers still display.
    #[serde(default)]
    pub court_level: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub court_complex: Option<String>,
    #[serde(default)]
    pub court_name: Option<String>,
    #[serde(default)]
    pub case_type: Option<String>,
    #[serde(default)]
    pub case_no: Option<String>,
    #[serde(default)]
    pub case_year: Option<serde_json::Value>,
    #[serde(default)]
    pub advocate_name: Option<String>,
    #[serde(default)]
    pub litigant_name: Option<String>,
    #[serde(default = "default_status", deserialize_with = "status_or_active")]
    pub status: String,
}

impl Subscription {
    pub fn id_string(&self) -> String {
        match &self.id {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Human label for the court level, falling back to the raw wire value.
    pub fn court_type_label(&self) -> String {
        let raw = self.court_level.as_deref().unwrap_or_default();
        CourtLevel::from_wire(raw)
            .map(|level| level.label())
            .unwrap_or_else(|| raw.to_string())
    }

    pub fn mode(&self) -> Option<SubscriptionMode> {
        if self.advocate_name.is_some() {
            Some(SubscriptionMode::Advocate)
        } else if self.litigant_name.is_some() {
            Some(SubscriptionMode::Litigant)
        } else if self.case_type.is_some() || self.case_year.is_some() {
            Some(SubscriptionMode::Dataset)
        } else {
            None
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: serde_json::Value,
    #[serde(default)]
    pub case_ref: Option<String>,
    #[serde(default)]
    pub hearing_id: Option<serde_json::Value>,
    #[serde(default)]
    pub hearing_date: Option<String>,
    #[serde(default)]
    pub hearing_time: Option<String>,
    #[serde(default)]
    pub court: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub parties: Option<String>,
    #[serde(default)]
    pub advocates: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_read: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_sent: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Notification {
    pub fn id_string(&self) -> String {
        match &self.id {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// `GET .../unread-count` answers either `{"count": n}` or a bare `n`.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum UnreadCount {
    Wrapped { count: u64 },
    Bare(u64),
}

impl UnreadCount {
    pub fn value(&self) -> u64 {
        match self {
            UnreadCount::Wrapped { count } => *count,
            UnreadCount::Bare(count) => *count,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub mobile_no: Option<String>,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advocate_name: Option<String>,
}

impl RegisterRequest {
    /// Puts a single contact value into the email or mobile slot.
    pub fn with_contact(mut self, contact: &str) -> Self {
        let contact = contact.trim();
        if contact.contains('@') {
            self.email = Some(contact.to_string());
            self.mobile_no = None;
        } else {
            self.email = None;
            self.mobile_no = Some(contact.to_string());
        }
        self
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advocate_name: Option<String>,
}
