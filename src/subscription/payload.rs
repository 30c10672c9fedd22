use super::form::FormFields;
use crate::models::{CourtLevel, SubscriptionMode, User};
use serde::Serialize;

/// Mode-specific part of the create request.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum ModeFields {
    Advocate {
        #[serde(rename = "advocateName")]
        advocate_name: Option<String>,
    },
    Litigant {
        #[serde(rename = "litigantName")]
        litigant_name: String,
    },
    Dataset {
        #[serde(rename = "caseType")]
        case_type: String,
        /// `null` when the entered year is not a number.
        #[serde(rename = "caseYear")]
        case_year: Option<i32>,
    },
}

/// Body for `POST /subscriptions/{advocate|litigant|case-details}`.
///
/// Location stages that do not apply to the court level, or were skipped,
/// go out as `null`.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPayload {
    pub user_id: Option<String>,
    pub court_level: Option<CourtLevel>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub court_complex: Option<String>,
    pub court_name: Option<String>,
    pub case_no: String,
    #[serde(flatten)]
    pub mode_fields: ModeFields,
}

impl SubscriptionPayload {
    pub fn build(
        court_level: Option<CourtLevel>,
        fields: &FormFields,
        mode: SubscriptionMode,
        user: Option<&User>,
    ) -> Self {
        let keeps_state = court_level.is_some_and(|l| l.requires_state());
        let keeps_district = court_level.is_some_and(|l| l.requires_district());
        let keep = |applies: bool, value: Option<&str>| {
            value
                .filter(|v| applies && !v.trim().is_empty())
                .map(|v| v.trim().to_string())
        };

        let mode_fields = match mode {
            SubscriptionMode::Advocate => ModeFields::Advocate {
                advocate_name: user.map(|u| {
                    u.advocate_name
                        .clone()
                        .filter(|n| !n.trim().is_empty())
                        .unwrap_or_else(|| u.username.clone())
                }),
            },
            SubscriptionMode::Litigant => ModeFields::Litigant {
                litigant_name: fields.litigant_name.trim().to_string(),
            },
            SubscriptionMode::Dataset => ModeFields::Dataset {
                case_type: fields.case_type.trim().to_string(),
                case_year: fields.case_year.trim().parse().ok(),
            },
        };

        Self {
            user_id: user.map(|u| u.user_id.clone()).filter(|id| !id.is_empty()),
            court_level,
            state: keep(keeps_state, fields.state.as_deref()),
            district: keep(keeps_district, fields.district.as_deref()),
            court_complex: keep(keeps_district, fields.court_complex.as_str()),
            court_name: keep(keeps_district, fields.court_name.as_str()),
            case_no: fields.case_no.trim().to_string(),
            mode_fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;
    use crate::subscription::form::Selection;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn user(advocate_name: Option<&str>) -> User {
        User {
            user_id: "u-7".to_string(),
            username: "asha".to_string(),
            role: UserRole::Advocate,
            advocate_name: advocate_name.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_district_litigant_payload_with_skipped_stages() {
        let fields = FormFields {
            state: Some("Karnataka".to_string()),
            district: Some("Kodagu".to_string()),
            court_complex: Selection::NotApplicable,
            court_name: Selection::NotApplicable,
            case_no: "OS 12/2023".to_string(),
            litigant_name: " Ravi ".to_string(),
            ..Default::default()
        };
        let payload = SubscriptionPayload::build(
            Some(CourtLevel::DistrictCourt),
            &fields,
            SubscriptionMode::Litigant,
            Some(&user(None)),
        );
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "userId": "u-7",
                "courtLevel": "DISTRICT_COURT",
                "state": "Karnataka",
                "district": "Kodagu",
                "courtComplex": null,
                "courtName": null,
                "caseNo": "OS 12/2023",
                "litigantName": "Ravi"
            })
        );
    }

    #[test]
    fn test_supreme_court_carries_no_location() {
        let fields = FormFields {
            state: Some("Kerala".to_string()),
            case_no: "SLP 9/2023".to_string(),
            ..Default::default()
        };
        let payload = SubscriptionPayload::build(
            Some(CourtLevel::SupremeCourt),
            &fields,
            SubscriptionMode::Advocate,
            Some(&user(Some("A. Rao"))),
        );
        let v = serde_json::to_value(&payload).unwrap();
        assert_eq!(v["state"], serde_json::Value::Null);
        assert_eq!(v["district"], serde_json::Value::Null);
        assert_eq!(v["advocateName"], "A. Rao");
    }

    #[test]
    fn test_advocate_name_falls_back_to_username() {
        let payload = SubscriptionPayload::build(
            Some(CourtLevel::HighCourt),
            &FormFields::default(),
            SubscriptionMode::Advocate,
            Some(&user(Some(" "))),
        );
        assert_eq!(
            payload.mode_fields,
            ModeFields::Advocate {
                advocate_name: Some("asha".to_string())
            }
        );
    }

    #[test]
    fn test_dataset_year_is_numeric_or_null() {
        let mut fields = FormFields {
            case_type: "Civil".to_string(),
            case_year: "2021".to_string(),
            ..Default::default()
        };
        let payload =
            SubscriptionPayload::build(None, &fields, SubscriptionMode::Dataset, None);
        let v = serde_json::to_value(&payload).unwrap();
        assert_eq!(v["caseType"], "Civil");
        assert_eq!(v["caseYear"], 2021);
        assert_eq!(v["userId"], serde_json::Value::Null);

        fields.case_year = "twenty".to_string();
        let payload =
            SubscriptionPayload::build(None, &fields, SubscriptionMode::Dataset, None);
        let v = serde_json::to_value(&payload).unwrap();
        assert!(v.as_object().unwrap().contains_key("caseYear"));
        assert_eq!(v["caseYear"], serde_json::Value::Null);
    }
}
