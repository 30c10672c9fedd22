//! Cascading subscription form: court level → state → district → complex → court name.

use super::reference::{ReferenceData, SELECT_OPTIONS};
use crate::models::{CourtLevel, SubscriptionMode, UserRole};

/// Display value for a stage that has no reference data.
pub const NOT_APPLICABLE: &str = "N/A";

/// Value of a cascading select. `NotApplicable` is only ever set by the form
/// itself when a stage is skipped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Unset,
    NotApplicable,
    Chosen(String),
}

impl Selection {
    fn from_input(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() {
            Selection::Unset
        } else {
            Selection::Chosen(value.to_string())
        }
    }

    /// The chosen value; `None` for unset and skipped stages.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Selection::Chosen(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_chosen(&self) -> bool {
        matches!(self, Selection::Chosen(_))
    }

    /// What the select element shows.
    pub fn display(&self) -> &str {
        match self {
            Selection::Unset => "",
            Selection::NotApplicable => NOT_APPLICABLE,
            Selection::Chosen(v) => v,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormFields {
    pub state: Option<String>,
    pub district: Option<String>,
    pub court_complex: Selection,
    pub court_name: Selection,
    pub case_no: String,
    pub litigant_name: String,
    pub case_type: String,
    pub case_year: String,
}

impl FormFields {
    fn clear_location(&mut self) {
        self.state = None;
        self.district = None;
        self.court_complex = Selection::Unset;
        self.court_name = Selection::Unset;
    }
}

/// Option lists currently offered by the dependent selects.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Available {
    pub districts: &'static [&'static str],
    pub court_complexes: &'static [&'static str],
    pub court_names: &'static [&'static str],
}

/// A stage the form skipped because the reference data has nothing for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkippedStage {
    CourtComplex,
    CourtName,
}

impl SkippedStage {
    pub fn notice(&self) -> &'static str {
        match self {
            SkippedStage::CourtComplex => {
                "Court complex data not available for this district - skipping"
            }
            SkippedStage::CourtName => "Court name data not available for this complex - skipping",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please select a court type")]
    MissingCourtLevel,
    #[error("Case number is required")]
    MissingCaseNumber,
    #[error("State is required for {}", court_phrase(.0))]
    MissingState(CourtLevel),
    #[error("District is required for District/Taluk courts")]
    MissingDistrict,
    #[error("Court complex is required for District/Taluk courts")]
    MissingCourtComplex,
    #[error("Court name is required for District/Taluk courts")]
    MissingCourtName,
    #[error("Litigant name is required")]
    MissingLitigantName,
    #[error("Case type is required")]
    MissingCaseType,
    #[error("Case year is required")]
    MissingCaseYear,
}

fn court_phrase(level: &CourtLevel) -> &'static str {
    match level {
        CourtLevel::DistrictCourt => "District/Taluk courts",
        CourtLevel::HighCourt => "High Court",
        CourtLevel::SupremeCourt => "Supreme Court",
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Only advocates can create advocate subscriptions")]
pub struct ModeNotAllowed;

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Checks the fields against the rules for the chosen court level and mode.
/// Errors come back in a fixed order; an empty list means the form can be
/// submitted.
pub fn validate(
    court_level: Option<CourtLevel>,
    fields: &FormFields,
    mode: SubscriptionMode,
    reference: &ReferenceData,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if court_level.is_none() {
        errors.push(ValidationError::MissingCourtLevel);
    }
    if blank(&fields.case_no) {
        errors.push(ValidationError::MissingCaseNumber);
    }

    match court_level {
        Some(level @ CourtLevel::DistrictCourt) => {
            match fields.state.as_deref() {
                None => errors.push(ValidationError::MissingState(level)),
                Some(_) if fields.district.is_none() => {
                    errors.push(ValidationError::MissingDistrict)
                }
                Some(_) => {}
            }

            if let Some(district) = fields.district.as_deref() {
                if reference.court_complexes(district).has_choices()
                    && !fields.court_complex.is_chosen()
                {
                    errors.push(ValidationError::MissingCourtComplex);
                }
            }

            if let Some(complex) = fields.court_complex.as_str() {
                if reference.court_names(complex).has_choices() && !fields.court_name.is_chosen() {
                    errors.push(ValidationError::MissingCourtName);
                }
            }
        }
        Some(level @ CourtLevel::HighCourt) => {
            if fields.state.is_none() {
                errors.push(ValidationError::MissingState(level));
            }
        }
        Some(CourtLevel::SupremeCourt) | None => {}
    }

    match mode {
        SubscriptionMode::Litigant if blank(&fields.litigant_name) => {
            errors.push(ValidationError::MissingLitigantName)
        }
        SubscriptionMode::Dataset => {
            if blank(&fields.case_type) {
                errors.push(ValidationError::MissingCaseType);
            }
            if blank(&fields.case_year) {
                errors.push(ValidationError::MissingCaseYear);
            }
        }
        _ => {}
    }

    errors
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubscriptionForm {
    role: UserRole,
    court_level: Option<CourtLevel>,
    mode: SubscriptionMode,
    fields: FormFields,
    available: Available,
    reference: &'static ReferenceData,
}

impl SubscriptionForm {
    /// Advocates start in advocate mode, everyone else in litigant mode.
    pub fn for_user(role: UserRole) -> Self {
        Self::with_reference(role, &SELECT_OPTIONS)
    }

    pub fn with_reference(role: UserRole, reference: &'static ReferenceData) -> Self {
        let mode = match role {
            UserRole::Advocate => SubscriptionMode::Advocate,
            UserRole::User => SubscriptionMode::Litigant,
        };
        Self {
            role,
            court_level: None,
            mode,
            fields: FormFields::default(),
            available: Available::default(),
            reference,
        }
    }

    pub fn court_level(&self) -> Option<CourtLevel> {
        self.court_level
    }

    pub fn mode(&self) -> SubscriptionMode {
        self.mode
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn available(&self) -> &Available {
        &self.available
    }

    pub fn reference(&self) -> &'static ReferenceData {
        self.reference
    }

    /// Modes this user may pick, in display order.
    pub fn allowed_modes(&self) -> Vec<SubscriptionMode> {
        let mut modes = Vec::with_capacity(3);
        if self.role == UserRole::Advocate {
            modes.push(SubscriptionMode::Advocate);
        }
        modes.push(SubscriptionMode::Litigant);
        modes.push(SubscriptionMode::Dataset);
        modes
    }

    /// Changing the court level clears every dependent field, location and
    /// case details alike. The mode stays.
    pub fn select_court_level(&mut self, level: Option<CourtLevel>) {
        self.court_level = level;
        self.fields = FormFields::default();
        self.available = Available::default();
    }

    pub fn select_court_level_label(&mut self, label: &str) {
        self.select_court_level(CourtLevel::from_label(label.trim()));
    }

    pub fn select_state(&mut self, state: &str) {
        let state = state.trim();
        self.fields.clear_location();
        self.available = Available::default();
        if state.is_empty() {
            return;
        }
        self.available.districts = self.reference.districts(state).choices();
        self.fields.state = Some(state.to_string());
    }

    pub fn select_district(&mut self, district: &str) {
        let district = district.trim();
        self.fields.court_complex = Selection::Unset;
        self.fields.court_name = Selection::Unset;
        self.available.court_complexes = &[];
        self.available.court_names = &[];

        if district.is_empty() {
            self.fields.district = None;
            return;
        }
        self.fields.district = Some(district.to_string());

        let complexes = self.reference.court_complexes(district);
        if complexes.has_choices() {
            self.available.court_complexes = complexes.choices();
        } else {
            tracing::debug!(district, "no court complex data, skipping stage");
            self.fields.court_complex = Selection::NotApplicable;
            self.fields.court_name = Selection::NotApplicable;
        }
    }

    pub fn select_court_complex(&mut self, complex: &str) {
        self.fields.court_complex = Selection::from_input(complex);
        self.fields.court_name = Selection::Unset;
        self.available.court_names = &[];

        let Some(complex) = self.fields.court_complex.as_str() else {
            return;
        };
        let names = self.reference.court_names(complex);
        if names.has_choices() {
            self.available.court_names = names.choices();
        } else {
            tracing::debug!(complex, "no court name data, skipping stage");
            self.fields.court_name = Selection::NotApplicable;
        }
    }

    pub fn select_court_name(&mut self, name: &str) {
        self.fields.court_name = Selection::from_input(name);
    }

    pub fn set_mode(&mut self, mode: SubscriptionMode) -> Result<(), ModeNotAllowed> {
        if mode == SubscriptionMode::Advocate && self.role != UserRole::Advocate {
            return Err(ModeNotAllowed);
        }
        self.mode = mode;
        Ok(())
    }

    pub fn set_case_no(&mut self, value: &str) {
        self.fields.case_no = value.to_string();
    }

    pub fn set_litigant_name(&mut self, value: &str) {
        self.fields.litigant_name = value.to_string();
    }

    pub fn set_case_type(&mut self, value: &str) {
        self.fields.case_type = value.to_string();
    }

    pub fn set_case_year(&mut self, value: &str) {
        self.fields.case_year = value.to_string();
    }

    pub fn shows_state(&self) -> bool {
        self.court_level.is_some_and(|l| l.requires_state())
    }

    pub fn shows_district(&self) -> bool {
        self.court_level.is_some_and(|l| l.requires_district()) && self.fields.state.is_some()
    }

    pub fn shows_court_complex(&self) -> bool {
        self.shows_district()
            && self.fields.district.is_some()
            && !self.available.court_complexes.is_empty()
    }

    pub fn shows_court_name(&self) -> bool {
        self.shows_court_complex()
            && self.fields.court_complex.is_chosen()
            && !self.available.court_names.is_empty()
    }

    /// The stage to announce as skipped, if any.
    pub fn skipped_stage(&self) -> Option<SkippedStage> {
        if !self.court_level.is_some_and(|l| l.requires_district()) {
            return None;
        }
        if self.fields.district.is_some() && self.fields.court_complex == Selection::NotApplicable {
            return Some(SkippedStage::CourtComplex);
        }
        if self.fields.court_complex.is_chosen() && self.fields.court_name == Selection::NotApplicable
        {
            return Some(SkippedStage::CourtName);
        }
        None
    }

    pub fn validate(&self) -> Vec<ValidationError> {
        validate(self.court_level, &self.fields, self.mode, self.reference)
    }

    pub fn first_error(&self) -> Option<ValidationError> {
        self.validate().into_iter().next()
    }

    /// Back to the initial state for the same user.
    pub fn reset(&mut self) {
        *self = Self::with_reference(self.role, self.reference);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn district_form(role: UserRole) -> SubscriptionForm {
        let mut form = SubscriptionForm::for_user(role);
        form.select_court_level(Some(CourtLevel::DistrictCourt));
        form
    }

    #[test]
    fn test_initial_mode_follows_role() {
        assert_eq!(
            SubscriptionForm::for_user(UserRole::Advocate).mode(),
            SubscriptionMode::Advocate
        );
        assert_eq!(
            SubscriptionForm::for_user(UserRole::User).mode(),
            SubscriptionMode::Litigant
        );
    }

    #[test]
    fn test_non_advocate_cannot_pick_advocate_mode() {
        let mut form = SubscriptionForm::for_user(UserRole::User);
        assert_eq!(form.set_mode(SubscriptionMode::Advocate), Err(ModeNotAllowed));
        assert_eq!(form.mode(), SubscriptionMode::Litigant);
        assert!(!form.allowed_modes().contains(&SubscriptionMode::Advocate));

        assert!(form.set_mode(SubscriptionMode::Dataset).is_ok());
        assert_eq!(form.mode(), SubscriptionMode::Dataset);
    }

    #[test]
    fn test_state_change_resets_downstream() {
        let mut form = district_form(UserRole::User);
        form.select_state("Karnataka");
        form.select_district("Bengaluru Urban");
        form.select_court_complex("Family Court Complex");
        form.select_court_name("Principal Family Court");

        form.select_state("Kerala");
        let fields = form.fields();
        assert_eq!(fields.state.as_deref(), Some("Kerala"));
        assert!(fields.district.is_none());
        assert_eq!(fields.court_complex, Selection::Unset);
        assert_eq!(fields.court_name, Selection::Unset);
        assert!(form.available().districts.contains(&"Wayanad"));
        assert!(form.available().court_complexes.is_empty());
    }

    #[test]
    fn test_district_change_resets_complex_and_name() {
        let mut form = district_form(UserRole::User);
        form.select_state("Karnataka");
        form.select_district("Bengaluru Urban");
        form.select_court_complex("Family Court Complex");
        form.select_court_name("Principal Family Court");

        form.select_district("Mysuru");
        assert_eq!(form.fields().court_complex, Selection::Unset);
        assert_eq!(form.fields().court_name, Selection::Unset);
        assert!(form.available().court_names.is_empty());
        assert!(form.shows_court_complex());
        assert!(!form.shows_court_name());
    }

    #[test]
    fn test_district_without_complexes_skips_both_stages() {
        let mut form = district_form(UserRole::User);
        form.select_state("Karnataka");
        form.select_district("Kodagu");

        assert_eq!(form.fields().court_complex, Selection::NotApplicable);
        assert_eq!(form.fields().court_name, Selection::NotApplicable);
        assert_eq!(form.fields().court_complex.display(), "N/A");
        assert!(!form.shows_court_complex());
        assert!(!form.shows_court_name());
        assert_eq!(form.skipped_stage(), Some(SkippedStage::CourtComplex));
        assert_eq!(
            form.skipped_stage().map(|s| s.notice()),
            Some("Court complex data not available for this district - skipping")
        );
    }

    #[test]
    fn test_complex_without_names_skips_name_stage() {
        let mut form = district_form(UserRole::User);
        form.select_state("Maharashtra");
        form.select_district("Mumbai City");
        form.select_court_complex("Family Court");

        assert_eq!(form.fields().court_name, Selection::NotApplicable);
        assert!(!form.shows_court_name());
        assert_eq!(form.skipped_stage(), Some(SkippedStage::CourtName));
    }

    #[test]
    fn test_court_level_change_resets_dependent_fields() {
        let mut form = district_form(UserRole::User);
        form.set_case_no("OS 12/2023");
        form.set_litigant_name("Ravi");
        form.select_state("Karnataka");
        form.select_district("Kodagu");

        form.select_court_level(Some(CourtLevel::HighCourt));
        assert_eq!(form.fields(), &FormFields::default());
        assert_eq!(form.available(), &Available::default());
        assert_eq!(form.mode(), SubscriptionMode::Litigant);
        assert!(form.shows_state());
        assert!(!form.shows_district());
    }

    #[test]
    fn test_visibility_by_court_level() {
        let mut form = SubscriptionForm::for_user(UserRole::User);
        assert!(!form.shows_state());

        form.select_court_level_label("Supreme Court");
        assert_eq!(form.court_level(), Some(CourtLevel::SupremeCourt));
        assert!(!form.shows_state());

        form.select_court_level_label("District / Taluk Court");
        assert!(form.shows_state());
        assert!(!form.shows_district());
        form.select_state("Tamil Nadu");
        assert!(form.shows_district());
    }

    #[test]
    fn test_validate_empty_form_in_order() {
        let form = SubscriptionForm::for_user(UserRole::User);
        assert_eq!(
            form.validate(),
            vec![
                ValidationError::MissingCourtLevel,
                ValidationError::MissingCaseNumber,
                ValidationError::MissingLitigantName,
            ]
        );
        assert_eq!(
            form.first_error().map(|e| e.to_string()).as_deref(),
            Some("Please select a court type")
        );
    }

    #[test]
    fn test_validate_district_court_stages() {
        let mut form = district_form(UserRole::Advocate);
        form.set_case_no("CC 5/2024");
        assert_eq!(
            form.validate(),
            vec![ValidationError::MissingState(CourtLevel::DistrictCourt)]
        );
        assert_eq!(
            form.validate()[0].to_string(),
            "State is required for District/Taluk courts"
        );

        form.select_state("Karnataka");
        assert_eq!(form.validate(), vec![ValidationError::MissingDistrict]);

        form.select_district("Bengaluru Urban");
        assert_eq!(form.validate(), vec![ValidationError::MissingCourtComplex]);

        form.select_court_complex("Magistrate Court Complex");
        assert_eq!(form.validate(), vec![ValidationError::MissingCourtName]);

        form.select_court_name("Metropolitan Magistrate");
        assert!(form.validate().is_empty());
    }

    #[test]
    fn test_validate_skipped_stages_are_not_required() {
        let mut form = district_form(UserRole::User);
        form.set_case_no("OS 1/2020");
        form.set_litigant_name("Meena");
        form.select_state("Karnataka");
        form.select_district("Kodagu");
        assert!(form.validate().is_empty());
    }

    #[test]
    fn test_validate_high_court_and_dataset_mode() {
        let mut form = SubscriptionForm::for_user(UserRole::User);
        form.select_court_level(Some(CourtLevel::HighCourt));
        form.set_case_no("WP 100/2024");
        form.set_mode(SubscriptionMode::Dataset).unwrap();
        assert_eq!(
            form.validate(),
            vec![
                ValidationError::MissingState(CourtLevel::HighCourt),
                ValidationError::MissingCaseType,
                ValidationError::MissingCaseYear,
            ]
        );
        assert_eq!(form.validate()[0].to_string(), "State is required for High Court");

        form.select_state("Kerala");
        form.set_case_type("Civil");
        form.set_case_year("2024");
        assert!(form.validate().is_empty());
    }

    #[test]
    fn test_whitespace_case_number_is_missing() {
        let mut form = SubscriptionForm::for_user(UserRole::Advocate);
        form.select_court_level(Some(CourtLevel::SupremeCourt));
        form.set_case_no("   ");
        assert_eq!(form.validate(), vec![ValidationError::MissingCaseNumber]);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut form = district_form(UserRole::Advocate);
        form.select_state("Karnataka");
        form.set_case_no("x");
        form.set_mode(SubscriptionMode::Dataset).unwrap();
        form.reset();
        assert_eq!(form, SubscriptionForm::for_user(UserRole::Advocate));
    }
}
