//! Client-side rules for the registration and profile forms.

use crate::api::{ApiError, ApiErrorKind, ContactField};
use crate::models::{ProfileUpdate, RegisterRequest, User, UserRole};

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("Username is required")]
    MissingUsername,
    #[error("Contact is required")]
    MissingContact,
    #[error("Password is required")]
    MissingPassword,
    #[error("Password must be at least 8 characters")]
    PasswordTooShort,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Contact must be verified")]
    ContactNotVerified,
    #[error("Advocate name is required")]
    MissingAdvocateName,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

pub fn password_strength(password: &str) -> Option<PasswordStrength> {
    if password.is_empty() {
        return None;
    }
    let has = |f: fn(&char) -> bool| password.chars().any(|c| f(&c));
    let special = |c: &char| "!@#$%^&*(),.?\":{}|<>".contains(*c);

    let score = [
        password.chars().count() >= 8,
        password.chars().count() >= 12,
        has(char::is_ascii_lowercase) && has(char::is_ascii_uppercase),
        has(char::is_ascii_digit),
        has(special),
    ]
    .into_iter()
    .filter(|ok| *ok)
    .count();

    Some(match score {
        s if s >= 4 => PasswordStrength::Strong,
        3 => PasswordStrength::Medium,
        _ => PasswordStrength::Weak,
    })
}

/// Registration form contents. The contact must be verified by OTP before
/// the request can be built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegistrationDraft {
    pub username: String,
    pub contact: String,
    pub password: String,
    pub confirm_password: String,
    pub role: UserRole,
    pub advocate_name: String,
    pub contact_verified: bool,
}

impl RegistrationDraft {
    pub fn validate(&self) -> Result<RegisterRequest, RegistrationError> {
        if self.username.trim().is_empty() {
            return Err(RegistrationError::MissingUsername);
        }
        if self.contact.trim().is_empty() {
            return Err(RegistrationError::MissingContact);
        }
        if self.password.is_empty() {
            return Err(RegistrationError::MissingPassword);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(RegistrationError::PasswordTooShort);
        }
        if self.password != self.confirm_password {
            return Err(RegistrationError::PasswordMismatch);
        }
        if !self.contact_verified {
            return Err(RegistrationError::ContactNotVerified);
        }
        let advocate_name = match self.role {
            UserRole::Advocate => Some(
                crate::util::non_blank(&self.advocate_name)
                    .ok_or(RegistrationError::MissingAdvocateName)?,
            ),
            UserRole::User => None,
        };

        Ok(RegisterRequest {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
            role: self.role,
            advocate_name,
            ..Default::default()
        }
        .with_contact(&self.contact))
    }

    /// Editing the contact invalidates an earlier verification.
    pub fn set_contact(&mut self, contact: &str) {
        if contact.trim() != self.contact.trim() {
            self.contact_verified = false;
        }
        self.contact = contact.to_string();
    }
}

pub fn conflict_message(field: ContactField) -> &'static str {
    match field {
        ContactField::Email => "Email already registered. Please use a different email address.",
        ContactField::Mobile => {
            "Phone number already registered. Please use a different phone number."
        }
    }
}

/// Editable copy of the profile.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    pub username: String,
    pub email: String,
    pub mobile: String,
    pub advocate_name: String,
}

impl ProfileDraft {
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone().unwrap_or_default(),
            mobile: user.mobile.clone().unwrap_or_default(),
            advocate_name: user.advocate_name.clone().unwrap_or_default(),
        }
    }

    /// Only the fields that differ from `original`.
    pub fn changes(&self, original: &User) -> ProfileUpdate {
        let changed = |value: &str, current: Option<&str>| {
            let value = value.trim();
            (value != current.unwrap_or_default().trim()).then(|| value.to_string())
        };
        ProfileUpdate {
            username: changed(&self.username, Some(original.username.as_str())),
            email: changed(&self.email, original.email.as_deref()),
            mobile_no: changed(&self.mobile, original.mobile.as_deref()),
            advocate_name: changed(&self.advocate_name, original.advocate_name.as_deref()),
        }
    }

    /// First changed contact that needs OTP verification before saving.
    pub fn contact_to_verify(&self, original: &User) -> Option<(ContactField, String)> {
        let update = self.changes(original);
        update
            .email
            .filter(|e| !e.is_empty())
            .map(|e| (ContactField::Email, e))
            .or_else(|| {
                update
                    .mobile_no
                    .filter(|m| !m.is_empty())
                    .map(|m| (ContactField::Mobile, m))
            })
    }
}

pub const MIN_RESET_PASSWORD_LEN: usize = 6;

/// Forgot-password flow: request a code, verify it, then set the password.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResetStep {
    #[default]
    SendOtp,
    VerifyOtp,
    SetPassword,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResetError {
    #[error("Please enter your email or mobile number")]
    MissingContact,
    #[error("Please enter OTP")]
    MissingOtp,
    #[error("Passwords do not match.")]
    PasswordMismatch,
    #[error("Password cannot be empty.")]
    EmptyPassword,
    #[error("Password must be at least 6 characters long.")]
    PasswordTooShort,
}

pub fn check_new_password(new_password: &str, confirm: &str) -> Result<(), ResetError> {
    if new_password != confirm {
        return Err(ResetError::PasswordMismatch);
    }
    if new_password.is_empty() {
        return Err(ResetError::EmptyPassword);
    }
    if new_password.chars().count() < MIN_RESET_PASSWORD_LEN {
        return Err(ResetError::PasswordTooShort);
    }
    Ok(())
}

/// User copy for a failed OTP step.
pub fn otp_failure_message(e: &ApiError, step: ResetStep) -> String {
    let detail = e.server_message().unwrap_or(&e.message);
    match (step, &e.kind) {
        (ResetStep::SendOtp, ApiErrorKind::NotFound) => {
            "Account not found. Please check your email or mobile number.".to_string()
        }
        (ResetStep::SendOtp, _) => format!("Failed to send OTP. {detail}"),
        (ResetStep::VerifyOtp, ApiErrorKind::Unauthorized) => {
            "Invalid OTP. Please try again.".to_string()
        }
        (ResetStep::VerifyOtp, _) => format!("Verification failed. {detail}"),
        (ResetStep::SetPassword, _) => format!("Reset failed. {detail}"),
    }
}
