//! Subscription creation and listing.

mod form;
mod list;
mod payload;
mod reference;

pub use form::{
    validate, Available, FormFields, ModeNotAllowed, Selection, SkippedStage, SubscriptionForm,
    ValidationError, NOT_APPLICABLE,
};
pub use list::SubscriptionList;
pub use payload::{ModeFields, SubscriptionPayload};
pub use reference::{Lookup, ReferenceData, SELECT_OPTIONS};

use crate::api::{ApiError, ApiErrorKind};
use crate::models::SubscriptionMode;
use crate::session::Session;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct SubmissionError {
    pub mode: SubscriptionMode,
    pub message: String,
    pub kind: ApiErrorKind,
}

impl SubmissionError {
    fn from_api(mode: SubscriptionMode, e: &ApiError) -> Self {
        Self {
            mode,
            message: e
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| format!("Failed to create {mode} subscription")),
            kind: e.kind.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// Rejected locally; nothing was sent.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Failed(#[from] SubmissionError),
}

impl SubscriptionForm {
    /// Validates, then creates the subscription for the session's user. The
    /// form resets after the server accepts it.
    pub async fn submit(&mut self, session: &mut Session) -> Result<(), SubmitError> {
        if let Some(error) = self.first_error() {
            return Err(error.into());
        }

        let mode = self.mode();
        let payload =
            SubscriptionPayload::build(self.court_level(), self.fields(), mode, session.user());
        let res = session.api().create_subscription(mode, &payload).await;

        match session.guard(res) {
            Ok(_) => {
                tracing::info!(%mode, "subscription created");
                self.reset();
                Ok(())
            }
            Err(e) => Err(SubmissionError::from_api(mode, &e).into()),
        }
    }
}
