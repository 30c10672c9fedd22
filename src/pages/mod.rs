mod auth;
mod home;
mod notifications;
mod profile;
mod subscriptions;

pub use auth::{ForgotPasswordPage, LoginPage, RegistrationPage};
pub use home::{HomePage, RootAuthed, RootPage};
