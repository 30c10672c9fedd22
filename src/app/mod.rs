use crate::pages::{
    ForgotPasswordPage, HomePage, LoginPage, RegistrationPage, RootAuthed, RootPage,
};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::{Redirect, Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    let state = AppState::new();
    provide_context(AppContext(state));

    // Restore the stored session before any guarded route decides.
    let mut session = state.session.get_untracked();
    spawn_local(async move {
        session.initialize().await;
        tracing::info!(state = ?session.state(), "session restored");
        state.session.set(session);
        state.restoring.set(false);
    });

    view! {
        <Router>
            <Routes fallback=|| view! { <Redirect path="/" /> }>
                <Route path=path!("login") view=LoginPage />
                <Route path=path!("register") view=RegistrationPage />
                <Route path=path!("forgot-password") view=ForgotPasswordPage />
                <Route path=path!("home") view=move || view! {
                    <RootAuthed>
                        <HomePage />
                    </RootAuthed>
                } />
                <Route path=path!("") view=RootPage />
            </Routes>
        </Router>
    }
}
