use crate::account::{
    check_new_password, conflict_message, otp_failure_message, password_strength,
    RegistrationDraft, ResetError, ResetStep,
};
use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription, CardHeader, CardTitle,
    ErrorAlert, NoticeAlert, SelectField, Spinner, TextField,
};
use crate::models::UserRole;
use crate::session::SessionState;
use crate::state::AppContext;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::Redirect;
use leptos_router::hooks::use_navigate;

#[component]
fn AuthLayout(
    #[prop(into)] title: String,
    #[prop(into)] description: String,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto flex min-h-screen w-full max-w-sm flex-col justify-center px-4 py-10">
                <div class="mb-6 flex items-center justify-center">
                    <a href="/" class="text-sm font-medium text-foreground">"Court Assist"</a>
                </div>
                <Card>
                    <CardHeader>
                        <CardTitle class="text-lg">{title}</CardTitle>
                        <CardDescription class="text-xs">{description}</CardDescription>
                    </CardHeader>
                    <CardContent>{children()}</CardContent>
                </Card>
            </div>
        </div>
    }
}

#[component]
fn SubmitButton(
    #[prop(into)] loading: Signal<bool>,
    #[prop(into)] idle: Signal<String>,
    #[prop(into)] busy: String,
) -> impl IntoView {
    view! {
        <Button class="w-full" size=ButtonSize::Sm attr:disabled=move || loading.get()>
            <span class="inline-flex items-center gap-2">
                <Show when=move || loading.get() fallback=|| ().into_view()>
                    <Spinner />
                </Show>
                {move || if loading.get() { busy.clone() } else { idle.get() }}
            </span>
        </Button>
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let identifier: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let remember_me: RwSignal<bool> = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let state = expect_context::<AppContext>().0;
    let navigate = StoredValue::new(use_navigate());
    let expired = state.session.with_untracked(|s| s.state() == SessionState::Expired);
    let notice: RwSignal<Option<String>> = RwSignal::new(
        expired.then(|| "Your session has expired. Please sign in again.".to_string()),
    );

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let identifier_val = identifier.get();
        let password_val = password.get();
        if identifier_val.trim().is_empty() {
            error.set(Some("Please enter your username, email, or mobile number".to_string()));
            return;
        }
        if password_val.is_empty() {
            error.set(Some("Please enter your password".to_string()));
            return;
        }

        let mut session = state.session.get_untracked();
        let remember = remember_me.get();
        loading.set(true);
        error.set(None);
        notice.set(None);

        spawn_local(async move {
            let outcome = session.login(&identifier_val, &password_val, remember).await;
            state.session.set(session);
            loading.set(false);
            match outcome.user_message() {
                None => {
                    state.reset_user_data();
                    navigate.with_value(|nav| nav("/home", Default::default()));
                }
                Some(message) => error.set(Some(message)),
            }
        });
    };

    let authenticated = move || state.session.with(|s| s.is_authenticated());

    view! {
        <Show when=authenticated fallback=|| ().into_view()>
            <Redirect path="/home" />
        </Show>
        <AuthLayout title="Log in" description="Use your username, email or mobile number to continue.">
            <form class="flex flex-col gap-3" on:submit=on_submit>
                <TextField id="identifier" label="Username, email or mobile" bind_value=identifier required=true />
                <TextField id="password" label="Password" r#type="password" bind_value=password required=true />

                <label class="flex items-center gap-2 text-xs text-muted-foreground">
                    <input
                        type="checkbox"
                        prop:checked=move || remember_me.get()
                        on:change=move |ev| remember_me.set(event_target_checked(&ev))
                    />
                    "Remember me"
                </label>

                <NoticeAlert message=notice />
                <ErrorAlert message=error />

                <SubmitButton loading=loading idle={"Continue".to_string()} busy="Signing in..." />

                <div class="flex justify-between pt-1 text-xs text-muted-foreground">
                    <a class="text-primary underline underline-offset-4" href="/forgot-password">"Forgot password?"</a>
                    <span>
                        "No account? "
                        <a class="text-primary underline underline-offset-4" href="/register">"Sign up"</a>
                    </span>
                </div>
            </form>
        </AuthLayout>
    }
}

#[component]
pub fn RegistrationPage() -> impl IntoView {
    let username: RwSignal<String> = RwSignal::new(String::new());
    let contact: RwSignal<String> = RwSignal::new(String::new());
    let otp: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let confirm_password: RwSignal<String> = RwSignal::new(String::new());
    let role: RwSignal<UserRole> = RwSignal::new(UserRole::User);
    let advocate_name: RwSignal<String> = RwSignal::new(String::new());

    let otp_sent: RwSignal<bool> = RwSignal::new(false);
    // Contact value the server confirmed; editing the contact drops it.
    let verified_contact: RwSignal<Option<String>> = RwSignal::new(None);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let notice: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let state = expect_context::<AppContext>().0;
    let navigate = StoredValue::new(use_navigate());

    let is_verified = move || {
        verified_contact.with(|v| v.as_deref().map(str::trim) == Some(contact.get().trim()))
    };

    let on_send_otp = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        let contact_val = contact.get().trim().to_string();
        if contact_val.is_empty() {
            error.set(Some("Contact is required".to_string()));
            return;
        }
        let api = state.session.with_untracked(|s| s.api().clone());
        loading.set(true);
        error.set(None);
        spawn_local(async move {
            match api.send_contact_verification_otp(&contact_val).await {
                Ok(_) => {
                    otp_sent.set(true);
                    notice.set(Some(format!("Verification code sent to {contact_val}")));
                }
                Err(e) => error.set(Some(otp_failure_message(&e, ResetStep::SendOtp))),
            }
            loading.set(false);
        });
    };

    let on_verify_otp = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        let contact_val = contact.get().trim().to_string();
        let otp_val = otp.get().trim().to_string();
        if otp_val.is_empty() {
            error.set(Some(ResetError::MissingOtp.to_string()));
            return;
        }
        let api = state.session.with_untracked(|s| s.api().clone());
        loading.set(true);
        error.set(None);
        spawn_local(async move {
            match api.verify_contact_verification_otp(&contact_val, &otp_val).await {
                Ok(_) => {
                    verified_contact.set(Some(contact_val));
                    notice.set(Some("Contact verified".to_string()));
                }
                Err(e) => error.set(Some(otp_failure_message(&e, ResetStep::VerifyOtp))),
            }
            loading.set(false);
        });
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let draft = RegistrationDraft {
            username: username.get(),
            contact: contact.get(),
            password: password.get(),
            confirm_password: confirm_password.get(),
            role: role.get(),
            advocate_name: advocate_name.get(),
            contact_verified: is_verified(),
        };
        let request = match draft.validate() {
            Ok(request) => request,
            Err(e) => {
                error.set(Some(e.to_string()));
                return;
            }
        };

        let mut session = state.session.get_untracked();
        loading.set(true);
        error.set(None);
        spawn_local(async move {
            let outcome = session.register(&request).await;
            let signed_in = outcome.signed_in;
            state.session.set(session);
            loading.set(false);

            if !outcome.success {
                let message = outcome
                    .conflict
                    .map(|field| conflict_message(field).to_string())
                    .or(outcome.error)
                    .unwrap_or_else(|| "Registration failed".to_string());
                error.set(Some(format!("Registration failed. {message}")));
            } else if signed_in {
                navigate.with_value(|nav| nav("/home", Default::default()));
            } else {
                notice.set(Some("Account created. Please sign in.".to_string()));
                navigate.with_value(|nav| nav("/login", Default::default()));
            }
        });
    };

    let role_options = Signal::derive(|| vec!["user".to_string(), "advocate".to_string()]);

    view! {
        <AuthLayout title="Create account" description="Register to follow your cases and hearings.">
            <form class="flex flex-col gap-3" on:submit=on_submit>
                <TextField id="username" label="Username" bind_value=username required=true />

                <div class="flex items-end gap-2">
                    <div class="flex-1">
                        <TextField id="contact" label="Email or mobile" bind_value=contact required=true />
                    </div>
                    <Button
                        variant=ButtonVariant::Outline
                        size=ButtonSize::Sm
                        attr:disabled=move || loading.get() || is_verified()
                        on:click=on_send_otp
                    >
                        {move || if otp_sent.get() { "Resend OTP" } else { "Get OTP" }}
                    </Button>
                </div>

                <Show when=move || otp_sent.get() && !is_verified() fallback=|| ().into_view()>
                    <div class="flex items-end gap-2">
                        <div class="flex-1">
                            <TextField id="otp" label="Verification code" bind_value=otp />
                        </div>
                        <Button
                            variant=ButtonVariant::Outline
                            size=ButtonSize::Sm
                                attr:disabled=move || loading.get()
                            on:click=on_verify_otp
                        >
                            "Verify"
                        </Button>
                    </div>
                </Show>

                <TextField id="password" label="Password" r#type="password" bind_value=password required=true />
                {move || password_strength(&password.get()).map(|strength| view! {
                    <p class="text-[11px] text-muted-foreground">"Strength: " {strength.to_string()}</p>
                })}
                <TextField id="confirm-password" label="Confirm password" r#type="password" bind_value=confirm_password required=true />

                <SelectField
                    id="role"
                    label="I am a"
                    options=role_options
                    value=Signal::derive(move || role.get().to_string())
                    on_change=move |v: String| role.set(UserRole::parse(Some(v.as_str())))
                />
                <Show when=move || role.get() == UserRole::Advocate fallback=|| ().into_view()>
                    <TextField id="advocate-name" label="Advocate name" bind_value=advocate_name />
                </Show>

                <NoticeAlert message=notice />
                <ErrorAlert message=error />

                <SubmitButton loading=loading idle={"Create account".to_string()} busy="Creating account..." />

                <div class="pt-1 text-xs text-muted-foreground">
                    "Already registered? "
                    <a class="text-primary underline underline-offset-4" href="/login">"Log in"</a>
                </div>
            </form>
        </AuthLayout>
    }
}

#[component]
pub fn ForgotPasswordPage() -> impl IntoView {
    let contact: RwSignal<String> = RwSignal::new(String::new());
    let otp: RwSignal<String> = RwSignal::new(String::new());
    let new_password: RwSignal<String> = RwSignal::new(String::new());
    let confirm_password: RwSignal<String> = RwSignal::new(String::new());
    let step: RwSignal<ResetStep> = RwSignal::new(ResetStep::SendOtp);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let notice: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let state = expect_context::<AppContext>().0;
    let navigate = StoredValue::new(use_navigate());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let current = step.get();
        let contact_val = contact.get().trim().to_string();
        let otp_val = otp.get().trim().to_string();
        let password_val = new_password.get();

        let precheck = match current {
            ResetStep::SendOtp if contact_val.is_empty() => Err(ResetError::MissingContact),
            ResetStep::VerifyOtp if otp_val.is_empty() => Err(ResetError::MissingOtp),
            ResetStep::SetPassword => check_new_password(&password_val, &confirm_password.get()),
            _ => Ok(()),
        };
        if let Err(e) = precheck {
            error.set(Some(e.to_string()));
            return;
        }

        let api = state.session.with_untracked(|s| s.api().clone());
        loading.set(true);
        error.set(None);
        spawn_local(async move {
            let result = match current {
                ResetStep::SendOtp => api.send_password_reset_otp(&contact_val).await,
                ResetStep::VerifyOtp => api.verify_password_reset_otp(&contact_val, &otp_val).await,
                ResetStep::SetPassword => api.reset_password(&contact_val, &password_val).await,
            };
            loading.set(false);

            match (result, current) {
                (Err(e), _) => error.set(Some(otp_failure_message(&e, current))),
                (Ok(_), ResetStep::SendOtp) => {
                    notice.set(Some("OTP sent to your registered email or mobile number.".to_string()));
                    step.set(ResetStep::VerifyOtp);
                }
                (Ok(_), ResetStep::VerifyOtp) => {
                    notice.set(Some("OTP verified. Please set your new password.".to_string()));
                    step.set(ResetStep::SetPassword);
                }
                (Ok(_), ResetStep::SetPassword) => {
                    navigate.with_value(|nav| nav("/login", Default::default()));
                }
            }
        });
    };

    view! {
        <AuthLayout title="Reset password" description="We will send a one-time code to your email or mobile.">
            <form class="flex flex-col gap-3" on:submit=on_submit>
                <TextField id="contact" label="Email or mobile" bind_value=contact required=true />
                <Show when=move || step.get() != ResetStep::SendOtp fallback=|| ().into_view()>
                    <TextField id="otp" label="Verification code" bind_value=otp />
                </Show>
                <Show when=move || step.get() == ResetStep::SetPassword fallback=|| ().into_view()>
                    <TextField id="new-password" label="New password" r#type="password" bind_value=new_password />
                    <TextField id="confirm-password" label="Confirm password" r#type="password" bind_value=confirm_password />
                </Show>

                <NoticeAlert message=notice />
                <ErrorAlert message=error />

                <SubmitButton
                    loading=loading
                    idle=Signal::derive(move || match step.get() {
                        ResetStep::SendOtp => "Send OTP".to_string(),
                        ResetStep::VerifyOtp => "Verify OTP".to_string(),
                        ResetStep::SetPassword => "Reset password".to_string(),
                    })
                    busy="Please wait..."
                />

                <div class="pt-1 text-xs text-muted-foreground">
                    <a class="text-primary underline underline-offset-4" href="/login">"Back to log in"</a>
                </div>
            </form>
        </AuthLayout>
    }
}
