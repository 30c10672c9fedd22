use crate::account::{
    check_new_password, conflict_message, otp_failure_message, ProfileDraft, ResetStep,
};
use crate::api::ContactField;
use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription, CardHeader, CardTitle,
    ErrorAlert, NoticeAlert, Spinner, TextField,
};
use crate::models::ProfileUpdate;
use crate::session::ProfileError;
use crate::state::AppContext;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

#[component]
pub fn ProfileSection() -> impl IntoView {
    view! {
        <div class="flex flex-col gap-4">
            <ProfileDetailsCard />
            <ChangePasswordCard />
            <DeleteAccountCard />
        </div>
    }
}

#[component]
fn ProfileDetailsCard() -> impl IntoView {
    let state = expect_context::<AppContext>().0;
    let initial = state
        .session
        .with_untracked(|s| s.user().map(ProfileDraft::from_user).unwrap_or_default());
    let is_advocate = state.session.with_untracked(|s| s.user().is_some_and(|u| u.is_advocate()));

    let username: RwSignal<String> = RwSignal::new(initial.username);
    let email: RwSignal<String> = RwSignal::new(initial.email);
    let mobile: RwSignal<String> = RwSignal::new(initial.mobile);
    let advocate_name: RwSignal<String> = RwSignal::new(initial.advocate_name);

    // Changed contact waiting for its OTP, and the last contact that passed.
    let pending_contact: RwSignal<Option<String>> = RwSignal::new(None);
    let verified_contact: RwSignal<Option<String>> = RwSignal::new(None);
    let otp: RwSignal<String> = RwSignal::new(String::new());

    let email_error: RwSignal<Option<String>> = RwSignal::new(None);
    let mobile_error: RwSignal<Option<String>> = RwSignal::new(None);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let notice: RwSignal<Option<String>> = RwSignal::new(None);
    let saving: RwSignal<bool> = RwSignal::new(false);

    let save = move || {
        let Some(original) = state.session.with_untracked(|s| s.user().cloned()) else {
            return;
        };
        let draft = ProfileDraft {
            username: username.get_untracked(),
            email: email.get_untracked(),
            mobile: mobile.get_untracked(),
            advocate_name: advocate_name.get_untracked(),
        };

        email_error.set(None);
        mobile_error.set(None);
        error.set(None);
        notice.set(None);

        let needs_otp = draft
            .contact_to_verify(&original)
            .map(|(_, contact)| contact)
            .filter(|contact| verified_contact.get_untracked().as_ref() != Some(contact));

        if let Some(contact) = needs_otp {
            let api = state.session.with_untracked(|s| s.api().clone());
            saving.set(true);
            spawn_local(async move {
                match api.send_contact_verification_otp(&contact).await {
                    Ok(_) => {
                        notice.set(Some(format!("Verification code sent to {contact}")));
                        pending_contact.set(Some(contact));
                    }
                    Err(e) => error.set(Some(otp_failure_message(&e, ResetStep::SendOtp))),
                }
                saving.set(false);
            });
            return;
        }

        let update = draft.changes(&original);
        if update == ProfileUpdate::default() {
            notice.set(Some("No changes to save.".to_string()));
            return;
        }

        let before = state.session.get_untracked();
        let mut session = before.clone();
        saving.set(true);
        spawn_local(async move {
            match session.update_profile(&update).await {
                Ok(_) => {
                    pending_contact.set(None);
                    notice.set(Some("Profile updated.".to_string()));
                }
                Err(ProfileError::FieldConflict { field, .. }) => {
                    let message = Some(conflict_message(field).to_string());
                    match field {
                        ContactField::Email => email_error.set(message),
                        ContactField::Mobile => mobile_error.set(message),
                    }
                }
                Err(ProfileError::Api(e)) => {
                    let detail = e.server_message().unwrap_or(&e.message).to_string();
                    error.set(Some(format!("Failed to update profile. {detail}")));
                }
            }
            state.commit_session(&before, session);
            saving.set(false);
        });
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        save();
    };

    let on_verify = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        let Some(contact) = pending_contact.get_untracked() else {
            return;
        };
        let otp_val = otp.get_untracked().trim().to_string();
        if otp_val.is_empty() {
            error.set(Some("Please enter OTP".to_string()));
            return;
        }
        let api = state.session.with_untracked(|s| s.api().clone());
        saving.set(true);
        spawn_local(async move {
            let result = api.verify_contact_verification_otp(&contact, &otp_val).await;
            saving.set(false);
            match result {
                Ok(_) => {
                    verified_contact.set(Some(contact));
                    otp.set(String::new());
                    save();
                }
                Err(e) => error.set(Some(otp_failure_message(&e, ResetStep::VerifyOtp))),
            }
        });
    };

    view! {
        <Card>
            <CardHeader>
                <CardTitle class="text-base">"Profile"</CardTitle>
                <CardDescription class="text-xs">
                    "Changing your email or mobile number requires a verification code."
                </CardDescription>
            </CardHeader>
            <CardContent>
                <form class="flex flex-col gap-3" on:submit=on_submit>
                    <TextField id="profile-username" label="Username" bind_value=username />
                    <TextField id="profile-email" label="Email" r#type="email" bind_value=email error=email_error />
                    <TextField id="profile-mobile" label="Mobile" r#type="tel" bind_value=mobile error=mobile_error />
                    <Show when=move || is_advocate fallback=|| ().into_view()>
                        <TextField id="profile-advocate-name" label="Advocate name" bind_value=advocate_name />
                    </Show>

                    <Show when=move || pending_contact.get().is_some() fallback=|| ().into_view()>
                        <div class="flex items-end gap-2">
                            <div class="flex-1">
                                <TextField id="profile-otp" label="Verification code" bind_value=otp />
                            </div>
                            <Button
                                variant=ButtonVariant::Outline
                                size=ButtonSize::Sm
                                attr:disabled=move || saving.get()
                                on:click=on_verify
                            >
                                "Verify"
                            </Button>
                        </div>
                    </Show>

                    <NoticeAlert message=notice />
                    <ErrorAlert message=error />

                    <Button size=ButtonSize::Sm attr:disabled=move || saving.get()>
                        <span class="inline-flex items-center gap-2">
                            <Show when=move || saving.get() fallback=|| ().into_view()>
                                <Spinner />
                            </Show>
                            "Save changes"
                        </span>
                    </Button>
                </form>
            </CardContent>
        </Card>
    }
}

#[component]
fn ChangePasswordCard() -> impl IntoView {
    let state = expect_context::<AppContext>().0;
    let current: RwSignal<String> = RwSignal::new(String::new());
    let new_password: RwSignal<String> = RwSignal::new(String::new());
    let confirm: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let notice: RwSignal<Option<String>> = RwSignal::new(None);
    let saving: RwSignal<bool> = RwSignal::new(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let current_val = current.get();
        let new_val = new_password.get();
        if current_val.is_empty() {
            error.set(Some("Please enter your current password".to_string()));
            return;
        }
        if let Err(e) = check_new_password(&new_val, &confirm.get()) {
            error.set(Some(e.to_string()));
            return;
        }

        let before = state.session.get_untracked();
        let mut session = before.clone();
        saving.set(true);
        error.set(None);
        notice.set(None);
        spawn_local(async move {
            match session.update_password(&current_val, &new_val).await {
                Ok(()) => {
                    current.set(String::new());
                    new_password.set(String::new());
                    confirm.set(String::new());
                    notice.set(Some("Password updated.".to_string()));
                }
                Err(e) => {
                    let detail = e.server_message().unwrap_or(&e.message).to_string();
                    error.set(Some(format!("Failed to update password. {detail}")));
                }
            }
            state.commit_session(&before, session);
            saving.set(false);
        });
    };

    view! {
        <Card>
            <CardHeader>
                <CardTitle class="text-base">"Change password"</CardTitle>
            </CardHeader>
            <CardContent>
                <form class="flex flex-col gap-3" on:submit=on_submit>
                    <TextField id="current-password" label="Current password" r#type="password" bind_value=current />
                    <TextField id="new-password" label="New password" r#type="password" bind_value=new_password />
                    <TextField id="confirm-new-password" label="Confirm new password" r#type="password" bind_value=confirm />

                    <NoticeAlert message=notice />
                    <ErrorAlert message=error />

                    <Button size=ButtonSize::Sm attr:disabled=move || saving.get()>
                        "Update password"
                    </Button>
                </form>
            </CardContent>
        </Card>
    }
}

#[component]
fn DeleteAccountCard() -> impl IntoView {
    let state = expect_context::<AppContext>().0;
    let navigate = StoredValue::new(use_navigate());
    let confirming: RwSignal<bool> = RwSignal::new(false);
    let deleting: RwSignal<bool> = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    let on_confirm = move |_| {
        let before = state.session.get_untracked();
        let mut session = before.clone();
        deleting.set(true);
        error.set(None);
        spawn_local(async move {
            let result = session.delete_account().await;
            state.commit_session(&before, session);
            deleting.set(false);
            match result {
                Ok(()) => {
                    state.reset_user_data();
                    navigate.with_value(|nav| nav("/login", Default::default()));
                }
                Err(e) => {
                    confirming.set(false);
                    let detail = e.server_message().unwrap_or(&e.message).to_string();
                    error.set(Some(format!("Failed to delete account. {detail}")));
                }
            }
        });
    };

    view! {
        <Card class="border-destructive/30">
            <CardHeader>
                <CardTitle class="text-base">"Delete account"</CardTitle>
                <CardDescription class="text-xs">
                    "Removes your account and all of your subscriptions. This cannot be undone."
                </CardDescription>
            </CardHeader>
            <CardContent class="space-y-3">
                <ErrorAlert message=error />
                <Show
                    when=move || confirming.get()
                    fallback=move || view! {
                        <Button
                            variant=ButtonVariant::Destructive
                            size=ButtonSize::Sm
                            on:click=move |_| confirming.set(true)
                        >
                            "Delete account"
                        </Button>
                    }
                >
                    <div class="flex items-center gap-2">
                        <span class="text-xs text-muted-foreground">"Are you sure?"</span>
                        <Button
                            variant=ButtonVariant::Destructive
                            size=ButtonSize::Sm
                            attr:disabled=move || deleting.get()
                            on:click=on_confirm
                        >
                            "Yes, delete"
                        </Button>
                        <Button
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Sm
                            on:click=move |_| confirming.set(false)
                        >
                            "Cancel"
                        </Button>
                    </div>
                </Show>
            </CardContent>
        </Card>
    }
}
