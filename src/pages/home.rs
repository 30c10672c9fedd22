use super::notifications::NotificationsSection;
use super::profile::ProfileSection;
use super::subscriptions::{MySubscriptionsSection, NewSubscriptionSection};
use crate::components::ui::{Button, ButtonSize, ButtonVariant, CountBadge, Spinner};
use crate::notifications::{fetch_unread_count, Section};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::Redirect;
use leptos_router::hooks::use_navigate;
use strum::IntoEnumIterator;

/// Re-reads the unread count and applies it to the badge. Responses land in
/// arrival order.
pub(crate) fn refresh_unread(state: AppState, section: Section) {
    spawn_local(async move {
        let before = state.session.get_untracked();
        let mut session = before.clone();
        let count = fetch_unread_count(&mut session).await;
        tracing::debug!(%section, ?count, "unread count refreshed");
        state.badge.update(|badge| badge.apply(count));
        state.commit_session(&before, session);
    });
}

#[cfg(target_arch = "wasm32")]
fn start_push(state: AppState) {
    use crate::push::{register_push_token, WebPushProvider};

    let provider = WebPushProvider::new(state.config.with_value(|c| c.push.vapid_key.clone()));
    let listening = provider.listen_for_messages(move |message| {
        tracing::info!(title = %message.title, "push received in foreground");
        refresh_unread(state, state.section.get_untracked());
    });
    if let Err(e) = listening {
        tracing::warn!(error = %e, "cannot listen for push messages");
    }
    spawn_local(async move {
        let before = state.session.get_untracked();
        let mut session = before.clone();
        register_push_token(&provider, &mut session).await;
        state.commit_session(&before, session);
    });
}

#[cfg(not(target_arch = "wasm32"))]
fn start_push(_state: AppState) {}

/// `/`: sends the visitor to the dashboard or the login page.
#[component]
pub fn RootPage() -> impl IntoView {
    let state = expect_context::<AppContext>().0;

    view! {
        <Show
            when=move || !state.restoring.get()
            fallback=|| view! {
                <div class="flex min-h-screen items-center justify-center text-muted-foreground">
                    <Spinner />
                </div>
            }
        >
            {move || {
                if state.session.with(|s| s.is_authenticated()) {
                    view! { <Redirect path="/home" /> }.into_any()
                } else {
                    view! { <Redirect path="/login" /> }.into_any()
                }
            }}
        </Show>
    }
}

/// Renders `children` only for a signed-in user. Waits for the startup
/// session check, then redirects anonymous visitors to `/login`.
#[component]
pub fn RootAuthed(children: ChildrenFn) -> impl IntoView {
    let state = expect_context::<AppContext>().0;
    let children = StoredValue::new(children);

    view! {
        <Show
            when=move || !state.restoring.get()
            fallback=|| view! {
                <div class="flex min-h-screen items-center justify-center text-muted-foreground">
                    <Spinner />
                </div>
            }
        >
            <Show
                when=move || state.session.with(|s| s.is_authenticated())
                fallback=|| view! { <Redirect path="/login" /> }
            >
                {children.with_value(|children| children())}
            </Show>
        </Show>
    }
}

#[component]
pub fn HomePage() -> impl IntoView {
    let state = expect_context::<AppContext>().0;
    let navigate = StoredValue::new(use_navigate());
    let logging_out: RwSignal<bool> = RwSignal::new(false);

    // Runs once on mount and again on every section switch.
    Effect::new(move |_| {
        let section = state.section.get();
        refresh_unread(state, section);
    });

    start_push(state);

    let username = move || {
        state
            .session
            .with(|s| s.user().map(|u| u.username.clone()).unwrap_or_default())
    };

    let on_logout = move |_| {
        let mut session = state.session.get_untracked();
        logging_out.set(true);
        spawn_local(async move {
            session.logout().await;
            state.session.set(session);
            state.reset_user_data();
            logging_out.set(false);
            navigate.with_value(|nav| nav("/login", Default::default()));
        });
    };

    let unread = Signal::derive(move || state.badge.with(|b| b.count()));

    view! {
        <div class="min-h-screen bg-background">
            <header class="border-b border-border">
                <div class="mx-auto flex h-12 max-w-5xl items-center justify-between px-4">
                    <span class="text-sm font-semibold">"Court Assist"</span>
                    <div class="flex items-center gap-3 text-xs text-muted-foreground">
                        <span>{username}</span>
                        <Button
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Sm
                            attr:disabled=move || logging_out.get()
                            on:click=on_logout
                        >
                            "Log out"
                        </Button>
                    </div>
                </div>
            </header>

            <nav class="border-b border-border">
                <div class="mx-auto flex max-w-5xl gap-1 overflow-x-auto px-4 py-2">
                    {Section::iter()
                        .map(|section| {
                            let active = move || state.section.get() == section;
                            view! {
                                <button
                                    class="inline-flex items-center rounded-md px-3 py-1.5 text-sm transition-colors hover:bg-accent"
                                    class:bg-accent=active
                                    class:font-medium=active
                                    aria-current=move || active().then_some("page")
                                    on:click=move |_| state.section.set(section)
                                >
                                    {section.to_string()}
                                    {(section == Section::Notifications)
                                        .then(|| view! { <CountBadge count=unread /> })}
                                </button>
                            }
                        })
                        .collect_view()}
                </div>
            </nav>

            <main class="mx-auto max-w-5xl px-4 py-6">
                {move || match state.section.get() {
                    Section::Notifications => view! { <NotificationsSection /> }.into_any(),
                    Section::NewSubscription => view! { <NewSubscriptionSection /> }.into_any(),
                    Section::MySubscriptions => view! { <MySubscriptionsSection /> }.into_any(),
                    Section::Profile => view! { <ProfileSection /> }.into_any(),
                }}
            </main>
        </div>
    }
}
