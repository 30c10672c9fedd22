use super::home::refresh_unread;
use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardHeader, CardItem, CardList,
    CardTitle, ErrorAlert, Spinner,
};
use crate::models::Notification;
use crate::notifications::{send_mark_all_as_read, send_mark_as_read, Section};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos::task::spawn_local;

fn load_feed(state: AppState, loading: RwSignal<bool>) {
    loading.set(true);
    spawn_local(async move {
        let before = state.session.get_untracked();
        let mut session = before.clone();
        let mut feed = state.feed.get_untracked();
        feed.load(&mut session).await;
        state.feed.set(feed);
        state.commit_session(&before, session);
        loading.set(false);
    });
}

fn mark_read(state: AppState, id: String) {
    state.feed.update(|feed| {
        feed.apply_mark_read(&id);
    });
    spawn_local(async move {
        let before = state.session.get_untracked();
        let mut session = before.clone();
        if let Err(e) = send_mark_as_read(&mut session, &id).await {
            state.feed.update(|feed| feed.record_error(e.message));
        }
        state.commit_session(&before, session);
        refresh_unread(state, Section::Notifications);
    });
}

fn mark_all_read(state: AppState) {
    state.feed.update(|feed| feed.apply_mark_all_read());
    spawn_local(async move {
        let before = state.session.get_untracked();
        let mut session = before.clone();
        if let Err(e) = send_mark_all_as_read(&mut session).await {
            state.feed.update(|feed| feed.record_error(e.message));
        }
        state.commit_session(&before, session);
        refresh_unread(state, Section::Notifications);
    });
}

fn detail_line(label: &'static str, value: Option<String>) -> impl IntoView {
    value.filter(|v| !v.trim().is_empty()).map(|v| {
        view! {
            <div class="text-xs text-muted-foreground">
                <span class="font-medium text-foreground">{label}</span>
                " "
                {v}
            </div>
        }
    })
}

#[component]
fn NotificationRow(notification: Notification) -> impl IntoView {
    let state = expect_context::<AppContext>().0;
    let id = notification.id_string();
    let unread = !notification.is_read;
    let when = [notification.hearing_date.clone(), notification.hearing_time.clone()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

    view! {
        <CardItem class={if unread { "bg-primary/5" } else { "" }}>
            <div class="min-w-0 flex-1 space-y-0.5">
                <div class="flex items-center gap-2 text-sm font-medium">
                    <span class="truncate">{notification.case_ref.clone().unwrap_or_else(|| "Hearing update".to_string())}</span>
                    {unread.then(|| view! { <span class="size-2 rounded-full bg-primary" aria-label="Unread"></span> })}
                </div>
                {detail_line("Hearing:", Some(when))}
                {detail_line("Court:", notification.court.clone())}
                {detail_line("Stage:", notification.stage.clone())}
                {detail_line("Parties:", notification.parties.clone())}
                {detail_line("Advocates:", notification.advocates.clone())}
            </div>
            {unread.then(|| {
                let id = id.clone();
                view! {
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Sm
                        on:click=move |_| mark_read(state, id.clone())
                    >
                        "Mark as read"
                    </Button>
                }
            })}
        </CardItem>
    }
}

#[component]
pub fn NotificationsSection() -> impl IntoView {
    let state = expect_context::<AppContext>().0;
    let loading: RwSignal<bool> = RwSignal::new(false);

    load_feed(state, loading);

    let error = Signal::derive(move || state.feed.with(|f| f.error().map(str::to_string)));
    let has_unread = move || state.feed.with(|f| f.unread_local() > 0);

    view! {
        <Card>
            <CardHeader>
                <div class="flex w-full items-center justify-between gap-2">
                    <CardTitle class="text-base">"Notifications"</CardTitle>
                    <div class="flex items-center gap-1">
                        <Button
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Sm
                            attr:disabled=move || loading.get()
                            on:click=move |_| load_feed(state, loading)
                        >
                            "Refresh"
                        </Button>
                        <Button
                            variant=ButtonVariant::Outline
                            size=ButtonSize::Sm
                            attr:disabled=move || !has_unread()
                            on:click=move |_| mark_all_read(state)
                        >
                            "Mark all as read"
                        </Button>
                    </div>
                </div>
            </CardHeader>
            <CardContent class="space-y-3">
                <ErrorAlert message=error />
                <Show when=move || loading.get() fallback=|| ().into_view()>
                    <div class="flex items-center gap-2 text-xs text-muted-foreground">
                        <Spinner />
                        "Loading notifications..."
                    </div>
                </Show>
                <Show
                    when=move || state.feed.with(|f| !f.items().is_empty())
                    fallback=move || view! {
                        <Show when=move || !loading.get() fallback=|| ().into_view()>
                            <div class="text-sm text-muted-foreground">"No notifications yet."</div>
                        </Show>
                    }
                >
                    <CardList>
                        {move || {
                            state
                                .feed
                                .with(|f| f.items().to_vec())
                                .into_iter()
                                .map(|n| view! { <NotificationRow notification=n /> })
                                .collect_view()
                        }}
                    </CardList>
                </Show>
            </CardContent>
        </Card>
    }
}
