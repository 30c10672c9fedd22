use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription, CardHeader, CardTitle,
    ErrorAlert, InputField, NoticeAlert, SelectField, Spinner,
};
use crate::models::{Subscription, SubscriptionMode};
use crate::state::{AppContext, AppState};
use crate::subscription::SubscriptionForm;
use leptos::prelude::*;
use leptos::task::spawn_local;

fn mode_label(mode: SubscriptionMode) -> &'static str {
    match mode {
        SubscriptionMode::Advocate => "Advocate",
        SubscriptionMode::Litigant => "Litigant",
        SubscriptionMode::Dataset => "Case details",
    }
}

fn to_options(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[component]
pub fn NewSubscriptionSection() -> impl IntoView {
    let state = expect_context::<AppContext>().0;
    let role = state
        .session
        .with_untracked(|s| s.user().map(|u| u.role).unwrap_or_default());

    let form: RwSignal<SubscriptionForm> = RwSignal::new(SubscriptionForm::for_user(role));
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let success: RwSignal<Option<String>> = RwSignal::new(None);
    let submitting: RwSignal<bool> = RwSignal::new(false);

    let reference = form.with_untracked(|f| f.reference());
    let court_types = Signal::derive(move || to_options(reference.court_types));
    let states = Signal::derive(move || to_options(reference.states));
    let case_types = Signal::derive(move || to_options(reference.case_types));
    let districts = Signal::derive(move || form.with(|f| to_options(f.available().districts)));
    let complexes =
        Signal::derive(move || form.with(|f| to_options(f.available().court_complexes)));
    let names = Signal::derive(move || form.with(|f| to_options(f.available().court_names)));

    let field = move |read: fn(&SubscriptionForm) -> String| Signal::derive(move || form.with(read));
    let notice = Signal::derive(move || {
        form.with(|f| f.skipped_stage().map(|stage| stage.notice().to_string()))
    });

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let mut draft = form.get_untracked();
        if let Some(e) = draft.first_error() {
            error.set(Some(e.to_string()));
            return;
        }

        let before = state.session.get_untracked();
        let mut session = before.clone();
        submitting.set(true);
        error.set(None);
        success.set(None);

        spawn_local(async move {
            let mode = draft.mode();
            match draft.submit(&mut session).await {
                Ok(()) => {
                    form.set(draft);
                    success.set(Some(format!(
                        "{} subscription created.",
                        mode_label(mode)
                    )));
                }
                Err(e) => error.set(Some(e.to_string())),
            }
            state.commit_session(&before, session);
            submitting.set(false);
        });
    };

    view! {
        <Card>
            <CardHeader>
                <CardTitle class="text-base">"New subscription"</CardTitle>
                <CardDescription class="text-xs">
                    "Get notified when a matching case is listed for hearing."
                </CardDescription>
            </CardHeader>
            <CardContent>
                <form class="flex flex-col gap-3" on:submit=on_submit>
                    <div class="flex flex-wrap gap-2" role="radiogroup" aria-label="Subscription type">
                        {move || {
                            let (modes, current) = form.with(|f| (f.allowed_modes(), f.mode()));
                            modes
                                .into_iter()
                                .map(|mode| {
                                    let variant = if mode == current {
                                        ButtonVariant::Default
                                    } else {
                                        ButtonVariant::Outline
                                    };
                                    view! {
                                        <Button
                                            variant=variant
                                            size=ButtonSize::Sm
                                            on:click=move |ev: web_sys::MouseEvent| {
                                                ev.prevent_default();
                                                if let Some(Err(e)) = form.try_update(|f| f.set_mode(mode)) {
                                                    error.set(Some(e.to_string()));
                                                }
                                            }
                                        >
                                            {mode_label(mode)}
                                        </Button>
                                    }
                                })
                                .collect_view()
                        }}
                    </div>

                    <SelectField
                        id="court-type"
                        label="Court type"
                        placeholder="Select court type"
                        options=court_types
                        value=field(|f| f.court_level().map(|l| l.label()).unwrap_or_default())
                        on_change=move |v: String| form.update(|f| f.select_court_level_label(&v))
                    />

                    <Show when=move || form.with(|f| f.shows_state()) fallback=|| ().into_view()>
                        <SelectField
                            id="state"
                            label="State"
                            placeholder="Select state"
                            options=states
                            value=field(|f| f.fields().state.clone().unwrap_or_default())
                            on_change=move |v: String| form.update(|f| f.select_state(&v))
                        />
                    </Show>

                    <Show when=move || form.with(|f| f.shows_district()) fallback=|| ().into_view()>
                        <SelectField
                            id="district"
                            label="District"
                            placeholder="Select district"
                            options=districts
                            value=field(|f| f.fields().district.clone().unwrap_or_default())
                            on_change=move |v: String| form.update(|f| f.select_district(&v))
                        />
                    </Show>

                    <Show when=move || form.with(|f| f.shows_court_complex()) fallback=|| ().into_view()>
                        <SelectField
                            id="court-complex"
                            label="Court complex"
                            placeholder="Select court complex"
                            options=complexes
                            value=field(|f| f.fields().court_complex.display().to_string())
                            on_change=move |v: String| form.update(|f| f.select_court_complex(&v))
                        />
                    </Show>

                    <Show when=move || form.with(|f| f.shows_court_name()) fallback=|| ().into_view()>
                        <SelectField
                            id="court-name"
                            label="Court name"
                            placeholder="Select court name"
                            options=names
                            value=field(|f| f.fields().court_name.display().to_string())
                            on_change=move |v: String| form.update(|f| f.select_court_name(&v))
                        />
                    </Show>

                    <NoticeAlert message=notice />

                    <InputField
                        id="case-no"
                        label="Case number"
                        placeholder="e.g. OS 123/2024"
                        value=field(|f| f.fields().case_no.clone())
                        on_input=move |v: String| form.update(|f| f.set_case_no(&v))
                    />

                    <Show
                        when=move || form.with(|f| f.mode() == SubscriptionMode::Litigant)
                        fallback=|| ().into_view()
                    >
                        <InputField
                            id="litigant-name"
                            label="Litigant name"
                            value=field(|f| f.fields().litigant_name.clone())
                            on_input=move |v: String| form.update(|f| f.set_litigant_name(&v))
                        />
                    </Show>

                    <Show
                        when=move || form.with(|f| f.mode() == SubscriptionMode::Dataset)
                        fallback=|| ().into_view()
                    >
                        <SelectField
                            id="case-type"
                            label="Case type"
                            placeholder="Select case type"
                            options=case_types
                            value=field(|f| f.fields().case_type.clone())
                            on_change=move |v: String| form.update(|f| f.set_case_type(&v))
                        />
                        <InputField
                            id="case-year"
                            label="Case year"
                            r#type="number"
                            placeholder="2024"
                            value=field(|f| f.fields().case_year.clone())
                            on_input=move |v: String| form.update(|f| f.set_case_year(&v))
                        />
                    </Show>

                    <NoticeAlert message=success />
                    <ErrorAlert message=error />

                    <Button class="w-full" size=ButtonSize::Sm attr:disabled=move || submitting.get()>
                        <span class="inline-flex items-center gap-2">
                            <Show when=move || submitting.get() fallback=|| ().into_view()>
                                <Spinner />
                            </Show>
                            {move || if submitting.get() { "Subscribing..." } else { "Subscribe" }}
                        </span>
                    </Button>
                </form>
            </CardContent>
        </Card>
    }
}

fn load_subscriptions(state: AppState, loading: RwSignal<bool>) {
    loading.set(true);
    spawn_local(async move {
        let before = state.session.get_untracked();
        let mut session = before.clone();
        let mut list = state.subscriptions.get_untracked();
        list.load(&mut session).await;
        state.subscriptions.set(list);
        state.commit_session(&before, session);
        loading.set(false);
    });
}

fn delete_subscriptions(state: AppState, ids: Vec<String>, busy: RwSignal<bool>) {
    if ids.is_empty() {
        return;
    }
    busy.set(true);
    spawn_local(async move {
        let before = state.session.get_untracked();
        let mut session = before.clone();
        let mut list = state.subscriptions.get_untracked();
        list.delete(&mut session, &ids).await;
        state.subscriptions.set(list);
        state.commit_session(&before, session);
        busy.set(false);
    });
}

fn describe(s: &Subscription) -> String {
    let mut parts = vec![s.court_type_label()];
    parts.extend(
        [&s.state, &s.district, &s.court_complex, &s.court_name]
            .into_iter()
            .flatten()
            .filter(|v| !v.trim().is_empty() && v.as_str() != crate::subscription::NOT_APPLICABLE)
            .cloned(),
    );
    parts.join(" · ")
}

fn party(s: &Subscription) -> Option<String> {
    match s.mode()? {
        SubscriptionMode::Advocate => s.advocate_name.clone().map(|n| format!("Advocate: {n}")),
        SubscriptionMode::Litigant => s.litigant_name.clone().map(|n| format!("Litigant: {n}")),
        SubscriptionMode::Dataset => {
            let year = s.case_year.as_ref().map(|y| match y {
                serde_json::Value::String(y) => y.clone(),
                other => other.to_string(),
            });
            let joined = [s.case_type.clone(), year]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ");
            Some(joined).filter(|j| !j.is_empty())
        }
    }
}

#[component]
pub fn MySubscriptionsSection() -> impl IntoView {
    let state = expect_context::<AppContext>().0;
    let loading: RwSignal<bool> = RwSignal::new(false);
    let deleting: RwSignal<bool> = RwSignal::new(false);

    load_subscriptions(state, loading);

    let error =
        Signal::derive(move || state.subscriptions.with(|l| l.error().map(str::to_string)));
    let selected_count = move || state.subscriptions.with(|l| l.selected_ids().len());

    let on_delete_selected = move |_| {
        let ids = state.subscriptions.with_untracked(|l| l.selected_ids());
        delete_subscriptions(state, ids, deleting);
    };

    view! {
        <Card>
            <CardHeader>
                <div class="flex w-full items-center justify-between gap-2">
                    <CardTitle class="text-base">"My subscriptions"</CardTitle>
                    <Button
                        variant=ButtonVariant::Destructive
                        size=ButtonSize::Sm
                        attr:disabled=move || deleting.get() || selected_count() == 0
                        on:click=on_delete_selected
                    >
                        {move || format!("Delete selected ({})", selected_count())}
                    </Button>
                </div>
            </CardHeader>
            <CardContent class="space-y-3">
                <input
                    type="search"
                    class="border-input flex h-8 w-full rounded-md border bg-transparent px-3 py-1 text-sm shadow-xs outline-none"
                    placeholder="Search by case number, party, court or state"
                    prop:value=move || state.subscriptions.with(|l| l.search().to_string())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        state.subscriptions.update(|l| l.set_search(&value));
                    }
                />

                <ErrorAlert message=error />

                <Show when=move || loading.get() fallback=|| ().into_view()>
                    <div class="flex items-center gap-2 text-xs text-muted-foreground">
                        <Spinner />
                        "Loading subscriptions..."
                    </div>
                </Show>

                <Show
                    when=move || state.subscriptions.with(|l| !l.filtered().is_empty())
                    fallback=move || view! {
                        <Show when=move || !loading.get() fallback=|| ().into_view()>
                            <div class="text-sm text-muted-foreground">"No subscriptions found."</div>
                        </Show>
                    }
                >
                    <table class="w-full text-left text-sm">
                        <thead class="text-xs text-muted-foreground">
                            <tr>
                                <th class="w-8 py-2">
                                    <input
                                        type="checkbox"
                                        aria-label="Select all"
                                        prop:checked=move || state.subscriptions.with(|l| l.all_filtered_selected())
                                        on:change=move |_| state.subscriptions.update(|l| l.toggle_select_all())
                                    />
                                </th>
                                <th class="py-2">"Case"</th>
                                <th class="py-2">"Court"</th>
                                <th class="py-2">"Details"</th>
                                <th class="py-2"></th>
                            </tr>
                        </thead>
                        <tbody class="divide-y">
                            {move || {
                                let rows = state.subscriptions.with(|l| {
                                    l.filtered()
                                        .into_iter()
                                        .map(|s| (s.id_string(), s.clone()))
                                        .collect::<Vec<_>>()
                                });
                                rows.into_iter()
                                    .map(|(id, s)| {
                                        let toggle_id = id.clone();
                                        let checked_id = id.clone();
                                        view! {
                                            <tr>
                                                <td class="py-2">
                                                    <input
                                                        type="checkbox"
                                                        prop:checked=move || state.subscriptions.with(|l| l.is_selected(&checked_id))
                                                        on:change=move |_| state.subscriptions.update(|l| l.toggle_selection(&toggle_id))
                                                    />
                                                </td>
                                                <td class="py-2 font-medium">{s.case_no.clone().unwrap_or_default()}</td>
                                                <td class="py-2 text-xs text-muted-foreground">{describe(&s)}</td>
                                                <td class="py-2 text-xs">{party(&s).unwrap_or_default()}</td>
                                                <td class="py-2 text-right">
                                                    <Button
                                                        variant=ButtonVariant::Ghost
                                                        size=ButtonSize::Sm
                                                        attr:disabled=move || deleting.get()
                                                        on:click=move |_| delete_subscriptions(state, vec![id.clone()], deleting)
                                                    >
                                                        "Delete"
                                                    </Button>
                                                </td>
                                            </tr>
                                        }
                                    })
                                    .collect_view()
                            }}
                        </tbody>
                    </table>
                </Show>
            </CardContent>
        </Card>
    }
}
