use leptos::prelude::*;
use tw_merge::tw_merge;

const CONTROL_CLASS: &str = "border-input flex h-8 w-full min-w-0 rounded-md border bg-transparent px-3 py-1 text-sm shadow-xs outline-none focus-visible:border-ring focus-visible:ring-2 focus-visible:ring-ring/50 disabled:cursor-not-allowed disabled:opacity-50 aria-invalid:border-destructive";
const LABEL_CLASS: &str = "text-xs font-medium leading-none select-none";

/// Labelled text input bound to a string signal.
#[component]
pub fn TextField(
    #[prop(into)] id: String,
    #[prop(into)] label: String,
    bind_value: RwSignal<String>,
    #[prop(into, default = "text")] r#type: &'static str,
    #[prop(into, optional)] placeholder: String,
    #[prop(optional)] required: bool,
    #[prop(into, optional)] class: String,
    /// Field-level error shown under the input.
    #[prop(into, optional)]
    error: MaybeProp<String>,
) -> impl IntoView {
    let merged_class = tw_merge!(CONTROL_CLASS, class);

    view! {
        <div class="flex flex-col gap-1.5">
            <label class=LABEL_CLASS for=id.clone()>{label}</label>
            <input
                data-name="TextField"
                id=id
                type=r#type
                class=merged_class
                placeholder=placeholder
                required=required
                aria-invalid=move || error.get().is_some().then_some("true")
                prop:value=move || bind_value.get()
                on:input=move |ev| bind_value.set(event_target_value(&ev))
            />
            {move || error.get().map(|e| view! { <p class="text-xs text-destructive">{e}</p> })}
        </div>
    }
}

/// Labelled `<select>` whose options can change underneath it, as in the
/// cascading court selects. An empty value means "nothing chosen".
#[component]
pub fn SelectField(
    #[prop(into)] id: String,
    #[prop(into)] label: String,
    #[prop(into)] options: Signal<Vec<String>>,
    #[prop(into)] value: Signal<String>,
    #[prop(into)] on_change: Callback<String>,
    #[prop(into, optional)] placeholder: String,
    #[prop(into, optional)] disabled: MaybeProp<bool>,
) -> impl IntoView {
    view! {
        <div class="flex flex-col gap-1.5">
            <label class=LABEL_CLASS for=id.clone()>{label}</label>
            <select
                data-name="SelectField"
                id=id
                class=CONTROL_CLASS
                disabled=move || disabled.get().unwrap_or(false)
                on:change=move |ev| on_change.run(event_target_value(&ev))
            >
                <option value="">{placeholder}</option>
                {move || {
                    let current = value.get();
                    options
                        .get()
                        .into_iter()
                        .map(|opt| {
                            let selected = opt == current;
                            view! { <option value=opt.clone() selected=selected>{opt.clone()}</option> }
                        })
                        .collect_view()
                }}
            </select>
        </div>
    }
}

/// Text input driven by a value signal and a change callback, for fields
/// that live inside a larger model rather than their own signal.
#[component]
pub fn InputField(
    #[prop(into)] id: String,
    #[prop(into)] label: String,
    #[prop(into)] value: Signal<String>,
    #[prop(into)] on_input: Callback<String>,
    #[prop(into, default = "text")] r#type: &'static str,
    #[prop(into, optional)] placeholder: String,
) -> impl IntoView {
    view! {
        <div class="flex flex-col gap-1.5">
            <label class=LABEL_CLASS for=id.clone()>{label}</label>
            <input
                data-name="InputField"
                id=id
                type=r#type
                class=CONTROL_CLASS
                placeholder=placeholder
                prop:value=move || value.get()
                on:input=move |ev| on_input.run(event_target_value(&ev))
            />
        </div>
    }
}
