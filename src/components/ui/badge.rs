use leptos::prelude::*;
use tw_merge::tw_merge;

/// Unread counter shown next to a section label. Hidden at zero.
#[component]
pub fn CountBadge(
    #[prop(into)] count: Signal<u64>,
    #[prop(into, optional)] class: String,
) -> impl IntoView {
    let merged_class = tw_merge!(
        "ml-2 inline-flex min-w-5 items-center justify-center rounded-full bg-destructive px-1.5 text-[10px] font-semibold leading-5 text-white",
        class
    );

    view! {
        <Show when=move || { count.get() > 0 } fallback=|| ().into_view()>
            <span data-name="CountBadge" class=merged_class.clone() aria-label="Unread notifications">
                {move || if count.get() > 99 { "99+".to_string() } else { count.get().to_string() }}
            </span>
        </Show>
    }
}
