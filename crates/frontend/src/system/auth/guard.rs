use leptos::prelude::*;

use super::context::use_auth;

/// Component that requires authentication
/// Shows fallback if not authenticated
#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let (auth_state, _) = use_auth();

    view! {
        <Show
            when=move || auth_state.get().token.is_some()
            fallback=|| view! { <div>"Требуется вход в систему."</div> }
        >
            {children()}
        </Show>
    }
}

/// Ведение суточного состава доступно только бригадирам
#[component]
pub fn RequireForeman(children: ChildrenFn) -> impl IntoView {
    let (auth_state, _) = use_auth();

    view! {
        <Show
            when=move || {
                auth_state
                    .get()
                    .user
                    .map(|u| u.parsed_role().can_manage_roster())
                    .unwrap_or(false)
            }
            fallback=|| view! { <div>"Раздел доступен только бригадирам."</div> }
        >
            {children()}
        </Show>
    }
}
