use std::cell::RefCell;

use contracts::system::auth::UserInfo;
use leptos::prelude::*;

use super::storage;

#[derive(Clone, Debug, Default)]
pub struct AuthState {
    pub token: Option<String>,
    pub token_type: String,
    pub user: Option<UserInfo>,
}

thread_local! {
    /// Хук принудительного выхода. Слой HTTP дёргает его на любой 401,
    /// не имея доступа к реактивному контексту.
    static FORCED_LOGOUT: RefCell<Option<Box<dyn Fn()>>> = RefCell::new(None);
}

/// Вызывается слоем HTTP при 401: чистка сессии + сброс состояния,
/// экран входа отрисуется через guard в `AppRoutes`.
pub fn trigger_forced_logout() {
    storage::clear_session();
    FORCED_LOGOUT.with(|hook| {
        if let Some(f) = hook.borrow().as_ref() {
            f();
        }
    });
}

/// Auth context provider component
#[component]
pub fn AuthProvider(children: ChildrenFn) -> impl IntoView {
    // Восстановление сессии из localStorage синхронно, без сети:
    // токен и кэшированный профиль — только UX-непрерывность,
    // источником истины остаётся сервер
    let restored = match (storage::get_token(), storage::get_cached_user()) {
        (Some((token, token_type)), user) => AuthState {
            token: Some(token),
            token_type,
            user,
        },
        _ => AuthState::default(),
    };

    let (auth_state, set_auth_state) = signal(restored);

    FORCED_LOGOUT.with(|hook| {
        *hook.borrow_mut() = Some(Box::new(move || {
            set_auth_state.set(AuthState::default());
        }));
    });

    provide_context(auth_state);
    provide_context(set_auth_state);

    children()
}

/// Hook to access auth state
pub fn use_auth() -> (ReadSignal<AuthState>, WriteSignal<AuthState>) {
    let auth_state =
        use_context::<ReadSignal<AuthState>>().expect("AuthProvider not found in component tree");
    let set_auth_state =
        use_context::<WriteSignal<AuthState>>().expect("AuthProvider not found in component tree");

    (auth_state, set_auth_state)
}

/// Callback выхода для кнопки в шапке
pub fn use_forced_logout() -> Callback<()> {
    let (_, set_auth_state) = use_auth();
    Callback::new(move |_| {
        storage::clear_session();
        set_auth_state.set(AuthState::default());
    })
}

/// id текущего пользователя (для "моего факта" и занятости рабочих)
pub fn current_user_id(auth_state: ReadSignal<AuthState>) -> Option<i64> {
    auth_state.get().user.map(|u| u.id)
}
