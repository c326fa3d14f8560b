use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::system::auth::{api, context::use_auth, storage};

#[component]
pub fn LoginPage() -> impl IntoView {
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (error_message, set_error_message) = signal(Option::<String>::None);
    let (is_loading, set_is_loading) = signal(false);

    let (_, set_auth_state) = use_auth();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let email_val = email.get();
        let password_val = password.get();

        set_is_loading.set(true);
        set_error_message.set(None);

        spawn_local(async move {
            match api::login(email_val, password_val).await {
                Ok(response) => {
                    storage::save_session(&response.token, &response.token_type, &response.user);

                    // смена состояния автоматически переключает на MainLayout
                    set_auth_state.set(crate::system::auth::context::AuthState {
                        token: Some(response.token),
                        token_type: response.token_type,
                        user: Some(response.user),
                    });

                    set_is_loading.set(false);
                }
                Err(e) => {
                    set_error_message.set(Some(format!("Не удалось войти: {}", e)));
                    set_is_loading.set(false);
                }
            }
        });
    };

    view! {
        <div class="login-container">
            <div class="login-box">
                <h1>"Бригада"</h1>
                <h2>"Вход в систему"</h2>

                <Show when=move || error_message.get().is_some()>
                    <div class="error-message">
                        {move || error_message.get().unwrap_or_default()}
                    </div>
                </Show>

                <form on:submit=on_submit>
                    <div class="form-group">
                        <label for="email">"Почта"</label>
                        <input
                            type="email"
                            id="email"
                            placeholder="admin@example.com"
                            value=move || email.get()
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                            required
                            disabled=move || is_loading.get()
                        />
                    </div>

                    <div class="form-group">
                        <label for="password">"Пароль"</label>
                        <input
                            type="password"
                            id="password"
                            value=move || password.get()
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                            required
                            disabled=move || is_loading.get()
                        />
                    </div>

                    <button type="submit" class="btn-primary" disabled=move || is_loading.get()>
                        {move || if is_loading.get() { "Вход..." } else { "Войти" }}
                    </button>
                </form>
            </div>
        </div>
    }
}
