/// Общие элементы списочных экранов: поиск с debounce, индикатор
/// сортировки. Сам конвейер фильтрации и сортировки живёт в
/// `contracts::list` и здесь только потребляется.
use gloo_timers::callback::Timeout;
use leptos::prelude::*;

/// Компонент поиска с debounce и кнопкой очистки
#[component]
pub fn SearchInput(
    /// Callback для обновления значения фильтра
    #[prop(into)]
    on_change: Callback<String>,
    /// Placeholder текст
    #[prop(optional, into)]
    placeholder: String,
) -> impl IntoView {
    let placeholder = if placeholder.is_empty() {
        "Поиск...".to_string()
    } else {
        placeholder
    };

    // Локальное состояние для input (до debounce)
    let (input_value, set_input_value) = signal(String::new());

    let debounce = StoredValue::new_local(None::<Timeout>);

    let handle_input_change = move |new_value: String| {
        set_input_value.set(new_value.clone());

        // замена значения роняет прежний Timeout — это и есть отмена
        let timeout = Timeout::new(300, move || {
            on_change.run(new_value);
        });
        debounce.set_value(Some(timeout));
    };

    let clear_filter = move |_| {
        set_input_value.set(String::new());
        on_change.run(String::new());
    };

    view! {
        <div style="position: relative; display: inline-flex; align-items: center;">
            <input
                type="text"
                placeholder={placeholder}
                style=move || format!(
                    "width: 250px; padding: 6px 32px 6px 10px; border: 1px solid #ddd; border-radius: 4px; font-size: 15px; background: {};",
                    if input_value.get().trim().is_empty() { "white" } else { "#fffbea" }
                )
                prop:value=move || input_value.get()
                on:input=move |ev| {
                    let val = event_target_value(&ev);
                    handle_input_change(val);
                }
            />
            {move || if !input_value.get().is_empty() {
                view! {
                    <button
                        style="position: absolute; right: 6px; background: none; border: none; cursor: pointer; padding: 4px; display: inline-flex; align-items: center; color: #666; line-height: 1;"
                        on:click=clear_filter
                        title="Очистить"
                    >
                        {crate::shared::icons::icon("x")}
                    </button>
                }.into_any()
            } else {
                view! { <></> }.into_any()
            }}
        </div>
    }
}

/// Получить индикатор сортировки для заголовка
pub fn get_sort_indicator(current_field: Option<&str>, field: &str, ascending: bool) -> &'static str {
    if current_field == Some(field) {
        if ascending {
            " ▲"
        } else {
            " ▼"
        }
    } else {
        " ⇅"
    }
}
