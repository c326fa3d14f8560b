use leptos::prelude::*;

/// Ячейка-чекбокс для выбора строки. Выбор ведётся по id и не зависит
/// от пагинации; клик не всплывает до обработчика строки.
#[component]
pub fn TableCheckbox(
    checked: Signal<bool>,
    on_change: Callback<bool>,
    #[prop(optional)] disabled: bool,
) -> impl IntoView {
    view! {
        <td class="table__cell table__cell--checkbox" on:click=|e| e.stop_propagation()>
            <input
                type="checkbox"
                class="table__checkbox"
                prop:checked=checked
                prop:disabled=disabled
                on:change=move |ev| {
                    on_change.run(event_target_checked(&ev));
                }
            />
        </td>
    }
}
