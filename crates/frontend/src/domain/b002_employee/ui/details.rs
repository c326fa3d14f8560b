use contracts::domain::Employee;
use contracts::sync::Tracked;
use contracts::validation;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::b002_employee::api;
use crate::shared::date_utils::{parse_input_date, to_input_date};

/// Карточка сотрудника. `id = None` — создание нового.
#[component]
pub fn EmployeeDetails(
    id: Option<i64>,
    employees: ReadSignal<Tracked<Vec<Employee>>>,
    on_saved: Callback<()>,
    on_dismiss: Callback<i64>,
) -> impl IntoView {
    let existing = id.and_then(|id| {
        employees
            .get_untracked()
            .value()
            .iter()
            .find(|e| e.id == id)
            .cloned()
    });

    let (surname, set_surname) = signal(
        existing.as_ref().map(|e| e.surname.clone()).unwrap_or_default(),
    );
    let (name, set_name) = signal(existing.as_ref().map(|e| e.name.clone()).unwrap_or_default());
    let (patronymic, set_patronymic) = signal(
        existing
            .as_ref()
            .and_then(|e| e.patronymic.clone())
            .unwrap_or_default(),
    );
    let (role, set_role) = signal(existing.as_ref().map(|e| e.role.clone()).unwrap_or_default());
    let (employment_date, set_employment_date) = signal(to_input_date(
        existing.as_ref().and_then(|e| e.employment_date),
    ));
    let (error, set_error) = signal(Option::<String>::None);

    let is_dismissed = existing.as_ref().map(|e| e.is_dismissed).unwrap_or(false);

    let handle_save = move |_| {
        if let Err(e) = validation::require_name(&surname.get()) {
            set_error.set(Some(e.to_string()));
            return;
        }
        set_error.set(None);

        let body = serde_json::json!({
            "surname": surname.get(),
            "name": name.get(),
            "patronymic": patronymic.get(),
            "role": role.get(),
            "employment_date": parse_input_date(&employment_date.get()),
        });
        spawn_local(async move {
            let result = match id {
                Some(employee_id) => api::update_employee(employee_id, &body).await,
                None => api::create_employee(&body).await,
            };
            match result {
                Ok(()) => on_saved.run(()),
                Err(e) => set_error.set(Some(format!("Не удалось сохранить: {}", e))),
            }
        });
    };

    view! {
        <div class="form">
            {move || error.get().map(|e| view! {
                <div class="error-message">{e}</div>
            })}

            <div class="form-group">
                <label>"Фамилия"</label>
                <input
                    type="text"
                    prop:value=move || surname.get()
                    on:input=move |ev| set_surname.set(event_target_value(&ev))
                />
            </div>
            <div class="form-group">
                <label>"Имя"</label>
                <input
                    type="text"
                    prop:value=move || name.get()
                    on:input=move |ev| set_name.set(event_target_value(&ev))
                />
            </div>
            <div class="form-group">
                <label>"Отчество"</label>
                <input
                    type="text"
                    prop:value=move || patronymic.get()
                    on:input=move |ev| set_patronymic.set(event_target_value(&ev))
                />
            </div>
            <div class="form-group">
                <label>"Должность"</label>
                <input
                    type="text"
                    placeholder="Например: Бригадир"
                    prop:value=move || role.get()
                    on:input=move |ev| set_role.set(event_target_value(&ev))
                />
            </div>
            <div class="form-group">
                <label>"Дата приёма"</label>
                <input
                    type="date"
                    prop:value=move || employment_date.get()
                    on:change=move |ev| set_employment_date.set(event_target_value(&ev))
                />
            </div>

            <div class="form-actions">
                <button class="button button--primary" on:click=handle_save>
                    {"Сохранить"}
                </button>
                {id.filter(|_| !is_dismissed).map(|employee_id| view! {
                    <button
                        class="button button--secondary"
                        on:click=move |_| on_dismiss.run(employee_id)
                    >
                        {"Уволить"}
                    </button>
                })}
            </div>
        </div>
    }
}
