use std::collections::HashMap;

use contracts::aggregates::{or_default, project_spend, remaining_budget};
use contracts::domain::{Employee, Project, WorkReport};
use contracts::sync::Tracked;
use contracts::validation;
use futures::future::join_all;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::b001_project::api;
use crate::domain::b002_employee::api as employee_api;
use crate::domain::b004_nomenclature::ui::materials_tab::MaterialsTab;
use crate::shared::date_utils::{format_money, format_naive, parse_input_date, to_input_date, today};
use crate::shared::ui_prefs;

#[derive(Clone, Copy, PartialEq, Eq)]
enum DetailsTab {
    General,
    Employees,
    Materials,
}

impl DetailsTab {
    fn key(&self) -> &'static str {
        match self {
            DetailsTab::General => "general",
            DetailsTab::Employees => "employees",
            DetailsTab::Materials => "materials",
        }
    }

    fn from_key(key: &str) -> DetailsTab {
        match key {
            "employees" => DetailsTab::Employees,
            "materials" => DetailsTab::Materials,
            _ => DetailsTab::General,
        }
    }
}

/// Карточка проекта. `id = None` — создание нового.
#[component]
pub fn ProjectDetails(id: Option<i64>, on_saved: Callback<()>) -> impl IntoView {
    // Последняя активная вкладка переживает перезагрузку
    let initial_tab = ui_prefs::load_project_tab()
        .map(|k| DetailsTab::from_key(&k))
        .unwrap_or(DetailsTab::General);
    let (active_tab, set_active_tab) = signal(initial_tab);

    let (tracked, set_tracked) = signal(Tracked::new(Option::<Project>::None));
    let (spent, set_spent) = signal(0.0_f64);
    let (error, set_error) = signal(Option::<String>::None);

    // Поля формы (вкладка «Общее»)
    let (name, set_name) = signal(String::new());
    let (address, set_address) = signal(String::new());
    let (budget, set_budget) = signal(0.0_f64);
    let (start_date, set_start_date) = signal(String::new());
    let (end_date, set_end_date) = signal(String::new());

    let generation = StoredValue::new(0u64);

    // Веерная загрузка табелей активных сотрудников и расчёт расхода.
    // Упавшая ветка даёт ноль, остальной агрегат продолжает считаться.
    let reload_spend = move |project: Project| {
        let gen = generation.get_value();
        spawn_local(async move {
            let pivots: Vec<i64> = project
                .active_employees()
                .map(|pe| pe.employee_id)
                .collect();
            let branches = pivots
                .iter()
                .map(|&eid| api::fetch_employee_reports(project.id, eid));
            let results: Vec<Result<Vec<WorkReport>, String>> = join_all(branches).await;
            if generation.get_value() != gen {
                return;
            }
            let by_employee: HashMap<i64, Vec<WorkReport>> = pivots
                .into_iter()
                .zip(results.into_iter().map(or_default))
                .collect();
            set_spent.set(project_spend(&project, &by_employee, None, None));
        });
    };

    let apply_project = move |project: Project| {
        set_name.set(project.name.clone());
        set_address.set(project.address.clone());
        set_budget.set(project.budget);
        set_start_date.set(to_input_date(project.start_date));
        set_end_date.set(to_input_date(project.end_date));
        reload_spend(project.clone());
        set_tracked.update(|t| t.reconciled(Some(project)));
    };

    let load = move || {
        let Some(project_id) = id else {
            return;
        };
        let gen = generation.get_value() + 1;
        generation.set_value(gen);
        spawn_local(async move {
            match api::fetch_project(project_id).await {
                Ok(project) => {
                    if generation.get_value() == gen {
                        apply_project(project);
                    }
                }
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    load();

    let select_tab = move |tab: DetailsTab| {
        set_active_tab.set(tab);
        ui_prefs::save_project_tab(tab.key());
    };

    let handle_save = move |_| {
        if let Err(e) = validation::require_name(&name.get()) {
            set_error.set(Some(e.to_string()));
            return;
        }
        let from = parse_input_date(&start_date.get());
        let to = parse_input_date(&end_date.get());
        if let Err(e) = validation::validate_period(from, to) {
            set_error.set(Some(e.to_string()));
            return;
        }
        set_error.set(None);

        let body = serde_json::json!({
            "name": name.get(),
            "address": address.get(),
            "budget": budget.get(),
            "start_date": from,
            "end_date": to,
        });
        spawn_local(async move {
            let result = match id {
                Some(project_id) => api::update_project(project_id, &body).await,
                None => api::create_project(&body).await,
            };
            match result {
                Ok(()) => on_saved.run(()),
                Err(e) => set_error.set(Some(format!("Не удалось сохранить: {}", e))),
            }
        });
    };

    // Снятие сотрудника с проекта: связка закрывается сегодняшней датой
    // локально сразу, сервер подтверждает, сверочный GET перетирает.
    let remove_employee = move |employee_id: i64| {
        let Some(project_id) = id else {
            return;
        };
        let date = today();
        set_tracked.update(|t| {
            t.apply_optimistic(|p| {
                if let Some(p) = p.as_mut() {
                    p.end_employee_associations(employee_id, date);
                }
            });
        });
        spawn_local(async move {
            match api::remove_employee(project_id, employee_id, date).await {
                Ok(()) => {
                    set_tracked.update(|t| t.begin_reconcile());
                    match api::fetch_project(project_id).await {
                        Ok(project) => apply_project(project),
                        Err(e) => leptos::logging::log!("сверка не удалась: {}", e),
                    }
                }
                Err(e) => {
                    set_tracked.update(|t| t.rollback());
                    leptos::logging::log!("снятие с проекта не прошло: {}", e);
                }
            }
        });
    };

    let add_employee = move |(employee_id, rate): (i64, f64)| {
        let Some(project_id) = id else {
            return;
        };
        if let Err(e) = validation::validate_rate(rate) {
            set_error.set(Some(e.to_string()));
            return;
        }
        let date = today();
        spawn_local(async move {
            match api::add_employee(project_id, employee_id, rate, date).await {
                Ok(()) => match api::fetch_project(project_id).await {
                    Ok(project) => apply_project(project),
                    Err(e) => leptos::logging::log!("сверка не удалась: {}", e),
                },
                Err(e) => leptos::logging::log!("добавление не прошло: {}", e),
            }
        });
    };

    let reload = Callback::new(move |_: ()| load());

    view! {
        <div class="details">
            {move || error.get().map(|e| view! {
                <div class="error-message">{e}</div>
            })}

            // Сводка бюджета: расход и остаток (остаток не бывает < 0)
            <Show when=move || id.is_some()>
                <div class="details__summary">
                    <span class="stat">
                        {"Расход: "}
                        <b>{move || format_money(spent.get())}</b>
                    </span>
                    <span class="stat">
                        {"Остаток: "}
                        <b>{move || format_money(remaining_budget(budget.get(), spent.get()))}</b>
                    </span>
                </div>

                <div class="tabs">
                    <button
                        class="tabs__item"
                        class:tabs__item--active=move || active_tab.get() == DetailsTab::General
                        on:click=move |_| select_tab(DetailsTab::General)
                    >
                        {"Общее"}
                    </button>
                    <button
                        class="tabs__item"
                        class:tabs__item--active=move || active_tab.get() == DetailsTab::Employees
                        on:click=move |_| select_tab(DetailsTab::Employees)
                    >
                        {"Сотрудники"}
                    </button>
                    <button
                        class="tabs__item"
                        class:tabs__item--active=move || active_tab.get() == DetailsTab::Materials
                        on:click=move |_| select_tab(DetailsTab::Materials)
                    >
                        {"Материалы"}
                    </button>
                </div>
            </Show>

            <Show when=move || id.is_none() || active_tab.get() == DetailsTab::General>
                <div class="form">
                    <div class="form-group">
                        <label>"Название"</label>
                        <input
                            type="text"
                            prop:value=move || name.get()
                            on:input=move |ev| set_name.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form-group">
                        <label>"Адрес"</label>
                        <input
                            type="text"
                            prop:value=move || address.get()
                            on:input=move |ev| set_address.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form-group">
                        <label>"Бюджет"</label>
                        <input
                            type="number"
                            prop:value=move || budget.get().to_string()
                            on:input=move |ev| {
                                set_budget.set(event_target_value(&ev).parse().unwrap_or(0.0));
                            }
                        />
                    </div>
                    <div class="form-group">
                        <label>"Начало работ"</label>
                        <input
                            type="date"
                            prop:value=move || start_date.get()
                            on:change=move |ev| set_start_date.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form-group">
                        <label>"Окончание работ"</label>
                        <input
                            type="date"
                            prop:value=move || end_date.get()
                            on:change=move |ev| set_end_date.set(event_target_value(&ev))
                        />
                    </div>
                    <button class="button button--primary" on:click=handle_save>
                        {"Сохранить"}
                    </button>
                </div>
            </Show>

            <Show when=move || id.is_some() && active_tab.get() == DetailsTab::Employees>
                <EmployeesTab
                    tracked=tracked
                    on_remove=Callback::new(remove_employee)
                    on_add=Callback::new(add_employee)
                />
            </Show>

            <Show when=move || id.is_some() && active_tab.get() == DetailsTab::Materials>
                {move || id.map(|project_id| view! {
                    <MaterialsTab
                        project_id=project_id
                        tracked=tracked
                        on_reload=reload
                    />
                })}
            </Show>
        </div>
    }
}

/// Вкладка «Сотрудники»: активные связки + добавление из справочника
#[component]
fn EmployeesTab(
    tracked: ReadSignal<Tracked<Option<Project>>>,
    on_remove: Callback<i64>,
    on_add: Callback<(i64, f64)>,
) -> impl IntoView {
    let (all_employees, set_all_employees) = signal(Vec::<Employee>::new());
    let (new_employee_id, set_new_employee_id) = signal(Option::<i64>::None);
    let (new_rate, set_new_rate) = signal(0.0_f64);

    spawn_local(async move {
        match employee_api::fetch_employees().await {
            Ok(list) => set_all_employees.set(list),
            Err(e) => leptos::logging::log!("справочник сотрудников не загрузился: {}", e),
        }
    });

    let pivots = move || {
        tracked
            .get()
            .value()
            .as_ref()
            .map(|p| p.employees.clone())
            .unwrap_or_default()
    };

    // в выпадающем списке только не состоящие в проекте и не уволенные
    let selectable = move || {
        let current: Vec<i64> = pivots()
            .iter()
            .filter(|pe| pe.is_active())
            .map(|pe| pe.employee_id)
            .collect();
        all_employees
            .get()
            .into_iter()
            .filter(|e| !e.is_dismissed && !current.contains(&e.id))
            .collect::<Vec<_>>()
    };

    view! {
        <div class="employees-tab">
            <table class="table__data table--striped">
                <thead class="table__head">
                    <tr>
                        <th class="table__header-cell">{"Сотрудник"}</th>
                        <th class="table__header-cell">{"Ставка, ₽/ч"}</th>
                        <th class="table__header-cell">{"На проекте с"}</th>
                        <th class="table__header-cell">{"Снят"}</th>
                        <th class="table__header-cell"></th>
                    </tr>
                </thead>
                <tbody>
                    {move || pivots().into_iter().map(|pe| {
                        let employee_id = pe.employee_id;
                        let display = pe
                            .employee
                            .as_ref()
                            .map(|e| e.short_name())
                            .unwrap_or_else(|| format!("#{}", employee_id));
                        let active = pe.is_active();
                        view! {
                            <tr class="table__row" class:table__row--inactive=!active>
                                <td class="table__cell">{display}</td>
                                <td class="table__cell table__cell--money">{format_money(pe.rate_per_hour)}</td>
                                <td class="table__cell">{format_naive(pe.start_working_date)}</td>
                                <td class="table__cell">{format_naive(pe.end_working_date)}</td>
                                <td class="table__cell">
                                    <Show when=move || active>
                                        <button
                                            class="button button--secondary button--small"
                                            on:click=move |_| on_remove.run(employee_id)
                                        >
                                            {"Снять с проекта"}
                                        </button>
                                    </Show>
                                </td>
                            </tr>
                        }
                    }).collect_view()}
                </tbody>
            </table>

            <div class="employees-tab__add">
                <select on:change=move |ev| {
                    set_new_employee_id.set(event_target_value(&ev).parse().ok());
                }>
                    <option value="">"— выберите сотрудника —"</option>
                    {move || selectable().into_iter().map(|e| view! {
                        <option value={e.id.to_string()}>{e.short_name()}</option>
                    }).collect_view()}
                </select>
                <input
                    type="number"
                    placeholder="Ставка, ₽/ч"
                    on:input=move |ev| {
                        set_new_rate.set(event_target_value(&ev).parse().unwrap_or(0.0));
                    }
                />
                <button
                    class="button button--primary"
                    disabled=move || new_employee_id.get().is_none()
                    on:click=move |_| {
                        if let Some(eid) = new_employee_id.get() {
                            on_add.run((eid, new_rate.get()));
                        }
                    }
                >
                    {"Добавить"}
                </button>
            </div>
        </div>
    }
}
