use std::collections::HashMap;

use chrono::NaiveDate;
use contracts::aggregates::payroll_month;
use contracts::domain::{Employee, Payment, Project};
use contracts::sync::Tracked;
use contracts::validation;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::b001_project;
use crate::domain::b002_employee::api as employee_api;
use crate::domain::b005_payment::api;
use crate::shared::date_utils::{
    format_money, parse_input_date, to_input_date, today,
};
use crate::shared::download;
use crate::shared::icons::icon;

/// Черновик траншей одной строки до сохранения
#[derive(Clone, Default)]
struct TrancheDraft {
    first_date: String,
    first_amount: String,
    second_date: String,
    second_amount: String,
    third_date: String,
    third_amount: String,
}

const MONTH_NAMES: [&str; 12] = [
    "Январь", "Февраль", "Март", "Апрель", "Май", "Июнь",
    "Июль", "Август", "Сентябрь", "Октябрь", "Ноябрь", "Декабрь",
];

/// Экран зарплаты: строка на связку (сотрудник, проект), до трёх
/// траншей, остаток считается на клиенте. Ошибка записи показывается
/// алертом, строка перечитывается.
#[component]
pub fn SalaryScreen() -> impl IntoView {
    let (projects, set_projects) = signal(Vec::<Project>::new());
    let (employees, set_employees) = signal(Vec::<Employee>::new());
    let (project_filter, set_project_filter) = signal(Option::<i64>::None);
    let (date_from, set_date_from) = signal(Option::<NaiveDate>::None);
    let (date_to, set_date_to) = signal(Option::<NaiveDate>::None);

    let (tracked, set_tracked) = signal(Tracked::new(Vec::<Payment>::new()));
    let (drafts, set_drafts) = signal(HashMap::<i64, TrancheDraft>::new());
    let (is_loading, set_is_loading) = signal(false);
    let (error, set_error) = signal(Option::<String>::None);

    let generation = StoredValue::new(0u64);

    let seed_drafts = move |payments: &[Payment]| {
        let mut map = HashMap::new();
        for p in payments {
            map.insert(
                p.id,
                TrancheDraft {
                    first_date: to_input_date(p.first.date),
                    first_amount: p.first.amount.map(|a| a.to_string()).unwrap_or_default(),
                    second_date: to_input_date(p.second.date),
                    second_amount: p.second.amount.map(|a| a.to_string()).unwrap_or_default(),
                    third_date: to_input_date(p.third.date),
                    third_amount: p.third.amount.map(|a| a.to_string()).unwrap_or_default(),
                },
            );
        }
        set_drafts.set(map);
    };

    let load = move || {
        set_is_loading.set(true);
        set_error.set(None);
        let project_id = project_filter.get_untracked();
        let from = date_from.get_untracked();
        let to = date_to.get_untracked();
        let gen = generation.get_value() + 1;
        generation.set_value(gen);
        spawn_local(async move {
            let result = api::fetch_payments(project_id, from, to).await;
            if generation.get_value() != gen {
                return;
            }
            set_is_loading.set(false);
            match result {
                Ok(data) => {
                    seed_drafts(&data);
                    set_tracked.update(|t| t.reconciled(data));
                }
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    // Справочники имён — проекты и сотрудники загружаются параллельно
    spawn_local(async move {
        let (projects_result, employees_result) = futures::join!(
            b001_project::api::fetch_projects(),
            employee_api::fetch_employees()
        );
        match projects_result {
            Ok(list) => set_projects.set(list),
            Err(e) => leptos::logging::log!("проекты не загрузились: {}", e),
        }
        match employees_result {
            Ok(list) => set_employees.set(list),
            Err(e) => leptos::logging::log!("сотрудники не загрузились: {}", e),
        }
        load();
    });

    let employee_name = move |id: i64| {
        employees
            .get()
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.short_name())
            .unwrap_or_else(|| format!("#{}", id))
    };

    let project_name = move |id: i64| {
        projects
            .get()
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("#{}", id))
    };

    // Заголовок расчётного месяца: первый заполненный транш, иначе
    // начало фильтра, иначе текущий месяц
    let month_title = move || {
        let payments = tracked.get();
        let (year, month) = payroll_month(
            payments.value().first(),
            date_from.get(),
            today(),
        );
        format!(
            "{} {}",
            MONTH_NAMES[(month - 1) as usize],
            year
        )
    };

    let parse_tranche =
        |date_raw: &str, amount_raw: &str| -> Result<(Option<NaiveDate>, Option<f64>), String> {
            let amount = if amount_raw.trim().is_empty() {
                None
            } else {
                let a = amount_raw
                    .trim()
                    .replace(',', ".")
                    .parse::<f64>()
                    .map_err(|_| format!("Сумма не число: \"{}\"", amount_raw))?;
                validation::validate_tranche_amount(Some(a)).map_err(|e| e.to_string())?;
                Some(a)
            };
            Ok((parse_input_date(date_raw), amount))
        };

    let save_row = move |payment_id: i64| {
        let Some(mut payment) = tracked
            .get_untracked()
            .value()
            .iter()
            .find(|p| p.id == payment_id)
            .cloned()
        else {
            return;
        };
        let draft = drafts
            .get_untracked()
            .get(&payment_id)
            .cloned()
            .unwrap_or_default();

        let parsed = parse_tranche(&draft.first_date, &draft.first_amount)
            .and_then(|first| {
                parse_tranche(&draft.second_date, &draft.second_amount)
                    .map(|second| (first, second))
            })
            .and_then(|(first, second)| {
                parse_tranche(&draft.third_date, &draft.third_amount)
                    .map(|third| (first, second, third))
            });
        let ((f_date, f_amount), (s_date, s_amount), (t_date, t_amount)) = match parsed {
            Ok(p) => p,
            Err(e) => {
                set_error.set(Some(e));
                return;
            }
        };
        set_error.set(None);

        payment.first.date = f_date;
        payment.first.amount = f_amount;
        payment.second.date = s_date;
        payment.second.amount = s_amount;
        payment.third.date = t_date;
        payment.third.amount = t_amount;

        // строка сразу показывает новый остаток
        let optimistic = payment.clone();
        set_tracked.update(|t| {
            t.apply_optimistic(|payments| {
                if let Some(p) = payments.iter_mut().find(|p| p.id == payment_id) {
                    *p = optimistic.clone();
                }
            });
        });

        spawn_local(async move {
            match api::save_payment(&payment).await {
                Ok(()) => {
                    set_tracked.update(|t| t.begin_reconcile());
                    load();
                }
                Err(e) => {
                    set_tracked.update(|t| t.rollback());
                    if let Some(w) = web_sys::window() {
                        let _ = w.alert_with_message(&format!("Выплата не сохранилась: {}", e));
                    }
                }
            }
        });
    };

    let handle_download = move |_| {
        let day = today();
        let from = date_from.get_untracked().unwrap_or(day);
        let to = date_to.get_untracked().unwrap_or(day);
        let path = api::export_path(from, to);
        spawn_local(async move {
            if let Err(e) = download::download_report(&path, "salary.xlsx").await {
                set_error.set(Some(format!("Не удалось скачать ведомость: {}", e)));
            }
        });
    };

    let update_draft = move |payment_id: i64, f: Box<dyn FnOnce(&mut TrancheDraft)>| {
        set_drafts.update(|map| {
            f(map.entry(payment_id).or_default());
        });
    };

    view! {
        <div class="page">
            <div class="header">
                <div class="header__content">
                    <h1 class="header__title">{"Зарплата"}</h1>
                    <span class="header__subtitle">{move || month_title()}</span>
                </div>
                <div class="header__actions">
                    <button class="button button--secondary" on:click=move |_| load()>
                        {icon("refresh")}
                        {"Обновить"}
                    </button>
                    <button class="button button--secondary" on:click=handle_download>
                        {icon("download")}
                        {"Ведомость"}
                    </button>
                </div>
            </div>

            <div class="filter-panel">
                <select
                    class="filter-select"
                    on:change=move |ev| {
                        set_project_filter.set(event_target_value(&ev).parse().ok());
                        load();
                    }
                >
                    <option value="">"Все проекты"</option>
                    {move || projects.get().into_iter().map(|p| view! {
                        <option value={p.id.to_string()}>{p.name.clone()}</option>
                    }).collect_view()}
                </select>
                <input
                    type="date"
                    class="filter-date"
                    on:change=move |ev| {
                        set_date_from.set(parse_input_date(&event_target_value(&ev)));
                        load();
                    }
                />
                <input
                    type="date"
                    class="filter-date"
                    on:change=move |ev| {
                        set_date_to.set(parse_input_date(&event_target_value(&ev)));
                        load();
                    }
                />
            </div>

            {move || error.get().map(|e| view! {
                <div class="warning-box">
                    <span class="warning-box__icon">"⚠"</span>
                    <span class="warning-box__text">{e}</span>
                </div>
            })}

            <Show when=move || is_loading.get()>
                <div class="loading">"Загрузка..."</div>
            </Show>

            <div class="table">
                <table class="table__data table--striped">
                    <thead class="table__head">
                        <tr>
                            <th class="table__header-cell">{"Сотрудник"}</th>
                            <th class="table__header-cell">{"Проект"}</th>
                            <th class="table__header-cell">{"Итого"}</th>
                            <th class="table__header-cell" colspan="2">{"Аванс"}</th>
                            <th class="table__header-cell" colspan="2">{"Выплата"}</th>
                            <th class="table__header-cell" colspan="2">{"Остаток"}</th>
                            <th class="table__header-cell"></th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || tracked.get().value().clone().into_iter().map(|payment| {
                            let payment_id = payment.id;
                            let balance = payment.balance();
                            let draft = move || {
                                drafts.get().get(&payment_id).cloned().unwrap_or_default()
                            };
                            view! {
                                <tr class="table__row">
                                    <td class="table__cell">{employee_name(payment.employee_id)}</td>
                                    <td class="table__cell">{project_name(payment.project_id)}</td>
                                    <td class="table__cell table__cell--money">{format_money(payment.total)}</td>
                                    <td class="table__cell">
                                        <input
                                            type="date"
                                            prop:value=move || draft().first_date
                                            on:change=move |ev| {
                                                let v = event_target_value(&ev);
                                                update_draft(payment_id, Box::new(move |d| d.first_date = v));
                                            }
                                        />
                                    </td>
                                    <td class="table__cell">
                                        <input
                                            type="text"
                                            class="table__input table__input--amount"
                                            prop:value=move || draft().first_amount
                                            on:input=move |ev| {
                                                let v = event_target_value(&ev);
                                                update_draft(payment_id, Box::new(move |d| d.first_amount = v));
                                            }
                                        />
                                    </td>
                                    <td class="table__cell">
                                        <input
                                            type="date"
                                            prop:value=move || draft().second_date
                                            on:change=move |ev| {
                                                let v = event_target_value(&ev);
                                                update_draft(payment_id, Box::new(move |d| d.second_date = v));
                                            }
                                        />
                                    </td>
                                    <td class="table__cell">
                                        <input
                                            type="text"
                                            class="table__input table__input--amount"
                                            prop:value=move || draft().second_amount
                                            on:input=move |ev| {
                                                let v = event_target_value(&ev);
                                                update_draft(payment_id, Box::new(move |d| d.second_amount = v));
                                            }
                                        />
                                    </td>
                                    <td class="table__cell">
                                        <input
                                            type="date"
                                            prop:value=move || draft().third_date
                                            on:change=move |ev| {
                                                let v = event_target_value(&ev);
                                                update_draft(payment_id, Box::new(move |d| d.third_date = v));
                                            }
                                        />
                                    </td>
                                    <td class="table__cell table__cell--money">{format_money(balance)}</td>
                                    <td class="table__cell">
                                        <button
                                            class="button button--small"
                                            on:click=move |_| save_row(payment_id)
                                        >
                                            {"Сохранить"}
                                        </button>
                                    </td>
                                </tr>
                            }
                        }).collect_view()}
                    </tbody>
                </table>
            </div>
        </div>
    }
}
