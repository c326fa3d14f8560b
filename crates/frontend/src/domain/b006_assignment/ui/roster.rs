use contracts::domain::{busy_map, Assignment, Employee};
use contracts::roles::Role;
use contracts::sync::Tracked;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::b002_employee::api as employee_api;
use crate::domain::b006_assignment::api;
use crate::shared::date_utils::{parse_input_date, to_input_date, today};
use crate::shared::icons::icon;
use crate::system::auth::context::{current_user_id, use_auth};
use crate::system::auth::guard::RequireForeman;

/// Суточный состав бригады. Рабочий, занятый другим бригадиром, виден,
/// но недоступен — рядом имя занявшего. Взятие и возврат оптимистичные.
#[component]
pub fn RosterScreen() -> impl IntoView {
    view! {
        <RequireForeman>
            <RosterInner />
        </RequireForeman>
    }
}

#[component]
fn RosterInner() -> impl IntoView {
    let (auth_state, _) = use_auth();
    let foreman_id = move || current_user_id(auth_state).unwrap_or(0);

    let (date, set_date) = signal(today());
    let (workers, set_workers) = signal(Vec::<Employee>::new());
    let (tracked, set_tracked) = signal(Tracked::new(Vec::<Assignment>::new()));
    let (is_loading, set_is_loading) = signal(false);
    let (error, set_error) = signal(Option::<String>::None);

    let generation = StoredValue::new(0u64);

    let load = move || {
        let day = date.get_untracked();
        set_is_loading.set(true);
        set_error.set(None);
        let gen = generation.get_value() + 1;
        generation.set_value(gen);
        spawn_local(async move {
            let result = api::fetch_assignments(day).await;
            if generation.get_value() != gen {
                return;
            }
            set_is_loading.set(false);
            match result {
                Ok(data) => set_tracked.update(|t| t.reconciled(data)),
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    // Справочник рабочих: не уволенные, бригадиры и ГИП в состав не берутся
    spawn_local(async move {
        match employee_api::fetch_employees().await {
            Ok(list) => {
                set_workers.set(
                    list.into_iter()
                        .filter(|e| !e.is_dismissed && e.parsed_role() == Role::Worker)
                        .collect(),
                );
                load();
            }
            Err(e) => set_error.set(Some(e)),
        }
    });

    // Занятость чужими бригадирами; свои заявки — "мой состав"
    let busy = move || busy_map(tracked.get().value(), foreman_id());
    let mine = move || {
        let uid = foreman_id();
        tracked
            .get()
            .value()
            .iter()
            .filter(|a| a.foreman_id == uid)
            .map(|a| a.employee_id)
            .collect::<Vec<i64>>()
    };

    let claim = move |employee_id: i64| {
        let day = date.get_untracked();
        let uid = foreman_id();
        // рабочий появляется в составе сразу
        set_tracked.update(|t| {
            t.apply_optimistic(|assignments| {
                assignments.push(Assignment {
                    id: 0,
                    employee_id,
                    date: day,
                    foreman_id: uid,
                    foreman_name: None,
                });
            });
        });
        spawn_local(async move {
            match api::claim(employee_id, day).await {
                Ok(()) => {
                    set_tracked.update(|t| t.begin_reconcile());
                    load();
                }
                Err(e) => {
                    // рабочего мог успеть занять другой бригадир
                    set_tracked.update(|t| t.rollback());
                    set_error.set(Some(format!("Не удалось взять рабочего: {}", e)));
                    load();
                }
            }
        });
    };

    let release = move |employee_id: i64| {
        let day = date.get_untracked();
        let uid = foreman_id();
        set_tracked.update(|t| {
            t.apply_optimistic(|assignments| {
                assignments.retain(|a| !(a.employee_id == employee_id && a.foreman_id == uid));
            });
        });
        spawn_local(async move {
            match api::release(employee_id, day).await {
                Ok(()) => {
                    set_tracked.update(|t| t.begin_reconcile());
                    load();
                }
                Err(e) => {
                    set_tracked.update(|t| t.rollback());
                    set_error.set(Some(format!("Не удалось отпустить рабочего: {}", e)));
                }
            }
        });
    };

    view! {
        <div class="page">
            <div class="header">
                <div class="header__content">
                    <h1 class="header__title">{"Состав на день"}</h1>
                </div>
                <div class="header__actions">
                    <button class="button button--secondary" on:click=move |_| load()>
                        {icon("refresh")}
                        {"Обновить"}
                    </button>
                </div>
            </div>

            <div class="filter-panel">
                <input
                    type="date"
                    class="filter-date"
                    prop:value=move || to_input_date(Some(date.get()))
                    on:change=move |ev| {
                        if let Some(day) = parse_input_date(&event_target_value(&ev)) {
                            set_date.set(day);
                            load();
                        }
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
                            <th class="table__header-cell">{"Рабочий"}</th>
                            <th class="table__header-cell">{"Статус"}</th>
                            <th class="table__header-cell"></th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            let busy_now = busy();
                            let my_ids = mine();
                            workers.get().into_iter().map(|worker| {
                                let id = worker.id;
                                let taken_by = busy_now.get(&id).cloned();
                                let in_roster = my_ids.contains(&id);
                                let status = match (&taken_by, in_roster) {
                                    (Some(name), _) => format!("Занят: {}", name),
                                    (None, true) => "В моём составе".to_string(),
                                    (None, false) => "Свободен".to_string(),
                                };
                                let is_busy = taken_by.is_some();
                                view! {
                                    <tr class="table__row" class:table__row--inactive=is_busy>
                                        <td class="table__cell">{worker.short_name()}</td>
                                        <td class="table__cell">{status}</td>
                                        <td class="table__cell">
                                            {if in_roster {
                                                view! {
                                                    <button
                                                        class="button button--small button--secondary"
                                                        on:click=move |_| release(id)
                                                    >
                                                        {"Отпустить"}
                                                    </button>
                                                }.into_any()
                                            } else {
                                                view! {
                                                    <button
                                                        class="button button--small"
                                                        prop:disabled=is_busy
                                                        on:click=move |_| claim(id)
                                                    >
                                                        {"Взять"}
                                                    </button>
                                                }.into_any()
                                            }}
                                        </td>
                                    </tr>
                                }
                            }).collect_view()
                        }}
                    </tbody>
                </table>
            </div>
        </div>
    }
}
