use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use contracts::domain::{Project, WorkReport};
use contracts::sync::Tracked;
use contracts::validation;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::b001_project;
use crate::domain::b003_work_report::api;
use crate::shared::date_utils::{parse_input_date, to_input_date, today};
use crate::shared::download;
use crate::shared::icons::icon;
use crate::shared::ui_prefs;

/// Черновик строки табеля до сохранения — текст из полей ввода
#[derive(Clone, Default)]
struct DraftRow {
    hours: String,
    absent: bool,
    note: String,
}

/// Экран табеля: проект + дата, по строке на каждого активного
/// сотрудника бригады. Сохранение оптимистичное, затем сверочный GET.
#[component]
pub fn WorkReportScreen() -> impl IntoView {
    let (projects, set_projects) = signal(Vec::<Project>::new());
    let (selected_project, set_selected_project) =
        signal(ui_prefs::load_selected_project());
    let (date, set_date) = signal(today());

    let (tracked, set_tracked) = signal(Tracked::new(Vec::<WorkReport>::new()));
    let (drafts, set_drafts) = signal(HashMap::<i64, DraftRow>::new());
    let (is_loading, set_is_loading) = signal(false);
    let (error, set_error) = signal(Option::<String>::None);

    let generation = StoredValue::new(0u64);

    // Перенос сохранённых строк в черновики полей ввода
    let seed_drafts = move |reports: &[WorkReport]| {
        let mut map = HashMap::new();
        for r in reports {
            map.insert(
                r.employee_id,
                DraftRow {
                    hours: if r.hours_worked > 0.0 {
                        r.hours_worked.to_string()
                    } else {
                        String::new()
                    },
                    absent: r.absent,
                    note: r.note.clone().unwrap_or_default(),
                },
            );
        }
        set_drafts.set(map);
    };

    let load_reports = move || {
        let Some(project_id) = selected_project.get_untracked() else {
            set_tracked.set(Tracked::new(Vec::new()));
            set_drafts.set(HashMap::new());
            return;
        };
        let day = date.get_untracked();
        set_is_loading.set(true);
        set_error.set(None);
        let gen = generation.get_value() + 1;
        generation.set_value(gen);
        spawn_local(async move {
            let result = api::fetch_reports(project_id, day).await;
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

    // Список проектов для выбора — один раз при входе на экран
    spawn_local(async move {
        match b001_project::api::fetch_projects().await {
            Ok(data) => {
                let active: Vec<Project> =
                    data.into_iter().filter(|p| !p.archived()).collect();
                if selected_project.get_untracked().is_none() {
                    if let Some(first) = active.first() {
                        set_selected_project.set(Some(first.id));
                    }
                }
                set_projects.set(active);
                load_reports();
            }
            Err(e) => set_error.set(Some(e)),
        }
    });

    let current_project = move || {
        selected_project
            .get()
            .and_then(|id| projects.get().into_iter().find(|p| p.id == id))
    };

    let update_draft = move |employee_id: i64, f: Box<dyn FnOnce(&mut DraftRow)>| {
        set_drafts.update(|map| {
            f(map.entry(employee_id).or_default());
        });
    };

    // Собрать строки к записи: только изменённые относительно сервера
    let pending_rows = move || -> Result<Vec<WorkReport>, String> {
        let Some(project_id) = selected_project.get_untracked() else {
            return Ok(Vec::new());
        };
        let day = date.get_untracked();
        let saved = tracked.get_untracked();
        let mut rows = Vec::new();
        for (employee_id, draft) in drafts.get_untracked() {
            let hours = if draft.hours.trim().is_empty() {
                0.0
            } else {
                draft
                    .hours
                    .trim()
                    .replace(',', ".")
                    .parse::<f64>()
                    .map_err(|_| format!("Часы не число: \"{}\"", draft.hours))?
            };
            validation::validate_hours(hours).map_err(|e| e.to_string())?;

            let existing = saved
                .value()
                .iter()
                .find(|r| r.employee_id == employee_id)
                .cloned();
            let note = if draft.note.trim().is_empty() {
                None
            } else {
                Some(draft.note.trim().to_string())
            };
            let row = WorkReport {
                id: existing.as_ref().map(|r| r.id).unwrap_or(0),
                project_id,
                employee_id,
                date: day,
                hours_worked: hours,
                absent: draft.absent,
                note,
            };
            let unchanged = existing.as_ref().map(|r| {
                r.hours_worked == row.hours_worked && r.absent == row.absent && r.note == row.note
            });
            let is_blank = row.hours_worked == 0.0 && !row.absent && row.note.is_none();
            match unchanged {
                Some(true) => {}
                Some(false) => rows.push(row),
                None if is_blank => {}
                None => rows.push(row),
            }
        }
        Ok(rows)
    };

    let handle_save = move |_| {
        let rows = match pending_rows() {
            Ok(rows) => rows,
            Err(e) => {
                set_error.set(Some(e));
                return;
            }
        };
        if rows.is_empty() {
            return;
        }
        set_error.set(None);

        // оптимистично: строки сразу считаются сохранёнными
        let optimistic = rows.clone();
        set_tracked.update(|t| {
            t.apply_optimistic(|reports| {
                for row in &optimistic {
                    match reports.iter_mut().find(|r| r.employee_id == row.employee_id) {
                        Some(existing) => *existing = row.clone(),
                        None => reports.push(row.clone()),
                    }
                }
            });
        });

        spawn_local(async move {
            let mut all_ok = true;
            for row in &rows {
                if let Err(e) = api::save_report(row).await {
                    all_ok = false;
                    leptos::logging::log!("строка табеля не сохранилась: {}", e);
                }
            }
            if all_ok {
                set_tracked.update(|t| t.begin_reconcile());
                load_reports();
            } else {
                set_tracked.update(|t| t.rollback());
                set_error.set(Some("Часть строк не сохранилась, изменения откатаны".to_string()));
            }
        });
    };

    let handle_download = move |_| {
        let Some(project_id) = selected_project.get_untracked() else {
            return;
        };
        let day = date.get_untracked();
        // выгрузка за месяц выбранной даты
        let from = NaiveDate::from_ymd_opt(day.year(), day.month(), 1).unwrap_or(day);
        let path = api::export_path(project_id, from, day);
        spawn_local(async move {
            if let Err(e) = download::download_report(&path, "timesheet.xlsx").await {
                set_error.set(Some(format!("Не удалось скачать отчёт: {}", e)));
            }
        });
    };

    view! {
        <div class="page">
            <div class="header">
                <div class="header__content">
                    <h1 class="header__title">{"Табель"}</h1>
                </div>
                <div class="header__actions">
                    <button class="button button--primary" on:click=handle_save>
                        {"Сохранить"}
                    </button>
                    <button class="button button--secondary" on:click=move |_| load_reports()>
                        {icon("refresh")}
                        {"Обновить"}
                    </button>
                    <button
                        class="button button--secondary"
                        on:click=handle_download
                        disabled=move || selected_project.get().is_none()
                    >
                        {icon("download")}
                        {"Выгрузить"}
                    </button>
                </div>
            </div>

            <div class="filter-panel">
                <select
                    class="filter-select"
                    on:change=move |ev| {
                        let id = event_target_value(&ev).parse::<i64>().ok();
                        if let Some(id) = id {
                            ui_prefs::save_selected_project(id);
                        }
                        set_selected_project.set(id);
                        load_reports();
                    }
                >
                    {move || projects.get().into_iter().map(|p| {
                        let chosen = selected_project.get() == Some(p.id);
                        view! {
                            <option value=p.id.to_string() selected=chosen>{p.name.clone()}</option>
                        }
                    }).collect_view()}
                </select>
                <input
                    type="date"
                    class="filter-date"
                    prop:value=move || to_input_date(Some(date.get()))
                    on:change=move |ev| {
                        if let Some(day) = parse_input_date(&event_target_value(&ev)) {
                            set_date.set(day);
                            load_reports();
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
                            <th class="table__header-cell">{"Сотрудник"}</th>
                            <th class="table__header-cell">{"Часы"}</th>
                            <th class="table__header-cell">{"Отсутствовал"}</th>
                            <th class="table__header-cell">{"Примечание"}</th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            let project = current_project();
                            let members: Vec<_> = project
                                .as_ref()
                                .map(|p| {
                                    p.active_employees()
                                        .filter_map(|pe| {
                                            pe.employee
                                                .as_ref()
                                                .map(|e| (pe.employee_id, e.full_name()))
                                        })
                                        .collect()
                                })
                                .unwrap_or_default();
                            members.into_iter().map(|(employee_id, full_name)| {
                                let draft = move || {
                                    drafts.get().get(&employee_id).cloned().unwrap_or_default()
                                };
                                view! {
                                    <tr class="table__row">
                                        <td class="table__cell">{full_name}</td>
                                        <td class="table__cell">
                                            <input
                                                type="text"
                                                class="table__input table__input--hours"
                                                prop:value=move || draft().hours
                                                prop:disabled=move || draft().absent
                                                on:input=move |ev| {
                                                    let v = event_target_value(&ev);
                                                    update_draft(employee_id, Box::new(move |d| d.hours = v));
                                                }
                                            />
                                        </td>
                                        <td class="table__cell table__cell--checkbox">
                                            <input
                                                type="checkbox"
                                                prop:checked=move || draft().absent
                                                on:change=move |ev| {
                                                    let v = event_target_checked(&ev);
                                                    update_draft(employee_id, Box::new(move |d| d.absent = v));
                                                }
                                            />
                                        </td>
                                        <td class="table__cell">
                                            <input
                                                type="text"
                                                class="table__input"
                                                prop:value=move || draft().note
                                                on:input=move |ev| {
                                                    let v = event_target_value(&ev);
                                                    update_draft(employee_id, Box::new(move |d| d.note = v));
                                                }
                                            />
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
