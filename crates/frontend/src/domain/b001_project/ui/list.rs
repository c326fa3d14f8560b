use std::collections::HashSet;

use contracts::domain::{Project, ProjectStatus};
use contracts::list::{apply_pipeline, uniform_flag, ListQuery, SortKind};
use contracts::sync::Tracked;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::details::ProjectDetails;
use crate::domain::b001_project::api;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::components::table_checkbox::TableCheckbox;
use crate::shared::date_utils::{format_money, format_naive, parse_input_date};
use crate::shared::icons::icon;
use crate::shared::list_utils::{get_sort_indicator, SearchInput};
use crate::shared::modal::Modal;
use crate::shared::ui_prefs;

const PAGE_SIZE: usize = 11;

#[component]
pub fn ProjectList() -> impl IntoView {
    let (tracked, set_tracked) = signal(Tracked::new(Vec::<Project>::new()));
    let (is_loading, set_is_loading) = signal(false);
    let (error, set_error) = signal(Option::<String>::None);

    // Фильтры и сортировка
    let (query, set_query) = signal(ListQuery::new(PAGE_SIZE));
    let (show_archived, set_show_archived) = signal(false);
    let (status_filter, set_status_filter) = signal(Option::<ProjectStatus>::None);

    // Выбор строк — по id, переживает листание
    let (selected, set_selected) = signal(HashSet::<i64>::new());

    // Модальное окно карточки
    let (editing_id, set_editing_id) = signal(Option::<Option<i64>>::None);

    // Защита от поздних ответов после ухода с экрана
    let generation = StoredValue::new(0u64);

    let load = move || {
        set_is_loading.set(true);
        set_error.set(None);
        let gen = generation.get_value() + 1;
        generation.set_value(gen);
        spawn_local(async move {
            let result = api::fetch_projects().await;
            // экран мог перезапустить загрузку — поздний ответ отбрасываем
            if generation.get_value() != gen {
                return;
            }
            match result {
                Ok(data) => {
                    set_tracked.update(|t| t.reconciled(data));
                    set_is_loading.set(false);
                }
                Err(e) => {
                    set_error.set(Some(e));
                    set_is_loading.set(false);
                }
            }
        });
    };

    load();

    // Конвейер: статус → поиск → даты → сортировка → страница
    let page_view = move || {
        let q = query.get();
        let archived = show_archived.get();
        let status = status_filter.get();
        let items = tracked.get();
        apply_pipeline(
            items.value(),
            |p: &Project| {
                p.archived() == archived && status.map(|s| p.status == s).unwrap_or(true)
            },
            &q,
        )
    };

    let toggle_sort = move |field: &'static str, kind: SortKind| {
        set_query.update(|q| q.toggle_sort(field, kind));
    };

    let handle_search = Callback::new(move |value: String| {
        set_query.update(|q| q.set_search(value));
    });

    let toggle_select = move |id: i64, checked: bool| {
        set_selected.update(|s| {
            if checked {
                s.insert(id);
            } else {
                s.remove(&id);
            }
        });
    };

    let open_project = move |project: Project| {
        // архивный проект на редактирование не открывается
        if project.archived() {
            if let Some(w) = web_sys::window() {
                let _ = w.alert_with_message("Архивный проект нельзя открыть для редактирования");
            }
            return;
        }
        ui_prefs::save_selected_project(project.id);
        set_editing_id.set(Some(Some(project.id)));
    };

    // Пакетная архивация: только однородная выборка, с подтверждением,
    // оптимистично с откатом при ошибке
    let archive_selected = move || {
        let ids: Vec<i64> = selected.get().into_iter().collect();
        if ids.is_empty() {
            return;
        }

        let rows: Vec<Project> = tracked
            .get()
            .value()
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect();
        match uniform_flag(&rows, |p| p.archived()) {
            Some(false) => {}
            Some(true) => {
                if let Some(w) = web_sys::window() {
                    let _ = w.alert_with_message("Выбранные проекты уже в архиве");
                }
                return;
            }
            None => {
                if let Some(w) = web_sys::window() {
                    let _ = w.alert_with_message(
                        "Нельзя архивировать смешанную выборку: снимите отметку с архивных строк",
                    );
                }
                return;
            }
        }

        let confirmed = web_sys::window()
            .map(|w| {
                w.confirm_with_message(&format!("Архивировать проекты? Количество: {}", ids.len()))
                    .unwrap_or(false)
            })
            .unwrap_or(false);
        if !confirmed {
            return;
        }

        // строки исчезают из активного списка сразу
        let optimistic_ids = ids.clone();
        set_tracked.update(|t| {
            t.apply_optimistic(|projects| {
                for p in projects.iter_mut() {
                    if optimistic_ids.contains(&p.id) {
                        p.is_archived = true;
                    }
                }
            });
        });
        set_selected.set(HashSet::new());

        spawn_local(async move {
            let mut all_ok = true;
            for id in ids {
                if api::archive_project(id).await.is_err() {
                    all_ok = false;
                }
            }
            if all_ok {
                set_tracked.update(|t| t.begin_reconcile());
                match api::fetch_projects().await {
                    Ok(data) => set_tracked.update(|t| t.reconciled(data)),
                    Err(e) => leptos::logging::log!("сверка после архивации не удалась: {}", e),
                }
            } else {
                set_tracked.update(|t| t.rollback());
                leptos::logging::log!("архивация не прошла, состояние откатано");
            }
        });
    };

    let close_modal = move || set_editing_id.set(None);

    view! {
        <div class="page">
            <div class="header">
                <div class="header__content">
                    <h1 class="header__title">{"Проекты"}</h1>
                </div>
                <div class="header__actions">
                    <button class="button button--primary" on:click=move |_| set_editing_id.set(Some(None))>
                        {icon("plus")}
                        {"Новый проект"}
                    </button>
                    <button class="button button--secondary" on:click=move |_| load()>
                        {icon("refresh")}
                        {"Обновить"}
                    </button>
                    <button
                        class="button button--secondary"
                        on:click=move |_| archive_selected()
                        disabled=move || selected.get().is_empty()
                    >
                        {icon("archive")}
                        {move || format!("В архив ({})", selected.get().len())}
                    </button>
                </div>
            </div>

            <div class="filter-panel">
                <SearchInput
                    on_change=handle_search
                    placeholder="Номер, название или бригадир..."
                />
                <select
                    class="filter-select"
                    on:change=move |ev| {
                        let val = event_target_value(&ev);
                        set_status_filter.set(match val.as_str() {
                            "new" => Some(ProjectStatus::New),
                            "in_progress" => Some(ProjectStatus::InProgress),
                            "completed" => Some(ProjectStatus::Completed),
                            _ => None,
                        });
                        set_query.update(|q| q.reset_page());
                    }
                >
                    <option value="">"Все статусы"</option>
                    <option value="new">"Новый"</option>
                    <option value="in_progress">"В работе"</option>
                    <option value="completed">"Завершён"</option>
                </select>
                <label class="filter-label">
                    <input
                        type="checkbox"
                        prop:checked=move || show_archived.get()
                        on:change=move |ev| {
                            set_show_archived.set(event_target_checked(&ev));
                            set_query.update(|q| q.reset_page());
                        }
                    />
                    {" Архив"}
                </label>
                <input
                    type="date"
                    class="filter-date"
                    on:change=move |ev| {
                        let from = parse_input_date(&event_target_value(&ev));
                        set_query.update(|q| {
                            let to = q.date_to;
                            q.set_date_range(from, to);
                        });
                    }
                />
                <input
                    type="date"
                    class="filter-date"
                    on:change=move |ev| {
                        let to = parse_input_date(&event_target_value(&ev));
                        set_query.update(|q| {
                            let from = q.date_from;
                            q.set_date_range(from, to);
                        });
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
                            <th class="table__header-cell table__header-cell--checkbox"></th>
                            <th class="table__header-cell table__header-cell--sortable"
                                on:click=move |_| toggle_sort("name", SortKind::Text)>
                                {move || {
                                    let q = query.get();
                                    format!("Название{}", get_sort_indicator(q.sort.as_deref(), "name", q.sort_ascending))
                                }}
                            </th>
                            <th class="table__header-cell table__header-cell--sortable"
                                on:click=move |_| toggle_sort("status", SortKind::Text)>
                                {move || {
                                    let q = query.get();
                                    format!("Статус{}", get_sort_indicator(q.sort.as_deref(), "status", q.sort_ascending))
                                }}
                            </th>
                            <th class="table__header-cell table__header-cell--sortable"
                                on:click=move |_| toggle_sort("start_date", SortKind::Numeric)>
                                {move || {
                                    let q = query.get();
                                    format!("Начало{}", get_sort_indicator(q.sort.as_deref(), "start_date", q.sort_ascending))
                                }}
                            </th>
                            <th class="table__header-cell table__header-cell--sortable"
                                on:click=move |_| toggle_sort("budget", SortKind::Numeric)>
                                {move || {
                                    let q = query.get();
                                    format!("Бюджет{}", get_sort_indicator(q.sort.as_deref(), "budget", q.sort_ascending))
                                }}
                            </th>
                            <th class="table__header-cell">{"Бригада"}</th>
                            <th class="table__header-cell">{"Адрес"}</th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || page_view().rows.into_iter().map(|project| {
                            let id = project.id;
                            let project_for_click = project.clone();
                            let chips: Vec<String> = project
                                .active_employees()
                                .filter_map(|pe| pe.employee.as_ref().map(|e| e.short_name()))
                                .collect();
                            view! {
                                <tr
                                    class="table__row"
                                    class:table__row--selected=move || selected.get().contains(&id)
                                    on:click=move |_| open_project(project_for_click.clone())
                                >
                                    <TableCheckbox
                                        checked=Signal::derive(move || selected.get().contains(&id))
                                        on_change=Callback::new(move |checked| toggle_select(id, checked))
                                    />
                                    <td class="table__cell">{project.name.clone()}</td>
                                    <td class="table__cell">{project.status.label()}</td>
                                    <td class="table__cell">{format_naive(project.start_date)}</td>
                                    <td class="table__cell table__cell--money">{format_money(project.budget)}</td>
                                    <td class="table__cell">
                                        {chips.into_iter().map(|name| view! {
                                            <span class="chip">{name}</span>
                                        }).collect_view()}
                                    </td>
                                    <td class="table__cell">{project.address.clone()}</td>
                                </tr>
                            }
                        }).collect_view()}
                    </tbody>
                </table>
            </div>

            <PaginationControls
                current_page=Signal::derive(move || query.get().page)
                total_pages=Signal::derive(move || page_view().total_pages)
                total_count=Signal::derive(move || page_view().total_count)
                on_page_change=Callback::new(move |page| set_query.update(|q| q.page = page))
            />

            {move || editing_id.get().map(|id| {
                view! {
                    <Modal
                        title=if id.is_some() { "Карточка проекта".to_string() } else { "Новый проект".to_string() }
                        on_close=Callback::new(move |_| close_modal())
                    >
                        <ProjectDetails
                            id=id
                            on_saved=Callback::new(move |_| {
                                close_modal();
                                load();
                            })
                        />
                    </Modal>
                }
            })}
        </div>
    }
}
