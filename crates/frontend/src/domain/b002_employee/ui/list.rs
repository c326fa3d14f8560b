use std::collections::HashSet;

use contracts::domain::{dismiss_employee as apply_dismissal, Employee};
use contracts::list::{apply_pipeline, ListQuery, SortKind};
use contracts::sync::Tracked;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::details::EmployeeDetails;
use crate::domain::b002_employee::api;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::components::table_checkbox::TableCheckbox;
use crate::shared::date_utils::{format_naive, parse_input_date, today};
use crate::shared::icons::icon;
use crate::shared::list_utils::{get_sort_indicator, SearchInput};
use crate::shared::modal::Modal;
use crate::shared::ui_prefs;

const PAGE_SIZE: usize = 10;

#[component]
pub fn EmployeeList() -> impl IntoView {
    let (tracked, set_tracked) = signal(Tracked::new(Vec::<Employee>::new()));
    let (error, set_error) = signal(Option::<String>::None);

    let (query, set_query) = signal(ListQuery::new(PAGE_SIZE));
    let (show_dismissed, set_show_dismissed) = signal(false);
    let (role_filter, set_role_filter) = signal(String::new());

    let (selected, set_selected) = signal(HashSet::<i64>::new());
    let (editing_id, set_editing_id) = signal(Option::<Option<i64>>::None);

    let generation = StoredValue::new(0u64);

    let load = move || {
        set_error.set(None);
        let gen = generation.get_value() + 1;
        generation.set_value(gen);
        spawn_local(async move {
            let result = api::fetch_employees().await;
            if generation.get_value() != gen {
                return;
            }
            match result {
                Ok(data) => set_tracked.update(|t| t.reconciled(data)),
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    load();

    let page_view = move || {
        let q = query.get();
        let dismissed = show_dismissed.get();
        let role = role_filter.get().to_lowercase();
        let items = tracked.get();
        apply_pipeline(
            items.value(),
            |e: &Employee| {
                e.is_dismissed == dismissed
                    && (role.is_empty() || e.role.to_lowercase().contains(&role))
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

    // Увольнение: подтверждение, оптимистичное применение (строка
    // уходит из активного списка сразу), сверка перезагрузкой.
    let dismiss = move |ids: Vec<i64>| {
        if ids.is_empty() {
            return;
        }
        let confirmed = web_sys::window()
            .map(|w| {
                w.confirm_with_message(&format!("Уволить сотрудников? Количество: {}", ids.len()))
                    .unwrap_or(false)
            })
            .unwrap_or(false);
        if !confirmed {
            return;
        }

        let date = today();
        let optimistic_ids = ids.clone();
        set_tracked.update(|t| {
            t.apply_optimistic(|employees| {
                for e in employees.iter_mut() {
                    if optimistic_ids.contains(&e.id) {
                        // проектные связки живут на экране проектов;
                        // здесь достаточно глобального флага
                        apply_dismissal(e, &mut [], date);
                    }
                }
            });
        });
        set_selected.set(HashSet::new());

        spawn_local(async move {
            let mut all_ok = true;
            for id in ids {
                if api::dismiss_employee(id, date).await.is_err() {
                    all_ok = false;
                }
            }
            if all_ok {
                set_tracked.update(|t| t.begin_reconcile());
                match api::fetch_employees().await {
                    Ok(data) => set_tracked.update(|t| t.reconciled(data)),
                    Err(e) => leptos::logging::log!("сверка после увольнения не удалась: {}", e),
                }
            } else {
                set_tracked.update(|t| t.rollback());
                leptos::logging::log!("увольнение не прошло, состояние откатано");
            }
        });
    };

    let open_employee = move |id: i64| {
        ui_prefs::save_selected_employee(id);
        set_editing_id.set(Some(Some(id)));
    };

    let close_modal = move || set_editing_id.set(None);

    view! {
        <div class="page">
            <div class="header">
                <div class="header__content">
                    <h1 class="header__title">{"Сотрудники"}</h1>
                </div>
                <div class="header__actions">
                    <button class="button button--primary" on:click=move |_| set_editing_id.set(Some(None))>
                        {icon("plus")}
                        {"Новый сотрудник"}
                    </button>
                    <button class="button button--secondary" on:click=move |_| load()>
                        {icon("refresh")}
                        {"Обновить"}
                    </button>
                    <button
                        class="button button--secondary"
                        on:click=move |_| dismiss(selected.get().into_iter().collect())
                        disabled=move || selected.get().is_empty() || show_dismissed.get()
                    >
                        {icon("delete")}
                        {move || format!("Уволить ({})", selected.get().len())}
                    </button>
                </div>
            </div>

            <div class="filter-panel">
                <SearchInput
                    on_change=handle_search
                    placeholder="Номер, ФИО или должность..."
                />
                <input
                    type="text"
                    class="filter-input"
                    placeholder="Должность"
                    on:input=move |ev| {
                        set_role_filter.set(event_target_value(&ev));
                        set_query.update(|q| q.reset_page());
                    }
                />
                <label class="filter-label">
                    <input
                        type="checkbox"
                        prop:checked=move || show_dismissed.get()
                        on:change=move |ev| {
                            set_show_dismissed.set(event_target_checked(&ev));
                            set_selected.set(HashSet::new());
                            set_query.update(|q| q.reset_page());
                        }
                    />
                    {" Уволенные"}
                </label>
                <input
                    type="date"
                    class="filter-date"
                    title="Принят с"
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
                    title="Принят по"
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

            <div class="table">
                <table class="table__data table--striped">
                    <thead class="table__head">
                        <tr>
                            <th class="table__header-cell table__header-cell--checkbox"></th>
                            <th class="table__header-cell table__header-cell--sortable"
                                on:click=move |_| toggle_sort("name", SortKind::Text)>
                                {move || {
                                    let q = query.get();
                                    format!("ФИО{}", get_sort_indicator(q.sort.as_deref(), "name", q.sort_ascending))
                                }}
                            </th>
                            <th class="table__header-cell table__header-cell--sortable"
                                on:click=move |_| toggle_sort("role", SortKind::Text)>
                                {move || {
                                    let q = query.get();
                                    format!("Должность{}", get_sort_indicator(q.sort.as_deref(), "role", q.sort_ascending))
                                }}
                            </th>
                            <th class="table__header-cell table__header-cell--sortable"
                                on:click=move |_| toggle_sort("employment_date", SortKind::Numeric)>
                                {move || {
                                    let q = query.get();
                                    format!("Принят{}", get_sort_indicator(q.sort.as_deref(), "employment_date", q.sort_ascending))
                                }}
                            </th>
                            <th class="table__header-cell">{"Уволен"}</th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || page_view().rows.into_iter().map(|employee| {
                            let id = employee.id;
                            view! {
                                <tr
                                    class="table__row"
                                    class:table__row--selected=move || selected.get().contains(&id)
                                    on:click=move |_| open_employee(id)
                                >
                                    <TableCheckbox
                                        checked=Signal::derive(move || selected.get().contains(&id))
                                        on_change=Callback::new(move |checked| toggle_select(id, checked))
                                    />
                                    <td class="table__cell">{employee.full_name()}</td>
                                    <td class="table__cell">{employee.role.clone()}</td>
                                    <td class="table__cell">{format_naive(employee.employment_date)}</td>
                                    <td class="table__cell">{format_naive(employee.dismissal_date)}</td>
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
                        title=if id.is_some() { "Карточка сотрудника".to_string() } else { "Новый сотрудник".to_string() }
                        on_close=Callback::new(move |_| close_modal())
                    >
                        <EmployeeDetails
                            id=id
                            employees=tracked
                            on_saved=Callback::new(move |_| {
                                close_modal();
                                load();
                            })
                            on_dismiss=Callback::new(move |id: i64| {
                                close_modal();
                                dismiss(vec![id]);
                            })
                        />
                    </Modal>
                }
            })}
        </div>
    }
}
