use std::collections::HashMap;

use contracts::aggregates::{my_fact, total_fact};
use contracts::domain::{AmountChange, Nomenclature, NomenclatureFact, Project, ProjectNomenclature};
use contracts::sync::Tracked;
use contracts::validation;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::b004_nomenclature::api;
use crate::shared::date_utils::today;
use crate::system::auth::context::{current_user_id, use_auth};

/// Вкладка «Материалы» карточки проекта: план с журналом корректировок,
/// колонки "мой факт" (сегодня, текущий бригадир) и "общий факт"
/// (пожизненная сумма). Факты правятся оптимистично, затем сверочный
/// GET проекта через `on_reload`.
#[component]
pub fn MaterialsTab(
    project_id: i64,
    tracked: ReadSignal<Tracked<Option<Project>>>,
    on_reload: Callback<()>,
) -> impl IntoView {
    let (auth_state, _) = use_auth();
    let manager_id = move || current_user_id(auth_state).unwrap_or(0);

    // Локальная копия связок — карточка проекта отдаёт состояние только
    // на чтение, а оптимистика со снимком живёт здесь
    let (materials, set_materials) = signal(Tracked::new(Vec::<ProjectNomenclature>::new()));
    Effect::new(move |_| {
        let rows = tracked
            .get()
            .value()
            .as_ref()
            .map(|p| p.nomenclatures.clone())
            .unwrap_or_default();
        set_materials.update(|t| t.reconciled(rows));
    });

    let (error, set_error) = signal(Option::<String>::None);

    // Черновики полей ввода, по id связки
    let (fact_drafts, set_fact_drafts) = signal(HashMap::<i64, String>::new());
    let (change_drafts, set_change_drafts) = signal(HashMap::<i64, String>::new());

    // Добавление материала из справочника
    let (catalog, set_catalog) = signal(Vec::<Nomenclature>::new());
    let (new_nomenclature_id, set_new_nomenclature_id) = signal(Option::<i64>::None);
    let (new_start_amount, set_new_start_amount) = signal(0.0_f64);

    spawn_local(async move {
        match api::fetch_nomenclatures().await {
            Ok(list) => set_catalog.set(list),
            Err(e) => leptos::logging::log!("справочник материалов не загрузился: {}", e),
        }
    });

    let parse_amount = |raw: &str| -> Result<f64, String> {
        raw.trim()
            .replace(',', ".")
            .parse::<f64>()
            .map_err(|_| format!("Количество не число: \"{}\"", raw))
    };

    // Мой сегодняшний факт по связке — он и редактируется
    let my_today_fact = move |pn: &ProjectNomenclature| -> Option<NomenclatureFact> {
        let uid = manager_id();
        let day = today();
        pn.facts
            .iter()
            .find(|f| !f.is_deleted && f.project_manager_id == uid && f.fact_date == day)
            .cloned()
    };

    let save_fact = move |pn_id: i64| {
        let raw = fact_drafts.get_untracked().get(&pn_id).cloned().unwrap_or_default();
        let amount = match parse_amount(&raw) {
            Ok(a) => a,
            Err(e) => {
                set_error.set(Some(e));
                return;
            }
        };
        if let Err(e) = validation::validate_fact_amount(amount) {
            set_error.set(Some(e.to_string()));
            return;
        }
        set_error.set(None);

        let uid = manager_id();
        let day = today();
        let existing = materials
            .get_untracked()
            .value()
            .iter()
            .find(|pn| pn.id == pn_id)
            .and_then(|pn| my_today_fact(pn));

        // колонки факта пересчитываются сразу
        let existing_id = existing.as_ref().map(|f| f.id);
        set_materials.update(|t| {
            t.apply_optimistic(|rows| {
                if let Some(pn) = rows.iter_mut().find(|pn| pn.id == pn_id) {
                    match existing_id {
                        Some(fact_id) => {
                            if let Some(f) = pn.facts.iter_mut().find(|f| f.id == fact_id) {
                                f.amount = amount;
                            }
                        }
                        None => pn.facts.push(NomenclatureFact {
                            id: 0,
                            amount,
                            fact_date: day,
                            project_manager_id: uid,
                            is_deleted: false,
                        }),
                    }
                }
            });
        });

        spawn_local(async move {
            let result = match existing_id {
                Some(fact_id) => api::update_fact(fact_id, amount).await,
                None => api::add_fact(pn_id, amount, day).await,
            };
            match result {
                Ok(()) => {
                    set_materials.update(|t| t.begin_reconcile());
                    set_fact_drafts.update(|d| {
                        d.remove(&pn_id);
                    });
                    on_reload.run(());
                }
                Err(e) => {
                    set_materials.update(|t| t.rollback());
                    set_error.set(Some(format!("Факт не сохранился: {}", e)));
                }
            }
        });
    };

    let remove_fact = move |pn_id: i64| {
        let Some(existing) = materials
            .get_untracked()
            .value()
            .iter()
            .find(|pn| pn.id == pn_id)
            .and_then(|pn| my_today_fact(pn))
        else {
            return;
        };
        let fact_id = existing.id;

        set_materials.update(|t| {
            t.apply_optimistic(|rows| {
                if let Some(pn) = rows.iter_mut().find(|pn| pn.id == pn_id) {
                    if let Some(f) = pn.facts.iter_mut().find(|f| f.id == fact_id) {
                        f.is_deleted = true;
                    }
                }
            });
        });

        spawn_local(async move {
            match api::delete_fact(fact_id).await {
                Ok(()) => {
                    set_materials.update(|t| t.begin_reconcile());
                    on_reload.run(());
                }
                Err(e) => {
                    set_materials.update(|t| t.rollback());
                    set_error.set(Some(format!("Удаление факта не прошло: {}", e)));
                }
            }
        });
    };

    let save_change = move |pn_id: i64| {
        let raw = change_drafts.get_untracked().get(&pn_id).cloned().unwrap_or_default();
        let amount = match parse_amount(&raw) {
            Ok(a) => a,
            Err(e) => {
                set_error.set(Some(e));
                return;
            }
        };
        if amount == 0.0 {
            return;
        }
        set_error.set(None);

        set_materials.update(|t| {
            t.apply_optimistic(|rows| {
                if let Some(pn) = rows.iter_mut().find(|pn| pn.id == pn_id) {
                    pn.amount_changes.push(AmountChange {
                        id: 0,
                        amount_change: amount,
                        created_at: Some(today()),
                        user: None,
                    });
                }
            });
        });

        spawn_local(async move {
            match api::add_amount_change(pn_id, amount).await {
                Ok(()) => {
                    set_materials.update(|t| t.begin_reconcile());
                    set_change_drafts.update(|d| {
                        d.remove(&pn_id);
                    });
                    on_reload.run(());
                }
                Err(e) => {
                    set_materials.update(|t| t.rollback());
                    set_error.set(Some(format!("Корректировка не прошла: {}", e)));
                }
            }
        });
    };

    let add_material = move |_| {
        let Some(nomenclature_id) = new_nomenclature_id.get_untracked() else {
            return;
        };
        let start_amount = new_start_amount.get_untracked();
        spawn_local(async move {
            match api::add_to_project(project_id, nomenclature_id, start_amount).await {
                Ok(()) => {
                    set_new_nomenclature_id.set(None);
                    on_reload.run(());
                }
                Err(e) => set_error.set(Some(format!("Материал не добавился: {}", e))),
            }
        });
    };

    // в выпадающем списке только материалы, которых ещё нет в проекте
    let selectable = move || {
        let current: Vec<i64> = materials
            .get()
            .value()
            .iter()
            .map(|pn| pn.nomenclature_id)
            .collect();
        catalog
            .get()
            .into_iter()
            .filter(|n| !current.contains(&n.id))
            .collect::<Vec<_>>()
    };

    view! {
        <div class="materials-tab">
            {move || error.get().map(|e| view! {
                <div class="error-message">{e}</div>
            })}

            <table class="table__data table--striped">
                <thead class="table__head">
                    <tr>
                        <th class="table__header-cell">{"Материал"}</th>
                        <th class="table__header-cell">{"Ед."}</th>
                        <th class="table__header-cell">{"План"}</th>
                        <th class="table__header-cell">{"Мой факт"}</th>
                        <th class="table__header-cell">{"Общий факт"}</th>
                        <th class="table__header-cell">{"Факт за сегодня"}</th>
                        <th class="table__header-cell">{"Корректировка плана"}</th>
                    </tr>
                </thead>
                <tbody>
                    {move || {
                        let uid = manager_id();
                        let day = today();
                        materials.get().value().clone().into_iter().map(|pn| {
                            let pn_id = pn.id;
                            let unit = pn
                                .nomenclature
                                .as_ref()
                                .map(|n| n.unit.clone())
                                .unwrap_or_default();
                            let mine = my_fact(&pn.facts, uid, day);
                            let total = total_fact(&pn.facts);
                            let has_my_fact = my_today_fact(&pn).is_some();
                            view! {
                                <tr class="table__row">
                                    <td class="table__cell">{pn.display_name()}</td>
                                    <td class="table__cell">{unit}</td>
                                    <td class="table__cell table__cell--number">{format!("{}", pn.plan_amount())}</td>
                                    <td class="table__cell table__cell--number">{format!("{}", mine)}</td>
                                    <td class="table__cell table__cell--number">{format!("{}", total)}</td>
                                    <td class="table__cell">
                                        <input
                                            type="text"
                                            class="table__input table__input--amount"
                                            prop:value=move || {
                                                fact_drafts.get().get(&pn_id).cloned().unwrap_or_default()
                                            }
                                            on:input=move |ev| {
                                                let v = event_target_value(&ev);
                                                set_fact_drafts.update(|d| {
                                                    d.insert(pn_id, v);
                                                });
                                            }
                                        />
                                        <button
                                            class="button button--small"
                                            on:click=move |_| save_fact(pn_id)
                                        >
                                            {"Записать"}
                                        </button>
                                        <Show when=move || has_my_fact>
                                            <button
                                                class="button button--small button--secondary"
                                                on:click=move |_| remove_fact(pn_id)
                                            >
                                                {"Удалить"}
                                            </button>
                                        </Show>
                                    </td>
                                    <td class="table__cell">
                                        <input
                                            type="text"
                                            class="table__input table__input--amount"
                                            placeholder="+/-"
                                            prop:value=move || {
                                                change_drafts.get().get(&pn_id).cloned().unwrap_or_default()
                                            }
                                            on:input=move |ev| {
                                                let v = event_target_value(&ev);
                                                set_change_drafts.update(|d| {
                                                    d.insert(pn_id, v);
                                                });
                                            }
                                        />
                                        <button
                                            class="button button--small"
                                            on:click=move |_| save_change(pn_id)
                                        >
                                            {"Применить"}
                                        </button>
                                    </td>
                                </tr>
                            }
                        }).collect_view()
                    }}
                </tbody>
            </table>

            <div class="materials-tab__add">
                <select on:change=move |ev| {
                    set_new_nomenclature_id.set(event_target_value(&ev).parse().ok());
                }>
                    <option value="">"— выберите материал —"</option>
                    {move || selectable().into_iter().map(|n| view! {
                        <option value={n.id.to_string()}>{n.name.clone()}</option>
                    }).collect_view()}
                </select>
                <input
                    type="number"
                    placeholder="План"
                    on:input=move |ev| {
                        set_new_start_amount.set(event_target_value(&ev).parse().unwrap_or(0.0));
                    }
                />
                <button
                    class="button button--primary"
                    disabled=move || new_nomenclature_id.get().is_none()
                    on:click=add_material
                >
                    {"Добавить материал"}
                </button>
            </div>
        </div>
    }
}
