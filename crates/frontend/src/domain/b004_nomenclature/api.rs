use chrono::NaiveDate;
use contracts::domain::Nomenclature;
use serde_json::json;

use crate::shared::http;

/// Справочник материалов
pub async fn fetch_nomenclatures() -> Result<Vec<Nomenclature>, String> {
    http::get_collection("/nomenclatures").await
}

pub async fn add_to_project(
    project_id: i64,
    nomenclature_id: i64,
    start_amount: f64,
) -> Result<(), String> {
    http::post_json(
        &format!("/projects/{}/nomenclatures/add", project_id),
        &json!({
            "nomenclature_id": nomenclature_id,
            "start_amount": start_amount,
        }),
    )
    .await
    .map(|_| ())
}

/// Корректировка плана — журнал append-only, прежние записи не трогаются
pub async fn add_amount_change(
    project_nomenclature_id: i64,
    amount_change: f64,
) -> Result<(), String> {
    http::post_json(
        &format!(
            "/project-nomenclatures/{}/amount-changes",
            project_nomenclature_id
        ),
        &json!({ "amount_change": amount_change }),
    )
    .await
    .map(|_| ())
}

/// Факт расхода за день от текущего бригадира
pub async fn add_fact(
    project_nomenclature_id: i64,
    amount: f64,
    fact_date: NaiveDate,
) -> Result<(), String> {
    http::post_json(
        &format!("/project-nomenclatures/{}/facts", project_nomenclature_id),
        &json!({ "amount": amount, "fact_date": fact_date }),
    )
    .await
    .map(|_| ())
}

pub async fn update_fact(fact_id: i64, amount: f64) -> Result<(), String> {
    http::patch_json(
        &format!("/nomenclature-facts/{}", fact_id),
        &json!({ "amount": amount }),
    )
    .await
    .map(|_| ())
}

/// Удаление факта всегда мягкое: сервер ставит `is_deleted`
pub async fn delete_fact(fact_id: i64) -> Result<(), String> {
    http::post_action(&format!("/nomenclature-facts/{}/remove", fact_id))
        .await
        .map(|_| ())
}
