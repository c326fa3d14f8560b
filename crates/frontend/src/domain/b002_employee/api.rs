use chrono::NaiveDate;
use contracts::domain::Employee;
use serde_json::json;

use crate::shared::http;

pub async fn fetch_employees() -> Result<Vec<Employee>, String> {
    http::get_collection("/employees").await
}

pub async fn create_employee(body: &serde_json::Value) -> Result<(), String> {
    http::post_json("/employees", body).await.map(|_| ())
}

pub async fn update_employee(id: i64, body: &serde_json::Value) -> Result<(), String> {
    http::patch_json(&format!("/employees/{}", id), body)
        .await
        .map(|_| ())
}

/// Глобальное увольнение. Сервер сам закрывает активные связки во всех
/// проектах той же датой; клиент делает то же оптимистично.
pub async fn dismiss_employee(id: i64, dismissal_date: NaiveDate) -> Result<(), String> {
    http::post_json(
        &format!("/employees/{}/dismiss", id),
        &json!({ "dismissal_date": dismissal_date }),
    )
    .await
    .map(|_| ())
}
