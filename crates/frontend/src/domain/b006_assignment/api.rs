use chrono::NaiveDate;
use contracts::domain::Assignment;
use serde_json::json;

use crate::shared::http;

/// Все заявки на день — по всем бригадирам, для карты занятости
pub async fn fetch_assignments(date: NaiveDate) -> Result<Vec<Assignment>, String> {
    let path = http::build_query(
        "/assignments",
        &[("filter[date]", date.format("%Y-%m-%d").to_string())],
    );
    http::get_collection(&path).await
}

/// Взять рабочего в состав на день
pub async fn claim(employee_id: i64, date: NaiveDate) -> Result<(), String> {
    http::post_json(
        "/assignments/add",
        &json!({ "employee_id": employee_id, "date": date }),
    )
    .await
    .map(|_| ())
}

/// Отпустить рабочего из состава
pub async fn release(employee_id: i64, date: NaiveDate) -> Result<(), String> {
    http::post_json(
        "/assignments/remove",
        &json!({ "employee_id": employee_id, "date": date }),
    )
    .await
    .map(|_| ())
}
