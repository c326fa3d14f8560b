use chrono::NaiveDate;
use contracts::domain::Payment;
use serde_json::json;

use crate::shared::http;

/// Выплаты с фильтрами по проекту и периоду
pub async fn fetch_payments(
    project_id: Option<i64>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<Vec<Payment>, String> {
    let mut params: Vec<(&str, String)> = Vec::new();
    if let Some(id) = project_id {
        params.push(("filter[project_id]", id.to_string()));
    }
    if let Some(from) = from {
        params.push(("filter[date_from]", from.format("%Y-%m-%d").to_string()));
    }
    if let Some(to) = to {
        params.push(("filter[date_to]", to.format("%Y-%m-%d").to_string()));
    }
    let path = http::build_query("/payments", &params);
    http::get_collection(&path).await
}

/// Запись выплаты: новая строка с нулевым id уходит POST-ом
pub async fn save_payment(payment: &Payment) -> Result<(), String> {
    let body = json!({
        "employee_id": payment.employee_id,
        "project_id": payment.project_id,
        "total": payment.total,
        "first": payment.first,
        "second": payment.second,
        "third": payment.third,
        "note": payment.note,
    });
    if payment.id > 0 {
        http::patch_json(&format!("/payments/{}", payment.id), &body)
            .await
            .map(|_| ())
    } else {
        http::post_json("/payments", &body).await.map(|_| ())
    }
}

/// Путь экспорта ведомости за период
pub fn export_path(from: NaiveDate, to: NaiveDate) -> String {
    http::build_query(
        "/payments/export",
        &[
            ("filter[date_from]", from.format("%Y-%m-%d").to_string()),
            ("filter[date_to]", to.format("%Y-%m-%d").to_string()),
        ],
    )
}
