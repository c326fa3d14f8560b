use chrono::NaiveDate;
use contracts::domain::WorkReport;
use serde_json::json;

use crate::shared::http;

/// Табели проекта за конкретный день
pub async fn fetch_reports(project_id: i64, date: NaiveDate) -> Result<Vec<WorkReport>, String> {
    let path = http::build_query(
        "/work-reports",
        &[
            ("filter[project_id]", project_id.to_string()),
            ("filter[date]", date.format("%Y-%m-%d").to_string()),
        ],
    );
    http::get_collection(&path).await
}

/// Создание либо частичное обновление строки табеля. Новая строка
/// приходит с нулевым id.
pub async fn save_report(report: &WorkReport) -> Result<(), String> {
    let body = json!({
        "project_id": report.project_id,
        "employee_id": report.employee_id,
        "date": report.date,
        "hours_worked": report.hours_worked,
        "absent": report.absent,
        "note": report.note,
    });
    if report.id > 0 {
        http::patch_json(&format!("/work-reports/{}", report.id), &body)
            .await
            .map(|_| ())
    } else {
        http::post_json("/work-reports", &body).await.map(|_| ())
    }
}

/// Путь экспорта табеля за период — файл скачивается отдельным слоем
pub fn export_path(project_id: i64, from: NaiveDate, to: NaiveDate) -> String {
    http::build_query(
        "/work-reports/export",
        &[
            ("filter[project_id]", project_id.to_string()),
            ("filter[date_from]", from.format("%Y-%m-%d").to_string()),
            ("filter[date_to]", to.format("%Y-%m-%d").to_string()),
        ],
    )
}
