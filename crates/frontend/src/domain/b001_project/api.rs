use chrono::NaiveDate;
use contracts::domain::{Project, WorkReport};
use serde_json::json;

use crate::shared::http;

/// Список проектов со связками сотрудников (для поиска по бригадирам)
pub async fn fetch_projects() -> Result<Vec<Project>, String> {
    let path = http::build_query(
        "/projects",
        &[
            ("with[]", "employees.employee".to_string()),
            ("with[]", "nomenclatures".to_string()),
        ],
    );
    http::get_collection(&path).await
}

/// Сверочный GET одного проекта — авторитетное состояние после мутации
pub async fn fetch_project(id: i64) -> Result<Project, String> {
    let path = http::build_query(
        &format!("/projects/{}", id),
        &[
            ("with[]", "employees.employee".to_string()),
            ("with[]", "nomenclatures.facts".to_string()),
            ("with[]", "nomenclatures.amount_changes".to_string()),
        ],
    );
    http::get_item(&path).await
}

pub async fn create_project(body: &serde_json::Value) -> Result<(), String> {
    http::post_json("/projects", body).await.map(|_| ())
}

pub async fn update_project(id: i64, body: &serde_json::Value) -> Result<(), String> {
    http::patch_json(&format!("/projects/{}", id), body)
        .await
        .map(|_| ())
}

/// Архивация — "экшен"-эндпоинт, POST без тела
pub async fn archive_project(id: i64) -> Result<(), String> {
    http::post_action(&format!("/projects/{}/archive", id))
        .await
        .map(|_| ())
}

pub async fn add_employee(
    project_id: i64,
    employee_id: i64,
    rate_per_hour: f64,
    start_working_date: NaiveDate,
) -> Result<(), String> {
    http::post_json(
        &format!("/projects/{}/employees/add", project_id),
        &json!({
            "employee_id": employee_id,
            "rate_per_hour": rate_per_hour,
            "start_working_date": start_working_date,
        }),
    )
    .await
    .map(|_| ())
}

/// Снятие с проекта: связка закрывается датой, не удаляется
pub async fn remove_employee(
    project_id: i64,
    employee_id: i64,
    end_working_date: NaiveDate,
) -> Result<(), String> {
    http::post_json(
        &format!("/projects/{}/employees/remove", project_id),
        &json!({
            "employee_id": employee_id,
            "end_working_date": end_working_date,
        }),
    )
    .await
    .map(|_| ())
}

/// Табели одного сотрудника по проекту — ветка веерной загрузки расхода
pub async fn fetch_employee_reports(
    project_id: i64,
    employee_id: i64,
) -> Result<Vec<WorkReport>, String> {
    let path = http::build_query(
        "/work-reports",
        &[
            ("filter[project_id]", project_id.to_string()),
            ("filter[employee_id]", employee_id.to_string()),
        ],
    );
    http::get_collection(&path).await
}
