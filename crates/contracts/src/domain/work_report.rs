use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Табель: одна строка на (проект, сотрудник, дата)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkReport {
    #[serde(default)]
    pub id: i64,
    pub project_id: i64,
    pub employee_id: i64,
    pub date: NaiveDate,
    #[serde(default)]
    pub hours_worked: f64,
    /// Отсутствовал — часы не учитываются, сколько бы ни стояло в поле
    #[serde(default)]
    pub absent: bool,
    #[serde(default)]
    pub note: Option<String>,
}

impl WorkReport {
    /// Часы к оплате: прогул всегда даёт ноль
    pub fn billable_hours(&self) -> f64 {
        if self.absent {
            0.0
        } else {
            self.hours_worked
        }
    }
}
