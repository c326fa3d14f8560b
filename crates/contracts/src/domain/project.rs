use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::employee::Employee;
use super::nomenclature::ProjectNomenclature;

/// Статус проекта. Backend отдаёт русские строковые значения.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ProjectStatus {
    #[default]
    #[serde(rename = "Новый")]
    New,
    #[serde(rename = "В работе")]
    InProgress,
    #[serde(rename = "Завершён", alias = "Завершен")]
    Completed,
    #[serde(rename = "Архив")]
    Archived,
}

impl ProjectStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ProjectStatus::New => "Новый",
            ProjectStatus::InProgress => "В работе",
            ProjectStatus::Completed => "Завершён",
            ProjectStatus::Archived => "Архив",
        }
    }
}

/// Связка сотрудника с проектом (pivot).
/// Активна, пока не проставлена `end_working_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectEmployee {
    pub employee_id: i64,
    /// Вложенная карточка приходит при `with[]=employees`
    #[serde(default)]
    pub employee: Option<Employee>,
    #[serde(default)]
    pub start_working_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_working_date: Option<NaiveDate>,
    #[serde(default)]
    pub rate_per_hour: f64,
}

impl ProjectEmployee {
    /// Снят ли сотрудник с проекта. Независимо от глобального
    /// `Employee::is_dismissed`.
    pub fn is_active(&self) -> bool {
        self.end_working_date.is_none()
    }
}

/// Проект (объект строительства)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub budget: f64,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub employees: Vec<ProjectEmployee>,
    #[serde(default)]
    pub nomenclatures: Vec<ProjectNomenclature>,
}

impl Project {
    /// Архивным проект считается и по флагу, и по терминальному статусу
    pub fn archived(&self) -> bool {
        self.is_archived || self.status == ProjectStatus::Archived
    }

    pub fn active_employees(&self) -> impl Iterator<Item = &ProjectEmployee> {
        self.employees.iter().filter(|pe| pe.is_active())
    }

    /// Проставить дату снятия всем активным связкам сотрудника.
    /// Используется оптимистичным увольнением: сотрудник может числиться
    /// сразу в нескольких проектах.
    pub fn end_employee_associations(&mut self, employee_id: i64, date: NaiveDate) {
        for pe in &mut self.employees {
            if pe.employee_id == employee_id && pe.is_active() {
                pe.end_working_date = Some(date);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archived_by_flag_or_status() {
        let mut p = Project {
            id: 1,
            name: "Объект".into(),
            status: ProjectStatus::InProgress,
            start_date: None,
            end_date: None,
            budget: 0.0,
            address: String::new(),
            is_archived: false,
            employees: vec![],
            nomenclatures: vec![],
        };
        assert!(!p.archived());
        p.status = ProjectStatus::Archived;
        assert!(p.archived());
        p.status = ProjectStatus::New;
        p.is_archived = true;
        assert!(p.archived());
    }

    #[test]
    fn status_parses_russian_values() {
        let s: ProjectStatus = serde_json::from_str("\"В работе\"").unwrap();
        assert_eq!(s, ProjectStatus::InProgress);
        let s: ProjectStatus = serde_json::from_str("\"Архив\"").unwrap();
        assert_eq!(s, ProjectStatus::Archived);
    }

    #[test]
    fn end_employee_associations_touches_only_active() {
        let old_end = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        let mut p = Project {
            id: 1,
            name: String::new(),
            status: ProjectStatus::InProgress,
            start_date: None,
            end_date: None,
            budget: 0.0,
            address: String::new(),
            is_archived: false,
            employees: vec![
                ProjectEmployee {
                    employee_id: 26,
                    employee: None,
                    start_working_date: None,
                    end_working_date: None,
                    rate_per_hour: 500.0,
                },
                ProjectEmployee {
                    employee_id: 26,
                    employee: None,
                    start_working_date: None,
                    end_working_date: Some(old_end),
                    rate_per_hour: 400.0,
                },
            ],
            nomenclatures: vec![],
        };
        let d = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        p.end_employee_associations(26, d);
        assert_eq!(p.employees[0].end_working_date, Some(d));
        // уже закрытая связка не перезаписывается
        assert_eq!(p.employees[1].end_working_date, Some(old_end));
    }
}
