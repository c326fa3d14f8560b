pub mod assignment;
pub mod employee;
pub mod nomenclature;
pub mod payment;
pub mod project;
pub mod work_report;

pub use assignment::{busy_map, Assignment};
pub use employee::Employee;
pub use nomenclature::{AmountChange, Nomenclature, NomenclatureFact, ProjectNomenclature};
pub use payment::Payment;
pub use project::{Project, ProjectEmployee, ProjectStatus};
pub use work_report::WorkReport;

use chrono::NaiveDate;

/// Увольнение сотрудника: глобальный флаг плюс закрытие всех его
/// активных связок во всех проектах одной датой. Оптимистичный
/// обработчик применяет это локально до подтверждения сервера.
pub fn dismiss_employee(employee: &mut Employee, projects: &mut [Project], date: NaiveDate) {
    employee.is_dismissed = true;
    employee.dismissal_date = Some(date);
    for project in projects.iter_mut() {
        project.end_employee_associations(employee.id, date);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project::ProjectStatus;

    fn project_with_employee(project_id: i64, employee_id: i64) -> Project {
        Project {
            id: project_id,
            name: format!("Объект {}", project_id),
            status: ProjectStatus::InProgress,
            start_date: None,
            end_date: None,
            budget: 0.0,
            address: String::new(),
            is_archived: false,
            employees: vec![ProjectEmployee {
                employee_id,
                employee: None,
                start_working_date: NaiveDate::from_ymd_opt(2026, 1, 10),
                end_working_date: None,
                rate_per_hour: 500.0,
            }],
            nomenclatures: vec![],
        }
    }

    // Увольнение закрывает связки в обоих проектах и
    // ставит глобальный флаг
    #[test]
    fn dismissal_closes_associations_in_every_project() {
        let mut employee = Employee {
            id: 26,
            surname: "Сидоров".into(),
            name: "Пётр".into(),
            patronymic: None,
            role: "монтажник".into(),
            is_dismissed: false,
            employment_date: None,
            dismissal_date: None,
        };
        let mut projects = vec![project_with_employee(1, 26), project_with_employee(2, 26)];
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();

        dismiss_employee(&mut employee, &mut projects, date);

        assert!(employee.is_dismissed);
        assert_eq!(employee.dismissal_date, Some(date));
        for p in &projects {
            assert_eq!(p.employees[0].end_working_date, Some(date));
            assert_eq!(p.active_employees().count(), 0);
        }
    }
}
