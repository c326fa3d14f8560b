//! Привязка доменных сущностей к списочному конвейеру: составной текст
//! поиска, ключ датового фильтра и значения полей сортировки.

use chrono::NaiveDate;

use crate::domain::{Employee, Project};
use crate::list::{ListRow, SortValue};

impl ListRow for Project {
    fn id(&self) -> i64 {
        self.id
    }

    /// Поиск по проекту находит строку по номеру, названию и по имени
    /// любого активного сотрудника (включая бригадира) на проекте.
    fn search_text(&self) -> String {
        let mut text = format!("{} {}", self.id, self.name);
        for pe in self.active_employees() {
            if let Some(e) = &pe.employee {
                text.push(' ');
                text.push_str(&e.full_name());
                text.push(' ');
                text.push_str(&e.short_name());
            }
        }
        text
    }

    fn date_key(&self) -> Option<NaiveDate> {
        self.start_date
    }

    fn sort_value(&self, field: &str) -> SortValue {
        match field {
            "name" => SortValue::Text(self.name.clone()),
            "status" => SortValue::Text(self.status.label().to_string()),
            "budget" => SortValue::Number(self.budget),
            "start_date" => SortValue::Date(self.start_date),
            _ => SortValue::Number(self.id as f64),
        }
    }
}

impl ListRow for Employee {
    fn id(&self) -> i64 {
        self.id
    }

    fn search_text(&self) -> String {
        format!("{} {} {}", self.id, self.full_name(), self.role)
    }

    fn date_key(&self) -> Option<NaiveDate> {
        self.employment_date
    }

    fn sort_value(&self, field: &str) -> SortValue {
        match field {
            "name" => SortValue::Text(self.full_name()),
            "role" => SortValue::Text(self.role.clone()),
            "employment_date" => SortValue::Date(self.employment_date),
            _ => SortValue::Number(self.id as f64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project::{ProjectEmployee, ProjectStatus};
    use crate::list::{apply_pipeline, ListQuery};

    fn foreman(id: i64, surname: &str) -> Employee {
        Employee {
            id,
            surname: surname.to_string(),
            name: "Иван".into(),
            patronymic: Some("Петрович".into()),
            role: "Бригадир".into(),
            is_dismissed: false,
            employment_date: None,
            dismissal_date: None,
        }
    }

    fn project(id: i64, name: &str, employees: Vec<ProjectEmployee>) -> Project {
        Project {
            id,
            name: name.to_string(),
            status: ProjectStatus::InProgress,
            start_date: None,
            end_date: None,
            budget: 0.0,
            address: String::new(),
            is_archived: false,
            employees,
            nomenclatures: vec![],
        }
    }

    fn pivot(e: Employee, ended: bool) -> ProjectEmployee {
        ProjectEmployee {
            employee_id: e.id,
            employee: Some(e),
            start_working_date: None,
            end_working_date: if ended {
                NaiveDate::from_ymd_opt(2026, 1, 1)
            } else {
                None
            },
            rate_per_hour: 0.0,
        }
    }

    #[test]
    fn project_found_by_active_foreman_name() {
        let items = vec![
            project(1, "ЖК Север", vec![pivot(foreman(5, "Кузнецов"), false)]),
            project(2, "ЖК Юг", vec![pivot(foreman(6, "Смирнов"), false)]),
        ];
        let mut query = ListQuery::new(10);
        query.set_search("кузнецов".to_string());
        let view = apply_pipeline(&items, |_: &Project| true, &query);
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].id, 1);
    }

    #[test]
    fn ended_association_is_not_searchable() {
        let items = vec![project(
            1,
            "ЖК Север",
            vec![pivot(foreman(5, "Кузнецов"), true)],
        )];
        let mut query = ListQuery::new(10);
        query.set_search("кузнецов".to_string());
        let view = apply_pipeline(&items, |_: &Project| true, &query);
        assert!(view.rows.is_empty());
    }

    #[test]
    fn employee_found_by_id_and_role() {
        let items = vec![foreman(26, "Сидоров"), foreman(27, "Иванов")];
        let mut query = ListQuery::new(10);
        query.set_search("26".to_string());
        let view = apply_pipeline(&items, |_: &Employee| true, &query);
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].id, 26);
    }
}
