use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::roles::Role;

/// Сотрудник (глобальная карточка, независимая от проектов)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub surname: String,
    pub name: String,
    #[serde(default)]
    pub patronymic: Option<String>,
    /// Должность — свободный текст backend'а; парсится в `Role` на границе
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub is_dismissed: bool,
    #[serde(default)]
    pub employment_date: Option<NaiveDate>,
    #[serde(default)]
    pub dismissal_date: Option<NaiveDate>,
}

impl Employee {
    /// "Иванов Иван Петрович"
    pub fn full_name(&self) -> String {
        match &self.patronymic {
            Some(p) if !p.is_empty() => format!("{} {} {}", self.surname, self.name, p),
            _ => format!("{} {}", self.surname, self.name),
        }
    }

    /// "Иванов И.П." — форма для чипов и колонок списка
    pub fn short_name(&self) -> String {
        let mut s = self.surname.clone();
        if let Some(c) = self.name.chars().next() {
            s.push(' ');
            s.push(c);
            s.push('.');
        }
        if let Some(p) = &self.patronymic {
            if let Some(c) = p.chars().next() {
                s.push(c);
                s.push('.');
            }
        }
        s
    }

    pub fn parsed_role(&self) -> Role {
        Role::parse(&self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emp(surname: &str, name: &str, patronymic: Option<&str>) -> Employee {
        Employee {
            id: 1,
            surname: surname.to_string(),
            name: name.to_string(),
            patronymic: patronymic.map(|s| s.to_string()),
            role: String::new(),
            is_dismissed: false,
            employment_date: None,
            dismissal_date: None,
        }
    }

    #[test]
    fn short_name_with_patronymic() {
        assert_eq!(
            emp("Иванов", "Иван", Some("Петрович")).short_name(),
            "Иванов И.П."
        );
    }

    #[test]
    fn short_name_without_patronymic() {
        assert_eq!(emp("Иванов", "Иван", None).short_name(), "Иванов И.");
    }
}
