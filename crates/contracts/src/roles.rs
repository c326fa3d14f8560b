//! Должности. Backend хранит должность свободным текстом; здесь она один
//! раз на границе разбирается в закрытое перечисление, и дальше весь код
//! работает только с `Role`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// "Бригадир" — ведёт суточный состав и факты расхода материалов
    Foreman,
    /// "ГИП" — главный инженер проекта; часы не входят в расход бюджета
    ChiefEngineer,
    /// Любая другая должность
    Worker,
}

impl Role {
    /// Правила разбора повторяют исходные проверки:
    /// подстрока "бригадир" и точное "гип" без учёта регистра.
    pub fn parse(raw: &str) -> Role {
        let lower = raw.trim().to_lowercase();
        if lower == "гип" {
            Role::ChiefEngineer
        } else if lower.contains("бригадир") {
            Role::Foreman
        } else {
            Role::Worker
        }
    }

    /// Часы сотрудника учитываются в расходе бюджета проекта
    pub fn counts_toward_spend(&self) -> bool {
        !matches!(self, Role::ChiefEngineer)
    }

    /// Может вести суточный состав (занимать рабочих на день)
    pub fn can_manage_roster(&self) -> bool {
        matches!(self, Role::Foreman)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_foreman_by_substring() {
        assert_eq!(Role::parse("Бригадир"), Role::Foreman);
        assert_eq!(Role::parse("старший бригадир"), Role::Foreman);
    }

    #[test]
    fn parses_chief_engineer_by_equality_only() {
        assert_eq!(Role::parse("ГИП"), Role::ChiefEngineer);
        assert_eq!(Role::parse(" гип "), Role::ChiefEngineer);
        // подстрочного совпадения для ГИП нет
        assert_eq!(Role::parse("помощник ГИП"), Role::Worker);
    }

    #[test]
    fn chief_engineer_excluded_from_spend() {
        assert!(!Role::ChiefEngineer.counts_toward_spend());
        assert!(Role::Foreman.counts_toward_spend());
        assert!(Role::Worker.counts_toward_spend());
    }
}
