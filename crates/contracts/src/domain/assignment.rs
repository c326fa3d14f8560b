use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Заявка бригадира на рабочего на календарный день.
/// Рабочий, занятый одним бригадиром, недоступен остальным в этот день.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    #[serde(default)]
    pub id: i64,
    pub employee_id: i64,
    pub date: NaiveDate,
    pub foreman_id: i64,
    #[serde(default)]
    pub foreman_name: Option<String>,
}

/// employee_id -> имя бригадира, занявшего рабочего.
/// Собственные заявки текущего бригадира занятостью не считаются.
pub fn busy_map(assignments: &[Assignment], current_foreman_id: i64) -> HashMap<i64, String> {
    assignments
        .iter()
        .filter(|a| a.foreman_id != current_foreman_id)
        .map(|a| {
            (
                a.employee_id,
                a.foreman_name
                    .clone()
                    .unwrap_or_else(|| format!("бригадир #{}", a.foreman_id)),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(employee_id: i64, foreman_id: i64, foreman_name: &str) -> Assignment {
        Assignment {
            id: 0,
            employee_id,
            date: NaiveDate::from_ymd_opt(2026, 2, 24).unwrap(),
            foreman_id,
            foreman_name: Some(foreman_name.to_string()),
        }
    }

    #[test]
    fn worker_claimed_by_other_foreman_is_busy() {
        let assignments = vec![assignment(101, 7, "Петров П.П.")];
        let busy = busy_map(&assignments, 9);
        assert_eq!(busy.get(&101).map(String::as_str), Some("Петров П.П."));
    }

    #[test]
    fn own_claim_is_not_busy() {
        let assignments = vec![assignment(101, 7, "Петров П.П.")];
        assert!(busy_map(&assignments, 7).is_empty());
    }

    #[test]
    fn released_claim_frees_worker() {
        let mut assignments = vec![assignment(101, 7, "Петров П.П.")];
        assert!(busy_map(&assignments, 9).contains_key(&101));
        assignments.clear();
        assert!(!busy_map(&assignments, 9).contains_key(&101));
    }
}
