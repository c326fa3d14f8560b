use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Номенклатура (материал) — справочная карточка
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nomenclature {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub unit: String,
}

/// Корректировка плана: append-only журнал изменений количества
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmountChange {
    #[serde(default)]
    pub id: i64,
    pub amount_change: f64,
    #[serde(default)]
    pub created_at: Option<NaiveDate>,
    #[serde(default)]
    pub user: Option<String>,
}

/// Факт расхода за день от конкретного бригадира.
/// Удаление только мягкое: запись остаётся с `is_deleted = true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NomenclatureFact {
    #[serde(default)]
    pub id: i64,
    pub amount: f64,
    pub fact_date: NaiveDate,
    pub project_manager_id: i64,
    #[serde(default)]
    pub is_deleted: bool,
}

/// Связка материала с проектом: план + журналы изменений и фактов
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectNomenclature {
    pub id: i64,
    pub nomenclature_id: i64,
    #[serde(default)]
    pub nomenclature: Option<Nomenclature>,
    /// Плановое количество на момент добавления в проект
    #[serde(default)]
    pub start_amount: f64,
    #[serde(default)]
    pub amount_changes: Vec<AmountChange>,
    #[serde(default)]
    pub facts: Vec<NomenclatureFact>,
}

impl ProjectNomenclature {
    /// План с учётом всех корректировок
    pub fn plan_amount(&self) -> f64 {
        self.start_amount
            + self
                .amount_changes
                .iter()
                .map(|c| c.amount_change)
                .sum::<f64>()
    }

    pub fn display_name(&self) -> String {
        self.nomenclature
            .as_ref()
            .map(|n| n.name.clone())
            .unwrap_or_else(|| format!("#{}", self.nomenclature_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_amount_sums_changes() {
        let pn = ProjectNomenclature {
            id: 1,
            nomenclature_id: 1,
            nomenclature: None,
            start_amount: 100.0,
            amount_changes: vec![
                AmountChange {
                    id: 1,
                    amount_change: 20.0,
                    created_at: None,
                    user: None,
                },
                AmountChange {
                    id: 2,
                    amount_change: -5.0,
                    created_at: None,
                    user: None,
                },
            ],
            facts: vec![],
        };
        assert_eq!(pn.plan_amount(), 115.0);
    }
}
