use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Один транш выплаты: дата, вид, сумма — каждое поле независимо опционально
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PaymentTranche {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
}

/// Выплаты по связке (сотрудник, проект): до трёх траншей.
/// Третий транш ("остаток") считается на клиенте, если не задан явно.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    #[serde(default)]
    pub id: i64,
    pub employee_id: i64,
    pub project_id: i64,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub first: PaymentTranche,
    #[serde(default)]
    pub second: PaymentTranche,
    #[serde(default)]
    pub third: PaymentTranche,
    #[serde(default)]
    pub note: Option<String>,
}

impl Payment {
    /// Остаток: явная сумма третьего транша имеет приоритет,
    /// иначе `max(0, total - first - second)`.
    pub fn balance(&self) -> f64 {
        if let Some(explicit) = self.third.amount {
            return explicit;
        }
        let paid = self.first.amount.unwrap_or(0.0) + self.second.amount.unwrap_or(0.0);
        (self.total - paid).max(0.0)
    }

    /// Дата первого заполненного транша — от неё считается месяц расчёта
    pub fn first_tranche_date(&self) -> Option<NaiveDate> {
        self.first
            .date
            .or(self.second.date)
            .or(self.third.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment(total: f64, first: Option<f64>, second: Option<f64>, third: Option<f64>) -> Payment {
        Payment {
            id: 0,
            employee_id: 1,
            project_id: 1,
            total,
            first: PaymentTranche {
                amount: first,
                ..Default::default()
            },
            second: PaymentTranche {
                amount: second,
                ..Default::default()
            },
            third: PaymentTranche {
                amount: third,
                ..Default::default()
            },
            note: None,
        }
    }

    #[test]
    fn balance_is_total_minus_tranches() {
        assert_eq!(payment(1000.0, Some(300.0), Some(200.0), None).balance(), 500.0);
    }

    #[test]
    fn balance_clamped_to_zero() {
        assert_eq!(payment(400.0, Some(300.0), Some(200.0), None).balance(), 0.0);
    }

    #[test]
    fn explicit_third_overrides_computed() {
        assert_eq!(
            payment(1000.0, Some(300.0), Some(200.0), Some(123.0)).balance(),
            123.0
        );
    }

    #[test]
    fn missing_tranches_count_as_zero() {
        assert_eq!(payment(1000.0, None, None, None).balance(), 1000.0);
    }
}
