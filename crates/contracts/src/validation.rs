//! Клиентская валидация форм: выполняется до отправки запроса,
//! непрошедшая форма до сети не доходит.

use anyhow::{bail, Result};
use chrono::NaiveDate;

pub fn require_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Название обязательно");
    }
    Ok(())
}

pub fn validate_hours(hours: f64) -> Result<()> {
    if !(0.0..=24.0).contains(&hours) {
        bail!("Часы должны быть в диапазоне 0–24");
    }
    Ok(())
}

pub fn validate_rate(rate: f64) -> Result<()> {
    if rate < 0.0 {
        bail!("Ставка не может быть отрицательной");
    }
    Ok(())
}

/// Суммы траншей, если заполнены, всегда неотрицательны
pub fn validate_tranche_amount(amount: Option<f64>) -> Result<()> {
    if let Some(a) = amount {
        if a < 0.0 {
            bail!("Сумма транша не может быть отрицательной");
        }
    }
    Ok(())
}

pub fn validate_fact_amount(amount: f64) -> Result<()> {
    if amount <= 0.0 {
        bail!("Количество должно быть больше нуля");
    }
    Ok(())
}

/// Дата окончания не раньше даты начала
pub fn validate_period(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<()> {
    if let (Some(s), Some(e)) = (start, end) {
        if e < s {
            bail!("Дата окончания раньше даты начала");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_name_is_rejected() {
        assert!(require_name("  ").is_err());
        assert!(require_name("ЖК Ленинский").is_ok());
    }

    #[test]
    fn hours_out_of_range_rejected() {
        assert!(validate_hours(-1.0).is_err());
        assert!(validate_hours(25.0).is_err());
        assert!(validate_hours(8.0).is_ok());
    }

    #[test]
    fn negative_tranche_rejected_missing_allowed() {
        assert!(validate_tranche_amount(Some(-1.0)).is_err());
        assert!(validate_tranche_amount(None).is_ok());
        assert!(validate_tranche_amount(Some(0.0)).is_ok());
    }

    #[test]
    fn inverted_period_rejected() {
        let s = NaiveDate::from_ymd_opt(2026, 3, 10);
        let e = NaiveDate::from_ymd_opt(2026, 3, 1);
        assert!(validate_period(s, e).is_err());
        assert!(validate_period(e, s).is_ok());
        assert!(validate_period(s, None).is_ok());
    }
}
