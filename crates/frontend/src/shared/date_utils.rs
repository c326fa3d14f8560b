/// Utilities for date and time formatting
///
/// Provides consistent date/time formatting across the application
use chrono::NaiveDate;

/// Format ISO date string to DD.MM.YYYY format
/// Example: "2024-03-15" or "2024-03-15T14:02:26Z" -> "15.03.2024"
pub fn format_date(date_str: &str) -> String {
    let date_part = date_str.split('T').next().unwrap_or(date_str);
    if let Some((year, rest)) = date_part.split_once('-') {
        if let Some((month, day)) = rest.split_once('-') {
            return format!("{}.{}.{}", day, month, year);
        }
    }
    date_str.to_string()
}

/// DD.MM.YYYY для NaiveDate, прочерк для отсутствующей даты
pub fn format_naive(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d.%m.%Y").to_string())
        .unwrap_or_else(|| "—".to_string())
}

/// Значение input[type=date] ("YYYY-MM-DD") в дату; пустая строка — None
pub fn parse_input_date(value: &str) -> Option<NaiveDate> {
    if value.trim().is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Значение для input[type=date]
pub fn to_input_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Сегодняшняя дата по часам браузера. `chrono` в wasm не имеет доступа
/// к системным часам, поэтому через `js_sys::Date`.
pub fn today() -> NaiveDate {
    let js = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(
        js.get_full_year() as i32,
        js.get_month() + 1,
        js.get_date(),
    )
    .unwrap_or_else(|| NaiveDate::from_ymd_opt(2026, 1, 1).expect("валидная дата"))
}

/// Денежный формат: 12345.5 -> "12 345,50"
pub fn format_money(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as i64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{}{},{:02}", sign, grouped, frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-03-15"), "15.03.2024");
        assert_eq!(format_date("2024-03-15T14:02:26.123Z"), "15.03.2024");
        assert_eq!(format_date("invalid"), "invalid");
    }

    #[test]
    fn test_parse_input_date() {
        assert_eq!(
            parse_input_date("2026-03-01"),
            NaiveDate::from_ymd_opt(2026, 3, 1)
        );
        assert_eq!(parse_input_date(""), None);
        assert_eq!(parse_input_date("03.01.2026"), None);
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0.0), "0,00");
        assert_eq!(format_money(12345.5), "12 345,50");
        assert_eq!(format_money(-700.0), "-700,00");
    }
}
