//! Производные суммы: расход бюджета по табелям, остаток, месяц
//! расчёта, "мой факт" и "общий факт" по материалам.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use crate::domain::{NomenclatureFact, Payment, Project, WorkReport};
use crate::roles::Role;

/// Сумма к оплате по табелям одного сотрудника: часы × ставка,
/// прогулы дают ноль. Диапазон дат включительный, `None` — без границы.
pub fn employee_spend(
    reports: &[WorkReport],
    rate_per_hour: f64,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> f64 {
    reports
        .iter()
        .filter(|r| from.map(|f| r.date >= f).unwrap_or(true))
        .filter(|r| to.map(|t| r.date <= t).unwrap_or(true))
        .map(|r| r.billable_hours() * rate_per_hour)
        .sum()
}

/// Расход бюджета проекта: сумма по активным связкам, ГИП исключается.
/// `reports_by_employee` — результат веерной загрузки табелей; сотрудник
/// без записи в карте (одна из веток загрузки упала) даёт ноль.
pub fn project_spend(
    project: &Project,
    reports_by_employee: &HashMap<i64, Vec<WorkReport>>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> f64 {
    project
        .employees
        .iter()
        .filter(|pe| {
            pe.employee
                .as_ref()
                .map(|e| e.parsed_role().counts_toward_spend())
                .unwrap_or(true)
        })
        .map(|pe| {
            reports_by_employee
                .get(&pe.employee_id)
                .map(|reports| employee_spend(reports, pe.rate_per_hour, from, to))
                .unwrap_or(0.0)
        })
        .sum()
}

/// Остаток бюджета никогда не показывается отрицательным
pub fn remaining_budget(allocated: f64, spent: f64) -> f64 {
    (allocated - spent).max(0.0)
}

/// Месяц расчётного периода: дата первого заполненного транша, иначе
/// начало явного диапазона, иначе текущий месяц.
pub fn payroll_month(
    payment: Option<&Payment>,
    range_from: Option<NaiveDate>,
    today: NaiveDate,
) -> (i32, u32) {
    let anchor = payment
        .and_then(|p| p.first_tranche_date())
        .or(range_from)
        .unwrap_or(today);
    (anchor.year(), anchor.month())
}

/// "Мой факт": вклад текущего бригадира за сегодняшний день
pub fn my_fact(facts: &[NomenclatureFact], manager_id: i64, today: NaiveDate) -> f64 {
    facts
        .iter()
        .filter(|f| !f.is_deleted)
        .filter(|f| f.project_manager_id == manager_id && f.fact_date == today)
        .map(|f| f.amount)
        .sum()
}

/// "Общий факт": пожизненная сумма по всем бригадирам
pub fn total_fact(facts: &[NomenclatureFact]) -> f64 {
    facts.iter().filter(|f| !f.is_deleted).map(|f| f.amount).sum()
}

/// Падение одной ветки веерной загрузки подменяется значением по
/// умолчанию, чтобы остальной экран продолжал считаться.
pub fn or_default<T: Default, E>(branch: Result<T, E>) -> T {
    branch.unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project::{ProjectEmployee, ProjectStatus};
    use crate::domain::Employee;

    fn report(employee_id: i64, day: u32, hours: f64, absent: bool) -> WorkReport {
        WorkReport {
            id: 0,
            project_id: 1,
            employee_id,
            date: NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
            hours_worked: hours,
            absent,
            note: None,
        }
    }

    fn employee(id: i64, role: &str) -> Employee {
        Employee {
            id,
            surname: "Иванов".into(),
            name: "Иван".into(),
            patronymic: None,
            role: role.to_string(),
            is_dismissed: false,
            employment_date: None,
            dismissal_date: None,
        }
    }

    fn pivot(employee_id: i64, role: &str, rate: f64) -> ProjectEmployee {
        ProjectEmployee {
            employee_id,
            employee: Some(employee(employee_id, role)),
            start_working_date: None,
            end_working_date: None,
            rate_per_hour: rate,
        }
    }

    fn project(employees: Vec<ProjectEmployee>, budget: f64) -> Project {
        Project {
            id: 1,
            name: "Объект".into(),
            status: ProjectStatus::InProgress,
            start_date: None,
            end_date: None,
            budget,
            address: String::new(),
            is_archived: false,
            employees,
            nomenclatures: vec![],
        }
    }

    #[test]
    fn absent_rows_contribute_zero_hours() {
        let reports = vec![report(1, 2, 8.0, false), report(1, 3, 8.0, true)];
        assert_eq!(employee_spend(&reports, 500.0, None, None), 4000.0);
    }

    #[test]
    fn spend_respects_inclusive_date_range() {
        let reports = vec![
            report(1, 1, 8.0, false),
            report(1, 15, 8.0, false),
            report(1, 31, 8.0, false),
        ];
        let from = NaiveDate::from_ymd_opt(2026, 3, 1);
        let to = NaiveDate::from_ymd_opt(2026, 3, 15);
        assert_eq!(employee_spend(&reports, 100.0, from, to), 1600.0);
    }

    #[test]
    fn chief_engineer_hours_do_not_count() {
        let p = project(vec![pivot(1, "рабочий", 100.0), pivot(2, "ГИП", 1000.0)], 0.0);
        let mut by_emp = HashMap::new();
        by_emp.insert(1, vec![report(1, 2, 8.0, false)]);
        by_emp.insert(2, vec![report(2, 2, 8.0, false)]);
        assert_eq!(project_spend(&p, &by_emp, None, None), 800.0);
    }

    #[test]
    fn missing_fanout_branch_counts_as_zero() {
        let p = project(vec![pivot(1, "рабочий", 100.0), pivot(2, "рабочий", 100.0)], 0.0);
        let mut by_emp = HashMap::new();
        by_emp.insert(1, vec![report(1, 2, 8.0, false)]);
        // табели сотрудника 2 не загрузились
        assert_eq!(project_spend(&p, &by_emp, None, None), 800.0);
    }

    // Остаток не бывает отрицательным
    #[test]
    fn remaining_budget_is_clamped() {
        assert_eq!(remaining_budget(1000.0, 400.0), 600.0);
        assert_eq!(remaining_budget(1000.0, 1500.0), 0.0);
    }

    #[test]
    fn payroll_month_prefers_tranche_then_range_then_today() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        let range_from = NaiveDate::from_ymd_opt(2026, 5, 1);

        let mut p = Payment {
            id: 0,
            employee_id: 1,
            project_id: 1,
            total: 0.0,
            first: Default::default(),
            second: Default::default(),
            third: Default::default(),
            note: None,
        };
        assert_eq!(payroll_month(Some(&p), range_from, today), (2026, 5));
        assert_eq!(payroll_month(None, None, today), (2026, 8));

        p.first.date = NaiveDate::from_ymd_opt(2026, 2, 10);
        assert_eq!(payroll_month(Some(&p), range_from, today), (2026, 2));
    }

    fn fact(amount: f64, day: u32, manager_id: i64, deleted: bool) -> NomenclatureFact {
        NomenclatureFact {
            id: 0,
            amount,
            fact_date: NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
            project_manager_id: manager_id,
            is_deleted: deleted,
        }
    }

    // "мой факт" и "общий факт" — разные числа, мягко удалённые записи
    // не входят ни в один
    #[test]
    fn my_fact_and_total_fact_are_distinct() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let facts = vec![
            fact(99.0, 10, 5, false),  // мой, сегодня
            fact(10.0, 9, 5, false),   // мой, вчера — только в общий
            fact(20.0, 10, 7, false),  // чужой, сегодня — только в общий
            fact(50.0, 10, 5, true),   // удалён — никуда
        ];
        assert_eq!(my_fact(&facts, 5, today), 99.0);
        assert_eq!(total_fact(&facts), 129.0);
    }

    // Новый факт на 99 поднимает "мой факт" до 99,
    // общий — на 99
    #[test]
    fn new_fact_moves_both_columns() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let mut facts = vec![fact(20.0, 9, 7, false)];
        let before_total = total_fact(&facts);
        assert_eq!(my_fact(&facts, 5, today), 0.0);

        facts.push(fact(99.0, 10, 5, false));
        assert_eq!(my_fact(&facts, 5, today), 99.0);
        assert_eq!(total_fact(&facts), before_total + 99.0);
    }

    #[test]
    fn or_default_substitutes_failure() {
        let ok: Result<Vec<i32>, String> = Ok(vec![1]);
        let err: Result<Vec<i32>, String> = Err("сеть".into());
        assert_eq!(or_default(ok), vec![1]);
        assert_eq!(or_default(err), Vec::<i32>::new());
    }
}
