//! Конвейер списочного состояния: фильтр состояния → текстовый поиск →
//! фильтр по датам → сортировка → страница. Порядок стадий фиксирован,
//! каждая перерисовка списка заново прогоняет коллекцию через конвейер.

use std::cmp::Ordering;

use chrono::NaiveDate;

/// Значение поля для сортировки. Текстовые поля сравниваются без учёта
/// регистра, числа и даты — естественным порядком.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Text(String),
    Number(f64),
    Date(Option<NaiveDate>),
}

impl SortValue {
    fn compare(&self, other: &SortValue) -> Ordering {
        match (self, other) {
            (SortValue::Text(a), SortValue::Text(b)) => {
                a.to_lowercase().cmp(&b.to_lowercase())
            }
            (SortValue::Number(a), SortValue::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (SortValue::Date(a), SortValue::Date(b)) => a.cmp(b),
            // разные виды значений между собой не упорядочены
            _ => Ordering::Equal,
        }
    }
}

/// Вид поля сортировки: определяет стартовое направление при выборе
/// нового поля (текст — по возрастанию, числа и даты — по убыванию).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKind {
    Text,
    Numeric,
}

/// Строка, пригодная для конвейера
pub trait ListRow {
    fn id(&self) -> i64;

    /// Составной текст поиска: id строкой, отображаемое имя и прочие
    /// поля, по которым строка должна находиться
    fn search_text(&self) -> String;

    /// Поле для фильтра по диапазону дат; `None` исключает строку,
    /// как только задана хотя бы одна граница
    fn date_key(&self) -> Option<NaiveDate> {
        None
    }

    /// Значение именованного поля сортировки
    fn sort_value(&self, field: &str) -> SortValue;
}

/// Параметры запроса списка. Страница 1-базная.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub page: usize,
    pub page_size: usize,
    pub search: String,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// `None` — порядок по умолчанию: по убыванию id
    pub sort: Option<String>,
    pub sort_ascending: bool,
}

impl ListQuery {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size,
            search: String::new(),
            date_from: None,
            date_to: None,
            sort: None,
            sort_ascending: false,
        }
    }

    /// Смена поиска сбрасывает страницу на первую
    pub fn set_search(&mut self, search: String) {
        self.search = search;
        self.page = 1;
    }

    /// Смена диапазона дат сбрасывает страницу на первую
    pub fn set_date_range(&mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) {
        self.date_from = from;
        self.date_to = to;
        self.page = 1;
    }

    /// Любая смена дискретного фильтра на экране обязана звать это
    pub fn reset_page(&mut self) {
        self.page = 1;
    }

    /// Переключение сортировки: повторный клик по полю меняет направление,
    /// новое поле стартует по возрастанию для текста и по убыванию для
    /// чисел и дат. Страницу НЕ сбрасывает.
    pub fn toggle_sort(&mut self, field: &str, kind: SortKind) {
        if self.sort.as_deref() == Some(field) {
            self.sort_ascending = !self.sort_ascending;
        } else {
            self.sort = Some(field.to_string());
            self.sort_ascending = kind == SortKind::Text;
        }
    }
}

/// Итог конвейера: видимая страница плюс счётчики для пагинатора
#[derive(Debug, Clone)]
pub struct PageView<T> {
    pub rows: Vec<T>,
    pub total_count: usize,
    pub total_pages: usize,
}

/// Прогнать коллекцию через все стадии. `status` — экранный предикат
/// первой стадии (архивные/уволенные и т.п.).
pub fn apply_pipeline<T, F>(items: &[T], status: F, query: &ListQuery) -> PageView<T>
where
    T: ListRow + Clone,
    F: Fn(&T) -> bool,
{
    let needle = query.search.trim().to_lowercase();

    let mut rows: Vec<T> = items
        .iter()
        .filter(|item| status(item))
        .filter(|item| {
            needle.is_empty() || item.search_text().to_lowercase().contains(&needle)
        })
        .filter(|item| match (query.date_from, query.date_to) {
            (None, None) => true,
            (from, to) => match item.date_key() {
                None => false,
                Some(d) => {
                    from.map(|f| d >= f).unwrap_or(true) && to.map(|t| d <= t).unwrap_or(true)
                }
            },
        })
        .cloned()
        .collect();

    match &query.sort {
        Some(field) => {
            rows.sort_by(|a, b| {
                let cmp = a.sort_value(field).compare(&b.sort_value(field));
                if query.sort_ascending {
                    cmp
                } else {
                    cmp.reverse()
                }
            });
        }
        // по умолчанию — свежие записи сверху
        None => rows.sort_by(|a, b| b.id().cmp(&a.id())),
    }

    let total_count = rows.len();
    let total_pages = if total_count == 0 {
        0
    } else {
        (total_count + query.page_size - 1) / query.page_size
    };

    let start = (query.page.max(1) - 1) * query.page_size;
    let rows = if start >= rows.len() {
        Vec::new()
    } else {
        let end = (start + query.page_size).min(rows.len());
        rows[start..end].to_vec()
    };

    PageView {
        rows,
        total_count,
        total_pages,
    }
}

/// Проверка однородности выборки для пакетных действий: `Some(flag)`,
/// если у всех строк флаг одинаков, `None` — смешанная выборка,
/// действие должно быть отклонено.
pub fn uniform_flag<T, F>(rows: &[T], flag: F) -> Option<bool>
where
    F: Fn(&T) -> bool,
{
    let mut iter = rows.iter().map(flag);
    let first = iter.next()?;
    if iter.all(|f| f == first) {
        Some(first)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: i64,
        name: String,
        budget: f64,
        date: Option<NaiveDate>,
        archived: bool,
    }

    impl ListRow for Row {
        fn id(&self) -> i64 {
            self.id
        }

        fn search_text(&self) -> String {
            format!("{} {}", self.id, self.name)
        }

        fn date_key(&self) -> Option<NaiveDate> {
            self.date
        }

        fn sort_value(&self, field: &str) -> SortValue {
            match field {
                "name" => SortValue::Text(self.name.clone()),
                "budget" => SortValue::Number(self.budget),
                "date" => SortValue::Date(self.date),
                _ => SortValue::Number(self.id as f64),
            }
        }
    }

    fn row(id: i64, name: &str, budget: f64) -> Row {
        Row {
            id,
            name: name.to_string(),
            budget,
            date: NaiveDate::from_ymd_opt(2026, 1, id as u32 % 28 + 1),
            archived: false,
        }
    }

    fn rows(n: i64) -> Vec<Row> {
        (1..=n).map(|i| row(i, &format!("Объект {}", i), i as f64 * 100.0)).collect()
    }

    // Страница — это ровно срез sort(filter(search(коллекция)))
    #[test]
    fn page_is_slice_of_filtered_sorted_set() {
        let items = rows(30);
        let mut query = ListQuery::new(7);
        query.set_search("объект 1".to_string()); // 1, 10..19
        query.page = 2;

        let view = apply_pipeline(&items, |_| true, &query);
        assert_eq!(view.total_count, 11);
        assert_eq!(view.total_pages, 2);
        // по умолчанию убывание id: 19..10, 1 — вторая страница даёт хвост
        let ids: Vec<i64> = view.rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![12, 11, 10, 1]);

        // смена страницы не меняет отфильтрованное множество
        query.page = 1;
        let first = apply_pipeline(&items, |_| true, &query);
        assert_eq!(first.total_count, 11);
        assert_eq!(first.rows.len(), 7);
    }

    // Без явного поля сортировки — строго по убыванию id,
    // порядок вставки не влияет
    #[test]
    fn default_order_is_descending_by_id() {
        let mut items = rows(5);
        let query = ListQuery::new(10);
        let forward: Vec<i64> = apply_pipeline(&items, |_| true, &query)
            .rows
            .iter()
            .map(|r| r.id)
            .collect();
        items.reverse();
        let reversed: Vec<i64> = apply_pipeline(&items, |_| true, &query)
            .rows
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(forward, vec![5, 4, 3, 2, 1]);
        assert_eq!(forward, reversed);
    }

    #[test]
    fn search_matches_id_as_string() {
        let items = rows(20);
        let mut query = ListQuery::new(10);
        query.set_search("17".to_string());
        let view = apply_pipeline(&items, |_| true, &query);
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].id, 17);
    }

    #[test]
    fn search_is_case_insensitive() {
        let items = vec![row(1, "ЖК Ленинский", 0.0), row(2, "Склад", 0.0)];
        let mut query = ListQuery::new(10);
        query.set_search("ленинский".to_string());
        let view = apply_pipeline(&items, |_| true, &query);
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].id, 1);
    }

    #[test]
    fn date_bound_excludes_rows_without_date() {
        let mut items = rows(3);
        items[1].date = None;
        let mut query = ListQuery::new(10);
        query.set_date_range(NaiveDate::from_ymd_opt(2026, 1, 1), None);
        let view = apply_pipeline(&items, |_| true, &query);
        assert_eq!(view.rows.len(), 2);
        assert!(view.rows.iter().all(|r| r.id != 2));
    }

    #[test]
    fn status_predicate_runs_first() {
        let mut items = rows(4);
        items[0].archived = true;
        let query = ListQuery::new(10);
        let view = apply_pipeline(&items, |r| !r.archived, &query);
        assert_eq!(view.total_count, 3);
    }

    #[test]
    fn explicit_text_sort_ignores_case() {
        let items = vec![row(1, "береза", 0.0), row(2, "Акация", 0.0)];
        let mut query = ListQuery::new(10);
        query.toggle_sort("name", SortKind::Text);
        let view = apply_pipeline(&items, |_| true, &query);
        let names: Vec<&str> = view.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Акация", "береза"]);
    }

    #[test]
    fn toggle_sort_flips_direction_and_resets_for_new_field() {
        let mut query = ListQuery::new(10);
        query.toggle_sort("name", SortKind::Text);
        assert!(query.sort_ascending);
        query.toggle_sort("name", SortKind::Text);
        assert!(!query.sort_ascending);
        // новое числовое поле — старт по убыванию
        query.toggle_sort("budget", SortKind::Numeric);
        assert_eq!(query.sort.as_deref(), Some("budget"));
        assert!(!query.sort_ascending);
    }

    #[test]
    fn search_change_resets_page_sort_does_not() {
        let mut query = ListQuery::new(7);
        query.page = 3;
        query.toggle_sort("name", SortKind::Text);
        assert_eq!(query.page, 3);
        query.set_search("x".to_string());
        assert_eq!(query.page, 1);
    }

    // 15 проектов при странице 11 — 11 строк, затем 4,
    // без дублей
    #[test]
    fn fifteen_rows_paginate_as_eleven_plus_four() {
        let items = rows(15);
        let mut query = ListQuery::new(11);
        let p1 = apply_pipeline(&items, |_| true, &query);
        assert_eq!(p1.rows.len(), 11);
        assert_eq!(p1.rows[0].id, 15);
        assert_eq!(p1.total_pages, 2);

        query.page = 2;
        let p2 = apply_pipeline(&items, |_| true, &query);
        assert_eq!(p2.rows.len(), 4);

        let mut all: Vec<i64> = p1.rows.iter().chain(p2.rows.iter()).map(|r| r.id).collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 15);
    }

    #[test]
    fn uniform_flag_detects_mixed_selection() {
        let mut items = rows(3);
        assert_eq!(uniform_flag(&items, |r| r.archived), Some(false));
        items[0].archived = true;
        assert_eq!(uniform_flag(&items, |r| r.archived), None);
        items.iter_mut().for_each(|r| r.archived = true);
        assert_eq!(uniform_flag(&items, |r| r.archived), Some(true));
        assert_eq!(uniform_flag(&Vec::<Row>::new(), |r: &Row| r.archived), None);
    }
}
