//! Нормализация конвертов ответа. Backend отдаёт коллекции в трёх видах:
//! голый массив, `{data: [...]}` и пагинированный `{data: {data: [...]}}`.
//! Разворачивание выполняется ровно один раз, на границе доступа к данным;
//! неожиданная форма трактуется как "нет данных", а не как ошибка.

use serde::de::DeserializeOwned;
use serde_json::Value;

fn collection_array(value: Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => Some(items),
            Some(Value::Object(mut inner)) => match inner.remove("data") {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            },
            _ => None,
        },
        _ => None,
    }
}

/// Развернуть коллекцию из любого поддерживаемого конверта.
/// Строки, не прошедшие десериализацию, пропускаются — остальные
/// сохраняются.
pub fn unwrap_collection<T: DeserializeOwned>(value: Value) -> Vec<T> {
    collection_array(value)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}

/// Развернуть одиночный ресурс: голый объект или `{data: {...}}`
pub fn unwrap_item<T: DeserializeOwned>(value: Value) -> Option<T> {
    match value {
        Value::Object(ref map) if map.contains_key("data") => {
            let inner = map.get("data").cloned()?;
            serde_json::from_value(inner).ok()
        }
        other => serde_json::from_value(other).ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: i64,
    }

    #[test]
    fn bare_array() {
        let v = json!([{"id": 1}, {"id": 2}]);
        let items: Vec<Item> = unwrap_collection(v);
        assert_eq!(items, vec![Item { id: 1 }, Item { id: 2 }]);
    }

    #[test]
    fn data_wrapper() {
        let v = json!({"data": [{"id": 3}]});
        let items: Vec<Item> = unwrap_collection(v);
        assert_eq!(items, vec![Item { id: 3 }]);
    }

    #[test]
    fn paginated_double_wrapper() {
        let v = json!({"data": {"data": [{"id": 4}], "total": 120, "per_page": 11}});
        let items: Vec<Item> = unwrap_collection(v);
        assert_eq!(items, vec![Item { id: 4 }]);
    }

    #[test]
    fn unexpected_shape_is_empty_not_error() {
        let items: Vec<Item> = unwrap_collection(json!({"message": "ok"}));
        assert!(items.is_empty());
        let items: Vec<Item> = unwrap_collection(json!("строка"));
        assert!(items.is_empty());
        let items: Vec<Item> = unwrap_collection(json!(null));
        assert!(items.is_empty());
    }

    #[test]
    fn bad_rows_are_skipped_rest_kept() {
        let v = json!([{"id": 1}, {"id": "не число"}, {"id": 3}]);
        let items: Vec<Item> = unwrap_collection(v);
        assert_eq!(items, vec![Item { id: 1 }, Item { id: 3 }]);
    }

    #[test]
    fn item_bare_and_wrapped() {
        let bare: Option<Item> = unwrap_item(json!({"id": 7}));
        assert_eq!(bare, Some(Item { id: 7 }));
        let wrapped: Option<Item> = unwrap_item(json!({"data": {"id": 8}}));
        assert_eq!(wrapped, Some(Item { id: 8 }));
        let none: Option<Item> = unwrap_item(json!(null));
        assert_eq!(none, None);
    }
}
