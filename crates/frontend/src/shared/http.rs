//! Авторизованный доступ к REST API. Токен подставляется в каждый
//! запрос, любой 401 приводит к принудительному выходу. Коллекции
//! разворачиваются из конвертов ровно здесь, ниже по коду формы
//! ответов не видно.

use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::system::auth::context::trigger_forced_logout;
use crate::system::auth::storage;

/// Get the base URL for API requests
///
/// Constructs the API base URL from the current window location,
/// using port 3000 for the backend server.
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

/// `Authorization: {token_type} {token}` — тип токена отдаёт сервер
fn auth_header() -> Option<String> {
    storage::get_token().map(|(token, token_type)| format!("{} {}", token_type, token))
}

fn check_status(response: &Response) -> Result<(), String> {
    if response.status() == 401 {
        trigger_forced_logout();
        return Err("HTTP 401".to_string());
    }
    if !response.ok() {
        return Err(format!("HTTP {}", response.status()));
    }
    Ok(())
}

async fn send_for_json(request: gloo_net::http::RequestBuilder) -> Result<Value, String> {
    let mut request = request.header("Accept", "application/json");
    if let Some(h) = auth_header() {
        request = request.header("Authorization", &h);
    }
    let response = request
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;
    check_status(&response)?;
    response
        .json::<Value>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

async fn send_body_for_json<B: Serialize>(
    request: gloo_net::http::RequestBuilder,
    body: &B,
) -> Result<Value, String> {
    let mut request = request.header("Accept", "application/json");
    if let Some(h) = auth_header() {
        request = request.header("Authorization", &h);
    }
    let response = request
        .json(body)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;
    check_status(&response)?;
    response
        .json::<Value>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn get_json(path: &str) -> Result<Value, String> {
    send_for_json(Request::get(&format!("{}{}", api_base(), path))).await
}

/// GET коллекции с нормализацией конверта
pub async fn get_collection<T: DeserializeOwned>(path: &str) -> Result<Vec<T>, String> {
    let value = get_json(path).await?;
    Ok(contracts::api::unwrap_collection(value))
}

/// GET одиночного ресурса
pub async fn get_item<T: DeserializeOwned>(path: &str) -> Result<T, String> {
    let value = get_json(path).await?;
    contracts::api::unwrap_item(value).ok_or_else(|| "Unexpected response shape".to_string())
}

pub async fn post_json<B: Serialize>(path: &str, body: &B) -> Result<Value, String> {
    send_body_for_json(Request::post(&format!("{}{}", api_base(), path)), body).await
}

/// Частичное обновление ресурса
pub async fn patch_json<B: Serialize>(path: &str, body: &B) -> Result<Value, String> {
    send_body_for_json(Request::patch(&format!("{}{}", api_base(), path)), body).await
}

/// POST без тела — "экшен"-эндпоинты вида `/archive`, `/add`, `/remove`
pub async fn post_action(path: &str) -> Result<Value, String> {
    send_for_json(Request::post(&format!("{}{}", api_base(), path))).await
}

/// Собрать строку запроса в стиле Laravel: `page`, `per_page`,
/// `filter[...]`, `with[]` — ключи и значения кодируются.
pub fn build_query(path: &str, params: &[(&str, String)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let qs: Vec<String> = params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect();
    format!("{}?{}", path, qs.join("&"))
}
