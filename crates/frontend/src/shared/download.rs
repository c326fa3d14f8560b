//! Получение файлов отчётов. Эндпоинты отдают вперемешку либо бинарную
//! таблицу, либо JSON с `report_url` на готовый файл — обрабатываются
//! обе формы.

use gloo_net::http::Request;
use serde_json::Value;
use wasm_bindgen::JsCast;

use crate::shared::http::api_base;
use crate::system::auth::storage;

fn click_anchor(href: &str, download_name: Option<&str>) -> Result<(), String> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| "no document".to_string())?;
    let anchor: web_sys::HtmlAnchorElement = document
        .create_element("a")
        .map_err(|e| format!("{e:?}"))?
        .dyn_into()
        .map_err(|e| format!("{e:?}"))?;
    anchor.set_href(href);
    if let Some(name) = download_name {
        anchor.set_download(name);
    }
    anchor.click();
    Ok(())
}

/// Скачать отчёт по пути API. Имя файла используется только для
/// бинарного ответа; ссылка из `report_url` открывается как есть.
pub async fn download_report(path: &str, filename: &str) -> Result<(), String> {
    let mut request = Request::get(&format!("{}{}", api_base(), path));
    if let Some((token, token_type)) = storage::get_token() {
        request = request.header("Authorization", &format!("{} {}", token_type, token));
    }
    let response = request
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;
    if !response.ok() {
        return Err(format!("HTTP {}", response.status()));
    }

    let content_type = response
        .headers()
        .get("content-type")
        .unwrap_or_default()
        .to_lowercase();

    if content_type.contains("application/json") {
        // готовый файл лежит по ссылке
        let value: Value = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))?;
        let url = value
            .get("report_url")
            .and_then(|v| v.as_str())
            .ok_or_else(|| "Unexpected response shape".to_string())?;
        return click_anchor(url, None);
    }

    // бинарное тело — собираем Blob и скачиваем через якорь
    let bytes = response
        .binary()
        .await
        .map_err(|e| format!("Failed to read body: {}", e))?;
    let array = js_sys::Uint8Array::from(bytes.as_slice());
    let parts = js_sys::Array::of1(&array);
    let options = web_sys::BlobPropertyBag::new();
    options.set_type("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet");
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(|e| format!("{e:?}"))?;
    let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(|e| format!("{e:?}"))?;
    let result = click_anchor(&url, Some(filename));
    let _ = web_sys::Url::revoke_object_url(&url);
    result
}
