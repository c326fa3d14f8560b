use contracts::system::auth::{LoginRequest, LoginResponse};
use gloo_net::http::Request;

use crate::shared::http::api_base;

/// Login with email and password
pub async fn login(email: String, password: String) -> Result<LoginResponse, String> {
    let request = LoginRequest { email, password };

    let response = Request::post(&format!("{}/auth/login", api_base()))
        .json(&request)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(format!("Login failed: {}", response.status()));
    }

    response
        .json::<LoginResponse>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}
