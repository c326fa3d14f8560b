use contracts::system::auth::UserInfo;
use web_sys::window;

const TOKEN_KEY: &str = "auth_token";
const TOKEN_TYPE_KEY: &str = "auth_token_type";
const USER_KEY: &str = "auth_user";

fn get_local_storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok()?
}

/// Save session (token + cached user profile) to localStorage
pub fn save_session(token: &str, token_type: &str, user: &UserInfo) {
    if let Some(storage) = get_local_storage() {
        let _ = storage.set_item(TOKEN_KEY, token);
        let _ = storage.set_item(TOKEN_TYPE_KEY, token_type);
        if let Ok(json) = serde_json::to_string(user) {
            let _ = storage.set_item(USER_KEY, &json);
        }
    }
}

/// Get token and its type ("Bearer" by default) from localStorage
pub fn get_token() -> Option<(String, String)> {
    let storage = get_local_storage()?;
    let token = storage.get_item(TOKEN_KEY).ok()??;
    let token_type = storage
        .get_item(TOKEN_TYPE_KEY)
        .ok()
        .flatten()
        .unwrap_or_else(|| "Bearer".to_string());
    Some((token, token_type))
}

/// Get cached user profile from localStorage
pub fn get_cached_user() -> Option<UserInfo> {
    let json = get_local_storage()?.get_item(USER_KEY).ok()??;
    serde_json::from_str(&json).ok()
}

/// Clear the whole session
pub fn clear_session() {
    if let Some(storage) = get_local_storage() {
        let _ = storage.remove_item(TOKEN_KEY);
        let _ = storage.remove_item(TOKEN_TYPE_KEY);
        let _ = storage.remove_item(USER_KEY);
    }
}
