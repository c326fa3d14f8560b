use serde::{Deserialize, Serialize};

use crate::roles::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Ответ `POST /auth/login`. Токен подставляется в заголовок как
/// `Authorization: {token_type} {token}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub user: UserInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    #[serde(default)]
    pub surname: String,
    pub name: String,
    #[serde(default)]
    pub role: String,
}

impl UserInfo {
    pub fn parsed_role(&self) -> Role {
        Role::parse(&self.role)
    }

    pub fn display_name(&self) -> String {
        if self.surname.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.surname, self.name)
        }
    }
}
