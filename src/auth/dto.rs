use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::repo::{Role, User};

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
}

/// Request body for user creation. Role arrives as a string so a bad literal
/// is reported as a 400 with a message instead of a body-rejection.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Public part of a user, safe to return to any client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedUserResponse {
    pub message: String,
    pub user: PublicUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_carries_token_and_role() {
        let resp = LoginResponse {
            token: "abc.def.ghi".into(),
            role: Role::Manager,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains(r#""token":"abc.def.ghi""#));
        assert!(json.contains(r#""role":"Manager""#));
    }

    #[test]
    fn public_user_drops_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Alice Admin".into(),
            email: "alice@admin.com".into(),
            password_hash: "$argon2id$secret".into(),
            role: Role::Admin,
            created_at: time::OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_string(&PublicUser::from(user)).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(json.contains("alice@admin.com"));
        assert!(json.contains(r#""role":"Admin""#));
    }
}
