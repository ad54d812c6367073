use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo::User;

/// Request body for signup and login.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Public part of the user returned to the client. Signup and `/auth/me`
/// include the creation timestamp; login omits it.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    #[serde(
        rename = "createdAt",
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub created_at: Option<OffsetDateTime>,
}

impl PublicUser {
    pub fn full(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            created_at: Some(user.created_at),
        }
    }

    pub fn brief(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            created_at: None,
        }
    }
}

/// Response returned after signup or login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: PublicUser,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "a@gmail.com".into(),
            password_hash: "$argon2id$...".into(),
            created_at: datetime!(2024-05-01 12:00:00 UTC),
        }
    }

    #[test]
    fn full_projection_serializes_created_at() {
        let json = serde_json::to_value(PublicUser::full(&sample_user())).unwrap();
        assert_eq!(json["email"], "a@gmail.com");
        assert!(json["createdAt"].is_string());
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn brief_projection_omits_created_at() {
        let json = serde_json::to_value(PublicUser::brief(&sample_user())).unwrap();
        assert!(json.get("createdAt").is_none());
    }

    #[test]
    fn credentials_fields_default_to_empty_when_missing() {
        let req: CredentialsRequest = serde_json::from_str(r#"{"email":"x@y.z"}"#).unwrap();
        assert_eq!(req.email, "x@y.z");
        assert!(req.password.is_empty());
    }
}
