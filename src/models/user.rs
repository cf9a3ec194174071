use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::utils::time::format_timestamp;

/// User account (stored in MongoDB).
///
/// `logged_in` is the revocation flag: a cryptographically valid token is only
/// honored while it is `true`. `password_hash` never leaves the service layer;
/// client-facing payloads are built from `UserProfile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: String,
    pub email: String,
    pub password_hash: String,
    pub username: Option<String>,
    /// Unix timestamp of registration
    pub date_joined: i64,
    #[serde(default)]
    pub logged_in: bool,
}

impl User {
    /// Display name: username when present, email otherwise.
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.email)
    }

    pub fn to_profile(&self) -> UserProfile {
        UserProfile {
            id: self.user_id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            date_joined: format_timestamp(self.date_joined),
            url: "/api/v1/user/".to_string(),
        }
    }
}

/// Client-facing view of a user. Carries no password material.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserProfile {
    pub id: String,
    pub username: Option<String>,
    pub email: String,
    pub date_joined: String,
    pub url: String,
}

/// Allow-listed profile update. Only named fields are ever applied.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: None,
            user_id: "64f0aa0d3bde9a0001abcdef".to_string(),
            email: "somebody@somedomain.com".to_string(),
            password_hash: "$2b$12$abcdefghijklmnopqrstuv".to_string(),
            username: Some("Somebody".to_string()),
            date_joined: 1_700_000_000,
            logged_in: false,
        }
    }

    #[test]
    fn test_profile_never_includes_password_material() {
        let profile = sample_user().to_profile();
        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("$2b$"));
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let mut user = sample_user();
        assert_eq!(user.display_name(), "Somebody");
        user.username = None;
        assert_eq!(user.display_name(), "somebody@somedomain.com");
    }

    #[test]
    fn test_profile_formats_date_joined() {
        let profile = sample_user().to_profile();
        assert_eq!(profile.date_joined, "2023-11-14 22:13:20");
    }
}
