//! Request bodies for the REST API.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/users/login`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Ask the server to reject non-admin accounts (HTTP 403)
    pub require_admin: bool,
}

/// Body of `POST /api/users/admin`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterAdminRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Body of `POST /api/users` (regular player account)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

fn default_question_limit() -> u32 {
    5
}

/// Query of `GET /api/questions/random`
///
/// An empty category means "any category".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomQuestionsQuery {
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_question_limit")]
    pub limit: u32,
}

impl Default for RandomQuestionsQuery {
    fn default() -> Self {
        Self {
            category: String::new(),
            limit: default_question_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_request_uses_camel_case() {
        let body = LoginRequest {
            email: "a@b.com".into(),
            password: "x".into(),
            require_admin: true,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"email": "a@b.com", "password": "x", "requireAdmin": true})
        );
    }

    #[test]
    fn random_questions_defaults_to_five() {
        assert_eq!(RandomQuestionsQuery::default().limit, 5);
        assert!(RandomQuestionsQuery::default().category.is_empty());
    }
}
