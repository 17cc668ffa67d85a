// Request and response bodies

use serde::{Deserialize, Serialize};

use crate::auth::Session;
use crate::db::UserProfile;
use crate::llm::ChatMessage;

// Auth
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

impl From<Session> for LoginResponse {
    fn from(session: Session) -> Self {
        Self {
            token: session.token,
            user: session.user,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PasswordChangeRequest {
    pub current_password: String,
    pub new_password: String,
}

// Generic acknowledgement
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// Upload
#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

// Chat
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequestBody {
    pub messages: Vec<ChatMessage>,
}

// Health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "ok",
            database: "connected",
            error: None,
        }
    }

    pub fn unhealthy(error: impl Into<String>) -> Self {
        Self {
            status: "error",
            database: "disconnected",
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MessageRole;

    #[test]
    fn test_login_response_serialization() {
        let response = LoginResponse {
            token: "abc.def".to_string(),
            user: UserProfile {
                id: 1,
                username: "admin".to_string(),
                role: "admin".to_string(),
            },
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["token"], "abc.def");
        assert_eq!(value["user"]["username"], "admin");
        assert_eq!(value["user"]["role"], "admin");
        assert!(value["user"].get("password").is_none());
    }

    #[test]
    fn test_chat_request_deserialization() {
        let body: ChatRequestBody = serde_json::from_str(
            r#"{"messages":[{"role":"system","content":"be brief"},{"role":"user","content":"Hello"}]}"#,
        )
        .unwrap();
        assert_eq!(body.messages.len(), 2);
        assert_eq!(body.messages[0].role, MessageRole::System);
        assert_eq!(body.messages[1].content, "Hello");
    }

    #[test]
    fn test_health_response_shapes() {
        let ok = serde_json::to_value(HealthResponse::healthy()).unwrap();
        assert_eq!(ok, serde_json::json!({"status": "ok", "database": "connected"}));

        let down = serde_json::to_value(HealthResponse::unhealthy("refused")).unwrap();
        assert_eq!(down["status"], "error");
        assert_eq!(down["database"], "disconnected");
        assert_eq!(down["error"], "refused");
    }

    #[test]
    fn test_message_response() {
        let value = serde_json::to_value(MessageResponse::new("Post deleted")).unwrap();
        assert_eq!(value, serde_json::json!({"message": "Post deleted"}));
    }
}
