//! Wire Model
//!
//! Request and response bodies exchanged with the Agentica backend.
//! Shared by the native client and the browser frontend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ClientError, ClientResult};

// ============================================
// USERS
// ============================================

/// Authenticated identity as returned by `/users/me/` and the auth endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile: Option<Profile>,
}

impl User {
    /// Profile completeness in whole percent, 0 when there is no profile
    pub fn profile_completeness(&self) -> u8 {
        self.profile.as_ref().map(Profile::completeness).unwrap_or(0)
    }
}

/// Optional profile fields. The backend sends blank strings for unset
/// `address`/`phone` and `null` for a missing photo.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl Profile {
    pub fn address(&self) -> Option<&str> {
        non_blank(&self.address)
    }

    pub fn phone(&self) -> Option<&str> {
        non_blank(&self.phone)
    }

    pub fn photo(&self) -> Option<&str> {
        non_blank(&self.photo)
    }

    /// floor(100 * present / 3) over address, phone and photo
    pub fn completeness(&self) -> u8 {
        let present = [self.address(), self.phone(), self.photo()]
            .iter()
            .filter(|field| field.is_some())
            .count();
        (present * 100 / 3) as u8
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Login request body
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Registration request body
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Tokens plus identity, returned by both login and registration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access: String,
    pub refresh: String,
    pub user: User,
}

// ============================================
// FILES
// ============================================

/// Which chat context a file informs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    Private,
    Public,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Private => "Private",
            Visibility::Public => "Public",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "private" => Ok(Visibility::Private),
            "public" => Ok(Visibility::Public),
            other => Err(format!("Unknown visibility: {}. Use: private, public", other)),
        }
    }
}

/// Processing status of an uploaded file. Unknown backend values are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FileStatus {
    NotProcessed,
    Processed,
    Error,
    UnsupportedFormat,
    Other(String),
}

impl FileStatus {
    pub fn as_str(&self) -> &str {
        match self {
            FileStatus::NotProcessed => "Not Processed",
            FileStatus::Processed => "Processed",
            FileStatus::Error => "Error",
            FileStatus::UnsupportedFormat => "Unsupported Format",
            FileStatus::Other(s) => s,
        }
    }

    pub fn is_processed(&self) -> bool {
        matches!(self, FileStatus::Processed)
    }
}

impl From<String> for FileStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Not Processed" => FileStatus::NotProcessed,
            "Processed" => FileStatus::Processed,
            "Error" => FileStatus::Error,
            "Unsupported Format" => FileStatus::UnsupportedFormat,
            _ => FileStatus::Other(s),
        }
    }
}

impl From<FileStatus> for String {
    fn from(status: FileStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// An uploaded file as listed by `/chat/files/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: i64,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub status: FileStatus,
    pub information_type: Visibility,
    #[serde(default)]
    pub information_type_display: Option<String>,
    #[serde(default)]
    pub user: Option<i64>,
}

/// Response of `/chat/files/{id}/process/`
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub status: FileStatus,
}

// ============================================
// CHAT
// ============================================

/// Chat request body, shared by the private and public endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub message: String,
}

/// A source document snippet backing a reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub content: String,
}

/// One past exchange from `/chat/chat/private/history/`, oldest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(default)]
    pub id: Option<i64>,
    pub query: String,
    pub answer: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sources: Option<Vec<Source>>,
}

/// Reply from either chat endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    /// `null` when the model produced nothing
    #[serde(default)]
    pub reply: Option<String>,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub history: Vec<Conversation>,
}

impl ChatReply {
    /// The answer text. A `null` or blank reply counts as a failed exchange.
    pub fn into_text(self) -> ClientResult<String> {
        self.reply
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| ClientError::Parse("Reply was empty".to_string()))
    }
}

// ============================================
// ERRORS
// ============================================

/// Build a readable message from a backend error body.
///
/// Order: `detail`, then `error`, then DRF field errors rendered as
/// `field: msg msg` joined by `" • "`, then `fallback`.
pub fn error_message(body: &serde_json::Value, fallback: &str) -> String {
    if let Some(detail) = body.get("detail").and_then(|v| v.as_str()) {
        return detail.to_string();
    }
    if let Some(error) = body.get("error").and_then(|v| v.as_str()) {
        return error.to_string();
    }

    if let Some(fields) = body.as_object() {
        let parts: Vec<String> = fields
            .iter()
            .map(|(field, msgs)| {
                let text = match msgs {
                    serde_json::Value::Array(items) => items
                        .iter()
                        .map(|m| m.as_str().map(str::to_string).unwrap_or_else(|| m.to_string()))
                        .collect::<Vec<_>>()
                        .join(" "),
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                format!("{}: {}", field, text)
            })
            .collect();

        if !parts.is_empty() {
            return parts.join(" • ");
        }
    }

    fallback.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile(address: &str, phone: &str, photo: Option<&str>) -> Profile {
        Profile {
            address: Some(address.to_string()),
            phone: Some(phone.to_string()),
            photo: photo.map(str::to_string),
        }
    }

    #[test]
    fn test_completeness_two_of_three() {
        let p = profile("1 Main St", "+15551234567", None);
        assert_eq!(p.completeness(), 66);
    }

    #[test]
    fn test_completeness_blank_fields_are_absent() {
        assert_eq!(profile("", "  ", None).completeness(), 0);
        assert_eq!(profile("x", "", None).completeness(), 33);
        assert_eq!(profile("x", "y", Some("/media/a.png")).completeness(), 100);
    }

    #[test]
    fn test_user_without_profile() {
        let user: User = serde_json::from_value(json!({"username": "ana"})).unwrap();
        assert_eq!(user.profile_completeness(), 0);
        assert_eq!(user.id, None);
    }

    #[test]
    fn test_file_record_from_backend() {
        let record: FileRecord = serde_json::from_value(json!({
            "id": 7,
            "filename": "notes.pdf",
            "uploaded_at": "2025-03-01T10:15:30.123456Z",
            "status": "Not Processed",
            "information_type": "Public",
            "information_type_display": "Public",
            "user": 3
        }))
        .unwrap();

        assert_eq!(record.status, FileStatus::NotProcessed);
        assert_eq!(record.information_type, Visibility::Public);
        assert!(!record.status.is_processed());
    }

    #[test]
    fn test_unknown_status_is_kept() {
        let status = FileStatus::from("Queued".to_string());
        assert_eq!(status, FileStatus::Other("Queued".to_string()));
        assert_eq!(String::from(status), "Queued");
        assert_eq!(
            FileStatus::from("Unsupported Format".to_string()),
            FileStatus::UnsupportedFormat
        );
    }

    #[test]
    fn test_visibility_parse() {
        assert_eq!("PUBLIC".parse::<Visibility>().unwrap(), Visibility::Public);
        assert_eq!(" private ".parse::<Visibility>().unwrap(), Visibility::Private);
        assert!("shared".parse::<Visibility>().is_err());
        assert_eq!(Visibility::default(), Visibility::Private);
    }

    #[test]
    fn test_chat_reply_null_reply() {
        let reply: ChatReply = serde_json::from_value(json!({"reply": null})).unwrap();
        assert_eq!(reply.reply, None);
        assert!(reply.history.is_empty());
        assert!(matches!(reply.into_text(), Err(ClientError::Parse(_))));

        let blank: ChatReply = serde_json::from_value(json!({"reply": "  "})).unwrap();
        assert!(blank.into_text().is_err());

        let answer: ChatReply = serde_json::from_value(json!({"reply": "Friday"})).unwrap();
        assert_eq!(answer.into_text().unwrap(), "Friday");
    }

    #[test]
    fn test_error_message_detail() {
        let body = json!({"detail": "No active account found with the given credentials"});
        assert_eq!(
            error_message(&body, "Login failed"),
            "No active account found with the given credentials"
        );
    }

    #[test]
    fn test_error_message_error_key() {
        let body = json!({"error": "Message is required."});
        assert_eq!(error_message(&body, "x"), "Message is required.");
    }

    #[test]
    fn test_error_message_field_errors() {
        let body = json!({
            "email": ["A user with that email already exists."],
            "password": ["Ensure this field has at least 8 characters."]
        });
        assert_eq!(
            error_message(&body, "Registration failed"),
            "email: A user with that email already exists. • password: Ensure this field has at least 8 characters."
        );
    }

    #[test]
    fn test_error_message_fallback() {
        assert_eq!(error_message(&json!(null), "Login failed"), "Login failed");
        assert_eq!(error_message(&json!({}), "Login failed"), "Login failed");
    }
}
