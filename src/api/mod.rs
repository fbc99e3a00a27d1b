//! Agentica Backend API
//!
//! The [`Backend`] trait is the seam between screen controllers and the
//! network. [`ApiClient`] implements it over HTTP with `reqwest`; tests
//! substitute an in-process fake.
//!
//! # Endpoints
//!
//! ## Users
//! - `POST /users/register/` - Create an account, returns tokens + user
//! - `POST /users/login/` - Exchange credentials for tokens + user
//! - `GET /users/me/` - Current identity (bearer)
//!
//! ## Files (bearer)
//! - `GET /chat/files/` - List uploads
//! - `POST /chat/files/` - Multipart upload (`file`, `information_type`)
//! - `POST /chat/files/{id}/process/` - Index a file, returns its new status
//! - `DELETE /chat/files/{id}/` - Remove a file
//!
//! ## Chat
//! - `GET /chat/chat/private/history/` - Last exchanges, oldest first (bearer)
//! - `POST /chat/chat/private/` - Ask over private documents (bearer)
//! - `POST /chat/chat/public/` - Ask over public documents

mod client;

pub use client::ApiClient;

use async_trait::async_trait;
use std::path::Path;

use crate::error::{ClientError, ClientResult};
use crate::model::{
    AuthResponse, ChatReply, Conversation, FileRecord, LoginRequest, ProcessResponse,
    RegisterRequest, User, Visibility,
};

/// A file ready to be sent as multipart form data
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub visibility: Visibility,
}

impl FileUpload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>, visibility: Visibility) -> Self {
        Self {
            filename: filename.into(),
            bytes,
            visibility,
        }
    }

    /// Read a local file. Fails before any request is made.
    pub fn from_path(path: &Path, visibility: Visibility) -> ClientResult<Self> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| ClientError::Validation(format!("Not a file: {}", path.display())))?;

        let bytes = std::fs::read(path).map_err(|e| {
            ClientError::Validation(format!("Cannot read {}: {}", path.display(), e))
        })?;

        Ok(Self::new(filename, bytes, visibility))
    }
}

/// Everything a screen can ask of the backend
#[async_trait]
pub trait Backend: Send + Sync {
    async fn register(&self, request: &RegisterRequest) -> ClientResult<AuthResponse>;

    async fn login(&self, request: &LoginRequest) -> ClientResult<AuthResponse>;

    async fn me(&self) -> ClientResult<User>;

    async fn list_files(&self) -> ClientResult<Vec<FileRecord>>;

    async fn upload_file(&self, upload: FileUpload) -> ClientResult<FileRecord>;

    async fn process_file(&self, id: i64) -> ClientResult<ProcessResponse>;

    async fn delete_file(&self, id: i64) -> ClientResult<()>;

    async fn private_history(&self) -> ClientResult<Vec<Conversation>>;

    async fn send_private(&self, message: &str) -> ClientResult<ChatReply>;

    async fn send_public(&self, message: &str) -> ClientResult<ChatReply>;
}
