//! In-process backend for controller tests

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::api::{Backend, FileUpload};
use crate::error::{ClientError, ClientResult};
use crate::model::{
    AuthResponse, ChatReply, Conversation, FileRecord, FileStatus, LoginRequest, ProcessResponse,
    RegisterRequest, User,
};

/// Holds a call open until the test releases it
#[derive(Default)]
pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

#[derive(Default)]
pub struct FakeBackend {
    /// Returned by login and register; `None` answers 401 like a bad password
    pub auth: Option<AuthResponse>,
    pub profile: Option<User>,
    pub files: Option<Vec<FileRecord>>,
    pub process_status: Option<FileStatus>,
    pub history: Option<Vec<Conversation>>,
    pub reply: Option<String>,
    /// Every bearer call answers as an expired session
    pub unauthorized: bool,
    pub gate: Option<Arc<Gate>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    async fn pass_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
    }

    fn bearer(&self) -> ClientResult<()> {
        if self.unauthorized {
            Err(ClientError::Unauthorized)
        } else {
            Ok(())
        }
    }

    fn server_error(message: &str) -> ClientError {
        ClientError::Api {
            status: 500,
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn register(&self, request: &RegisterRequest) -> ClientResult<AuthResponse> {
        self.record(format!("register {}", request.username));
        self.auth.clone().ok_or_else(|| ClientError::Api {
            status: 400,
            message: "username: A user with that username already exists.".to_string(),
        })
    }

    async fn login(&self, request: &LoginRequest) -> ClientResult<AuthResponse> {
        self.record(format!("login {}", request.username));
        self.auth.clone().ok_or_else(|| ClientError::Api {
            status: 401,
            message: "No active account found with the given credentials".to_string(),
        })
    }

    async fn me(&self) -> ClientResult<User> {
        self.record("me");
        self.bearer()?;
        self.profile
            .clone()
            .ok_or_else(|| Self::server_error("Failed to load profile"))
    }

    async fn list_files(&self) -> ClientResult<Vec<FileRecord>> {
        self.record("list_files");
        self.bearer()?;
        self.files
            .clone()
            .ok_or_else(|| Self::server_error("Failed to load files"))
    }

    async fn upload_file(&self, upload: FileUpload) -> ClientResult<FileRecord> {
        self.record(format!("upload {}", upload.filename));
        self.bearer()?;
        Ok(FileRecord {
            id: 100,
            filename: upload.filename,
            uploaded_at: Utc::now(),
            status: FileStatus::NotProcessed,
            information_type: upload.visibility,
            information_type_display: Some(upload.visibility.to_string()),
            user: Some(1),
        })
    }

    async fn process_file(&self, id: i64) -> ClientResult<ProcessResponse> {
        self.record(format!("process {}", id));
        self.bearer()?;
        match &self.process_status {
            Some(status) => Ok(ProcessResponse {
                message: Some(format!("File processed with status {}", status)),
                status: status.clone(),
            }),
            None => Err(Self::server_error("index unavailable")),
        }
    }

    async fn delete_file(&self, id: i64) -> ClientResult<()> {
        self.record(format!("delete {}", id));
        self.pass_gate().await;
        self.bearer()
    }

    async fn private_history(&self) -> ClientResult<Vec<Conversation>> {
        self.record("history");
        self.pass_gate().await;
        self.bearer()?;
        self.history
            .clone()
            .ok_or_else(|| Self::server_error("Could not load chat history."))
    }

    async fn send_private(&self, message: &str) -> ClientResult<ChatReply> {
        self.record(format!("private {}", message));
        self.pass_gate().await;
        self.bearer()?;
        self.chat_reply()
    }

    async fn send_public(&self, message: &str) -> ClientResult<ChatReply> {
        self.record(format!("public {}", message));
        self.pass_gate().await;
        self.chat_reply()
    }
}

impl FakeBackend {
    fn chat_reply(&self) -> ClientResult<ChatReply> {
        match &self.reply {
            Some(reply) => Ok(ChatReply {
                reply: Some(reply.clone()),
                sources: Vec::new(),
                history: Vec::new(),
            }),
            None => Err(Self::server_error("model unavailable")),
        }
    }
}
