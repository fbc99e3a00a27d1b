//! Agentica REST API Client
//!
//! HTTP client for the Agentica backend. Every bearer-authenticated call
//! goes through [`ApiClient::send_authenticated`], which attaches the
//! stored credential and turns a 401 into a logout.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{multipart, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::{Backend, FileUpload};
use crate::config::ApiConfig;
use crate::error::{ClientError, ClientResult};
use crate::model::{
    error_message, AuthResponse, ChatReply, ChatRequest, Conversation, FileRecord, LoginRequest,
    ProcessResponse, RegisterRequest, User,
};
use crate::session::SessionStore;

/// Agentica REST API client
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl ApiClient {
    /// Create a client for `base_url` (e.g. "http://localhost:8000/api")
    pub fn new(base_url: impl Into<String>, session: Arc<SessionStore>) -> ClientResult<Self> {
        Self::build(base_url.into(), None, session)
    }

    pub fn from_config(config: &ApiConfig, session: Arc<SessionStore>) -> ClientResult<Self> {
        Self::build(
            config.base_url.clone(),
            config.request_timeout_secs.map(Duration::from_secs),
            session,
        )
    }

    fn build(
        base_url: String,
        timeout: Option<Duration>,
        session: Arc<SessionStore>,
    ) -> ClientResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send with the stored bearer credential. The header is always present,
    /// empty without a credential. A 401 logs the session out and is
    /// returned as [`ClientError::Unauthorized`]; nothing is retried.
    pub async fn send_authenticated(&self, request: RequestBuilder) -> ClientResult<Response> {
        let request = request.header(AUTHORIZATION, self.session.authorization_header());
        let response = self.send(request).await?;
        self.session.check_status(response.status().as_u16())?;
        Ok(response)
    }

    /// Send without credentials
    async fn send(&self, request: RequestBuilder) -> ClientResult<Response> {
        let request = request.build()?;
        let request_id = Uuid::new_v4();
        tracing::debug!(%request_id, method = %request.method(), url = %request.url(), "Request");

        let response = self.http.execute(request).await.map_err(|e| {
            tracing::warn!(%request_id, "Request failed: {}", e);
            ClientError::from(e)
        })?;

        tracing::debug!(%request_id, status = response.status().as_u16(), "Response");
        Ok(response)
    }

    /// Fail on a non-success status with the most readable message the
    /// error body offers
    async fn ensure_success(response: Response, fallback: &str) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(serde_json::Value::Null);
        let message = error_message(&body, fallback);

        tracing::warn!(status = status.as_u16(), "{}", message);
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn read_json<T: DeserializeOwned>(response: Response, fallback: &str) -> ClientResult<T> {
        let response = Self::ensure_success(response, fallback).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl Backend for ApiClient {
    async fn register(&self, request: &RegisterRequest) -> ClientResult<AuthResponse> {
        let req = self.http.post(self.url("/users/register/")).json(request);
        let response = self.send(req).await?;
        Self::read_json(response, "Registration failed").await
    }

    async fn login(&self, request: &LoginRequest) -> ClientResult<AuthResponse> {
        let req = self.http.post(self.url("/users/login/")).json(request);
        let response = self.send(req).await?;
        Self::read_json(response, "Login failed").await
    }

    async fn me(&self) -> ClientResult<User> {
        let req = self.http.get(self.url("/users/me/"));
        let response = self.send_authenticated(req).await?;
        Self::read_json(response, "Failed to load profile").await
    }

    async fn list_files(&self) -> ClientResult<Vec<FileRecord>> {
        let req = self.http.get(self.url("/chat/files/"));
        let response = self.send_authenticated(req).await?;
        Self::read_json(response, "Failed to load files").await
    }

    async fn upload_file(&self, upload: FileUpload) -> ClientResult<FileRecord> {
        let part = multipart::Part::bytes(upload.bytes).file_name(upload.filename);
        let form = multipart::Form::new()
            .part("file", part)
            .text("information_type", upload.visibility.as_str());

        let req = self.http.post(self.url("/chat/files/")).multipart(form);
        let response = self.send_authenticated(req).await?;
        Self::read_json(response, "Upload failed").await
    }

    async fn process_file(&self, id: i64) -> ClientResult<ProcessResponse> {
        let req = self.http.post(self.url(&format!("/chat/files/{}/process/", id)));
        let response = self.send_authenticated(req).await?;
        Self::read_json(response, "Processing failed").await
    }

    async fn delete_file(&self, id: i64) -> ClientResult<()> {
        let req = self.http.delete(self.url(&format!("/chat/files/{}/", id)));
        let response = self.send_authenticated(req).await?;
        Self::ensure_success(response, "Delete failed").await?;
        Ok(())
    }

    async fn private_history(&self) -> ClientResult<Vec<Conversation>> {
        let req = self.http.get(self.url("/chat/chat/private/history/"));
        let response = self.send_authenticated(req).await?;
        Self::read_json(response, "Could not load chat history.").await
    }

    async fn send_private(&self, message: &str) -> ClientResult<ChatReply> {
        let body = ChatRequest {
            message: message.to_string(),
        };
        let req = self.http.post(self.url("/chat/chat/private/")).json(&body);
        let response = self.send_authenticated(req).await?;
        Self::read_json(response, "Chat request failed").await
    }

    async fn send_public(&self, message: &str) -> ClientResult<ChatReply> {
        let body = ChatRequest {
            message: message.to_string(),
        };
        let req = self.http.post(self.url("/chat/chat/public/")).json(&body);
        let response = self.send(req).await?;
        Self::read_json(response, "Chat request failed").await
    }
}
