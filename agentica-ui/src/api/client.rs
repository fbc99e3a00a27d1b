//! HTTP API Client
//!
//! Functions for communicating with the Agentica REST API. Every bearer
//! call goes through [`Api::send_authenticated`]: the `Authorization`
//! header is always attached and a 401 logs the session out.

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use agentica::model::{
    error_message, AuthResponse, ChatReply, ChatRequest, Conversation, FileRecord, LoginRequest,
    ProcessResponse, RegisterRequest, User, Visibility,
};
use agentica::{ClientError, ClientResult};

use crate::state::GlobalState;

/// Default API base URL, overridable at build time
pub const DEFAULT_API_BASE: &str = match option_env!("AGENTICA_DEFAULT_API_URL") {
    Some(url) => url,
    None => "http://localhost:8000/api",
};

const API_URL_KEY: &str = "agentica_api_url";

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(API_URL_KEY).ok().flatten())
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    // Normalize: remove trailing slash
    url.trim_end_matches('/').to_string()
}

fn network(err: gloo_net::Error) -> ClientError {
    ClientError::Network(err.to_string())
}

fn build(err: gloo_net::Error) -> ClientError {
    ClientError::Validation(format!("Request build error: {}", err))
}

/// Handle on the backend, bound to the session in [`GlobalState`]
#[derive(Clone)]
pub struct Api {
    base: String,
    state: GlobalState,
}

impl Api {
    pub fn new(state: GlobalState) -> Self {
        Self {
            base: get_api_base(),
            state,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header(
            "Authorization",
            &self.state.session().authorization_header(),
        )
    }

    async fn send(request: Request) -> ClientResult<Response> {
        request.send().await.map_err(network)
    }

    async fn send_authenticated(&self, request: Request) -> ClientResult<Response> {
        let response = Self::send(request).await?;
        self.state.check_status(response.status())?;
        Ok(response)
    }

    async fn ensure_success(response: Response, fallback: &str) -> ClientResult<Response> {
        if response.ok() {
            return Ok(response);
        }

        let status = response.status();
        let body: serde_json::Value = response.json().await.unwrap_or(serde_json::Value::Null);
        Err(ClientError::Api {
            status,
            message: error_message(&body, fallback),
        })
    }

    async fn read_json<T: DeserializeOwned>(response: Response, fallback: &str) -> ClientResult<T> {
        Self::ensure_success(response, fallback)
            .await?
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }

    // ============ Users ============

    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<AuthResponse> {
        let request = Request::post(&self.url("/users/register/"))
            .json(request)
            .map_err(build)?;
        Self::read_json(Self::send(request).await?, "Registration failed").await
    }

    pub async fn login(&self, request: &LoginRequest) -> ClientResult<AuthResponse> {
        let request = Request::post(&self.url("/users/login/"))
            .json(request)
            .map_err(build)?;
        Self::read_json(Self::send(request).await?, "Login failed").await
    }

    pub async fn me(&self) -> ClientResult<User> {
        let request = self
            .authorized(Request::get(&self.url("/users/me/")))
            .build()
            .map_err(build)?;
        let response = self.send_authenticated(request).await?;
        Self::read_json(response, "Failed to load user data").await
    }

    // ============ Files ============

    pub async fn list_files(&self) -> ClientResult<Vec<FileRecord>> {
        let request = self
            .authorized(Request::get(&self.url("/chat/files/")))
            .build()
            .map_err(build)?;
        let response = self.send_authenticated(request).await?;
        Self::read_json(response, "Failed to load files").await
    }

    /// Multipart upload: `file` plus its `information_type`
    pub async fn upload_file(
        &self,
        file: &web_sys::File,
        visibility: Visibility,
    ) -> ClientResult<FileRecord> {
        let form = web_sys::FormData::new()
            .and_then(|form| {
                form.append_with_blob_and_filename("file", file, &file.name())?;
                form.append_with_str("information_type", visibility.as_str())?;
                Ok(form)
            })
            .map_err(|e| ClientError::Validation(format!("Could not read file: {:?}", e)))?;

        // No content type: the browser sets the multipart boundary itself
        let request = self
            .authorized(Request::post(&self.url("/chat/files/")))
            .body(form)
            .map_err(build)?;
        let response = self.send_authenticated(request).await?;
        Self::read_json(response, "Upload failed").await
    }

    pub async fn process_file(&self, id: i64) -> ClientResult<ProcessResponse> {
        let request = self
            .authorized(Request::post(&self.url(&format!("/chat/files/{}/process/", id))))
            .build()
            .map_err(build)?;
        let response = self.send_authenticated(request).await?;
        Self::read_json(response, "Processing failed").await
    }

    pub async fn delete_file(&self, id: i64) -> ClientResult<()> {
        let request = self
            .authorized(Request::delete(&self.url(&format!("/chat/files/{}/", id))))
            .build()
            .map_err(build)?;
        let response = self.send_authenticated(request).await?;
        Self::ensure_success(response, "Delete failed").await?;
        Ok(())
    }

    // ============ Chat ============

    pub async fn private_history(&self) -> ClientResult<Vec<Conversation>> {
        let request = self
            .authorized(Request::get(&self.url("/chat/chat/private/history/")))
            .build()
            .map_err(build)?;
        let response = self.send_authenticated(request).await?;
        Self::read_json(response, "Failed to load chat history").await
    }

    pub async fn send_private(&self, message: &str) -> ClientResult<String> {
        let request = self
            .authorized(Request::post(&self.url("/chat/chat/private/")))
            .json(&ChatRequest {
                message: message.to_string(),
            })
            .map_err(build)?;
        let response = self.send_authenticated(request).await?;
        Self::read_json::<ChatReply>(response, "Failed to get a reply")
            .await?
            .into_text()
    }

    /// Guest chat; no credential involved
    pub async fn send_public(&self, message: &str) -> ClientResult<String> {
        let request = Request::post(&self.url("/chat/chat/public/"))
            .json(&ChatRequest {
                message: message.to_string(),
            })
            .map_err(build)?;
        Self::read_json::<ChatReply>(Self::send(request).await?, "Failed to get a reply")
            .await?
            .into_text()
    }
}
