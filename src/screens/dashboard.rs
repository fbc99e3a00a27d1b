//! Dashboard controller
//!
//! Loads profile and files concurrently, then drives upload, process and
//! delete one request at a time against [`Dashboard`] state.

use std::sync::{Arc, Mutex};

use super::lock;
use crate::api::{Backend, FileUpload};
use crate::dashboard::Dashboard;
use crate::error::{ClientError, ClientResult};
use crate::lifecycle::ScreenScope;
use crate::model::{FileRecord, FileStatus};

/// Controller for the dashboard screen
pub struct DashboardScreen {
    backend: Arc<dyn Backend>,
    scope: ScreenScope,
    state: Mutex<Dashboard>,
}

impl DashboardScreen {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            scope: ScreenScope::new(),
            state: Mutex::new(Dashboard::new()),
        }
    }

    /// Copy of the current state for rendering
    pub fn snapshot(&self) -> Dashboard {
        lock(&self.state).clone()
    }

    pub fn dispose(&self) {
        self.scope.invalidate();
    }

    /// Fetch profile and files together. Each failure lands in its own
    /// error slot; only an expired session is returned as an error.
    pub async fn load(&self) -> ClientResult<()> {
        let ticket = self.scope.ticket();
        let (profile, files) = tokio::join!(self.backend.me(), self.backend.list_files());

        let unauthorized = matches!(profile, Err(ClientError::Unauthorized))
            || matches!(files, Err(ClientError::Unauthorized));

        ticket.apply(|| {
            let mut state = lock(&self.state);
            match profile {
                Ok(user) => state.set_profile(user),
                Err(e) => {
                    tracing::warn!("Failed to load profile: {}", e);
                    state.set_profile_error(e.to_string());
                }
            }
            match files {
                Ok(files) => state.set_files(files),
                Err(e) => {
                    tracing::warn!("Failed to load files: {}", e);
                    state.set_files_error(e.to_string());
                }
            }
        });

        if unauthorized {
            return Err(ClientError::Unauthorized);
        }
        Ok(())
    }

    pub async fn upload(&self, upload: FileUpload) -> ClientResult<FileRecord> {
        if !lock(&self.state).begin_upload(!upload.filename.is_empty()) {
            return Err(ClientError::Validation(
                "Select a file, or wait for the current upload".to_string(),
            ));
        }

        let ticket = self.scope.ticket();
        let outcome = self.backend.upload_file(upload).await;

        ticket.apply(|| {
            let mut state = lock(&self.state);
            match &outcome {
                Ok(record) => state.finish_upload::<ClientError>(Ok(record.clone())),
                Err(e) => state.finish_upload(Err(e)),
            }
        });
        outcome
    }

    /// Process `id` and adopt whatever status the server reports
    pub async fn process(&self, id: i64) -> ClientResult<FileStatus> {
        if !lock(&self.state).begin_process(id) {
            return Err(ClientError::Validation(
                "Another file is being processed".to_string(),
            ));
        }

        let ticket = self.scope.ticket();
        let outcome = self.backend.process_file(id).await.map(|r| r.status);

        ticket.apply(|| {
            let mut state = lock(&self.state);
            match &outcome {
                Ok(status) => state.finish_process::<ClientError>(id, Ok(status.clone())),
                Err(e) => state.finish_process(id, Err(e)),
            }
        });
        outcome
    }

    /// Delete `id`; the row is dropped once the backend confirms
    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        if !lock(&self.state).begin_delete(id) {
            return Err(ClientError::Validation(
                "Another file is being deleted".to_string(),
            ));
        }

        let ticket = self.scope.ticket();
        let outcome = self.backend.delete_file(id).await;

        ticket.apply(|| {
            let mut state = lock(&self.state);
            match &outcome {
                Ok(()) => state.finish_delete::<ClientError>(id, Ok(())),
                Err(e) => state.finish_delete(id, Err(e)),
            }
        });
        outcome
    }
}
