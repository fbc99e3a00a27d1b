//! Dashboard State
//!
//! Profile, file list and the per-action form states behind the dashboard
//! screen. The backend is the source of truth; local changes are applied
//! only after the matching call succeeds.

use crate::form::FormState;
use crate::model::{FileRecord, FileStatus, User, Visibility};

/// State behind the dashboard screen
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    profile: Option<User>,
    files: Vec<FileRecord>,
    /// Page-level error (profile failed to load)
    load_error: Option<String>,
    /// Inline error for list, process and delete failures
    files_error: Option<String>,
    upload: FormState,
    upload_visibility: Visibility,
    processing: Option<i64>,
    deleting: Option<i64>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- load ----

    pub fn set_profile(&mut self, user: User) {
        self.profile = Some(user);
        self.load_error = None;
    }

    pub fn set_profile_error(&mut self, message: impl Into<String>) {
        self.load_error = Some(message.into());
    }

    pub fn set_files(&mut self, files: Vec<FileRecord>) {
        self.files = files;
        self.files_error = None;
    }

    pub fn set_files_error(&mut self, message: impl Into<String>) {
        self.files_error = Some(message.into());
    }

    pub fn profile(&self) -> Option<&User> {
        self.profile.as_ref()
    }

    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn files_error(&self) -> Option<&str> {
        self.files_error.as_deref()
    }

    // ---- stats ----

    /// Profile completeness in whole percent
    pub fn completeness(&self) -> u8 {
        self.profile
            .as_ref()
            .map(User::profile_completeness)
            .unwrap_or(0)
    }

    pub fn total_files(&self) -> usize {
        self.files.len()
    }

    pub fn processed_files(&self) -> usize {
        self.files.iter().filter(|f| f.status.is_processed()).count()
    }

    // ---- upload ----

    pub fn upload_state(&self) -> &FormState {
        &self.upload
    }

    pub fn upload_visibility(&self) -> Visibility {
        self.upload_visibility
    }

    pub fn set_upload_visibility(&mut self, visibility: Visibility) {
        self.upload_visibility = visibility;
    }

    /// Start an upload. Refused without a selected file or while another
    /// upload is pending.
    pub fn begin_upload(&mut self, file_selected: bool) -> bool {
        if !self.upload.can_submit(file_selected) {
            return false;
        }
        self.upload.begin()
    }

    /// Finish the pending upload; a new record goes to the head of the list
    pub fn finish_upload<E: std::fmt::Display>(&mut self, outcome: Result<FileRecord, E>) {
        match outcome {
            Ok(record) => {
                tracing::info!(id = record.id, filename = %record.filename, "File uploaded");
                self.files.insert(0, record);
                self.upload = FormState::Idle;
            }
            Err(e) => {
                self.upload = FormState::Error(format!("Upload failed: {}", e));
            }
        }
    }

    // ---- process ----

    /// Id of the file currently being processed
    pub fn processing(&self) -> Option<i64> {
        self.processing
    }

    /// Whether the process control for `id` is shown: hidden once processed
    pub fn can_process(&self, file: &FileRecord) -> bool {
        !file.status.is_processed()
    }

    /// Start processing `id`. One file at a time.
    pub fn begin_process(&mut self, id: i64) -> bool {
        if self.processing.is_some() {
            return false;
        }
        self.processing = Some(id);
        true
    }

    /// Apply the status the server reported for `id`. On failure the list
    /// stays as it was and the error is surfaced.
    pub fn finish_process<E: std::fmt::Display>(&mut self, id: i64, outcome: Result<FileStatus, E>) {
        self.processing = None;

        match outcome {
            Ok(status) => {
                if let Some(file) = self.files.iter_mut().find(|f| f.id == id) {
                    tracing::info!(id, status = %status, "File status updated");
                    file.status = status;
                }
            }
            Err(e) => {
                self.files_error = Some(format!("Processing failed: {}", e));
            }
        }
    }

    // ---- delete ----

    /// Id of the file currently being deleted
    pub fn deleting(&self) -> Option<i64> {
        self.deleting
    }

    /// Start deleting `id`. One delete at a time.
    pub fn begin_delete(&mut self, id: i64) -> bool {
        if self.deleting.is_some() {
            return false;
        }
        self.deleting = Some(id);
        true
    }

    /// Finish the pending delete of `id`. The row goes only once the
    /// backend confirmed; on failure the list stays and the error shows.
    pub fn finish_delete<E: std::fmt::Display>(&mut self, id: i64, outcome: Result<(), E>) {
        self.deleting = None;

        match outcome {
            Ok(()) => self.remove_file(id),
            Err(e) => {
                self.files_error = Some(format!("Delete failed: {}", e));
            }
        }
    }

    /// Drop `id` from the list. An id that is not listed leaves the list
    /// unchanged.
    pub fn remove_file(&mut self, id: i64) {
        self.files.retain(|f| f.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Profile;
    use chrono::Utc;

    fn file(id: i64, name: &str, status: FileStatus) -> FileRecord {
        FileRecord {
            id,
            filename: name.to_string(),
            uploaded_at: Utc::now(),
            status,
            information_type: Visibility::Private,
            information_type_display: None,
            user: Some(1),
        }
    }

    fn user(address: &str, phone: &str) -> User {
        User {
            id: Some(1),
            username: "ana".to_string(),
            email: None,
            profile: Some(Profile {
                photo: None,
                address: Some(address.to_string()),
                phone: Some(phone.to_string()),
            }),
        }
    }

    #[test]
    fn test_completeness_address_and_phone() {
        let mut dash = Dashboard::new();
        assert_eq!(dash.completeness(), 0);
        dash.set_profile(user("1 Main St", "+15550001111"));
        assert_eq!(dash.completeness(), 66);
    }

    #[test]
    fn test_stats() {
        let mut dash = Dashboard::new();
        dash.set_files(vec![
            file(1, "a.pdf", FileStatus::Processed),
            file(2, "b.txt", FileStatus::NotProcessed),
            file(3, "c.docx", FileStatus::Error),
        ]);
        assert_eq!(dash.total_files(), 3);
        assert_eq!(dash.processed_files(), 1);
    }

    #[test]
    fn test_upload_prepends_record() {
        let mut dash = Dashboard::new();
        dash.set_files(vec![file(1, "old.txt", FileStatus::Processed)]);
        dash.set_upload_visibility(Visibility::Public);

        assert!(!dash.begin_upload(false));
        assert!(dash.begin_upload(true));
        assert!(!dash.begin_upload(true));

        let mut record = file(2, "notes.pdf", FileStatus::NotProcessed);
        record.information_type = dash.upload_visibility();
        dash.finish_upload::<String>(Ok(record));

        assert_eq!(dash.files()[0].filename, "notes.pdf");
        assert_eq!(dash.files()[0].information_type, Visibility::Public);
        assert_eq!(dash.total_files(), 2);
        assert_eq!(*dash.upload_state(), FormState::Idle);
    }

    #[test]
    fn test_upload_failure_keeps_list() {
        let mut dash = Dashboard::new();
        dash.set_files(vec![file(1, "old.txt", FileStatus::Processed)]);
        dash.begin_upload(true);
        dash.finish_upload::<&str>(Err("No file uploaded."));

        assert_eq!(dash.total_files(), 1);
        assert_eq!(
            dash.upload_state().error(),
            Some("Upload failed: No file uploaded.")
        );
    }

    #[test]
    fn test_process_uses_server_status() {
        let mut dash = Dashboard::new();
        dash.set_files(vec![file(5, "scan.png", FileStatus::NotProcessed)]);

        assert!(dash.begin_process(5));
        assert!(!dash.begin_process(5));
        dash.finish_process::<String>(5, Ok(FileStatus::UnsupportedFormat));

        assert_eq!(dash.processing(), None);
        assert_eq!(dash.files()[0].status, FileStatus::UnsupportedFormat);
        assert_eq!(dash.processed_files(), 0);
    }

    #[test]
    fn test_process_failure_leaves_status() {
        let mut dash = Dashboard::new();
        dash.set_files(vec![file(5, "a.pdf", FileStatus::NotProcessed)]);
        dash.begin_process(5);
        dash.finish_process::<&str>(5, Err("boom"));

        assert_eq!(dash.files()[0].status, FileStatus::NotProcessed);
        assert!(dash.files_error().is_some());
        assert!(dash.can_process(&dash.files()[0].clone()));
    }

    #[test]
    fn test_remove_absent_id_is_noop() {
        let mut dash = Dashboard::new();
        dash.set_files(vec![
            file(1, "a.pdf", FileStatus::Processed),
            file(2, "b.pdf", FileStatus::Processed),
        ]);
        let before = dash.files().to_vec();

        dash.remove_file(99);
        assert_eq!(dash.files(), before.as_slice());

        dash.remove_file(1);
        assert_eq!(dash.total_files(), 1);
        assert_eq!(dash.files()[0].id, 2);
    }

    #[test]
    fn test_second_delete_refused_while_pending() {
        let mut dash = Dashboard::new();
        dash.set_files(vec![
            file(1, "a.pdf", FileStatus::Processed),
            file(2, "b.pdf", FileStatus::Processed),
        ]);

        assert!(dash.begin_delete(1));
        assert!(!dash.begin_delete(1));
        assert!(!dash.begin_delete(2));
        assert_eq!(dash.deleting(), Some(1));

        dash.finish_delete::<String>(1, Ok(()));
        assert_eq!(dash.deleting(), None);
        assert_eq!(dash.total_files(), 1);

        assert!(dash.begin_delete(2));
    }

    #[test]
    fn test_delete_failure_keeps_row() {
        let mut dash = Dashboard::new();
        dash.set_files(vec![file(1, "a.pdf", FileStatus::Processed)]);

        dash.begin_delete(1);
        dash.finish_delete::<&str>(1, Err("Not found."));

        assert_eq!(dash.total_files(), 1);
        assert_eq!(dash.deleting(), None);
        assert_eq!(dash.files_error(), Some("Delete failed: Not found."));
    }
}
