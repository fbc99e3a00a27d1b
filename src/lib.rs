//! # Agentica
//!
//! Client for the Agentica document-chat service: register or log in, upload
//! documents, have the backend index them, and ask questions about them.
//!
//! ## Features
//!
//! - **Persistent session**: identity and bearer credential survive restarts
//! - **Single auth path**: every bearer call attaches the credential, a 401
//!   logs out
//! - **Dashboard**: profile completeness, file stats, upload, process, delete
//! - **Chat**: private chat over your documents, guest chat over public ones
//! - **Late-response guard**: results for a closed screen are dropped
//!
//! ## Modules
//!
//! Platform-neutral (also built for the browser frontend):
//!
//! - [`storage`]: Key-value persistence behind the session
//! - [`session`]: Session store and hydration
//! - [`model`]: Wire types and backend error messages
//! - [`routes`]: Screen routing and access rules
//! - [`dashboard`], [`chat`], [`guest`]: Screen state
//! - [`form`], [`lifecycle`]: Form state machine and screen lifetime guard
//!
//! Native only (`native` feature, on by default):
//!
//! - [`api`]: `Backend` trait and the `reqwest` client
//! - [`screens`]: Async controllers driving the screen state
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use agentica::api::ApiClient;
//! use agentica::screens::{AuthScreen, ChatScreen};
//! use agentica::session::SessionStore;
//! use agentica::storage::FileStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = Arc::new(SessionStore::new(FileStore::new(FileStore::default_path())));
//!     session.hydrate();
//!
//!     let backend = Arc::new(ApiClient::new("http://localhost:8000/api", Arc::clone(&session))?);
//!
//!     if !session.is_authenticated() {
//!         AuthScreen::new(backend.clone(), Arc::clone(&session))
//!             .login("ana", "correct horse")
//!             .await?;
//!     }
//!
//!     let chat = ChatScreen::private(backend);
//!     chat.load_history().await?;
//!     let reply = chat.send("What does the contract say about renewals?").await?;
//!     println!("{}", reply.text);
//!
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod dashboard;
pub mod error;
pub mod form;
pub mod guest;
pub mod lifecycle;
pub mod model;
pub mod routes;
pub mod session;
pub mod storage;

#[cfg(feature = "native")]
pub mod api;
#[cfg(feature = "native")]
pub mod config;
#[cfg(feature = "native")]
pub mod screens;

// Re-export top-level types for convenience
pub use chat::{ChatKind, ChatLog, ChatMessage, Role};
pub use dashboard::Dashboard;
pub use error::{ClientError, ClientResult};
pub use form::FormState;
pub use guest::{GuestVisibility, GuestWidget};
pub use lifecycle::{ScreenScope, Ticket};
pub use model::{
    AuthResponse, ChatReply, Conversation, FileRecord, FileStatus, Profile, User, Visibility,
};
pub use routes::{NavItem, Route, RouteAccess};
pub use session::SessionStore;
pub use storage::{KeyValueStore, MemoryStore, StorageError, StorageResult};

#[cfg(feature = "native")]
pub use api::{ApiClient, Backend, FileUpload};
#[cfg(feature = "native")]
pub use config::{Config, ConfigError};
#[cfg(feature = "native")]
pub use screens::{AuthScreen, ChatScreen, DashboardScreen};
#[cfg(feature = "native")]
pub use storage::FileStore;
