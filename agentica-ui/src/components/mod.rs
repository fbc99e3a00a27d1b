//! UI Components
//!
//! Reusable Leptos components shared by the pages and the layout.

pub mod chat_window;
pub mod guest_chat;
pub mod loading;
pub mod nav;
pub mod toast;

pub use chat_window::ChatWindow;
pub use guest_chat::GuestChat;
pub use loading::{InlineLoading, Loading};
pub use nav::Nav;
pub use toast::Toast;
