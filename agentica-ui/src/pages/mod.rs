//! Pages
//!
//! Top-level page components for each route.

use leptos::on_cleanup;

use agentica::lifecycle::ScreenScope;

pub mod chat;
pub mod dashboard;
pub mod home;
pub mod login;
pub mod register;

pub use chat::ChatPage;
pub use dashboard::DashboardPage;
pub use home::HomePage;
pub use login::LoginPage;
pub use register::RegisterPage;

/// Scope tied to the calling component: invalidated when it unmounts, so
/// responses that land after navigation are dropped.
fn page_scope() -> ScreenScope {
    let scope = ScreenScope::new();
    let on_unmount = scope.clone();
    on_cleanup(move || on_unmount.invalidate());
    scope
}
