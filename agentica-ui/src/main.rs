//! Agentica Web Client
//!
//! Browser frontend for the Agentica document-chat service, built with
//! Leptos (WASM).
//!
//! # Features
//!
//! - Register, log in and out; the session survives reloads via `localStorage`
//! - Dashboard: profile completeness, upload, process and delete documents
//! - Private chat over your own documents
//! - Guest chat widget over public documents for visitors
//!
//! # Architecture
//!
//! Client-side rendered Leptos application. Session handling, routing rules
//! and screen state come from the `agentica` core crate; this crate adds the
//! browser storage, the `gloo-net` HTTP layer and the views.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;
mod storage;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
