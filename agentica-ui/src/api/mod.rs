//! Backend API
//!
//! `gloo-net` client for the Agentica REST API.

mod client;

pub use client::Api;
