//! # Site24x7 Prometheus Exporter
//!
//! Polls the Site24x7 monitoring API on a fixed schedule, caches the
//! rendered exposition text per data category, and serves it on
//! `GET /metrics`.
//!
//! Modules:
//! - `config` — environment-sourced service settings
//! - `auth` — Zoho OAuth credential lifecycle (refresh grant, persistence)
//! - `upstream` — authenticated Site24x7 API client and document models
//! - `render` — Prometheus exposition builder and per-category renderers
//! - `cache` — per-category slots and the refresh coordinator

pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod helpers;
pub mod observability;
pub mod render;
pub mod server;
pub mod tests;
pub mod upstream;
pub mod utils;

pub use crate::config::settings::Settings;
pub use crate::error::ExporterError;
pub use crate::upstream::Category;
