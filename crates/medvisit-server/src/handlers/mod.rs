//! HTTP handlers, one module per route group.

pub mod admin;
pub mod catalog;
pub mod health;
pub mod profile;
pub mod users;
pub mod visits;
pub mod webhook;

use serde::Deserialize;

/// Common `?limit=` query parameter.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct LimitQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}
