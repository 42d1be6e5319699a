//! HTTP inbound adapter exposing the chat webhook and health probes.

use actix_web::web;

pub mod cache_control;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
pub mod webhook;

pub use error::ApiResult;

/// Register every HTTP route.
///
/// Callers supply `web::Data<HttpState>` and `web::Data<HealthState>` as app
/// data.
///
/// [`HttpState`]: state::HttpState
/// [`HealthState`]: health::HealthState
pub fn configure(cfg: &mut web::ServiceConfig) {
    webhook::configure(cfg);
    cfg.service(health::ready).service(health::live);
}
