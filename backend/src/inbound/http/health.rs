//! Health probes for orchestration.
//!
//! Liveness only says the process answers HTTP. Readiness additionally needs
//! the listener bound and the directory store answering a read of the
//! `services` key, so a replica whose Redis pool is unreachable is taken out
//! of rotation instead of replying "Alas" to every chat message.
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::ports::{DirectoryStore, SERVICES_KEY};
use crate::inbound::http::cache_control::NO_STORE;

/// Probe outcome reported in the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    /// Process is serving requests.
    Alive,
    /// Bound and the directory store is reachable.
    Ready,
    /// Listener not bound yet.
    Starting,
    /// Directory store read failed.
    StoreUnavailable,
}

/// Body of both probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct ProbeReport {
    /// Outcome of the probe.
    pub status: ProbeStatus,
}

/// Shared probe state: the bound flag plus the store readiness depends on.
pub struct HealthState {
    bound: AtomicBool,
    store: Arc<dyn DirectoryStore>,
}

impl HealthState {
    /// Not ready until [`mark_ready`](Self::mark_ready) is called.
    pub fn new(store: Arc<dyn DirectoryStore>) -> Self {
        Self {
            bound: AtomicBool::new(false),
            store,
        }
    }

    /// Record that the listener is bound.
    pub fn mark_ready(&self) {
        self.bound.store(true, Ordering::Release);
    }

    /// Whether the listener is bound. Store reachability is checked per probe.
    pub fn is_ready(&self) -> bool {
        self.bound.load(Ordering::Acquire)
    }

    async fn readiness(&self) -> ProbeStatus {
        if !self.is_ready() {
            return ProbeStatus::Starting;
        }
        match self.store.get(SERVICES_KEY).await {
            Ok(_) => ProbeStatus::Ready,
            Err(err) => {
                warn!(error = %err, "readiness probe could not read the directory");
                ProbeStatus::StoreUnavailable
            }
        }
    }
}

fn report(status: ProbeStatus) -> HttpResponse {
    let mut response = match status {
        ProbeStatus::Alive | ProbeStatus::Ready => HttpResponse::Ok(),
        ProbeStatus::Starting | ProbeStatus::StoreUnavailable => {
            HttpResponse::ServiceUnavailable()
        }
    };
    response
        .insert_header((header::CACHE_CONTROL, NO_STORE))
        .json(ProbeReport { status })
}

/// Readiness probe.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "Bound and the directory store answers", body = ProbeReport),
        (status = 503, description = "Still starting or the store is unreachable", body = ProbeReport)
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    report(state.readiness().await)
}

/// Liveness probe; always 200 while the process serves HTTP.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses(
        (status = 200, description = "Process is serving requests", body = ProbeReport)
    )
)]
#[get("/health/live")]
pub async fn live() -> HttpResponse {
    report(ProbeStatus::Alive)
}
