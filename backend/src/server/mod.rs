//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use ownerbot::Trace;
#[cfg(debug_assertions)]
use ownerbot::doc::ApiDoc;
use ownerbot::inbound::http::health::HealthState;
use ownerbot::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .configure(ownerbot::inbound::http::configure);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server answering chat events through `http_state`.
///
/// Readiness flips to true once the socket is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: HttpState,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(http_state);
    let server_health_state = health_state.clone();
    let ServerConfig { bind_addr, workers } = config;

    let mut server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    });
    if let Some(workers) = workers {
        server = server.workers(workers);
    }
    let server = server.bind(bind_addr)?.run();

    info!(%bind_addr, "ownerbot listening");
    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    //! Tests for server bootstrap and readiness signalling.

    use std::net::SocketAddr;
    use std::sync::Arc;

    use super::*;
    use ownerbot::domain::OwnerBot;
    use ownerbot::outbound::kv::InMemoryDirectoryStore;
    use rstest::rstest;

    fn http_state() -> HttpState {
        HttpState::new(Arc::new(OwnerBot::new(Arc::new(InMemoryDirectoryStore::new()))))
    }

    fn health_state() -> web::Data<HealthState> {
        web::Data::new(HealthState::new(Arc::new(InMemoryDirectoryStore::new())))
    }

    #[rstest]
    #[actix_web::test]
    async fn create_server_marks_ready() {
        let health_state = health_state();
        let config = ServerConfig::new(SocketAddr::from(([127, 0, 0, 1], 0))).with_workers(1);

        let server = create_server(health_state.clone(), http_state(), config)
            .expect("server binds to an ephemeral port");

        assert!(health_state.is_ready());
        server.handle().stop(false).await;
    }

    #[rstest]
    #[actix_web::test]
    async fn bind_failure_leaves_server_unready() {
        let health_state = health_state();
        let config = ServerConfig::new(SocketAddr::from(([203, 0, 113, 1], 1)));

        let result = create_server(health_state.clone(), http_state(), config);

        assert!(result.is_err());
        assert!(!health_state.is_ready());
        assert_eq!(
            ServerConfig::new(SocketAddr::from(([127, 0, 0, 1], 8080))).bind_addr().port(),
            8080
        );
    }
}
