use std::net::SocketAddr;

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{config::AppConfig, handlers, state::AppState};

pub struct MedvisitServer {
    addr: SocketAddr,
    app: Router,
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health::health))
        // Own profile
        .route("/profile", get(handlers::profile::get_profile))
        .route(
            "/profile/promote-self",
            post(handlers::profile::promote_self),
        )
        // Admin user directory
        .route("/users", get(handlers::users::list_users))
        .route(
            "/users/{external_id}",
            axum::routing::delete(handlers::users::delete_user),
        )
        .route(
            "/users/{external_id}/role",
            post(handlers::users::update_role),
        )
        .route(
            "/users/{external_id}/assignments",
            put(handlers::users::set_assignments),
        )
        // Catalogs
        .route(
            "/doctors",
            get(handlers::catalog::list_doctors).post(handlers::catalog::create_doctor),
        )
        .route(
            "/doctors/{id}",
            get(handlers::catalog::get_doctor)
                .put(handlers::catalog::update_doctor)
                .delete(handlers::catalog::delete_doctor),
        )
        .route(
            "/medications",
            get(handlers::catalog::list_medications).post(handlers::catalog::create_medication),
        )
        .route(
            "/medications/{id}",
            get(handlers::catalog::get_medication)
                .put(handlers::catalog::update_medication)
                .delete(handlers::catalog::delete_medication),
        )
        .route(
            "/medical-centers",
            get(handlers::catalog::list_centers).post(handlers::catalog::create_center),
        )
        .route(
            "/medical-centers/{id}",
            get(handlers::catalog::get_center)
                .put(handlers::catalog::update_center)
                .delete(handlers::catalog::delete_center),
        )
        // Visits
        .route(
            "/visits",
            get(handlers::visits::list_visits).post(handlers::visits::create_visit),
        )
        .route("/visits/recent", get(handlers::visits::recent_visits))
        .route(
            "/visits/{id}",
            get(handlers::visits::get_visit).put(handlers::visits::update_visit),
        )
        // Admin
        .route("/admin/stats", get(handlers::admin::stats))
        .route("/admin/activity", get(handlers::admin::activity))
        // Identity-provider sync
        .route("/webhooks/identity", post(handlers::webhook::identity_webhook))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub struct ServerBuilder {
    config: AppConfig,
}

impl ServerBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn build(self) -> MedvisitServer {
        let addr = self.config.addr();
        let state = AppState::new(self.config.auth);
        MedvisitServer {
            addr,
            app: build_app(state),
        }
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MedvisitServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
