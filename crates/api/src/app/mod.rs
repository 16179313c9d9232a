//! Application assembly: router, middleware stack, and storage wiring.

pub mod dto;
pub mod envelope;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::Extension;
use axum::Router;
use axum::http::HeaderValue;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use bizgrid_auth::Hs256TokenDecoder;

use crate::config::Config;
use crate::middleware::{self, AuthState};
use services::AppServices;

/// Build the full application router from configuration.
///
/// Everything except `/health` sits behind bearer-token authentication.
pub async fn build_app(config: Config) -> Router {
    let services = Arc::new(build_services(&config).await);
    let auth_state = AuthState {
        decoder: Arc::new(Hs256TokenDecoder::new(config.jwt_secret.as_bytes())),
    };

    let protected = routes::router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
        .layer(Extension(services))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config))
        .fallback(envelope::not_found_handler)
}

async fn build_services(config: &Config) -> AppServices {
    #[cfg(feature = "postgres")]
    if let Some(url) = config.database_url.as_deref() {
        match sqlx::postgres::PgPoolOptions::new()
            .max_connections(8)
            .connect(url)
            .await
        {
            Ok(pool) => {
                tracing::info!("connected to postgres");
                return AppServices::postgres(pool);
            }
            Err(e) => {
                tracing::error!(error = %e, "postgres connection failed, using in-memory store");
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    let _ = config;

    AppServices::in_memory()
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origin = config
        .frontend_url
        .as_deref()
        .and_then(|url| url.parse::<HeaderValue>().ok());
    match origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::permissive(),
    }
}
