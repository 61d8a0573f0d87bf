use crate::docs::ApiDoc;
use crate::logging::{REQUEST_ID_HEADER, logging_middleware};
use crate::metrics::metrics_middleware;
use crate::modules::course_modules::init_modules_router;
use crate::modules::courses::init_courses_router;
use crate::modules::pages::init_pages_router;
use crate::modules::resources::{init_resource_pages_router, init_resources_router};
use crate::modules::uploads::init_uploads_router;
use crate::state::AppState;
use coursekit_config::CorsConfig;
use std::time::Duration;
use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .nest("/courses", init_courses_router())
                .nest("/modules", init_modules_router())
                .nest("/pages", init_pages_router())
                .nest("/resources", init_resources_router())
                .nest(
                    "/uploads",
                    init_uploads_router(state.upload_config.max_bytes),
                ),
        )
        .merge(init_resource_pages_router())
        .nest_service("/files", ServeDir::new(&state.upload_config.upload_dir))
        .with_state(state.clone())
        .layer(cors_layer(&state.cors_config))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}

/// Unparseable origins are skipped rather than failing startup.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([REQUEST_ID_HEADER])
        .allow_credentials(true)
        .max_age(Duration::from_secs(config.max_age_secs))
}
