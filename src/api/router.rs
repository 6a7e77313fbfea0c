//! REST API router.
//!
//! Returns a composable `Router` with every route nested under `/api/`.
//!
//! Layer stack (outermost → innermost):
//! 1. Request tracing → 2. CORS → 3. Body size limit

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::config::MAX_UPLOAD_BYTES;
use crate::core_state::CoreState;

/// Build the check-in API router.
///
/// `cors_origins` lists the browser origins allowed to call the API; an
/// empty list allows any origin.
pub fn api_router(core: Arc<CoreState>, cors_origins: &[String]) -> Router {
    let ctx = ApiContext::new(core);

    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        // Companies
        .route(
            "/empresas",
            get(endpoints::companies::list).post(endpoints::companies::create),
        )
        .route(
            "/empresas/:id",
            get(endpoints::companies::detail)
                .put(endpoints::companies::update)
                .delete(endpoints::companies::remove),
        )
        // Persons
        .route(
            "/pessoas",
            get(endpoints::persons::list).post(endpoints::persons::create),
        )
        .route(
            "/pessoas/documento/:documento",
            get(endpoints::persons::by_document),
        )
        .route(
            "/pessoas/:id",
            get(endpoints::persons::detail)
                .put(endpoints::persons::update)
                .delete(endpoints::persons::remove),
        )
        // Check-ins
        .route(
            "/checkins",
            get(endpoints::checkins::list).post(endpoints::checkins::create),
        )
        .route("/checkins/stats/geral", get(endpoints::checkins::stats))
        .route(
            "/checkins/pessoa/:pessoa_id",
            get(endpoints::checkins::for_person),
        )
        .route(
            "/checkins/:id",
            get(endpoints::checkins::detail).delete(endpoints::checkins::remove),
        )
        // Reports
        .route("/relatorios/dashboard", get(endpoints::reports::dashboard))
        .route("/relatorios/empresas", get(endpoints::reports::companies))
        .route("/relatorios/setores", get(endpoints::reports::sectors))
        .route(
            "/relatorios/empresa/:empresa_id",
            get(endpoints::reports::company),
        )
        .route("/relatorios/periodo", get(endpoints::reports::period))
        .route("/relatorios/export/csv", get(endpoints::reports::export))
        // Uploads
        .route("/upload/excel", post(endpoints::upload::import_spreadsheet))
        .route(
            "/upload/excel/validar",
            post(endpoints::upload::validate_spreadsheet),
        )
        .route("/upload/ocr", post(endpoints::upload::ocr_document))
        .route("/upload/template", get(endpoints::upload::download_template))
        .with_state(ctx)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES));

    Router::new()
        .nest("/api", routes)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}
