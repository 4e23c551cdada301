use crate::{
    active_stats, activity, index_handler, load_tables, not_found, precip, routes, stations,
    temp_avg_active, ClimateData, ClimateTables, CutoffPolicy, ErrorResponse, PrecipitationSummary,
    ACTIVE_STATS_ROUTE, ACTIVITY_ROUTE, PRECIP_ROUTE, STATIONS_ROUTE, TEMP_AVG_ACTIVE_ROUTE,
};
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use hyper::{header::ACCEPT, Method};
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

/// Shared, read-only context handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub tables: Arc<ClimateTables>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::home::index_handler,
        routes::api::climate_routes::precip,
        routes::api::climate_routes::stations,
        routes::api::climate_routes::activity,
        routes::api::climate_routes::temp_avg_active,
        routes::api::climate_routes::active_stats,
    ),
    components(
        schemas(
                PrecipitationSummary,
                ErrorResponse,
        )
    ),
    tags(
        (name = "hawaii climate api", description = "a read-only RESTful api over historical precipitation and temperature observations")
    )
)]
struct ApiDoc;

/// Load every table from `source` before anything is served.
///
/// Any store or schema problem is returned as an error, the caller must not
/// start listening in that case.
pub async fn build_app_state(
    source: Arc<dyn ClimateData>,
    cutoff: CutoffPolicy,
) -> Result<AppState, anyhow::Error> {
    let tables = load_tables(source.as_ref(), &cutoff)
        .await
        .map_err(|e| anyhow!("error loading climate tables: {}", e))?;

    Ok(AppState {
        tables: Arc::new(tables),
    })
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT])
        .allow_origin(Any);

    Router::new()
        .route("/", get(index_handler))
        .route(PRECIP_ROUTE, get(precip))
        .route(STATIONS_ROUTE, get(stations))
        .route(ACTIVITY_ROUTE, get(activity))
        .route(TEMP_AVG_ACTIVE_ROUTE, get(temp_avg_active))
        .route(ACTIVE_STATS_ROUTE, get(active_stats))
        .fallback(not_found)
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default()
        .to_owned();
    info!(target: "http_request","new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, code: {}, time: {}", response.status().as_str(), response_time);

    response
}
