use axum::{http::StatusCode, http::Uri, Json};
use log::debug;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::API_ROUTES;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = OK, description = "Plain text listing of the available api routes", content_type = "text/plain", body = String)
    ))]
pub async fn index_handler() -> String {
    let mut listing = String::from("Available Routes:\n");
    for route in API_ROUTES {
        listing.push_str(route);
        listing.push('\n');
    }
    listing
}

pub async fn not_found(uri: Uri) -> (StatusCode, Json<ErrorResponse>) {
    debug!("no route for {}", uri.path());
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("no route for {}", uri.path()),
        }),
    )
}
