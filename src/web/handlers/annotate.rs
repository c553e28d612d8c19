// POST / — annotate a MMIF container.
//
// Returns 400 if the body isn't a MMIF document.
// Returns 500 if annotation fails (unreachable text location, inference error).
// Otherwise returns the container with the new topic views appended.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use serde::Deserialize;

use crate::mmif::Mmif;
use crate::web::{api_error, is_truthy, json_response, AppState};

#[derive(Debug, Deserialize)]
pub struct AnnotateParams {
    pub pretty: Option<String>,
}

pub async fn annotate(
    State(state): State<AppState>,
    Query(params): Query<AnnotateParams>,
    body: String,
) -> Response {
    let mmif = match Mmif::from_json(&body) {
        Ok(mmif) => mmif,
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "Rejected malformed MMIF");
            return api_error(StatusCode::BAD_REQUEST, &format!("{e:#}"));
        }
    };

    let annotated = match state.annotator.annotate(mmif).await {
        Ok(annotated) => annotated,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "Annotation failed");
            return api_error(StatusCode::INTERNAL_SERVER_ERROR, &format!("{e:#}"));
        }
    };

    match annotated.to_json(is_truthy(params.pretty.as_deref())) {
        Ok(body) => json_response(body),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize annotated MMIF");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to serialize MMIF")
        }
    }
}
