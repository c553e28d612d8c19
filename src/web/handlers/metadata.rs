// GET / — the app's self-description (name, version, input/output types).

use axum::extract::{Query, State};
use axum::response::Response;
use serde::Deserialize;

use crate::web::{is_truthy, json_response, AppState};

#[derive(Debug, Deserialize)]
pub struct MetadataParams {
    pub pretty: Option<String>,
}

pub async fn get_metadata(
    State(state): State<AppState>,
    Query(params): Query<MetadataParams>,
) -> Response {
    let pretty = is_truthy(params.pretty.as_deref());
    json_response(state.annotator.metadata().to_json(pretty))
}
