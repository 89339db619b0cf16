//! HTTP route handlers for the checklist proxy endpoints.

use std::sync::Arc;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use sts_core::FormKind;

use super::json_error;
use super::state::{AppState, StoreError};

#[derive(Debug, Deserialize)]
pub(crate) struct RecordQuery {
    #[serde(rename = "operationRef", default)]
    operation_ref: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListQuery {
    year: Option<String>,
}

/// Fallback handler for unmatched routes.
pub(crate) async fn handle_not_found() -> impl IntoResponse {
    json_error(StatusCode::NOT_FOUND, "not found")
}

/// GET /health
pub(crate) async fn handle_health() -> impl IntoResponse {
    let forms: Vec<&str> = FormKind::ALL.iter().map(|k| k.slug()).collect();
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "ok", "forms": forms })),
    )
}

/// GET /api/sts-proxy/{slug}?operationRef=...
pub(crate) async fn handle_read(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(query): Query<RecordQuery>,
) -> Response {
    let Some(kind) = FormKind::from_slug(&slug) else {
        return unknown_form(&slug);
    };
    let store = state.store.read().await;
    match store.read(kind, &query.operation_ref) {
        Ok(record) => ok(StatusCode::OK, None, record),
        Err(e) => store_error(e),
    }
}

/// POST /api/sts-proxy/{slug}/create
pub(crate) async fn handle_create(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    multipart: Multipart,
) -> Response {
    let Some(kind) = FormKind::from_slug(&slug) else {
        return unknown_form(&slug);
    };
    let payload = match read_data_field(multipart).await {
        Ok(payload) => payload,
        Err(response) => return response,
    };

    let mut store = state.store.write().await;
    match store.create(kind, payload) {
        Ok(record) => {
            tracing::info!(form = kind.slug(), operation_ref = %record["operationRef"], "checklist created");
            ok(StatusCode::CREATED, Some("Checklist created successfully"), record)
        }
        Err(e) => store_error(e),
    }
}

/// PUT /api/sts-proxy/{slug}?operationRef=...
pub(crate) async fn handle_update(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(query): Query<RecordQuery>,
    multipart: Multipart,
) -> Response {
    let Some(kind) = FormKind::from_slug(&slug) else {
        return unknown_form(&slug);
    };
    let payload = match read_data_field(multipart).await {
        Ok(payload) => payload,
        Err(response) => return response,
    };

    let mut store = state.store.write().await;
    match store.update(kind, &query.operation_ref, payload) {
        Ok(record) => {
            tracing::info!(form = kind.slug(), operation_ref = %record["operationRef"], "checklist updated");
            ok(StatusCode::OK, Some("Checklist updated successfully"), record)
        }
        Err(e) => store_error(e),
    }
}

/// GET /api/sts-proxy/{slug}/list?year=yyyy
pub(crate) async fn handle_list(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(query): Query<ListQuery>,
) -> Response {
    let Some(kind) = FormKind::from_slug(&slug) else {
        return unknown_form(&slug);
    };
    let year = match query.year.as_deref().map(str::trim) {
        None | Some("") => time::OffsetDateTime::now_utc().year(),
        Some(raw) => match raw.parse::<i32>() {
            Ok(year) => year,
            Err(_) => {
                return json_error(
                    StatusCode::BAD_REQUEST,
                    &format!("Validation failed: invalid year '{}'", raw),
                )
                .into_response()
            }
        },
    };

    let store = state.store.read().await;
    let (rows, years) = store.list(kind, year);
    (
        StatusCode::OK,
        Json(serde_json::json!({ "success": true, "data": rows, "years": years })),
    )
        .into_response()
}

/// Extract and parse the JSON text of the multipart field `data`.
async fn read_data_field(mut multipart: Multipart) -> Result<Value, Response> {
    let bad_request = |msg: String| json_error(StatusCode::BAD_REQUEST, &msg).into_response();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Err(bad_request("missing multipart field 'data'".into())),
            Err(e) => return Err(bad_request(format!("invalid multipart body: {}", e))),
        };
        if field.name() != Some("data") {
            continue;
        }
        let text = field
            .text()
            .await
            .map_err(|e| bad_request(format!("invalid multipart body: {}", e)))?;
        return serde_json::from_str(&text)
            .map_err(|e| bad_request(format!("field 'data' is not valid JSON: {}", e)));
    }
}

fn ok(status: StatusCode, message: Option<&str>, record: Value) -> Response {
    let mut body = serde_json::json!({ "success": true, "data": record });
    if let Some(message) = message {
        body["message"] = Value::String(message.to_string());
    }
    (status, Json(body)).into_response()
}

fn store_error(err: StoreError) -> Response {
    let status = match err {
        StoreError::MissingOperationRef | StoreError::NotAnObject => StatusCode::BAD_REQUEST,
        StoreError::NotFound => StatusCode::NOT_FOUND,
        StoreError::Duplicate(_) => StatusCode::CONFLICT,
    };
    json_error(status, &err.to_string()).into_response()
}

fn unknown_form(slug: &str) -> Response {
    json_error(StatusCode::NOT_FOUND, &format!("Unknown checklist form '{}'", slug)).into_response()
}
