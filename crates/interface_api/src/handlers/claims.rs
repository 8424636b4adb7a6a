//! Claims handlers

use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Query, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum::extract::rejection::QueryRejection;
use domain_claims::csv_import::read_csv_submission;
use domain_claims::intake::parse_json_submission;
use domain_claims::{BatchMode, IntakeRecord, ProcessOutcome, ProviderLimit};
use tracing::{debug, instrument};

use crate::dto::claims::*;
use crate::{error::ApiError, AppState};

/// Processes claims submitted as JSON
///
/// Accepts one claim object, an array of claims, or `{"claims": [...]}`
#[instrument(skip_all)]
pub async fn process_claims(
    State(state): State<AppState>,
    query: Result<Query<ProcessQuery>, QueryRejection>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let records = parse_json_submission(&body)?;
    debug!(records = records.len(), "JSON submission parsed");

    process(&state, records, query.on_error).await
}

/// Processes claims uploaded as a CSV file
///
/// Takes the multipart part named `file`, falling back to the first file part.
/// Any other content type is read as raw CSV text.
#[instrument(skip_all)]
pub async fn process_csv(
    State(state): State<AppState>,
    query: Result<Query<ProcessQuery>, QueryRejection>,
    request: Request,
) -> Result<Response, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .map(|ct| ct.starts_with("multipart/form-data"))
        .unwrap_or(false);

    let content = if is_multipart {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        read_upload(multipart).await?
    } else {
        axum::body::to_bytes(request.into_body(), state.config.max_body_bytes)
            .await
            .map_err(|e| ApiError::BadRequest(format!("unreadable body: {}", e)))?
    };

    let records = read_csv_submission(content.as_ref())?;
    debug!(records = records.len(), "CSV submission parsed");

    process(&state, records, query.on_error).await
}

async fn read_upload(mut multipart: Multipart) -> Result<Bytes, ApiError> {
    let mut first_file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        let is_named_file = field.name() == Some("file");
        let is_file = field.file_name().is_some();
        if !is_named_file && (!is_file || first_file.is_some()) {
            continue;
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        if is_named_file {
            return Ok(data);
        }
        first_file = Some(data);
    }

    first_file.ok_or_else(|| ApiError::BadRequest("missing CSV file upload".to_string()))
}

async fn process(
    state: &AppState,
    records: Vec<IntakeRecord>,
    mode: BatchMode,
) -> Result<Response, ApiError> {
    let ProcessOutcome { accepted, rejected } = state.processor.process(records, mode).await?;
    let claims: Vec<ClaimResponse> = accepted.into_iter().map(ClaimResponse::from).collect();

    let response = match mode {
        BatchMode::Reject => (StatusCode::CREATED, Json(claims)).into_response(),
        BatchMode::Skip => {
            (StatusCode::CREATED, Json(ProcessReport { claims, rejected })).into_response()
        }
    };
    Ok(response)
}

/// Returns the providers with the highest summed net fee
#[instrument(skip_all)]
pub async fn top_providers(
    State(state): State<AppState>,
    query: Result<Query<TopProvidersQuery>, QueryRejection>,
) -> Result<Json<Vec<TopProviderResponse>>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let limit = match query.limit {
        Some(requested) => ProviderLimit::new(requested)?,
        None => ProviderLimit::default(),
    };

    let totals = state.processor.top_providers(limit).await?;
    Ok(Json(totals.into_iter().map(TopProviderResponse::from).collect()))
}
