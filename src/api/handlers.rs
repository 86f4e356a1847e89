use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Path, Query, Request, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::categories::Category;
use crate::dataset::{CategoryWeights, DatasetAssembler};
use crate::export::{self, DatasetInfo};
use crate::generator::{GeneratedSample, SampleGenerator};
use crate::ohlc::{OhlcBar, OhlcPattern, OhlcSynthesizer};
use crate::validation::{self, ValidationReport};

use super::error::{ApiError, ApiResult};
use super::AppState;

/// Query params for the preview endpoint
#[derive(Debug, Default, Deserialize)]
pub struct PreviewQuery {
    pub seed: Option<u64>,
}

/// Preview response: the sample plus the seed that reproduces it
#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    #[serde(flatten)]
    pub sample: GeneratedSample,
    pub seed: u64,
}

/// Query params for the OHLC preview endpoint
#[derive(Debug, Default, Deserialize)]
pub struct OhlcQuery {
    pub pattern: Option<String>,
    pub num_bars: Option<usize>,
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct OhlcResponse {
    pub pattern: String,
    pub bars: Vec<OhlcBar>,
}

/// Body of a generation request
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    pub size: Option<usize>,
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_balance")]
    pub balance: bool,
    #[serde(default = "default_pine_weight")]
    pub pine_weight: u32,
    #[serde(default = "default_price_weight")]
    pub price_weight: u32,
    #[serde(default = "default_inst_weight")]
    pub inst_weight: u32,
    pub filename: Option<String>,
}

fn default_balance() -> bool {
    true
}

fn default_pine_weight() -> u32 {
    Category::Pinescript.default_weight()
}

fn default_price_weight() -> u32 {
    Category::PriceAction.default_weight()
}

fn default_inst_weight() -> u32 {
    Category::Institutional.default_weight()
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub samples_generated: usize,
    pub filename: String,
    pub path: String,
    pub seed_used: u64,
    pub distribution: BTreeMap<String, usize>,
}

#[derive(Debug, Serialize)]
pub struct DatasetsResponse {
    pub datasets: Vec<DatasetInfo>,
}

/// GET /api/health
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// GET /api/preview/{category} - One sample without record wrapping
pub async fn preview_sample(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
    Query(params): Query<PreviewQuery>,
) -> ApiResult<Json<PreviewResponse>> {
    let category: Category = category.parse()?;
    let (sample, seed) = SampleGenerator::new(&state.bank).preview(category, params.seed)?;
    Ok(Json(PreviewResponse { sample, seed }))
}

/// GET /api/preview/ohlc - Bar sequence for a pattern
pub async fn preview_ohlc(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OhlcQuery>,
) -> ApiResult<Json<OhlcResponse>> {
    let pattern = params.pattern.unwrap_or_else(|| "breakout".to_string());
    let num_bars = params.num_bars.unwrap_or(10);
    if num_bars > state.config.max_ohlc_bars {
        return Err(ApiError::BadRequest(format!(
            "num_bars {} exceeds the limit of {}",
            num_bars, state.config.max_ohlc_bars
        )));
    }

    let synth = OhlcSynthesizer::new(state.config.ohlc_interval_minutes);
    let shape = OhlcPattern::from_name(&pattern);
    let bars = tokio::task::spawn_blocking(move || synth.generate(shape, num_bars, params.seed))
        .await
        .map_err(|e| ApiError::Internal(format!("OHLC task failed: {}", e)))?;
    Ok(Json(OhlcResponse { pattern, bars }))
}

/// POST /api/generate - Assemble a dataset and write it to the datasets dir
pub async fn generate_dataset(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> ApiResult<Json<GenerateResponse>> {
    let size = req.size.unwrap_or(state.config.default_size);
    if size == 0 {
        return Err(ApiError::BadRequest("size must be positive".to_string()));
    }

    let filename = match req.filename.as_deref() {
        Some(name) => export::sanitize_filename(name)?,
        None => export::default_filename(),
    };
    let path = state.config.datasets_dir.join(&filename);
    let weights =
        CategoryWeights::from_request(req.balance, req.pine_weight, req.price_weight, req.inst_weight);
    let seed = (req.seed != 0).then_some(req.seed);

    let worker_state = Arc::clone(&state);
    let worker_path = path.clone();
    let (count, seed_used, distribution) = tokio::task::spawn_blocking(move || {
        let dataset = DatasetAssembler::new(&worker_state.bank)
            .with_max_records(worker_state.config.max_dataset_size)
            .assemble(size, &weights, seed)?;
        let count = export::write_jsonl(&worker_path, &dataset.records)?;
        Ok::<_, ApiError>((count, dataset.seed_used, dataset.distribution_by_name()))
    })
    .await
    .map_err(|e| ApiError::Internal(format!("generation task failed: {}", e)))??;

    Ok(Json(GenerateResponse {
        success: true,
        samples_generated: count,
        filename,
        path: path.display().to_string(),
        seed_used,
        distribution,
    }))
}

/// GET /api/datasets - List dataset files, newest first
pub async fn list_datasets(State(state): State<Arc<AppState>>) -> ApiResult<Json<DatasetsResponse>> {
    let datasets = export::list_datasets(&state.config.datasets_dir)?;
    Ok(Json(DatasetsResponse { datasets }))
}

/// GET /api/datasets/{filename} - Download one dataset file
pub async fn download_dataset(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> ApiResult<Response> {
    let name = export::sanitize_filename(&filename)?;
    let path = state.config.datasets_dir.join(&name);

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::NotFound("Dataset not found".to_string()))
        }
        Err(e) => return Err(ApiError::Internal(e.to_string())),
    };

    let headers = [
        (header::CONTENT_TYPE, "application/x-ndjson".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", name),
        ),
    ];
    Ok((headers, bytes).into_response())
}

/// POST /api/validate - Validate an uploaded JSONL file
///
/// Accepts a multipart form with a `file` field, or the file as the raw body.
pub async fn validate_dataset(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> ApiResult<Json<ValidationReport>> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    let body = if is_multipart {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        read_file_field(multipart).await?
    } else {
        Bytes::from_request(request, &state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?
    };

    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::BadRequest("No file provided".to_string()));
    }

    let report = validation::validate_reader(body.as_ref(), state.config.max_reported_errors)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(report))
}

async fn read_file_field(mut multipart: Multipart) -> ApiResult<Bytes> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        if field.name() == Some("file") {
            return field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()));
        }
    }
    Err(ApiError::BadRequest("No file provided".to_string()))
}
