use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, HeaderName};
use axum::response::{IntoResponse, Json, Response};
use log::debug;

use super::error::ApiError;
use crate::data::encode::{encode_f64_le, encode_rows};
use crate::data::model::{Dataset, DatasetSummary};
use crate::data::registry::Registry;
use crate::state::AppState;

const OCTET_STREAM: &str = "application/octet-stream";

/// Shape headers on whole-matrix payloads.
pub const SPECTRUM_COUNT_HEADER: HeaderName = HeaderName::from_static("x-spectrum-count");
pub const AXIS_LENGTH_HEADER: HeaderName = HeaderName::from_static("x-axis-length");

// ---------------------------------------------------------------------------
// Path resolution
// ---------------------------------------------------------------------------

/// Look up a dataset by identifier.
pub fn resolve_dataset<'a>(registry: &'a Registry, dataid: &str) -> Result<&'a Dataset, ApiError> {
    if dataid.is_empty() {
        return Err(ApiError::MissingDatasetId);
    }
    registry
        .get(dataid)
        .ok_or_else(|| ApiError::DatasetNotFound(dataid.to_string()))
}

/// Parse a spectrum index and bounds-check it against `dataset`.
pub fn resolve_spectrum<'a>(dataset: &'a Dataset, spectrumid: &str) -> Result<&'a [f64], ApiError> {
    if spectrumid.is_empty() {
        return Err(ApiError::MissingSpectrumId);
    }
    let index: usize = spectrumid
        .parse()
        .map_err(|_| ApiError::InvalidSpectrumId(spectrumid.to_string()))?;

    dataset
        .spectrum(index)
        .ok_or_else(|| ApiError::SpectrumOutOfRange {
            dataset: dataset.name().to_string(),
            index,
            count: dataset.spectrum_count(),
        })
}

fn octet_stream(bytes: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, OCTET_STREAM)], bytes).into_response()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /data
pub async fn list_datasets(State(state): State<Arc<AppState>>) -> Json<Vec<DatasetSummary>> {
    Json(state.registry.summaries())
}

/// GET /data/{dataid}/data – every spectrum, concatenated row-major.
pub async fn get_dataset(
    State(state): State<Arc<AppState>>,
    Path(dataid): Path<String>,
) -> Result<Response, ApiError> {
    let dataset = resolve_dataset(&state.registry, &dataid)?;
    let bytes = encode_rows(dataset.spectra());
    debug!("Serving {dataid}: {} bytes", bytes.len());

    Ok((
        [
            (header::CONTENT_TYPE, OCTET_STREAM.to_string()),
            (SPECTRUM_COUNT_HEADER, dataset.spectrum_count().to_string()),
            (AXIS_LENGTH_HEADER, dataset.axis().len().to_string()),
        ],
        bytes,
    )
        .into_response())
}

/// GET /data/{dataid}/axis
pub async fn get_axis(
    State(state): State<Arc<AppState>>,
    Path(dataid): Path<String>,
) -> Result<Response, ApiError> {
    let dataset = resolve_dataset(&state.registry, &dataid)?;
    Ok(octet_stream(encode_f64_le(dataset.axis())))
}

/// GET /data/{dataid}/{spectrumid}/data
pub async fn get_spectrum(
    State(state): State<Arc<AppState>>,
    Path((dataid, spectrumid)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let dataset = resolve_dataset(&state.registry, &dataid)?;
    let spectrum = resolve_spectrum(dataset, &spectrumid)?;
    debug!("Serving {dataid}[{spectrumid}]");
    Ok(octet_stream(encode_f64_le(spectrum)))
}
