use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Request-time failures. None of these stop the server; each becomes a
/// plain-text error response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Dataset ID not specified")]
    MissingDatasetId,

    #[error("Spectrum ID not specified")]
    MissingSpectrumId,

    #[error("Dataset with ID {0} not found")]
    DatasetNotFound(String),

    #[error("Dataset with spectrum ID {0} not found")]
    InvalidSpectrumId(String),

    #[error("Spectrum {index} out of range, dataset {dataset} has {count} spectra")]
    SpectrumOutOfRange {
        dataset: String,
        index: usize,
        count: usize,
    },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingDatasetId | ApiError::MissingSpectrumId => StatusCode::BAD_REQUEST,
            ApiError::DatasetNotFound(_)
            | ApiError::InvalidSpectrumId(_)
            | ApiError::SpectrumOutOfRange { .. } => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        log::debug!("{self}");
        (self.status(), self.to_string()).into_response()
    }
}
