//! Mapping from crate errors to HTTP responses.
//!
//! Input-format problems surface as 400 with a descriptive message,
//! missing data or model as 404, everything else degrades to a 500 with
//! the underlying message string.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::error::Error;

/// An HTTP-facing error carrying a status and a human-readable message.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            Error::Ingest(_) => StatusCode::BAD_REQUEST,
            Error::NoData | Error::NoModel => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %err, "request failed");
        }

        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IngestError;

    #[test]
    fn ingest_errors_map_to_bad_request() {
        let api: ApiError = Error::Ingest(IngestError::MissingFile).into();
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn no_data_maps_to_not_found() {
        let api: ApiError = Error::NoData.into();
        assert_eq!(api.status, StatusCode::NOT_FOUND);
        assert_eq!(api.message, "no data loaded");
    }

    #[test]
    fn database_errors_map_to_internal() {
        let api: ApiError = Error::Database("locked".into()).into();
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
