use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use error_stack::Report;
use serde::Serialize;
use std::error::Error;

/// Returned from a handler when the layer below it failed. The full report is kept
/// so `#[instrument(err(Debug))]` logs every attached frame, while the client only
/// ever sees a 500.
#[derive(thiserror::Error)]
#[error("there was an error running the endpoint")]
pub struct EndpointError<T: Error>(Report<T>);

impl<T: Error> EndpointError<T> {
    pub fn report(&self) -> &Report<T> {
        &self.0
    }
}

impl<T: Error> std::fmt::Debug for EndpointError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl<T> From<Report<T>> for EndpointError<T>
where
    T: Error,
{
    fn from(value: Report<T>) -> Self {
        Self(value)
    }
}

#[derive(Serialize)]
struct InternalErrorBody {
    message: &'static str,
}

impl<T: Error> IntoResponse for EndpointError<T> {
    fn into_response(self) -> axum::response::Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(InternalErrorBody {
                message: "the request could not be completed",
            }),
        )
            .into_response()
    }
}
