use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::borrow::Cow;
use utoipa::ToSchema;

/// A single resource with the status it should be returned with.
#[derive(Debug, Serialize)]
pub struct ResourceResponse<T> {
    #[serde(skip)]
    status_code: StatusCode,
    #[serde(flatten)]
    resource: T,
}

impl<T> ResourceResponse<T> {
    pub fn ok(resource: T) -> Self {
        Self {
            status_code: StatusCode::OK,
            resource,
        }
    }

    pub fn created(resource: T) -> Self {
        Self {
            status_code: StatusCode::CREATED,
            resource,
        }
    }
}

impl<T: Serialize> IntoResponse for ResourceResponse<T> {
    fn into_response(self) -> Response {
        (self.status_code, Json(self)).into_response()
    }
}

pub type ErrorMessageType = Cow<'static, str>;

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiError {
    #[serde(skip)]
    status_code: StatusCode,
    message: Cow<'static, str>,
}

impl ApiError {
    pub fn video_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "the requested video does not exist")
    }

    pub fn asset_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "the requested asset does not exist")
    }

    pub fn owning_video_not_found() -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "the video the asset should belong to does not exist",
        )
    }

    pub fn unprocessable_entity(message: impl Into<ErrorMessageType>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn new(status_code: StatusCode, message: impl Into<ErrorMessageType>) -> Self {
        Self {
            status_code,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code, Json(self)).into_response()
    }
}
