// src/models.rs
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};

use crate::validator::DogImage;

/// Message returned for every failed dog image request.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch image";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthMarker {
    Ok,
}

/// Body of `GET /api/health`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: HealthMarker,
}

impl HealthStatus {
    pub fn ok() -> Self {
        Self { status: HealthMarker::Ok }
    }
}

/// Body of a successful `GET /api/dog`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DogImageResult {
    pub image_url: String,
}

impl From<DogImage> for DogImageResult {
    fn from(image: DogImage) -> Self {
        Self {
            image_url: image.url,
        }
    }
}

/// Body of every failed API request.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{error}")]
pub struct ErrorResult {
    pub error: String,
    #[serde(skip)]
    status: u16,
}

impl ErrorResult {
    /// The generic upstream failure, answered with 500.
    pub fn fetch_failed() -> Self {
        Self {
            error: FETCH_FAILED_MESSAGE.to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
        }
    }

    pub fn not_found() -> Self {
        Self {
            error: "Not found".to_string(),
            status: StatusCode::NOT_FOUND.as_u16(),
        }
    }
}

impl ResponseError for ErrorResult {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}
