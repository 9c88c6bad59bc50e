// src/api/handlers/dog.rs
use actix_web::{web, HttpResponse, ResponseError};

use crate::api::AppState;
use crate::errors::DogError;
use crate::models::{DogImageResult, ErrorResult};
use crate::proxy;

/// Proxies one random dog image. Internal error detail is logged, never returned.
pub async fn get_dog_image(state: web::Data<AppState>) -> Result<web::Json<DogImageResult>, ErrorResult> {
    match proxy::fetch_dog_image(state.upstream.as_ref(), &state.config.upstream).await {
        Ok(image) => Ok(web::Json(image.into())),
        Err(e) => {
            match &e {
                DogError::Fetch { attempts, source } => {
                    log::error!("dog image fetch failed after {} attempt(s): {}", attempts, source);
                }
                DogError::UpstreamStatus { status, body } => {
                    log::error!("dog API returned status {}: {}", status, body);
                }
                DogError::Rejected(rejection) => {
                    log::error!("dog API payload failed {} validation: {}", rejection.kind(), rejection);
                }
            }
            Err(ErrorResult::fetch_failed())
        }
    }
}

pub async fn api_not_found() -> HttpResponse {
    ErrorResult::not_found().error_response()
}
