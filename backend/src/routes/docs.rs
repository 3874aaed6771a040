//! OpenAPI document and Scalar viewer, mounted outside production

use aide::{axum::ApiRouter, openapi::OpenApi, scalar::Scalar};
use axum::{routing::get, Extension, Json};

use crate::types::Environment;

const OPENAPI_PATH: &str = "/openapi.json";

/// Routes serving the API description, empty when `environment` hides the docs
pub fn handler(environment: Environment) -> ApiRouter {
    if !environment.show_api_docs() {
        return ApiRouter::new();
    }

    ApiRouter::new()
        .route(
            "/docs",
            Scalar::new(OPENAPI_PATH)
                .with_title("Tubely API Docs")
                .axum_route(),
        )
        .route(OPENAPI_PATH, get(openapi_document))
}

#[allow(clippy::unused_async)]
async fn openapi_document(Extension(openapi): Extension<OpenApi>) -> Json<OpenApi> {
    Json(openapi)
}
