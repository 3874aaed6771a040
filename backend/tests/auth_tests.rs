mod common;

use common::*;

use chrono::Utc;
use http::StatusCode;
use jsonwebtoken::{encode, EncodingKey, Header};
use tubely::{
    jwt::{JwtManager, TubelyClaims, TOKEN_ISSUER},
    types::Environment,
};
use uuid::Uuid;

fn signed_token(secret: &str, claims: &TubelyClaims) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

fn claims_for(user_id: Uuid, expires_in_secs: i64) -> TubelyClaims {
    let now = Utc::now().timestamp();
    TubelyClaims {
        iss: TOKEN_ISSUER.to_string(),
        sub: user_id.to_string(),
        iat: now,
        exp: now + expires_in_secs,
    }
}

async fn assert_unauthorized(setup: &TestSetup, token: Option<&str>, message: &str) {
    let owner = Uuid::new_v4();
    let video = setup.seed_video(owner);

    for route in [thumbnail_route(video.id), video_route(video.id)] {
        let response = setup
            .send_upload(
                &route,
                token,
                FormPart::new("thumbnail", "image/png", b"png bytes"),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{route}");
        let body = parse_response_body(response).await;
        assert_eq!(body["error"], message, "{route}");
    }

    assert!(setup.asset_files().is_empty());
    assert!(setup.object_store.objects().is_empty());
}

// Token tests

#[tokio::test]
async fn test_missing_token() {
    let setup = TestSetup::new().await;
    assert_unauthorized(&setup, None, "Couldn't find JWT").await;
}

#[tokio::test]
async fn test_garbage_token() {
    let setup = TestSetup::new().await;
    assert_unauthorized(&setup, Some("not-a-jwt"), "Couldn't validate JWT").await;
}

#[tokio::test]
async fn test_expired_token() {
    let setup = TestSetup::new().await;
    let token = signed_token(TEST_JWT_SECRET, &claims_for(Uuid::new_v4(), -3600));
    assert_unauthorized(&setup, Some(&token), "Couldn't validate JWT").await;
}

#[tokio::test]
async fn test_token_signed_with_other_secret() {
    let setup = TestSetup::new().await;
    let token = JwtManager::new("some-other-secret")
        .issue_token(Uuid::new_v4(), std::time::Duration::from_secs(3600))
        .unwrap();
    assert_unauthorized(&setup, Some(&token), "Couldn't validate JWT").await;
}

#[tokio::test]
async fn test_token_with_foreign_issuer() {
    let setup = TestSetup::new().await;
    let mut claims = claims_for(Uuid::new_v4(), 3600);
    claims.iss = "someone-else".to_string();
    let token = signed_token(TEST_JWT_SECRET, &claims);
    assert_unauthorized(&setup, Some(&token), "Couldn't validate JWT").await;
}

#[tokio::test]
async fn test_non_bearer_scheme() {
    let setup = TestSetup::new().await;
    let owner = Uuid::new_v4();
    let video = setup.seed_video(owner);
    let token = setup.token_for(owner);

    let request = axum::http::Request::builder()
        .uri(thumbnail_route(video.id))
        .method("POST")
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header("Authorization", format!("Basic {token}"))
        .body(axum::body::Body::from(multipart_body(&[FormPart::new(
            "thumbnail",
            "image/png",
            b"png bytes",
        )])))
        .unwrap();
    let response = tower::ServiceExt::oneshot(setup.router.clone(), request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "Couldn't find JWT");
}

// Path tests

#[tokio::test]
async fn test_invalid_video_id_precedes_auth() {
    let setup = TestSetup::new().await;

    for route in ["/api/thumbnail_upload/not-a-uuid", "/api/video_upload/123"] {
        let response = setup
            .send_upload(
                route,
                None,
                FormPart::new("thumbnail", "image/png", b"png bytes"),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{route}");
        let body = parse_response_body(response).await;
        assert_eq!(body["error"], "Invalid ID", "{route}");
    }
}

// Service routes

#[tokio::test]
async fn test_health() {
    let setup = TestSetup::new().await;

    let response = setup.send_get_request("/health").await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["semver"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_openapi_document_lists_upload_routes() {
    let setup = TestSetup::new().await;

    let response = setup.send_get_request("/openapi.json").await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    let paths = body["paths"].as_object().unwrap();
    assert!(paths.contains_key("/api/thumbnail_upload/{video_id}"));
    assert!(paths.contains_key("/api/video_upload/{video_id}"));
}

#[tokio::test]
async fn test_api_docs_hidden_in_production() {
    let setup = TestSetup::with_options(TestOptions {
        environment: Environment::Production,
        ..TestOptions::default()
    })
    .await;

    for route in ["/docs", "/openapi.json"] {
        let response = setup.send_get_request(route).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{route}");
    }

    let response = setup.send_get_request("/health").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_api_docs_served_in_staging() {
    let setup = TestSetup::with_options(TestOptions {
        environment: Environment::Staging,
        ..TestOptions::default()
    })
    .await;

    for route in ["/docs", "/openapi.json"] {
        let response = setup.send_get_request(route).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{route}");
    }
}
