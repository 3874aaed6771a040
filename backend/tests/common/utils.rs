use axum::response::Response;
use http_body_util::BodyExt;
use rand::RngCore;

/// Boundary used by every hand-built multipart body
pub const BOUNDARY: &str = "tubely-test-boundary";

/// One part of a multipart form
pub struct FormPart<'a> {
    pub name: &'a str,
    pub content_type: &'a str,
    pub data: &'a [u8],
}

impl<'a> FormPart<'a> {
    pub const fn new(name: &'a str, content_type: &'a str, data: &'a [u8]) -> Self {
        Self {
            name,
            content_type,
            data,
        }
    }
}

/// Builds a `multipart/form-data` body delimited by `BOUNDARY`
pub fn multipart_body(parts: &[FormPart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"upload\"\r\nContent-Type: {}\r\n\r\n",
                part.name, part.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Random payload of `size` bytes
pub fn random_bytes(size: usize) -> Vec<u8> {
    let mut buf = vec![0u8; size];
    rand::rngs::OsRng.fill_bytes(&mut buf);
    buf
}

/// Parse response body to JSON
pub async fn parse_response_body(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Asserts `name` is a freshly minted asset name with the given extension
pub fn assert_asset_name(name: &str, extension: &str) {
    let (id, ext) = name
        .split_once('.')
        .unwrap_or_else(|| panic!("asset name without extension: {name}"));
    assert_eq!(ext, extension, "extension of {name}");
    assert_eq!(id.len(), 43, "id length of {name}");
    assert!(
        id.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
        "id alphabet of {name}"
    );
}
