//! End-to-end tests for the upload/resolve flow
//!
//! These drive the real router through `axum_test::TestServer`: multipart
//! uploads in, QR data URIs and image bytes out. The QR codes in upload
//! responses are decoded with `rqrr` to prove they point at the served URL.

use axum_test::TestServer;
use axum_test::multipart::{MultipartForm, Part};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use tempfile::TempDir;

use shutterlink::config::{Config, StorageConfig, UploadConfig, WebConfig};
use shutterlink::models::{HealthResponse, PreviewResponse, UploadResponse};
use shutterlink::services::ImageShareService;
use shutterlink::web::{AppState, ErrorResponse, create_router};

const BASE_URL: &str = "http://localhost:8080";

fn test_config(dir: &TempDir, retention: &str) -> Config {
    Config {
        web: WebConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            base_url: BASE_URL.to_string(),
        },
        storage: StorageConfig {
            upload_path: dir.path().to_path_buf(),
            retention: retention.to_string(),
            sweep_interval: None,
        },
        uploads: UploadConfig {
            max_file_size_mb: 10,
        },
    }
}

fn test_server(dir: &TempDir, retention: &str) -> TestServer {
    let config = test_config(dir, retention);
    let image_service = ImageShareService::from_config(&config).unwrap();
    let router = create_router(
        AppState { image_service },
        config.uploads.max_file_size_bytes(),
    );
    TestServer::new(router).unwrap()
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::new(width, height);
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

fn upload_form(file_name: &str, content: Vec<u8>, mime: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(content).file_name(file_name).mime_type(mime),
    )
}

fn decode_qr_data_uri(data_uri: &str) -> String {
    let payload = data_uri
        .strip_prefix("data:image/png;base64,")
        .expect("QR code should be a PNG data URI");
    let png = STANDARD.decode(payload).unwrap();

    let luma = image::load_from_memory(&png).unwrap().to_luma8();
    let (width, height) = luma.dimensions();
    let mut prepared =
        rqrr::PreparedImage::prepare_from_greyscale(width as usize, height as usize, |x, y| {
            luma.get_pixel(x as u32, y as u32).0[0]
        });
    let grids = prepared.detect_grids();
    assert_eq!(grids.len(), 1, "expected exactly one QR code in the image");
    let (_meta, content) = grids[0].decode().unwrap();
    content
}

#[tokio::test]
async fn health_endpoint_reports_healthy() {
    let dir = TempDir::new().unwrap();
    let server = test_server(&dir, "24h");

    let response = server.get("/health").await;

    assert_eq!(response.status_code().as_u16(), 200);
    assert_eq!(response.json::<HealthResponse>().status, "healthy");
}

#[tokio::test]
async fn upload_returns_receipt_and_image_is_served_back() {
    let dir = TempDir::new().unwrap();
    let server = test_server(&dir, "24h");
    let content = png_bytes(50, 50);

    let response = server
        .post("/api/upload")
        .multipart(upload_form("cat.png", content.clone(), "image/png"))
        .await;
    assert_eq!(response.status_code().as_u16(), 200);

    let body = response.json::<UploadResponse>();
    assert!(body.success);
    assert_eq!(body.message, "Image uploaded successfully!");
    assert_eq!(
        body.image_url,
        format!("{}/image/{}", BASE_URL, body.image_id)
    );
    assert_eq!(decode_qr_data_uri(&body.qr_code), body.image_url);

    let serve = server.get(&format!("/image/{}", body.image_id)).await;
    assert_eq!(serve.status_code().as_u16(), 200);
    assert_eq!(serve.header("content-type"), "image/png");
    assert_eq!(serve.as_bytes().as_ref(), content.as_slice());
}

#[tokio::test]
async fn upload_response_carries_exactly_the_documented_fields() {
    let dir = TempDir::new().unwrap();
    let server = test_server(&dir, "24h");

    let response = server
        .post("/api/upload")
        .multipart(upload_form("cat.png", png_bytes(10, 10), "image/png"))
        .await;
    assert_eq!(response.status_code().as_u16(), 200);

    let value = response.json::<serde_json::Value>();
    let body = value.as_object().unwrap();
    let mut keys: Vec<&str> = body.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        ["expires_at", "image_id", "image_url", "message", "qr_code", "success"]
    );
    assert_eq!(body["success"], serde_json::json!(true));
    // expires_at goes over the wire as an RFC 3339 UTC timestamp.
    let expires_at = body["expires_at"].as_str().unwrap();
    assert!(expires_at.parse::<chrono::DateTime<chrono::Utc>>().is_ok());
}

#[tokio::test]
async fn error_response_carries_exactly_the_documented_fields() {
    let dir = TempDir::new().unwrap();
    let server = test_server(&dir, "24h");

    let response = server
        .post("/api/upload")
        .multipart(upload_form("notes.txt", b"hello".to_vec(), "text/plain"))
        .await;
    assert_eq!(response.status_code().as_u16(), 400);

    let value = response.json::<serde_json::Value>();
    let body = value.as_object().unwrap();
    let mut keys: Vec<&str> = body.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, ["error", "success"]);
    assert_eq!(body["success"], serde_json::json!(false));
}

#[tokio::test]
async fn upload_without_file_field_is_rejected() {
    let dir = TempDir::new().unwrap();
    let server = test_server(&dir, "24h");

    let form = MultipartForm::new().add_text("name", "not a file");
    let response = server.post("/api/upload").multipart(form).await;

    assert_eq!(response.status_code().as_u16(), 400);
    let body = response.json::<ErrorResponse>();
    assert!(!body.success);
    assert_eq!(body.error, "No file provided.");
}

#[tokio::test]
async fn upload_with_empty_filename_is_rejected() {
    let dir = TempDir::new().unwrap();
    let server = test_server(&dir, "24h");

    let response = server
        .post("/api/upload")
        .multipart(upload_form("", png_bytes(10, 10), "image/png"))
        .await;

    assert_eq!(response.status_code().as_u16(), 400);
    let body = response.json::<ErrorResponse>();
    assert!(!body.success);
    assert_eq!(body.error, "No file selected.");
}

#[tokio::test]
async fn upload_with_disallowed_extension_is_rejected() {
    let dir = TempDir::new().unwrap();
    let server = test_server(&dir, "24h");

    let response = server
        .post("/api/upload")
        .multipart(upload_form("notes.txt", b"hello".to_vec(), "text/plain"))
        .await;

    assert_eq!(response.status_code().as_u16(), 400);
    let body = response.json::<ErrorResponse>();
    assert_eq!(body.error, "Invalid file type. Allowed: png, jpg, jpeg, gif, webp");
}

#[tokio::test]
async fn oversize_upload_is_rejected() {
    let dir = TempDir::new().unwrap();
    let server = test_server(&dir, "24h");

    let oversized = vec![0u8; 10 * 1024 * 1024 + 1];
    let response = server
        .post("/api/upload")
        .multipart(upload_form("big.png", oversized, "image/png"))
        .await;

    assert_eq!(response.status_code().as_u16(), 400);
    let body = response.json::<ErrorResponse>();
    assert_eq!(body.error, "File size exceeds 10MB limit.");
}

#[tokio::test]
async fn non_image_bytes_with_image_extension_are_rejected() {
    let dir = TempDir::new().unwrap();
    let server = test_server(&dir, "24h");

    let response = server
        .post("/api/upload")
        .multipart(upload_form(
            "fake.png",
            b"definitely not an image".to_vec(),
            "image/png",
        ))
        .await;

    assert_eq!(response.status_code().as_u16(), 400);
    let body = response.json::<ErrorResponse>();
    assert!(body.error.starts_with("Invalid image file:"));
    assert!(dir.path().read_dir().unwrap().next().is_none());
}

#[tokio::test]
async fn unknown_image_id_gets_the_not_found_page() {
    let dir = TempDir::new().unwrap();
    let server = test_server(&dir, "24h");

    let response = server
        .get("/image/4c0f7a7a-9e2b-4af1-8a41-0a2f2c9d71bb")
        .await;

    assert_eq!(response.status_code().as_u16(), 404);
    assert!(response.text().contains("Image Not Found"));
}

#[tokio::test]
async fn malformed_image_id_gets_the_not_found_page() {
    let dir = TempDir::new().unwrap();
    let server = test_server(&dir, "24h");

    let response = server.get("/image/not-a-uuid").await;

    assert_eq!(response.status_code().as_u16(), 404);
    assert!(response.text().contains("Image Not Found"));
}

#[tokio::test]
async fn expired_image_is_gone_once_then_not_found() {
    let dir = TempDir::new().unwrap();
    let server = test_server(&dir, "50ms");

    let body = server
        .post("/api/upload")
        .multipart(upload_form("cat.png", png_bytes(10, 10), "image/png"))
        .await
        .json::<UploadResponse>();
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    let first = server.get(&format!("/image/{}", body.image_id)).await;
    assert_eq!(first.status_code().as_u16(), 410);
    assert!(first.text().contains("Image Expired"));

    let second = server.get(&format!("/image/{}", body.image_id)).await;
    assert_eq!(second.status_code().as_u16(), 404);

    // The blob was evicted along with the record.
    assert!(dir.path().read_dir().unwrap().next().is_none());
}

#[tokio::test]
async fn preview_round_trips_bytes_without_storing_them() {
    let dir = TempDir::new().unwrap();
    let server = test_server(&dir, "24h");
    let content = png_bytes(10, 10);

    let response = server
        .post("/api/preview")
        .multipart(upload_form("cat.png", content.clone(), "image/png"))
        .await;
    assert_eq!(response.status_code().as_u16(), 200);

    let body = response.json::<PreviewResponse>();
    assert!(body.success);
    let payload = body.preview.strip_prefix("data:image/png;base64,").unwrap();
    assert_eq!(STANDARD.decode(payload).unwrap(), content);
    assert!(dir.path().read_dir().unwrap().next().is_none());
}

#[tokio::test]
async fn concurrent_uploads_stay_separate() {
    let dir = TempDir::new().unwrap();
    let server = test_server(&dir, "24h");
    let small = png_bytes(10, 10);
    let large = png_bytes(20, 20);

    let (a, b) = tokio::join!(
        server
            .post("/api/upload")
            .multipart(upload_form("a.png", small.clone(), "image/png")),
        server
            .post("/api/upload")
            .multipart(upload_form("b.png", large.clone(), "image/png")),
    );
    let (a, b) = (a.json::<UploadResponse>(), b.json::<UploadResponse>());

    assert_ne!(a.image_id, b.image_id);
    let served_a = server.get(&format!("/image/{}", a.image_id)).await;
    let served_b = server.get(&format!("/image/{}", b.image_id)).await;
    assert_eq!(served_a.as_bytes().as_ref(), small.as_slice());
    assert_eq!(served_b.as_bytes().as_ref(), large.as_slice());
}
