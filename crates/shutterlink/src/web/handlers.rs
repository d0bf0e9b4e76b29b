//! HTTP request handlers
//!
//! Thin wrappers around [`ImageShareService`]: extract the multipart file
//! field or path id, call the service, and map the outcome to a response.
//! The image route answers with small human-readable pages on 404/410
//! because its audience is a person who just scanned a QR code, not an API
//! client.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use tracing::error;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{HealthResponse, PreviewResponse, UploadResponse};
use crate::web::AppState;
use crate::web::responses::{error_response, handle_error};

// Both pages link back to `/`: the upload frontend, which deployments mount
// in front of this service. The API itself defines no root route.
const NOT_FOUND_PAGE: &str = r#"<html>
    <body style="font-family: Arial, sans-serif; text-align: center; padding: 50px;">
        <h1>&#10060; Image Not Found</h1>
        <p>The image has expired or was not found.</p>
        <p>Images are available for 24 hours after upload.</p>
        <a href="/" style="color: #007bff; text-decoration: none;">&larr; Back to Upload</a>
    </body>
</html>"#;

const EXPIRED_PAGE: &str = r#"<html>
    <body style="font-family: Arial, sans-serif; text-align: center; padding: 50px;">
        <h1>&#9200; Image Expired</h1>
        <p>This image has expired after 24 hours.</p>
        <a href="/" style="color: #007bff; text-decoration: none;">&larr; Upload a New Image</a>
    </body>
</html>"#;

/// Handle image upload and QR code generation
///
/// `POST /api/upload`, multipart field `file`.
pub async fn upload_image(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let (filename, content) = match read_file_field(&mut multipart).await {
        Ok(found) => found,
        Err(response) => return response,
    };

    match state.image_service.ingest(&filename, &content).await {
        Ok(receipt) => Json(UploadResponse {
            success: true,
            message: "Image uploaded successfully!".to_string(),
            qr_code: receipt.qr_data_uri,
            image_url: receipt.public_url,
            image_id: receipt.id,
            expires_at: receipt.expires_at,
        })
        .into_response(),
        Err(e) => handle_error(e),
    }
}

/// Serve an uploaded image by id
///
/// `GET /image/{id}`. A malformed id was never issued by us, so it gets the
/// not-found page rather than a 400.
pub async fn serve_image(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Ok(id) = Uuid::parse_str(&id) else {
        return (StatusCode::NOT_FOUND, Html(NOT_FOUND_PAGE)).into_response();
    };

    match state.image_service.resolve(id).await {
        Ok(image) => {
            let mut headers = HeaderMap::new();
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static(image.content_type),
            );
            (headers, image.content).into_response()
        }
        Err(AppError::NotFound { .. }) => {
            (StatusCode::NOT_FOUND, Html(NOT_FOUND_PAGE)).into_response()
        }
        Err(AppError::Expired { .. }) => (StatusCode::GONE, Html(EXPIRED_PAGE)).into_response(),
        Err(e) => {
            error!("Failed to serve image {}: {}", id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

/// Return a validated upload as an inline data URI without storing it
///
/// `POST /api/preview`, multipart field `file`.
pub async fn preview_image(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let (filename, content) = match read_file_field(&mut multipart).await {
        Ok(found) => found,
        Err(response) => return response,
    };

    match state.image_service.preview(&filename, &content).await {
        Ok(receipt) => Json(PreviewResponse {
            success: true,
            preview: receipt.data_uri,
        })
        .into_response(),
        Err(e) => handle_error(e),
    }
}

/// Health check endpoint for deployment services
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse::healthy())
}

/// Pull the `file` field out of a multipart body.
///
/// An absent field is rejected here with "No file provided."; an empty
/// filename is left for the validator, which reports "No file selected.".
/// A body axum cannot parse gets a plain 400.
async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Vec<u8>), Response> {
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content = field.bytes().await.map_err(|e| {
                    error_response(StatusCode::BAD_REQUEST, format!("Malformed upload: {e}"))
                })?;
                return Ok((filename, content.to_vec()));
            }
            // Ignore other fields
            Ok(Some(_)) => {}
            Ok(None) => {
                return Err(error_response(StatusCode::BAD_REQUEST, "No file provided."));
            }
            Err(e) => {
                return Err(error_response(
                    StatusCode::BAD_REQUEST,
                    format!("Malformed upload: {e}"),
                ));
            }
        }
    }
}
