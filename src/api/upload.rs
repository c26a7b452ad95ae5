//! Image upload (`POST /api/upload`), served back under `/uploads`

use axum::{extract::{Multipart, State}, http::StatusCode, Json};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::AppState;
use crate::domain::events::{CatalogEvent, DomainEvent};
use crate::{Result, TailorError};

pub const IMAGE_FIELD: &str = "image";
/// Raster formats only; uploads are served same-origin, so nothing scriptable
const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "avif"];

#[derive(Debug, Serialize)] pub struct UploadResponse { pub path: String }

pub async fn upload_image(State(s): State<AppState>, mut multipart: Multipart) -> Result<(StatusCode, Json<UploadResponse>)> {
    while let Some(field) = multipart.next_field().await.map_err(|e| TailorError::Upload(e.to_string()))? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let ext = image_extension(field.file_name(), field.content_type())
            .ok_or_else(|| TailorError::Upload("unsupported image type".into()))?;
        let bytes = field.bytes().await.map_err(|e| TailorError::Upload(e.to_string()))?;
        if bytes.is_empty() {
            return Err(TailorError::Upload("empty file".into()));
        }

        let file_name = format!("{}.{ext}", Uuid::new_v4());
        tokio::fs::create_dir_all(&s.config.upload_dir).await?;
        tokio::fs::write(s.config.upload_dir.join(&file_name), &bytes).await?;

        let path = format!("/uploads/{file_name}");
        info!(path = %path, size = bytes.len(), "image uploaded");
        s.events.publish(DomainEvent::Catalog(CatalogEvent::ImageUploaded { path: path.clone() })).await;
        return Ok((StatusCode::CREATED, Json(UploadResponse { path })));
    }
    Err(TailorError::Upload(format!("missing `{IMAGE_FIELD}` field")))
}

/// File extension first, then the declared content type
fn image_extension(file_name: Option<&str>, content_type: Option<&str>) -> Option<&'static str> {
    let from_name = file_name
        .and_then(|n| n.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .and_then(|ext| ALLOWED_EXTENSIONS.iter().copied().find(|allowed| *allowed == ext));
    from_name.or_else(|| match content_type? {
        "image/png" => Some("png"),
        "image/jpeg" => Some("jpg"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        "image/avif" => Some("avif"),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension(Some("Collar.PNG"), None), Some("png"));
        assert_eq!(image_extension(Some("notes.txt"), Some("image/jpeg")), Some("jpg"));
        assert_eq!(image_extension(Some("blob"), None), None);
        assert_eq!(image_extension(None, Some("application/pdf")), None);
        assert_eq!(image_extension(Some("logo.svg"), Some("image/svg+xml")), None);
        assert_eq!(image_extension(Some("page.html"), Some("text/html")), None);
    }
}
