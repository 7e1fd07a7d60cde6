//! Client-side preview of a picked image for `image-view` fields.
//!
//! Encoding runs on the blocking pool so a large image never stalls the
//! task rendering the other fields.
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("content type `{0}` is not an image")]
    NotAnImage(String),
    #[error("image is empty")]
    Empty,
    #[error("preview worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// A displayable `data:` URL for a picked image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePreview {
    pub data_url: String,
}

impl ImagePreview {
    pub fn from_data_url(data_url: impl Into<String>) -> Self {
        Self {
            data_url: data_url.into(),
        }
    }
}

/// Decode `bytes` into a preview without blocking the calling task.
pub async fn decode_preview(bytes: Vec<u8>, content_type: &str) -> Result<ImagePreview, PreviewError> {
    let mime = content_type.trim().to_ascii_lowercase();
    if !mime.starts_with("image/") {
        return Err(PreviewError::NotAnImage(content_type.to_string()));
    }
    if bytes.is_empty() {
        return Err(PreviewError::Empty);
    }

    let len = bytes.len();
    let data_url = tokio::task::spawn_blocking(move || {
        format!("data:{mime};base64,{}", STANDARD.encode(&bytes))
    })
    .await?;
    tracing::debug!(bytes = len, "image preview decoded");

    Ok(ImagePreview { data_url })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn encodes_data_url() {
        let preview = decode_preview(vec![0x89, b'P', b'N', b'G'], "image/png").await.unwrap();
        assert_eq!(preview.data_url, "data:image/png;base64,iVBORw==");
    }

    #[tokio::test]
    async fn rejects_non_image() {
        let err = decode_preview(b"%PDF".to_vec(), "application/pdf").await.unwrap_err();
        assert!(matches!(err, PreviewError::NotAnImage(_)));
    }

    #[tokio::test]
    async fn rejects_empty_blob() {
        let err = decode_preview(Vec::new(), "image/jpeg").await.unwrap_err();
        assert!(matches!(err, PreviewError::Empty));
    }
}
