//! Caller-side upload validation
//!
//! The relay deliberately does not inspect image bytes. Whoever accepts the
//! raw upload runs it through [`ImageUpload::validate`] first: JPEG or PNG
//! only, at most 10 MiB, and the declared type must agree with the file's
//! leading bytes.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

use crate::config::settings::DEFAULT_MAX_IMAGE_BYTES;
use crate::services::relay::{AnalysisRequest, ImageMime};

const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Upload rejection reasons
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("Formato inválido: selecione uma imagem JPEG ou PNG")]
    UnsupportedType(String),

    #[error("O conteúdo do arquivo não corresponde ao tipo {declared}")]
    ContentMismatch { declared: ImageMime },

    #[error("Arquivo vazio")]
    Empty,

    #[error("Arquivo maior que o limite de {limit} bytes")]
    TooLarge { size: usize, limit: usize },
}

/// A validated image upload
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: ImageMime,
    bytes: Vec<u8>,
}

impl ImageUpload {
    /// Validate with the default 10 MiB ceiling
    pub fn validate(
        file_name: impl Into<String>,
        declared_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Self, UploadError> {
        Self::validate_with_limit(file_name, declared_type, bytes, DEFAULT_MAX_IMAGE_BYTES)
    }

    pub fn validate_with_limit(
        file_name: impl Into<String>,
        declared_type: &str,
        bytes: Vec<u8>,
        limit: usize,
    ) -> Result<Self, UploadError> {
        let mime_type: ImageMime = declared_type
            .parse()
            .map_err(|_| UploadError::UnsupportedType(declared_type.to_string()))?;

        if bytes.is_empty() {
            return Err(UploadError::Empty);
        }
        if bytes.len() > limit {
            return Err(UploadError::TooLarge {
                size: bytes.len(),
                limit,
            });
        }

        match sniff(&bytes) {
            Some(actual) if actual == mime_type => {}
            _ => return Err(UploadError::ContentMismatch { declared: mime_type }),
        }

        Ok(Self {
            file_name: file_name.into(),
            mime_type,
            bytes,
        })
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Base64 form sent to the relay
    pub fn encode(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    pub fn into_analysis_request(self) -> AnalysisRequest {
        AnalysisRequest::new(self.encode(), self.mime_type)
    }
}

/// Detect JPEG/PNG from leading bytes
pub fn sniff(bytes: &[u8]) -> Option<ImageMime> {
    if bytes.starts_with(JPEG_MAGIC) {
        Some(ImageMime::Jpeg)
    } else if bytes.starts_with(PNG_MAGIC) {
        Some(ImageMime::Png)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpeg_bytes() -> Vec<u8> {
        let mut bytes = JPEG_MAGIC.to_vec();
        bytes.extend_from_slice(&[0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F']);
        bytes
    }

    fn png_bytes() -> Vec<u8> {
        let mut bytes = PNG_MAGIC.to_vec();
        bytes.extend_from_slice(b"\0\0\0\rIHDR");
        bytes
    }

    #[test]
    fn test_accepts_jpeg_and_png() {
        let jpeg = ImageUpload::validate("torax.jpg", "image/jpeg", jpeg_bytes()).unwrap();
        assert_eq!(jpeg.mime_type, ImageMime::Jpeg);

        let png = ImageUpload::validate("torax.png", "image/png", png_bytes()).unwrap();
        assert_eq!(png.mime_type, ImageMime::Png);
        assert_eq!(png.file_name, "torax.png");
    }

    #[test]
    fn test_rejects_other_types() {
        let err = ImageUpload::validate("scan.gif", "image/gif", b"GIF89a".to_vec()).unwrap_err();
        assert_eq!(err, UploadError::UnsupportedType("image/gif".to_string()));
    }

    #[test]
    fn test_rejects_mismatched_content() {
        let err = ImageUpload::validate("torax.png", "image/png", jpeg_bytes()).unwrap_err();
        assert_eq!(err, UploadError::ContentMismatch { declared: ImageMime::Png });
    }

    #[test]
    fn test_rejects_empty_and_oversize() {
        assert_eq!(
            ImageUpload::validate("x.jpg", "image/jpeg", Vec::new()).unwrap_err(),
            UploadError::Empty
        );

        let mut big = jpeg_bytes();
        big.resize(DEFAULT_MAX_IMAGE_BYTES + 1, 0);
        assert!(matches!(
            ImageUpload::validate("x.jpg", "image/jpeg", big).unwrap_err(),
            UploadError::TooLarge { limit: DEFAULT_MAX_IMAGE_BYTES, .. }
        ));
    }

    #[test]
    fn test_exact_limit_is_accepted() {
        let mut bytes = jpeg_bytes();
        bytes.resize(64, 0);
        assert!(ImageUpload::validate_with_limit("x.jpg", "image/jpeg", bytes, 64).is_ok());
    }

    #[test]
    fn test_into_analysis_request_encodes_base64() {
        let upload = ImageUpload::validate("t.png", "image/png", png_bytes()).unwrap();
        let expected = STANDARD.encode(png_bytes());

        let request = upload.into_analysis_request();
        assert_eq!(request.image_base64.as_deref(), Some(expected.as_str()));
        assert_eq!(request.mime_type, ImageMime::Png);
    }
}
