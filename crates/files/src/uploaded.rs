//! Encoded attachment payload and its metadata.

use crate::constants::FALLBACK_MIME_TYPE;
use crate::{AttachmentError, AttachmentResult};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use tourdesk_types::NonEmptyText;

/// An attachment ready to travel inside the booking payload.
///
/// Serialises as `{filename, size, type, data}` where `data` is the standard base64 encoding
/// of the raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub filename: String,
    /// Size of the raw (unencoded) content in bytes
    pub size: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub data: String,
}

/// The part of an attachment that survives a draft save. Never carries content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub filename: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl UploadedFile {
    /// Encodes raw bytes into a transport-safe attachment.
    ///
    /// The MIME type comes from the extension table when the extension is known, otherwise from
    /// content sniffing, otherwise `application/octet-stream`.
    ///
    /// # Errors
    ///
    /// Returns `AttachmentError::MissingFilename` if `filename` is blank.
    pub fn encode(filename: &str, bytes: &[u8]) -> AttachmentResult<Self> {
        let filename =
            NonEmptyText::new(filename).map_err(|_| AttachmentError::MissingFilename)?;
        let mime_type = detect_mime_type(filename.as_str(), bytes);

        Ok(Self {
            filename: filename.into_inner(),
            size: bytes.len() as u64,
            mime_type,
            data: STANDARD.encode(bytes),
        })
    }

    /// Decodes `data` back into raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(self.data.as_bytes())
    }

    pub fn metadata(&self) -> FileMetadata {
        FileMetadata {
            filename: self.filename.clone(),
            size: self.size,
            mime_type: self.mime_type.clone(),
        }
    }
}

fn mime_type_for_extension(filename: &str) -> Option<&'static str> {
    let (_, ext) = filename.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "pdf" => Some("application/pdf"),
        "doc" => Some("application/msword"),
        "docx" => {
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
        }
        "xlsx" => Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        "md" => Some("text/markdown"),
        _ => None,
    }
}

pub(crate) fn detect_mime_type(filename: &str, bytes: &[u8]) -> String {
    if let Some(mime) = mime_type_for_extension(filename) {
        return mime.to_string();
    }

    infer::get(bytes)
        .map(|kind| kind.mime_type().to_string())
        .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_string())
}
