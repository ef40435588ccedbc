//! Image encoding: file or bytes → base64 [`ImagePayload`].
//!
//! Vision-model APIs accept images as base64 data embedded in the JSON
//! request body, tagged with a MIME type. The MIME type is sniffed from the
//! actual bytes (magic numbers) rather than trusted from the file name — a
//! `.jpg` that is really a PNG would otherwise be mislabelled on the wire.
//! The declared type (file extension, or a caller-supplied string for the
//! byte API) is only a fallback for formats the sniffer does not recognise.
//!
//! Size and format guidance is advisory: an oversized or unusual image is
//! logged and sent anyway, and the remote endpoint is the final arbiter.

use crate::error::TranscribeError;
use crate::payload::ImagePayload;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;
use tracing::{debug, warn};

/// Advisory upload ceiling, matching the UI guidance ("Max file size: 10MB").
pub const ADVISED_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// MIME types named in the upload guidance. Others are allowed, just warned.
pub const ADVISED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif"];

/// Whether `mime_type` is one of the advised raster formats.
pub fn is_advised_format(mime_type: &str) -> bool {
    ADVISED_MIME_TYPES.contains(&mime_type)
}

/// Read an image file and encode it as an [`ImagePayload`].
///
/// The MIME type comes from the byte content when recognisable, otherwise
/// from the file extension. A read failure is surfaced as
/// [`TranscribeError::ImageReadFailed`] rather than swallowed.
pub async fn encode_image_file(path: impl AsRef<Path>) -> Result<ImagePayload, TranscribeError> {
    let path = path.as_ref();
    let bytes =
        tokio::fs::read(path)
            .await
            .map_err(|source| TranscribeError::ImageReadFailed {
                path: path.to_path_buf(),
                source,
            })?;

    let declared = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(image::ImageFormat::from_extension)
        .map(|format| format.to_mime_type());

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());

    Ok(encode_image_bytes(&bytes, declared, file_name))
}

/// Encode raw image bytes as an [`ImagePayload`].
///
/// `declared_mime` is used only when the bytes are not a recognisable image
/// format; with neither, the payload is tagged `application/octet-stream`
/// and left for the remote endpoint to reject.
pub fn encode_image_bytes(
    bytes: &[u8],
    declared_mime: Option<&str>,
    file_name: impl Into<String>,
) -> ImagePayload {
    let file_name = file_name.into();

    let mime_type = match image::guess_format(bytes) {
        Ok(format) => format.to_mime_type().to_string(),
        Err(_) => declared_mime.unwrap_or("application/octet-stream").to_string(),
    };

    if bytes.len() as u64 > ADVISED_MAX_BYTES {
        warn!(
            "Image '{}' is {} bytes, above the advised {} byte ceiling; sending anyway",
            file_name,
            bytes.len(),
            ADVISED_MAX_BYTES
        );
    }
    if !is_advised_format(&mime_type) {
        warn!(
            "Image '{}' has unusual MIME type '{}'; sending anyway",
            file_name, mime_type
        );
    }

    let data = STANDARD.encode(bytes);
    debug!(
        "Encoded '{}' ({}) → {} bytes base64",
        file_name,
        mime_type,
        data.len()
    );

    ImagePayload::new(data, mime_type, file_name)
}
