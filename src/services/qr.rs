//! QR encoding for scannable pass payloads
//!
//! Payloads are serialized to JSON, rendered as a QR PNG and emitted as a
//! base64 data URL so clients can embed them directly in an <img> tag.

use base64::Engine;
use image::Luma;
use qrcode::QrCode;

use crate::{
    error::{AppError, AppResult},
    models::pass::QrPayload,
};

const DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Encode a pass payload into a PNG data URL
pub fn encode_payload(payload: &QrPayload) -> AppResult<String> {
    let json = serde_json::to_string(payload)
        .map_err(|e| AppError::Internal(format!("Failed to serialize QR payload: {}", e)))?;

    let code = QrCode::new(json.as_bytes())
        .map_err(|e| AppError::Internal(format!("Failed to encode QR code: {}", e)))?;

    let img = code
        .render::<Luma<u8>>()
        .min_dimensions(256, 256)
        .build();

    let mut png_bytes = Vec::new();
    image::DynamicImage::ImageLuma8(img)
        .write_to(
            &mut std::io::Cursor::new(&mut png_bytes),
            image::ImageOutputFormat::Png,
        )
        .map_err(|e| AppError::Internal(format!("Failed to render QR image: {}", e)))?;

    Ok(format!(
        "{}{}",
        DATA_URL_PREFIX,
        base64::engine::general_purpose::STANDARD.encode(&png_bytes)
    ))
}

/// Recover the PNG bytes from a data URL produced by [`encode_payload`]
pub fn png_bytes_from_data_url(data_url: &str) -> AppResult<Vec<u8>> {
    let encoded = data_url
        .strip_prefix(DATA_URL_PREFIX)
        .ok_or_else(|| AppError::Internal("Malformed QR data URL".to_string()))?;
    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| AppError::Internal(format!("Malformed QR data URL: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn payload() -> QrPayload {
        QrPayload {
            pass_id: Uuid::new_v4(),
            visitor_id: 42,
            visitor_name: "Ada Lovelace".to_string(),
            valid_from: Utc::now(),
            valid_to: Utc::now(),
            issued_at: Utc::now(),
        }
    }

    #[test]
    fn encodes_to_png_data_url() {
        let url = encode_payload(&payload()).unwrap();
        assert!(url.starts_with(DATA_URL_PREFIX));

        let bytes = png_bytes_from_data_url(&url).unwrap();
        // PNG magic number
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    }

    #[test]
    fn rejects_foreign_data_urls() {
        assert!(png_bytes_from_data_url("data:image/jpeg;base64,abcd").is_err());
    }
}
