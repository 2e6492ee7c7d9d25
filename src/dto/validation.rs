//! Validation helpers for DTOs.

use validator::ValidationError;

/// Longest accepted camera identifier.
const MAX_CAMERA_ID_LENGTH: usize = 64;

/// Validates a camera identifier: 1-64 characters of ASCII letters, digits, `-`, `_` or `.`.
///
/// Callers trim surrounding whitespace first.
///
/// # Examples
///
/// ```ignore
/// validate_camera_id("board-cam_1") // Ok
/// validate_camera_id("")            // Err - empty
/// validate_camera_id("cam 1")       // Err - space
/// ```
pub fn validate_camera_id(id: &str) -> Result<(), ValidationError> {
    if id.is_empty() || id.len() > MAX_CAMERA_ID_LENGTH {
        let mut err = ValidationError::new("camera_id_length");
        err.message = Some(
            format!(
                "Camera ID must be 1 to {MAX_CAMERA_ID_LENGTH} characters (got {})",
                id.len()
            )
            .into(),
        );
        return Err(err);
    }

    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        let mut err = ValidationError::new("camera_id_format");
        err.message = Some(
            "Camera ID may only contain ASCII letters, digits, '-', '_' and '.'".into(),
        );
        return Err(err);
    }

    Ok(())
}
