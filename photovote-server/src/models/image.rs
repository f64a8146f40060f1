//! Image lookup and upload request models

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Deserialize;

use super::{PhotoId, ValidationError};

/// Maximum ids accepted by one batch lookup
pub const MAX_BATCH_IDS: usize = 10;

/// Query string of `GET /images`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageBatchQuery {
    pub photo_ids: Option<String>,
}

impl ImageBatchQuery {
    /// Parse the comma-separated id list.
    ///
    /// Blank elements are skipped, so `"1,,2,"` yields two ids and `","`
    /// yields none.
    pub fn ids(&self) -> Result<Vec<PhotoId>, ValidationError> {
        let raw = self
            .photo_ids
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(ValidationError::InvalidFormat {
                field: "photo_ids",
                reason: "parameter required (comma-separated)",
            })?;

        let ids = raw
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                PhotoId::parse(part, "photo_ids").map_err(|_| ValidationError::InvalidFormat {
                    field: "photo_ids",
                    reason: "invalid photo_ids format",
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if ids.len() > MAX_BATCH_IDS {
            return Err(ValidationError::TooMany {
                field: "photo IDs",
                max: MAX_BATCH_IDS,
            });
        }

        Ok(ids)
    }
}

/// Body of `POST /upload-image`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageUploadRequest {
    pub image: Option<String>,
}

impl ImageUploadRequest {
    /// Decode the payload, accepting either bare base64 or a `data:image/...`
    /// URL.
    pub fn decode(&self) -> Result<Vec<u8>, ValidationError> {
        let data = self
            .image
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(ValidationError::Missing { field: "image" })?;

        let encoded = if data.starts_with("data:image") {
            data.split_once(',').map(|(_, rest)| rest).unwrap_or("")
        } else {
            data
        };

        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|_| ValidationError::InvalidFormat {
                field: "image",
                reason: "invalid base64 image",
            })?;

        if bytes.is_empty() {
            return Err(ValidationError::Missing { field: "image" });
        }
        Ok(bytes)
    }
}
