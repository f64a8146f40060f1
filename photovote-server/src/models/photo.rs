//! Photo listing and upload request models

use serde::Deserialize;

use super::validation::require;
use super::{CategoryId, UserId, ValidationError};

/// Maximum length of a stored `image_url` (inline base64 payloads included)
pub const MAX_IMAGE_URL_LEN: usize = 250_000;

/// Maximum photos a single user may enter into one category
pub const MAX_PHOTOS_PER_CATEGORY: i64 = 6;

/// Body of `POST /photos`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPhotoRequest {
    pub user_id: Option<i64>,
    pub category_id: Option<i64>,
    pub image_url: Option<String>,
}

/// Validated photo entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPhoto {
    pub owner: UserId,
    pub category: CategoryId,
    pub image_url: String,
}

impl TryFrom<NewPhotoRequest> for NewPhoto {
    type Error = ValidationError;

    fn try_from(req: NewPhotoRequest) -> Result<Self, Self::Error> {
        let owner = UserId::new(require(req.user_id, "user_id")?, "user_id")?;
        let category = CategoryId::new(require(req.category_id, "category_id")?, "category_id")?;
        let image_url = require(req.image_url, "image_url")?;

        if image_url.is_empty() {
            return Err(ValidationError::Missing { field: "image_url" });
        }
        if image_url.chars().count() > MAX_IMAGE_URL_LEN {
            return Err(ValidationError::TooLong {
                field: "image_url",
                max: MAX_IMAGE_URL_LEN,
            });
        }

        Ok(Self {
            owner,
            category,
            image_url,
        })
    }
}
