//! Request models with validation at construction
//!
//! All client input is validated into these types before any storage call.
//! Invalid input returns ValidationError, not panic.

pub mod ids;
pub mod image;
pub mod maintenance;
pub mod photo;
pub mod user;
pub mod validation;
pub mod vote;

pub use ids::{CategoryId, PhotoId, UserId};
pub use image::{ImageBatchQuery, ImageUploadRequest, MAX_BATCH_IDS};
pub use maintenance::{MaintenanceAction, MaintenanceQuery};
pub use photo::{NewPhoto, NewPhotoRequest, MAX_IMAGE_URL_LEN, MAX_PHOTOS_PER_CATEGORY};
pub use user::UserQuery;
pub use validation::ValidationError;
pub use vote::{PairQuery, VoteRequest, VoteSubmission};
