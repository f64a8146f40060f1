//! Typed identifiers
//!
//! Every table keys on a BIGSERIAL. Identifiers arriving from clients must
//! be strictly positive; zero and negatives are rejected before any query.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ValidationError;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
        #[serde(transparent)]
        #[sqlx(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Validate a raw identifier supplied for `field`.
            pub fn new(raw: i64, field: &'static str) -> Result<Self, ValidationError> {
                if raw <= 0 {
                    return Err(ValidationError::NotPositive { field });
                }
                Ok(Self(raw))
            }

            /// Parse a textual identifier (query strings, CSV lists).
            pub fn parse(raw: &str, field: &'static str) -> Result<Self, ValidationError> {
                let value = i64::from_str(raw.trim())
                    .map_err(|_| ValidationError::NotPositive { field })?;
                Self::new(value, field)
            }

            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> i64 {
                id.0
            }
        }
    };
}

define_id!(
    /// Identifier of a user (voter or photo author)
    UserId
);
define_id!(
    /// Identifier of a photo
    PhotoId
);
define_id!(
    /// Identifier of a category
    CategoryId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_positive() {
        assert_eq!(UserId::new(7, "user_id").unwrap().get(), 7);
        assert_eq!(PhotoId::parse(" 42 ", "photo_ids").unwrap().get(), 42);
    }

    #[test]
    fn rejects_zero_and_negative() {
        assert_eq!(
            UserId::new(0, "user_id").unwrap_err(),
            ValidationError::NotPositive { field: "user_id" }
        );
        assert!(CategoryId::new(-3, "category_id").is_err());
    }

    #[test]
    fn rejects_non_numeric() {
        let err = UserId::parse("abc", "user_id").unwrap_err();
        assert!(matches!(err, ValidationError::NotPositive { field: "user_id" }));
    }

    #[test]
    fn serializes_as_plain_number() {
        let id = PhotoId::new(11, "photo1_id").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "11");
    }
}
