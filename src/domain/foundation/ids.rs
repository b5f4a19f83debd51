//! Strongly-typed identifier value objects.
//!
//! Every row is keyed by a database-assigned `BIGSERIAL`, so identifiers wrap a
//! positive `i64`. Identifiers arriving as request strings are parsed with
//! [`FromStr`], which rejects anything that is not a positive decimal integer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a database-assigned key.
            pub fn new(id: i64) -> Result<Self, ValidationError> {
                if id <= 0 {
                    return Err(ValidationError::out_of_range($field, 1, i64::MAX, id));
                }
                Ok(Self(id))
            }

            /// Wraps a key read back from the database without re-validating.
            pub fn from_db(id: i64) -> Self {
                Self(id)
            }

            /// Returns the raw key.
            pub fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let id: i64 = s.trim().parse().map_err(|_| {
                    ValidationError::invalid_format($field, format!("'{}' is not a number", s))
                })?;
                if id <= 0 {
                    return Err(ValidationError::invalid_format(
                        $field,
                        format!("'{}' is not a positive number", s),
                    ));
                }
                Ok(Self(id))
            }
        }
    };
}

row_id!(
    /// Identifier of a blog post.
    PostId,
    "post_id"
);
row_id!(
    /// Identifier of a tag.
    TagId,
    "tag_id"
);
row_id!(
    /// Identifier of a registered user.
    UserId,
    "user_id"
);
row_id!(
    /// Identifier of a comment.
    CommentId,
    "comment_id"
);
row_id!(
    /// Identifier of a newsletter subscriber.
    SubscriberId,
    "subscriber_id"
);
row_id!(
    /// Identifier of a blogroll link.
    LinkId,
    "link_id"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_id_parses_from_decimal_string() {
        let id: PostId = "42".parse().unwrap();
        assert_eq!(id.as_i64(), 42);
    }

    #[test]
    fn id_parsing_trims_whitespace() {
        let id: TagId = " 7 ".parse().unwrap();
        assert_eq!(id.as_i64(), 7);
    }

    #[test]
    fn id_parsing_rejects_non_numeric() {
        let err = "abc".parse::<PostId>().unwrap_err();
        assert_eq!(err.field(), "post_id");
    }

    #[test]
    fn id_parsing_rejects_zero_and_negative() {
        assert!("0".parse::<CommentId>().is_err());
        assert!("-3".parse::<CommentId>().is_err());
    }

    #[test]
    fn new_rejects_non_positive() {
        assert!(UserId::new(0).is_err());
        assert!(UserId::new(1).is_ok());
    }

    #[test]
    fn id_displays_as_number() {
        assert_eq!(LinkId::from_db(9).to_string(), "9");
    }

    #[test]
    fn id_serializes_transparently() {
        let json = serde_json::to_string(&SubscriberId::from_db(5)).unwrap();
        assert_eq!(json, "5");
    }
}
