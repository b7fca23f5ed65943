use std::fmt;

use crate::validation::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};

macro_rules! newtype {
    ($name:ident, $doc:expr, $pattern:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Parses a validated identifier from a string.
            pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
                let s = value.into();
                if !Regex::new($pattern).expect("invalid regex").is_match(&s) {
                    return Err(ValidationError::PatternMismatch {
                        field: stringify!($name),
                        value: s,
                    });
                }
                Ok(Self(s))
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

newtype!(
    Principal,
    "Authenticated actor on the ledger (`kind:name`, lowercase, URL-safe).",
    r"^(human|service|org|contract):[a-z][a-z0-9_-]{0,62}$"
);
newtype!(
    Timestamp,
    "UTC RFC3339 timestamp with `Z` suffix.",
    r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d{1,9})?Z$"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn principal_accepts_kind_and_name() {
        let p = Principal::parse("human:alice").unwrap();
        assert_eq!(p.as_str(), "human:alice");
    }

    #[test]
    fn principal_rejects_unknown_kind() {
        let err = Principal::parse("robot:alice").unwrap_err();
        assert_eq!(
            err,
            ValidationError::PatternMismatch {
                field: "Principal",
                value: "robot:alice".to_string()
            }
        );
    }

    #[test]
    fn principal_rejects_uppercase() {
        assert!(Principal::parse("human:Alice").is_err());
    }

    #[test]
    fn principal_deserialization_validates() {
        let ok: Result<Principal, _> = serde_json::from_str("\"org:acme\"");
        assert!(ok.is_ok());
        let bad: Result<Principal, _> = serde_json::from_str("\"acme\"");
        assert!(bad.is_err());
    }

    #[test]
    fn timestamp_requires_z_suffix() {
        assert!(Timestamp::parse("2024-01-01T00:00:00Z").is_ok());
        assert!(Timestamp::parse("2024-01-01T00:00:00+01:00").is_err());
    }
}
