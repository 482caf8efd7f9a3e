use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error returned when an identifier is empty or only whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} cannot be empty")]
pub struct BlankIdError {
    /// Which identifier was rejected, e.g. `"Product ID"`.
    pub kind: &'static str,
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Human readable name used in error messages.
            pub const KIND: &'static str = $kind;

            /// Parses an identifier, rejecting blank input.
            pub fn parse(value: impl Into<String>) -> Result<Self, BlankIdError> {
                let value = value.into();
                if value.trim().is_empty() {
                    return Err(BlankIdError { kind: Self::KIND });
                }
                Ok(Self(value))
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = BlankIdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = BlankIdError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::parse(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Product identifier (SKU).
    ProductId,
    "Product ID"
);

string_id!(
    /// Unique identifier for a user.
    UserId,
    "User ID"
);

string_id!(
    /// Unique identifier for an order.
    OrderId,
    "Order ID"
);

impl OrderId {
    /// Creates a new random order ID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_non_blank_ids() {
        let id = ProductId::parse("SKU-001").unwrap();
        assert_eq!(id.as_str(), "SKU-001");
        assert_eq!(id.to_string(), "SKU-001");
    }

    #[test]
    fn parse_rejects_empty_and_whitespace() {
        assert_eq!(
            UserId::parse("").unwrap_err(),
            BlankIdError { kind: "User ID" }
        );
        assert!(ProductId::parse("   ").is_err());
        assert_eq!(
            OrderId::parse("\t").unwrap_err().to_string(),
            "Order ID cannot be empty"
        );
    }

    #[test]
    fn generated_order_ids_are_unique() {
        let id1 = OrderId::generate();
        let id2 = OrderId::generate();
        assert_ne!(id1, id2);
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = ProductId::parse("SKU-001").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"SKU-001\"");
    }

    #[test]
    fn deserialization_rejects_blank_ids() {
        let result: Result<UserId, _> = serde_json::from_str("\"  \"");
        assert!(result.is_err());

        let id: UserId = serde_json::from_str("\"user-1\"").unwrap();
        assert_eq!(id.as_str(), "user-1");
    }
}
