//! Customer entity and tier classification.

use std::str::FromStr;

use common::UserId;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};

/// Customer classification driving the tier discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Tier {
    #[default]
    Regular,
    Premium,
}

impl Tier {
    /// Discount percentage granted to regular customers.
    pub const REGULAR_DISCOUNT_PERCENT: f64 = 5.0;

    /// Discount percentage granted to premium customers.
    pub const PREMIUM_DISCOUNT_PERCENT: f64 = 15.0;

    /// Returns the tier discount as a percentage.
    pub fn discount_percent(&self) -> f64 {
        match self {
            Tier::Regular => Self::REGULAR_DISCOUNT_PERCENT,
            Tier::Premium => Self::PREMIUM_DISCOUNT_PERCENT,
        }
    }

    /// Returns the tier name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Regular => "Regular",
            Tier::Premium => "Premium",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Tier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "regular" => Ok(Tier::Regular),
            "premium" => Ok(Tier::Premium),
            _ => Err(DomainError::Unrecognized {
                kind: "user tier",
                value: s.to_string(),
            }),
        }
    }
}

/// A customer who owns carts and orders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    id: UserId,
    username: String,
    email: String,
    tier: Tier,
}

impl User {
    /// Creates a regular-tier user.
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self> {
        Self::with_tier(id, username, email, Tier::default())
    }

    /// Creates a user with an explicit tier.
    pub fn with_tier(
        id: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        tier: Tier,
    ) -> Result<Self> {
        let id = UserId::parse(id)?;
        let username = username.into();
        if username.trim().is_empty() {
            return Err(DomainError::BlankField { field: "Username" });
        }
        let email = email.into();
        validate_email(&email)?;

        Ok(Self {
            id,
            username,
            email,
            tier,
        })
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Changes the email address.
    pub fn set_email(&mut self, email: impl Into<String>) -> Result<()> {
        let email = email.into();
        validate_email(&email)?;
        self.email = email;
        Ok(())
    }

    /// Changes the customer tier.
    pub fn set_tier(&mut self, tier: Tier) {
        self.tier = tier;
    }
}

fn validate_email(email: &str) -> Result<()> {
    if !email.contains('@') {
        return Err(DomainError::InvalidEmail {
            email: email.to_string(),
        });
    }
    Ok(())
}
