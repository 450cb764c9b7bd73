// ABOUTME: Cloud account and region identifiers.
// ABOUTME: Validated once during identity resolution and immutable afterwards.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccountIdError {
    #[error("account id must be 12 digits, got {0:?}")]
    InvalidFormat(String),
}

/// A 12-digit cloud account identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(value: &str) -> Result<Self, AccountIdError> {
        let value = value.trim();
        if value.len() != 12 || !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(AccountIdError::InvalidFormat(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl serde::Serialize for AccountId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[derive(Debug, Error)]
pub enum RegionError {
    #[error("region cannot be empty")]
    Empty,

    #[error("invalid region: {0:?}")]
    InvalidFormat(String),
}

/// A cloud region such as `eu-west-1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Region(String);

impl Region {
    /// The region in which buckets are created without a location constraint.
    pub const DEFAULT_BUCKET_REGION: &'static str = "us-east-1";

    pub fn new(value: &str) -> Result<Self, RegionError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(RegionError::Empty);
        }

        // <area>-<direction>-<number>, e.g. us-east-1, ap-southeast-2, us-gov-west-1
        let parts: Vec<&str> = value.split('-').collect();
        let well_formed = parts.len() >= 3
            && parts.iter().all(|p| is_region_part(p))
            && parts
                .last()
                .is_some_and(|n| n.chars().all(|c| c.is_ascii_digit()));

        if !well_formed {
            return Err(RegionError::InvalidFormat(value.to_string()));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether bucket creation needs an explicit location constraint.
    pub fn needs_location_constraint(&self) -> bool {
        self.0 != Self::DEFAULT_BUCKET_REGION
    }
}

fn is_region_part(part: &str) -> bool {
    !part.is_empty()
        && part
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl serde::Serialize for Region {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_id_requires_twelve_digits() {
        assert!(AccountId::new("123456789012").is_ok());
        assert!(AccountId::new("12345678901").is_err());
        assert!(AccountId::new("12345678901a").is_err());
    }

    #[test]
    fn account_id_trims_cli_output() {
        let id = AccountId::new("123456789012\n").unwrap();
        assert_eq!(id.as_str(), "123456789012");
    }

    #[test]
    fn region_accepts_common_forms() {
        assert!(Region::new("us-east-1").is_ok());
        assert!(Region::new("ap-southeast-2").is_ok());
        assert!(Region::new("us-gov-west-1").is_ok());
    }

    #[test]
    fn region_rejects_garbage() {
        assert!(Region::new("").is_err());
        assert!(Region::new("useast1").is_err());
        assert!(Region::new("US-EAST-1").is_err());
        assert!(Region::new("us-east-x").is_err());
    }

    #[test]
    fn only_us_east_1_skips_location_constraint() {
        assert!(!Region::new("us-east-1").unwrap().needs_location_constraint());
        assert!(Region::new("eu-west-1").unwrap().needs_location_constraint());
    }
}
