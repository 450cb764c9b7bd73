// ABOUTME: Deterministic image tag derivation and validation.
// ABOUTME: Short revision when one is available, otherwise the build counter.

use std::fmt;
use thiserror::Error;

/// Number of revision characters used for a revision-derived tag.
pub const REVISION_TAG_LEN: usize = 7;

const MAX_TAG_LEN: usize = 128;

#[derive(Debug, Error)]
pub enum ImageTagError {
    #[error("image tag cannot be empty")]
    Empty,

    #[error("image tag exceeds maximum length of {MAX_TAG_LEN} characters")]
    TooLong,

    #[error("image tag cannot start with '{0}'")]
    InvalidStart(char),

    #[error("invalid character in image tag: '{0}'")]
    InvalidChar(char),
}

/// A container image tag following the registry tag grammar
/// `[A-Za-z0-9_][A-Za-z0-9_.-]{0,127}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageTag(String);

impl ImageTag {
    pub fn new(value: &str) -> Result<Self, ImageTagError> {
        let mut chars = value.chars();
        let first = chars.next().ok_or(ImageTagError::Empty)?;

        if value.len() > MAX_TAG_LEN {
            return Err(ImageTagError::TooLong);
        }

        if !first.is_ascii_alphanumeric() && first != '_' {
            return Err(ImageTagError::InvalidStart(first));
        }

        for c in chars {
            if !c.is_ascii_alphanumeric() && c != '_' && c != '.' && c != '-' {
                return Err(ImageTagError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    /// Derive the tag for a build.
    ///
    /// A revision of at least [`REVISION_TAG_LEN`] characters yields its first
    /// [`REVISION_TAG_LEN`] characters. A shorter or missing revision yields
    /// the build counter.
    pub fn derive(revision: Option<&str>, build_number: u64) -> Result<Self, ImageTagError> {
        match revision {
            Some(rev) if rev.chars().count() >= REVISION_TAG_LEN => {
                let short: String = rev.chars().take(REVISION_TAG_LEN).collect();
                Self::new(&short)
            }
            _ => Self::new(&build_number.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl serde::Serialize for ImageTag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
