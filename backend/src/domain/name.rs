//! Display names shared by users and accounts.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum allowed length, in characters, of a display name.
pub const DISPLAY_NAME_MAX: usize = 255;

/// Validation errors for [`DisplayName`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    /// The name is empty once trimmed.
    #[error("missing name")]
    Missing,
    /// The name exceeds [`DISPLAY_NAME_MAX`].
    #[error("name must be at most {max} characters")]
    TooLong {
        /// Permitted maximum.
        max: usize,
    },
}

impl NameError {
    /// Stable code used in validation details.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Missing => "missing_field",
            Self::TooLong { .. } => "name_too_long",
        }
    }
}

/// A trimmed, non-empty display name.
///
/// # Examples
/// ```
/// use ledger::domain::DisplayName;
///
/// let name = DisplayName::new("  Savings ").expect("valid name");
/// assert_eq!(name.as_ref(), "Savings");
/// assert!(DisplayName::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a display name, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`NameError::Missing`] for blank input and
    /// [`NameError::TooLong`] past [`DISPLAY_NAME_MAX`] characters.
    pub fn new(name: impl AsRef<str>) -> Result<Self, NameError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(NameError::Missing);
        }
        if trimmed.chars().count() > DISPLAY_NAME_MAX {
            return Err(NameError::TooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
