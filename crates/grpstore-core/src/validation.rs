//! Name validation for group and member names.
//!
//! Valid names:
//! - Are not empty
//! - Contain no `:` (field separator)
//! - Contain no `,` (member list separator)
//! - Contain no newline (record separator)
//!
//! The same rules apply to group names and member names, since both end up
//! as fields of a single colon-delimited line.

use crate::error::{GroupStoreError, Result};

/// Validates a group or member name.
///
/// # Examples
/// ```
/// use grpstore_core::validation::validate_name;
///
/// assert!(validate_name("build").is_ok());
/// assert!(validate_name("ci-runners").is_ok());
/// assert!(validate_name("alice.smith").is_ok());
///
/// assert!(validate_name("").is_err());
/// assert!(validate_name("a:b").is_err());
/// assert!(validate_name("a,b").is_err());
/// assert!(validate_name("a\nb").is_err());
/// ```
pub fn validate_name(name: &str) -> std::result::Result<(), NameValidationError> {
    if name.is_empty() {
        return Err(NameValidationError::Empty);
    }

    match name.chars().find(|ch| is_forbidden(*ch)) {
        Some(ch) => Err(NameValidationError::ForbiddenCharacter(ch)),
        None => Ok(()),
    }
}

/// Like [`validate_name`], but lifts the failure into the crate error so
/// commands can `?` it directly.
pub fn ensure_valid_name(name: &str) -> Result<()> {
    validate_name(name).map_err(|reason| GroupStoreError::InvalidName {
        name: name.to_string(),
        reason,
    })
}

fn is_forbidden(ch: char) -> bool {
    matches!(ch, ':' | ',' | '\n')
}

/// Error type for name validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameValidationError {
    /// Name is empty
    Empty,
    /// Name contains a separator character
    ForbiddenCharacter(char),
}

impl std::fmt::Display for NameValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NameValidationError::Empty => write!(f, "name cannot be empty"),
            NameValidationError::ForbiddenCharacter(ch) => {
                write!(
                    f,
                    "name contains forbidden character {:?} (':', ',' and newline are separators)",
                    ch
                )
            }
        }
    }
}

impl std::error::Error for NameValidationError {}
