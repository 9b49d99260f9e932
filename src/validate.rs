//! Portable user and group name validation
//!
//! Accepts names matching `^[a-z_][a-z0-9_]{0,30}$`. Every name handed to
//! an external command passes through here first.

use crate::error::{UserError, UserResult};
use std::fmt;

/// Longest accepted name, in bytes
pub const MAX_NAME_LEN: usize = 31;

/// Check a candidate user or group name against the portable-name grammar
pub fn validate_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    if bytes.is_empty() || bytes.len() > MAX_NAME_LEN {
        return false;
    }

    let first = bytes[0];
    if !(first.is_ascii_lowercase() || first == b'_') {
        return false;
    }

    bytes[1..]
        .iter()
        .all(|&b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

/// Alias kept for callers that only deal with accounts
pub fn validate_username(name: &str) -> bool {
    validate_name(name)
}

/// A user or group name that passed [`validate_name`]
///
/// Command builders only accept this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidName(String);

impl ValidName {
    /// Validate `name` on behalf of `operation`
    pub fn parse(operation: &'static str, name: &str) -> UserResult<Self> {
        if validate_name(name) {
            Ok(Self(name.to_string()))
        } else {
            Err(UserError::invalid(
                operation,
                name,
                "not a portable user or group name",
            ))
        }
    }

    /// Borrow the name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ValidName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ValidName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
