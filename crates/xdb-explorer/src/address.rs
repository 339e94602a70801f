//! Account identifier validation

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::core::error::{ExplorerError, ExplorerResult};

/// Length of an encoded public account identifier
pub const ACCOUNT_ID_LEN: usize = 56;

/// Version prefix of public account identifiers
pub const ACCOUNT_ID_PREFIX: char = 'G';

/// Structural check: `G` followed by 55 characters of the base32 alphabet `A-Z2-7`.
///
/// No checksum is verified.
pub fn validate(input: &str) -> bool {
    check(input).is_ok()
}

fn check(input: &str) -> Result<(), String> {
    if input.is_empty() {
        return Err("address is empty".to_string());
    }
    if input.len() != ACCOUNT_ID_LEN {
        return Err(format!(
            "expected {} characters, got {}",
            ACCOUNT_ID_LEN,
            input.chars().count()
        ));
    }
    if !input.starts_with(ACCOUNT_ID_PREFIX) {
        return Err(format!("must start with '{}'", ACCOUNT_ID_PREFIX));
    }
    match input.chars().find(|c| !is_base32(*c)) {
        Some(bad) => Err(format!("invalid character '{}'", bad)),
        None => Ok(()),
    }
}

fn is_base32(c: char) -> bool {
    c.is_ascii_uppercase() || ('2'..='7').contains(&c)
}

/// A structurally valid public account identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Validate `input` (surrounding whitespace ignored)
    pub fn parse(input: &str) -> ExplorerResult<Self> {
        let trimmed = input.trim();
        check(trimmed).map_err(|reason| ExplorerError::InvalidAddress {
            input: input.to_string(),
            reason,
        })?;
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for AccountId {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
