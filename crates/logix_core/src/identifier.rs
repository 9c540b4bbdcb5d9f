//! Validated registry keys.
//!
//! An identifier is at least six characters long, starts with three lowercase
//! ASCII letters and continues with lowercase letters, digits or underscores
//! (`^[a-z]{3}[a-z0-9_]{3,}$`). Validation happens once, at construction, so
//! every `Identifier` in the engine is known to be well formed.

use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

pub const MIN_LENGTH: usize = 6;
const PREFIX_LENGTH: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(raw: impl Into<String>) -> Result<Self, EngineError> {
        let raw = raw.into();
        if let Err(reason) = validate(&raw) {
            return Err(EngineError::InvalidIdentifier { raw, reason });
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

fn validate(raw: &str) -> Result<(), &'static str> {
    if raw.chars().count() < MIN_LENGTH {
        return Err("too short");
    }
    let mut chars = raw.chars();
    if !chars.by_ref().take(PREFIX_LENGTH).all(|c| c.is_ascii_lowercase()) {
        return Err("prefix must be lowercase letters");
    }
    if !chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') {
        return Err("body has invalid characters");
    }
    Ok(())
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Identifier {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for Identifier {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for Identifier {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.0
    }
}
