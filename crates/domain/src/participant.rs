//! Participant naming rules.
//!
//! A participant name doubles as a directory name, so only characters that are
//! legal in file names on every platform are accepted.

use crate::errors::ParticipantError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static LEGAL_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._\- ]+$").expect("valid participant name regex"));

/// Check whether a string is a legal file name for a participant.
///
/// Alphanumeric characters, `.`, `-`, `_` and spaces are allowed, without
/// leading or trailing whitespace. Names made only of dots would resolve to
/// the current or parent directory and are rejected.
pub fn is_legal_filename(name: &str) -> bool {
    !name.is_empty()
        && name.trim() == name
        && !name.chars().all(|c| c == '.')
        && LEGAL_NAME_REGEX.is_match(name)
}

/// A validated participant name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ParticipantName(String);

impl ParticipantName {
    pub fn parse(name: impl Into<String>) -> Result<Self, ParticipantError> {
        let name = name.into();
        if is_legal_filename(&name) {
            Ok(Self(name))
        } else {
            Err(ParticipantError::InvalidName(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ParticipantName {
    type Error = ParticipantError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ParticipantName> for String {
    fn from(name: ParticipantName) -> Self {
        name.0
    }
}

impl AsRef<str> for ParticipantName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
