//! Typed identifiers for songs and users.
//!
//! Ids arrive as untyped text from paths, forms and JSON bodies; wrapping them
//! here rejects malformed values before they reach the store or the filesystem.
//! A valid id is 1..=128 characters drawn from `[A-Za-z0-9_-]`, which also
//! guarantees `<id>.mp3` never escapes the songs directory.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

pub const MAX_ID_LEN: usize = 128;

fn validate_id(kind: &str, raw: &str) -> Result<(), ModelError> {
    if raw.is_empty() {
        return Err(ModelError::Validation(format!("{kind} id required")));
    }
    if raw.len() > MAX_ID_LEN {
        return Err(ModelError::Validation(format!("{kind} id longer than {MAX_ID_LEN} characters")));
    }
    if !raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(ModelError::Validation(format!("{kind} id contains invalid characters: {raw:?}")));
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SongId(String);

impl SongId {
    pub fn parse(raw: &str) -> Result<Self, ModelError> {
        validate_id("song", raw)?;
        Ok(Self(raw.to_string()))
    }

    /// Fresh store-assigned id.
    pub fn generate() -> Self { Self(Uuid::new_v4().to_string()) }

    pub fn as_str(&self) -> &str { &self.0 }

    pub fn into_inner(self) -> String { self.0 }

    /// File name of the audio file for this song under the songs directory.
    pub fn file_name(&self) -> String { format!("{}.mp3", self.0) }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    pub fn parse(raw: &str) -> Result<Self, ModelError> {
        validate_id("user", raw)?;
        Ok(Self(raw.to_string()))
    }

    pub fn generate() -> Self { Self(Uuid::new_v4().to_string()) }

    pub fn as_str(&self) -> &str { &self.0 }

    pub fn into_inner(self) -> String { self.0 }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl FromStr for SongId {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> { Self::parse(s) }
}

impl FromStr for UserId {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> { Self::parse(s) }
}

impl TryFrom<String> for SongId {
    type Error = ModelError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        validate_id("song", &s)?;
        Ok(Self(s))
    }
}

impl TryFrom<String> for UserId {
    type Error = ModelError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        validate_id("user", &s)?;
        Ok(Self(s))
    }
}

impl From<SongId> for String {
    fn from(id: SongId) -> Self { id.0 }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self { id.0 }
}
