//! UUID and sharded-path utilities.
//!
//! Intake stores assessment records under sharded directories derived from a
//! UUID. To keep path derivation deterministic across the codebase, the
//! canonical identifier representation is **32 lowercase hexadecimal
//! characters** (no hyphens) — the same value produced by
//! `Uuid::new_v4().simple().to_string()`.
//!
//! For a canonical UUID `u`, records live under
//! `parent_dir/<u[0..2]>/<u[2..4]>/<u>/`, which bounds the fan-out of any
//! single directory as the record count grows.

use crate::error::{AssessmentError, AssessmentResult};
use std::path::{Path, PathBuf};
use std::{fmt, str::FromStr};

use ::uuid::Uuid;

/// The canonical assessment identifier (32 lowercase hex characters, no hyphens).
///
/// Once constructed, the contained UUID is guaranteed to be in canonical
/// form, so sharded path derivation and display are consistent everywhere.
///
/// Construct with [`ShardableUuid::new`] for fresh records or
/// [`ShardableUuid::parse`] for externally supplied identifiers (CLI input,
/// API request paths). Non-canonical values (uppercase, hyphenated, wrong
/// length, non-hex) are rejected rather than normalised.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ShardableUuid(Uuid);

impl ShardableUuid {
    /// Generates a new identifier in canonical form.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates and parses an identifier that must already be canonical.
    ///
    /// # Errors
    ///
    /// Returns [`AssessmentError::InvalidInput`] if `input` is not exactly
    /// 32 lowercase hex characters.
    pub fn parse(input: &str) -> AssessmentResult<Self> {
        if Self::is_canonical(input) {
            // is_canonical guarantees valid hex, so parse_str will succeed
            let uuid = Uuid::parse_str(input).expect("is_canonical guarantees valid UUID");
            return Ok(Self(uuid));
        }
        Err(AssessmentError::InvalidInput(format!(
            "assessment id must be 32 lowercase hex characters without hyphens, got: '{}'",
            input
        )))
    }

    /// Returns the underlying `uuid::Uuid`.
    pub fn uuid(&self) -> Uuid {
        self.0
    }

    /// Returns true if `input` is in canonical form.
    ///
    /// Purely syntactic: exactly 32 bytes, lowercase hex only.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 32
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    /// Returns `parent_dir/<s1>/<s2>/<uuid>/` where `s1`/`s2` are the first
    /// two and next two hex characters of this identifier.
    pub fn sharded_dir(&self, parent_dir: &Path) -> PathBuf {
        let canonical = self.0.simple().to_string();
        let s1 = &canonical[0..2];
        let s2 = &canonical[2..4];
        parent_dir.join(s1).join(s2).join(&canonical)
    }
}

impl Default for ShardableUuid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ShardableUuid {
    /// Formats the identifier in canonical form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for ShardableUuid {
    type Err = AssessmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for ShardableUuid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for ShardableUuid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ShardableUuid::parse(&s).map_err(serde::de::Error::custom)
    }
}
