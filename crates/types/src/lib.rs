//! # Intake Types
//!
//! Validated primitive types shared across the intake workspace.
//!
//! These wrappers push input validation to construction time so that the
//! rest of the codebase can assume the invariants hold: a `NonEmptyText`
//! always contains at least one non-whitespace character, an
//! `EmailAddress` always has a plausible `local@domain` shape.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// Errors that can occur when parsing an email address.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// The input did not look like a `local@domain` address
    #[error("Invalid email address: '{0}'")]
    Invalid(String),
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` if the trimmed input is empty or contains
    /// only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// An email address validated at construction time.
///
/// The validation is deliberately conservative: a single `@` separating a
/// non-empty local part from a domain containing at least one dot, with no
/// embedded whitespace. Anything stricter belongs to the mail provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parses and validates an email address.
    ///
    /// The input is trimmed before validation.
    ///
    /// # Errors
    ///
    /// Returns `EmailError::Invalid` if the input does not have a
    /// `local@domain.tld` shape.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, EmailError> {
        let trimmed = input.as_ref().trim();

        let invalid = || EmailError::Invalid(trimmed.to_owned());

        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return Err(invalid());
        }

        let mut parts = trimmed.splitn(2, '@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().ok_or_else(invalid)?;

        if local.is_empty() || domain.contains('@') {
            return Err(invalid());
        }

        // The domain needs at least one dot with content on both sides.
        let dot = domain.find('.').ok_or_else(invalid)?;
        if dot == 0 || dot == domain.len() - 1 {
            return Err(invalid());
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for EmailAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for EmailAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        EmailAddress::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_and_accepts() {
        let text = NonEmptyText::new("  Jane Doe  ").expect("should accept");
        assert_eq!(text.as_str(), "Jane Doe");
    }

    #[test]
    fn non_empty_text_rejects_whitespace_only() {
        let err = NonEmptyText::new("   \t").expect_err("should reject");
        assert!(matches!(err, TextError::Empty));
    }

    #[test]
    fn email_accepts_plain_address() {
        let email = EmailAddress::parse("jane.doe@example.com").expect("should accept");
        assert_eq!(email.as_str(), "jane.doe@example.com");
    }

    #[test]
    fn email_rejects_missing_at() {
        EmailAddress::parse("jane.example.com").expect_err("should reject");
    }

    #[test]
    fn email_rejects_dotless_domain() {
        EmailAddress::parse("jane@localhost").expect_err("should reject");
    }

    #[test]
    fn email_rejects_embedded_whitespace() {
        EmailAddress::parse("jane doe@example.com").expect_err("should reject");
    }

    #[test]
    fn email_rejects_double_at() {
        EmailAddress::parse("jane@doe@example.com").expect_err("should reject");
    }
}
