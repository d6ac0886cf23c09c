//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneNumberError {
    /// The input string is empty (after trimming).
    #[error("phone number cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("phone number must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains too few digits.
    #[error("phone number must contain at least {min} digits")]
    TooFewDigits {
        /// Minimum required digit count.
        min: usize,
    },
    /// The input contains a character that is not allowed.
    #[error("phone number contains invalid character {found:?}")]
    InvalidCharacter {
        /// The offending character.
        found: char,
    },
}

/// A salon customer or staff phone number.
///
/// This type keeps the number exactly as entered (minus surrounding
/// whitespace) so receipts and reminders show what the customer wrote down,
/// while still rejecting strings that cannot be dialed.
///
/// ## Constraints
///
/// - Length: 1-32 characters after trimming
/// - At least 7 ASCII digits
/// - Only digits, spaces, and `+` `-` `(` `)` `.` are allowed
///
/// ## Examples
///
/// ```
/// use lotus_bloom_core::PhoneNumber;
///
/// // Valid phone numbers
/// assert!(PhoneNumber::parse("555-0123").is_ok());
/// assert!(PhoneNumber::parse("+84 28 3822 9999").is_ok());
/// assert!(PhoneNumber::parse("(212) 555-0199").is_ok());
///
/// // Invalid phone numbers
/// assert!(PhoneNumber::parse("").is_err());         // empty
/// assert!(PhoneNumber::parse("555-01").is_err());   // too few digits
/// assert!(PhoneNumber::parse("call me").is_err());  // letters
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Maximum length of a phone number.
    pub const MAX_LENGTH: usize = 32;

    /// Minimum number of digits a phone number must contain.
    pub const MIN_DIGITS: usize = 7;

    /// Parse a `PhoneNumber` from a string.
    ///
    /// Surrounding whitespace is trimmed; interior formatting is preserved.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input:
    /// - Is empty
    /// - Is longer than 32 characters
    /// - Contains fewer than 7 digits
    /// - Contains a character other than digits, spaces, or `+ - ( ) .`
    pub fn parse(s: &str) -> Result<Self, PhoneNumberError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(PhoneNumberError::Empty);
        }

        if trimmed.len() > Self::MAX_LENGTH {
            return Err(PhoneNumberError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(found) = trimmed
            .chars()
            .find(|c| !c.is_ascii_digit() && !matches!(c, ' ' | '+' | '-' | '(' | ')' | '.'))
        {
            return Err(PhoneNumberError::InvalidCharacter { found });
        }

        let digits = trimmed.chars().filter(char::is_ascii_digit).count();
        if digits < Self::MIN_DIGITS {
            return Err(PhoneNumberError::TooFewDigits {
                min: Self::MIN_DIGITS,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `PhoneNumber` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns only the digits, stripped of formatting.
    ///
    /// Useful for duplicate detection when the same number was entered with
    /// different punctuation.
    #[must_use]
    pub fn digits(&self) -> String {
        self.0.chars().filter(char::is_ascii_digit).collect()
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for PhoneNumber {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for PhoneNumber {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for PhoneNumber {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
