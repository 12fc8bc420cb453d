//! Validated text primitives shared across MediReg crates.
//!
//! These types carry their validation in the constructor so that once a value exists it is
//! known to be well-formed. The form validator uses them to decide whether raw user input is
//! acceptable; the health-record controller uses [`NonEmptyText`] for the patient and doctor
//! identifiers it must never submit blank.

/// Errors that can occur when creating validated text types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// The input had the wrong number of characters
    #[error("expected {expected} digits, got {actual} characters")]
    WrongLength { expected: usize, actual: usize },
    /// The input contained something other than ASCII digits
    #[error("only the digits 0-9 are allowed")]
    NonDigit,
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// Returns `Err(TextError::Empty)` if the trimmed input is empty.
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

/// A string of exactly `N` ASCII decimal digits.
///
/// Unlike [`NonEmptyText`] the input is **not** trimmed: `" 123456"` is rejected for a
/// six-digit code, matching how the form treats pasted values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DigitString<const N: usize>(String);

/// Ten-digit mobile number.
pub type MobileNumber = DigitString<10>;

/// Twelve-digit national identity number.
pub type NationalId = DigitString<12>;

/// Six-digit postal code.
pub type PostalCode = DigitString<6>;

impl<const N: usize> DigitString<N> {
    /// Parses `input` as exactly `N` ASCII digits.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, TextError> {
        let input = input.as_ref();
        if input.is_empty() {
            return Err(TextError::Empty);
        }
        if !input.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TextError::NonDigit);
        }
        // All bytes are ASCII here, so byte length equals character count.
        if input.len() != N {
            return Err(TextError::WrongLength {
                expected: N,
                actual: input.len(),
            });
        }
        Ok(Self(input.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
