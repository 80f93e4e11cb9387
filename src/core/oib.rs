//! Croatian personal identification number (OIB) checksum.
//!
//! An OIB is eleven ASCII digits. The last digit is a check digit computed from
//! the first ten with the ISO 7064 MOD 11,10 hybrid system.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const OIB_LENGTH: usize = 11;
pub const PREFIX_LENGTH: usize = OIB_LENGTH - 1;

/// Returns `true` iff `input` is exactly eleven ASCII digits whose last digit
/// matches the check digit of the first ten.
///
/// Never panics; anything malformed is simply not valid.
#[must_use]
pub fn validate(input: &str) -> bool {
    let bytes = input.as_bytes();
    if bytes.len() != OIB_LENGTH || !bytes.iter().all(u8::is_ascii_digit) {
        return false;
    }

    let mut digits = [0u8; OIB_LENGTH];
    for (digit, byte) in digits.iter_mut().zip(bytes) {
        *digit = byte - b'0';
    }

    let mut prefix = [0u8; PREFIX_LENGTH];
    prefix.copy_from_slice(&digits[..PREFIX_LENGTH]);

    check_digit(&prefix) == digits[PREFIX_LENGTH]
}

/// Computes the check digit (0..=9) for ten digit values.
///
/// Each element must be in `0..=9`.
#[must_use]
pub fn check_digit(prefix: &[u8; PREFIX_LENGTH]) -> u8 {
    let mut checksum: u8 = 10;
    for &digit in prefix {
        checksum = (checksum + digit) % 10;
        if checksum == 0 {
            checksum = 10;
        }
        checksum = (checksum * 2) % 11;
    }

    if checksum == 1 {
        0
    } else {
        11 - checksum
    }
}

/// Appends the check digit to a ten digit prefix.
///
/// Returns `None` unless `prefix` is exactly ten ASCII digits.
#[must_use]
pub fn complete(prefix: &str) -> Option<String> {
    let bytes = prefix.as_bytes();
    if bytes.len() != PREFIX_LENGTH || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }

    let mut digits = [0u8; PREFIX_LENGTH];
    for (digit, byte) in digits.iter_mut().zip(bytes) {
        *digit = byte - b'0';
    }

    let mut oib = String::with_capacity(OIB_LENGTH);
    oib.push_str(prefix);
    oib.push(char::from(b'0' + check_digit(&digits)));
    Some(oib)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OibError {
    #[error("expected 11 digits, got {length} characters")]
    InvalidLength { length: usize },

    #[error("character '{character}' at position {position} is not a digit")]
    NonDigit { position: usize, character: char },

    #[error("check digit is {found}, expected {expected}")]
    ChecksumMismatch { expected: u8, found: u8 },
}

/// A checked OIB. Holding one proves the value passed [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Oib(String);

impl Oib {
    pub fn parse(input: &str) -> Result<Self, OibError> {
        let length = input.chars().count();
        if length != OIB_LENGTH {
            return Err(OibError::InvalidLength { length });
        }

        let mut digits = [0u8; OIB_LENGTH];
        for (position, character) in input.chars().enumerate() {
            match character.to_digit(10) {
                Some(value) if character.is_ascii_digit() => digits[position] = value as u8,
                _ => return Err(OibError::NonDigit { position, character }),
            }
        }

        let mut prefix = [0u8; PREFIX_LENGTH];
        prefix.copy_from_slice(&digits[..PREFIX_LENGTH]);
        let expected = check_digit(&prefix);
        let found = digits[PREFIX_LENGTH];
        if expected != found {
            return Err(OibError::ChecksumMismatch { expected, found });
        }

        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn check_digit(&self) -> u8 {
        self.0.as_bytes()[PREFIX_LENGTH] - b'0'
    }
}

impl fmt::Display for Oib {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Oib {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Oib {
    type Err = OibError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Oib {
    type Error = OibError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Oib> for String {
    fn from(oib: Oib) -> Self {
        oib.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_zero_prefix_worked_example() {
        // checksum per step: 9, 7, 3, 6, 1, 2, 4, 8, 5, 10 -> check digit 11 - 10 = 1
        assert_eq!(check_digit(&[0; PREFIX_LENGTH]), 1);
        assert!(!validate("00000000000"));
        assert!(validate("00000000001"));
    }

    #[test]
    fn test_known_valid_numbers() {
        for oib in [
            "69435151530",
            "12345678903",
            "99999999994",
            "11111111119",
            "01234567896",
            "33214709116",
        ] {
            assert!(validate(oib), "{} should be valid", oib);
        }
    }

    #[test]
    fn test_wrong_check_digit() {
        assert!(!validate("69435151531"));
        assert!(!validate("12345678901"));
        assert!(!validate("99999999990"));
    }

    #[test]
    fn test_structural_rejections() {
        assert!(!validate(""));
        assert!(!validate("1234567890"));
        assert!(!validate("123456789033"));
        assert!(!validate("1234567890a"));
        assert!(!validate(" 2345678903"));
        assert!(!validate("6943515153\n"));
        // eleven characters, but not eleven bytes
        assert!(!validate("1234567890٣"));
    }

    #[test]
    fn test_checksum_one_maps_to_zero() {
        assert_eq!(check_digit(&[6, 9, 4, 3, 5, 1, 5, 1, 5, 3]), 0);
    }

    #[test]
    fn test_complete() {
        assert_eq!(complete("6943515153").as_deref(), Some("69435151530"));
        assert_eq!(complete("0000000000").as_deref(), Some("00000000001"));
        assert_eq!(complete("123456789"), None);
        assert_eq!(complete("12345678901"), None);
        assert_eq!(complete("12345x7890"), None);
    }

    #[test]
    fn test_parse_diagnostics() {
        assert_eq!(
            Oib::parse("1234"),
            Err(OibError::InvalidLength { length: 4 })
        );
        assert_eq!(
            Oib::parse("1234567890a"),
            Err(OibError::NonDigit {
                position: 10,
                character: 'a'
            })
        );
        assert_eq!(
            Oib::parse("12345678901"),
            Err(OibError::ChecksumMismatch {
                expected: 3,
                found: 1
            })
        );
        assert_eq!(
            Oib::parse("1234567890٣"),
            Err(OibError::NonDigit {
                position: 10,
                character: '٣'
            })
        );
    }

    #[test]
    fn test_parse_valid() {
        let oib: Oib = "69435151530".parse().unwrap();
        assert_eq!(oib.as_str(), "69435151530");
        assert_eq!(oib.check_digit(), 0);
        assert_eq!(oib.to_string(), "69435151530");
    }

    #[test]
    fn test_serde_goes_through_parse() {
        let oib: Oib = serde_json::from_str("\"12345678903\"").unwrap();
        assert_eq!(serde_json::to_string(&oib).unwrap(), "\"12345678903\"");

        let err = serde_json::from_str::<Oib>("\"12345678900\"").unwrap_err();
        assert!(err.to_string().contains("check digit"));
    }
}
