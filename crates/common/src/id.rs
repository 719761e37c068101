//! Record identifiers
//!
//! Every record in the store is named by a random 128-bit [`RecordId`].
//! On disk and on the wire an id is always written as exactly 22 base-58
//! characters, left-padded with the zero symbol `1`, so ids sort and
//! compare as fixed-width strings and can be used directly as file names.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Size of a record id in bytes (128 bits)
pub const ID_SIZE: usize = 16;
/// Length of the canonical text form of a record id
pub const ID_TEXT_LEN: usize = 22;
/// Base-58 alphabet, without the visually ambiguous `0`, `O`, `I` and `l`
pub const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

const BASE: u128 = 58;

/// Errors that can occur when minting or parsing record ids
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    #[error("invalid id length: expected 22, got {0}")]
    InvalidLength(usize),
    #[error("invalid character in id: {0:?}")]
    InvalidCharacter(char),
    #[error("id value does not fit in 128 bits")]
    Overflow,
    #[error("entropy source exhausted: {0}")]
    EntropyExhausted(String),
}

/// Opaque 128-bit record identifier
///
/// Equality, ordering and hashing are by value. Serializes as its quoted
/// 22-character text form.
///
/// # Examples
///
/// ```
/// use common::id::RecordId;
///
/// let id = RecordId::from_bytes([0; 16]);
/// assert_eq!(id.to_string(), "1111111111111111111111");
/// assert_eq!("1111111111111111111111".parse::<RecordId>().unwrap(), id);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RecordId([u8; ID_SIZE]);

impl RecordId {
    /// Mint a fresh id from the operating system's secure random source.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::EntropyExhausted`] if the random source fails.
    /// Callers must treat this as fatal: minting ids from a degraded source
    /// risks collisions.
    pub fn generate() -> Result<Self, IdError> {
        let mut buff = [0u8; ID_SIZE];
        getrandom::getrandom(&mut buff).map_err(|e| IdError::EntropyExhausted(e.to_string()))?;
        Ok(Self(buff))
    }

    pub fn from_bytes(bytes: [u8; ID_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ID_SIZE] {
        &self.0
    }

    /// Parse the canonical 22-character text form.
    pub fn parse(s: &str) -> Result<Self, IdError> {
        if s.len() != ID_TEXT_LEN {
            return Err(IdError::InvalidLength(s.len()));
        }

        let mut value: u128 = 0;
        for c in s.chars() {
            let digit = digit_of(c).ok_or(IdError::InvalidCharacter(c))?;
            value = value
                .checked_mul(BASE)
                .and_then(|v| v.checked_add(digit))
                .ok_or(IdError::Overflow)?;
        }

        // to_be_bytes always yields all 16 bytes, high-order zeros included
        Ok(Self(value.to_be_bytes()))
    }
}

fn digit_of(c: char) -> Option<u128> {
    if !c.is_ascii() {
        return None;
    }
    ALPHABET
        .iter()
        .position(|&symbol| symbol == c as u8)
        .map(|idx| idx as u128)
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut value = u128::from_be_bytes(self.0);
        let mut out = [ALPHABET[0]; ID_TEXT_LEN];
        // 58^22 > 2^128, so 22 digits always exhaust the value
        for slot in out.iter_mut().rev() {
            *slot = ALPHABET[(value % BASE) as usize];
            value /= BASE;
        }
        out.iter().try_for_each(|&b| fmt::Write::write_char(f, b as char))
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self)
    }
}

impl FromStr for RecordId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<[u8; ID_SIZE]> for RecordId {
    fn from(bytes: [u8; ID_SIZE]) -> Self {
        Self(bytes)
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(de::Error::custom)
    }
}
