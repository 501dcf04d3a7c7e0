//! Message id - the chat platform's timestamp-derived message identifier
//!
//! The native form is `"<seconds>.<microseconds>"`, e.g. `"1599393257.001900"`.
//! Message permalinks carry the same value as one undivided digit run after a
//! `p`, e.g. `p1599393257001900`; the last 6 digits are the sub-second
//! component. Both conversions are exactly invertible.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// Number of sub-second digits in a message id.
const SUBSEC_DIGITS: usize = 6;

/// Timestamp-derived message identifier in the platform's native
/// `"<seconds>.<microseconds>"` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageId(String);

impl MessageId {
    /// Parse from the native `"<seconds>.<microseconds>"` form.
    pub fn parse(s: &str) -> Result<Self, MessageIdParseError> {
        let (whole, subsec) = s
            .split_once('.')
            .ok_or_else(|| MessageIdParseError::new(s))?;

        if whole.is_empty()
            || whole.len() > 16
            || subsec.len() != SUBSEC_DIGITS
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || !subsec.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(MessageIdParseError::new(s));
        }

        Ok(Self(s.to_string()))
    }

    /// Reassemble from a permalink digit run (the digits after `p` in the
    /// permalink's last segment). The last 6 digits become the sub-second
    /// component, the remainder the whole-second component.
    pub fn from_permalink_digits(digits: &str) -> Result<Self, MessageIdParseError> {
        if digits.len() <= SUBSEC_DIGITS {
            return Err(MessageIdParseError::new(digits));
        }

        let split = digits.len() - SUBSEC_DIGITS;
        Self::parse(&format!("{}.{}", &digits[..split], &digits[split..]))
    }

    /// The permalink digit run for this id: the native form with the dot
    /// removed. Inverse of [`MessageId::from_permalink_digits`].
    pub fn permalink_digits(&self) -> String {
        self.0.replace('.', "")
    }

    /// The native string form.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric (seconds, microseconds) pair, for ordering.
    fn ts_pair(&self) -> (u64, u32) {
        // Both components are validated as short ASCII digit runs at
        // construction, so these parses cannot fail.
        let (whole, subsec) = self.0.split_once('.').unwrap_or((&self.0, "0"));
        (
            whole.parse().unwrap_or(u64::MAX),
            subsec.parse().unwrap_or(0),
        )
    }
}

impl PartialOrd for MessageId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MessageId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ts_pair().cmp(&other.ts_pair())
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for MessageId {
    type Err = MessageIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MessageId::parse(s)
    }
}

impl Serialize for MessageId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for MessageId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        MessageId::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Error when parsing a message id
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid message id: {input}")]
pub struct MessageIdParseError {
    input: String,
}

impl MessageIdParseError {
    fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
        }
    }
}
