//! Identifiers
//!
//! Guild and member ids are the numeric ids handed to us by the chat platform.
//! Record ids are generated locally and are time-ordered:
//! - Bits 63-22: milliseconds since [`RecordId::EPOCH`]
//! - Bits 21-12: worker (0-1023)
//! - Bits 11-0:  per-millisecond sequence

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Error when parsing an id from its string form
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdParseError {
    #[error("invalid id format")]
    InvalidFormat,
}

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name(i64);

        impl $name {
            #[inline]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            #[inline]
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<i64>()
                    .map(Self)
                    .map_err(|_| IdParseError::InvalidFormat)
            }
        }

        // Strings on the wire; chat ids overflow JavaScript numbers
        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.0.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                #[derive(Deserialize)]
                #[serde(untagged)]
                enum Raw {
                    Text(String),
                    Number(i64),
                }

                match Raw::deserialize(deserializer)? {
                    Raw::Number(n) => Ok(Self(n)),
                    Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
                }
            }
        }
    };
}

numeric_id!(
    /// Chat group id of a guild
    GuildId
);
numeric_id!(
    /// Chat platform user id of a member
    MemberId
);
numeric_id!(
    /// Ledger row id (damage records, reservations, SL usages)
    RecordId
);

impl RecordId {
    /// 2020-04-01 00:00:00 UTC in milliseconds
    pub const EPOCH: i64 = 1_585_699_200_000;

    /// Milliseconds since the Unix epoch encoded in the id
    pub fn timestamp_millis(&self) -> i64 {
        (self.0 >> 22) + Self::EPOCH
    }
}

/// Lock-free generator of time-ordered [`RecordId`]s
#[derive(Debug)]
pub struct RecordIdGenerator {
    worker: i64,
    // (millis << 12) | sequence of the last id handed out
    last: AtomicI64,
}

impl RecordIdGenerator {
    pub fn new(worker: u16) -> Self {
        Self {
            worker: i64::from(worker & 0x3FF),
            last: AtomicI64::new(0),
        }
    }

    pub fn next_id(&self) -> RecordId {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as i64)
            - RecordId::EPOCH;

        let mut current = self.last.load(Ordering::Acquire);
        loop {
            let floor = now << 12;
            // A sequence overflow simply borrows the next millisecond
            let candidate = if current >= floor { current + 1 } else { floor };
            match self.last.compare_exchange_weak(
                current,
                candidate,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    let millis = candidate >> 12;
                    let sequence = candidate & 0xFFF;
                    return RecordId((millis << 22) | (self.worker << 12) | sequence);
                }
                Err(actual) => current = actual,
            }
        }
    }
}

impl Default for RecordIdGenerator {
    fn default() -> Self {
        Self::new(0)
    }
}
