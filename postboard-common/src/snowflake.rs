//! Snowflake ids.
//!
//! A snowflake packs, from the most significant bit down, 42 bits of milliseconds since an
//! [`Epoch`], a 5 bit worker id, a 5 bit process id and a 12 bit increment. On the wire it is
//! a decimal string, so clients that only have 53 bit floats don't lose precision.

use derive_where::derive_where;
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{Error, Unexpected},
};
use std::{
    fmt::{Display, Formatter},
    marker::PhantomData,
    num::ParseIntError,
    str::FromStr,
};
use thiserror::Error;
use time::{Duration, UtcDateTime};

pub const INCREMENT_BITS: u32 = 12;
pub const PROCESS_ID_BITS: u32 = 5;
pub const WORKER_ID_BITS: u32 = 5;
pub const TIMESTAMP_BITS: u32 = 42;

pub const INCREMENT_SHIFT: u32 = 0;
pub const PROCESS_ID_SHIFT: u32 = INCREMENT_SHIFT + INCREMENT_BITS;
pub const WORKER_ID_SHIFT: u32 = PROCESS_ID_SHIFT + PROCESS_ID_BITS;
pub const TIMESTAMP_SHIFT: u32 = WORKER_ID_SHIFT + WORKER_ID_BITS;

const fn mask(bits: u32) -> u64 {
    (1 << bits) - 1
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Error)]
pub enum SnowflakeTimestampFromDateTimeError {
    #[error("Specified time was before the snowflake epoch.")]
    TimeBeforeEpoch,
    #[error("Resulting timestamp uses too many bits.")]
    TimestampTooLarge,
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Error)]
#[error("{part} out of range: {value}")]
pub struct SnowflakePartOutOfRangeError {
    part: &'static str,
    value: u64,
}

#[derive(Clone, Eq, PartialEq, Debug, Error)]
#[error("Invalid snowflake: {0}")]
pub struct ParseSnowflakeError(#[from] ParseIntError);

pub trait Epoch {
    const EPOCH_TIME: UtcDateTime;
}

macro_rules! snowflake_part {
    ($name:ident: $repr:ty, bits = $bits:ident, shift = $shift:ident) => {
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name($repr);

        impl $name {
            #[allow(clippy::cast_possible_truncation)]
            pub const MAX: $repr = mask($bits) as $repr;

            #[must_use]
            pub fn new(value: $repr) -> Option<Self> {
                (value <= Self::MAX).then_some(Self(value))
            }

            #[must_use]
            pub fn new_unchecked(value: $repr) -> Self {
                Self::new(value).expect(concat!(stringify!($name), " out of range."))
            }

            #[must_use]
            pub fn get(self) -> $repr {
                self.0
            }

            #[allow(clippy::cast_possible_truncation)]
            fn extract(snowflake: u64) -> Self {
                Self(((snowflake >> $shift) & mask($bits)) as $repr)
            }

            fn pack(self) -> u64 {
                u64::from(self.0) << $shift
            }
        }

        impl TryFrom<$repr> for $name {
            type Error = SnowflakePartOutOfRangeError;

            fn try_from(value: $repr) -> Result<Self, Self::Error> {
                Self::new(value).ok_or(SnowflakePartOutOfRangeError {
                    part: stringify!($name),
                    value: value.into(),
                })
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let inner = <$repr>::deserialize(deserializer)?;
                Self::new(inner).ok_or_else(|| {
                    Error::invalid_value(Unexpected::Unsigned(inner.into()), &stringify!($name))
                })
            }
        }
    };
}

snowflake_part!(WorkerId: u8, bits = WORKER_ID_BITS, shift = WORKER_ID_SHIFT);
snowflake_part!(ProcessId: u8, bits = PROCESS_ID_BITS, shift = PROCESS_ID_SHIFT);
snowflake_part!(SnowflakeIncrement: u16, bits = INCREMENT_BITS, shift = INCREMENT_SHIFT);

impl SnowflakeIncrement {
    #[must_use]
    pub fn next(self) -> Self {
        Self((self.0 + 1) & Self::MAX)
    }

    pub fn increment(&mut self) {
        *self = self.next();
    }
}

/// Milliseconds since `SnowflakeEpoch`, limited to [`TIMESTAMP_BITS`] bits.
#[derive_where(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct SnowflakeTimestamp<SnowflakeEpoch>(u64, PhantomData<SnowflakeEpoch>);

impl<SnowflakeEpoch> SnowflakeTimestamp<SnowflakeEpoch> {
    pub const MAX: u64 = mask(TIMESTAMP_BITS);

    #[must_use]
    pub fn new(millis: u64) -> Option<Self> {
        (millis <= Self::MAX).then_some(Self(millis, PhantomData))
    }

    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }

    /// The following millisecond, saturating at [`Self::MAX`].
    fn next(self) -> Self {
        Self((self.0 + 1).min(Self::MAX), PhantomData)
    }

    fn extract(snowflake: u64) -> Self {
        Self((snowflake >> TIMESTAMP_SHIFT) & Self::MAX, PhantomData)
    }
}

impl<SnowflakeEpoch: Epoch> TryFrom<UtcDateTime> for SnowflakeTimestamp<SnowflakeEpoch> {
    type Error = SnowflakeTimestampFromDateTimeError;

    fn try_from(value: UtcDateTime) -> Result<Self, Self::Error> {
        let millis = (value - SnowflakeEpoch::EPOCH_TIME).whole_milliseconds();
        if millis < 0 {
            return Err(Self::Error::TimeBeforeEpoch);
        }
        let millis = u64::try_from(millis).map_err(|_| Self::Error::TimestampTooLarge)?;
        Self::new(millis).ok_or(Self::Error::TimestampTooLarge)
    }
}

impl<SnowflakeEpoch: Epoch> From<SnowflakeTimestamp<SnowflakeEpoch>> for UtcDateTime {
    fn from(value: SnowflakeTimestamp<SnowflakeEpoch>) -> Self {
        // At most 42 bits, so the signed cast is lossless.
        SnowflakeEpoch::EPOCH_TIME + Duration::milliseconds(value.0.cast_signed())
    }
}

#[derive_where(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct Snowflake<SnowflakeEpoch>(u64, PhantomData<SnowflakeEpoch>);

impl<SnowflakeEpoch> Snowflake<SnowflakeEpoch> {
    #[must_use]
    pub fn new(inner: u64) -> Self {
        Self(inner, PhantomData)
    }

    #[must_use]
    pub fn from_parts(
        timestamp: SnowflakeTimestamp<SnowflakeEpoch>,
        worker_id: WorkerId,
        process_id: ProcessId,
        increment: SnowflakeIncrement,
    ) -> Self {
        Self::new(
            timestamp.get() << TIMESTAMP_SHIFT
                | worker_id.pack()
                | process_id.pack()
                | increment.pack(),
        )
    }

    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn timestamp(self) -> SnowflakeTimestamp<SnowflakeEpoch> {
        SnowflakeTimestamp::extract(self.0)
    }

    #[must_use]
    pub fn worker_id(self) -> WorkerId {
        WorkerId::extract(self.0)
    }

    #[must_use]
    pub fn process_id(self) -> ProcessId {
        ProcessId::extract(self.0)
    }

    #[must_use]
    pub fn increment(self) -> SnowflakeIncrement {
        SnowflakeIncrement::extract(self.0)
    }

    #[must_use]
    pub fn into_parts(
        self,
    ) -> (
        SnowflakeTimestamp<SnowflakeEpoch>,
        WorkerId,
        ProcessId,
        SnowflakeIncrement,
    ) {
        (
            self.timestamp(),
            self.worker_id(),
            self.process_id(),
            self.increment(),
        )
    }
}

impl<SnowflakeEpoch> Display for Snowflake<SnowflakeEpoch> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<SnowflakeEpoch> FromStr for Snowflake<SnowflakeEpoch> {
    type Err = ParseSnowflakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(u64::from_str(s)?))
    }
}

impl<SnowflakeEpoch> From<u64> for Snowflake<SnowflakeEpoch> {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl<SnowflakeEpoch> From<Snowflake<SnowflakeEpoch>> for u64 {
    fn from(value: Snowflake<SnowflakeEpoch>) -> Self {
        value.get()
    }
}

impl<SnowflakeEpoch> Serialize for Snowflake<SnowflakeEpoch> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&self.0)
    }
}

impl<'de, SnowflakeEpoch> Deserialize<'de> for Snowflake<SnowflakeEpoch> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::from_str(&raw)
            .map_err(|_| Error::invalid_value(Unexpected::Str(&raw), &"a decimal snowflake"))
    }
}

/// Hands out snowflakes for one worker/process pair.
///
/// Timestamps never go backwards. Once all 4096 increments of a millisecond are taken, the
/// generator moves on to the next millisecond, so every id it issues is distinct.
#[derive_where(Copy, Clone, Eq, PartialEq, Debug, Default, Hash)]
pub struct SnowflakeGenerator<SnowflakeEpoch> {
    worker_id: WorkerId,
    process_id: ProcessId,
    timestamp: SnowflakeTimestamp<SnowflakeEpoch>,
    next_increment: SnowflakeIncrement,
}

impl<SnowflakeEpoch> SnowflakeGenerator<SnowflakeEpoch> {
    #[must_use]
    pub fn new(worker_id: WorkerId, process_id: ProcessId) -> Self {
        Self {
            worker_id,
            process_id,
            timestamp: SnowflakeTimestamp::default(),
            next_increment: SnowflakeIncrement::default(),
        }
    }

    /// Generates a snowflake for `time`.
    ///
    /// Times before the epoch count as the epoch itself. Times that are earlier than a previously
    /// generated snowflake's timestamp reuse that timestamp.
    pub fn generate_at(&mut self, time: UtcDateTime) -> Snowflake<SnowflakeEpoch>
    where
        SnowflakeEpoch: Epoch,
    {
        let requested = match SnowflakeTimestamp::try_from(time) {
            Ok(timestamp) => timestamp,
            Err(SnowflakeTimestampFromDateTimeError::TimeBeforeEpoch) => {
                SnowflakeTimestamp::default()
            }
            Err(SnowflakeTimestampFromDateTimeError::TimestampTooLarge) => {
                SnowflakeTimestamp(SnowflakeTimestamp::<SnowflakeEpoch>::MAX, PhantomData)
            }
        };

        if requested > self.timestamp {
            self.timestamp = requested;
            self.next_increment = SnowflakeIncrement::default();
        }

        let snowflake = Snowflake::from_parts(
            self.timestamp,
            self.worker_id,
            self.process_id,
            self.next_increment,
        );

        self.next_increment.increment();
        if self.next_increment == SnowflakeIncrement::default() {
            // Every increment of this millisecond is taken.
            self.timestamp = self.timestamp.next();
        }

        snowflake
    }
}
