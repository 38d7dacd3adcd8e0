pub mod post;
pub mod reaction;
pub mod user;

use crate::snowflake::{Epoch, ParseSnowflakeError, Snowflake, SnowflakeGenerator};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, marker::PhantomData, str::FromStr};
use time::{UtcDateTime, macros::utc_datetime};

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct PostboardEpoch;
impl Epoch for PostboardEpoch {
    const EPOCH_TIME: UtcDateTime = utc_datetime!(2025-01-01 00:00);
}

pub type PostboardSnowflake = Snowflake<PostboardEpoch>;
pub type PostboardSnowflakeGenerator = SnowflakeGenerator<PostboardEpoch>;

/// A snowflake tagged with the kind of entity it identifies.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Id<Marker>(PostboardSnowflake, #[serde(skip)] PhantomData<Marker>);

impl<Marker> Id<Marker> {
    #[must_use]
    pub fn new(snowflake: PostboardSnowflake) -> Self {
        Self(snowflake, PhantomData)
    }
}

impl<Marker> Display for Id<Marker> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<Marker> FromStr for Id<Marker> {
    type Err = ParseSnowflakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PostboardSnowflake::from_str(s).map(Self::new)
    }
}

impl<Marker> From<PostboardSnowflake> for Id<Marker> {
    fn from(value: PostboardSnowflake) -> Self {
        Self::new(value)
    }
}

impl<Marker> From<u64> for Id<Marker> {
    fn from(value: u64) -> Self {
        Id::new(PostboardSnowflake::new(value))
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{Id, post::PostMarker, user::UserMarker};

    #[test]
    fn ids_parse_from_decimal_strings() {
        let id: Id<PostMarker> = "7".parse().unwrap();
        assert_eq!(id, Id::from(7_u64));
        assert_eq!(id.to_string(), "7");
        assert!("".parse::<Id<UserMarker>>().is_err());
        assert!("-1".parse::<Id<UserMarker>>().is_err());
    }
}
