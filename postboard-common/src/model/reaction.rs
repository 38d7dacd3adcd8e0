use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};
use thiserror::Error;

/// The closed set of reactions a reader can leave on a post.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Reaction {
    ThumbsUp,
    Hooray,
    Heart,
    Rocket,
    Eyes,
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("Unknown reaction: {0}")]
pub struct UnknownReactionError(String);

impl Reaction {
    pub const ALL: [Reaction; 5] = [
        Reaction::ThumbsUp,
        Reaction::Hooray,
        Reaction::Heart,
        Reaction::Rocket,
        Reaction::Eyes,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Reaction::ThumbsUp => "thumbsUp",
            Reaction::Hooray => "hooray",
            Reaction::Heart => "heart",
            Reaction::Rocket => "rocket",
            Reaction::Eyes => "eyes",
        }
    }
}

impl Display for Reaction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Reaction {
    type Err = UnknownReactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Reaction::ALL
            .into_iter()
            .find(|reaction| reaction.name() == s)
            .ok_or_else(|| UnknownReactionError(s.to_owned()))
    }
}

/// One counter per [`Reaction`]. Counters only ever go up.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reactions {
    thumbs_up: u64,
    hooray: u64,
    heart: u64,
    rocket: u64,
    eyes: u64,
}

impl Reactions {
    #[must_use]
    pub fn get(&self, reaction: Reaction) -> u64 {
        match reaction {
            Reaction::ThumbsUp => self.thumbs_up,
            Reaction::Hooray => self.hooray,
            Reaction::Heart => self.heart,
            Reaction::Rocket => self.rocket,
            Reaction::Eyes => self.eyes,
        }
    }

    /// Adds one to the counter for `reaction`, saturating at `u64::MAX`.
    pub fn increment(&mut self, reaction: Reaction) {
        let counter = match reaction {
            Reaction::ThumbsUp => &mut self.thumbs_up,
            Reaction::Hooray => &mut self.hooray,
            Reaction::Heart => &mut self.heart,
            Reaction::Rocket => &mut self.rocket,
            Reaction::Eyes => &mut self.eyes,
        };
        *counter = counter.saturating_add(1);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Reaction, u64)> + '_ {
        Reaction::ALL
            .into_iter()
            .map(move |reaction| (reaction, self.get(reaction)))
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.iter()
            .fold(0, |total, (_, count)| total.saturating_add(count))
    }
}
