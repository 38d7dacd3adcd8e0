use crate::model::{Id, reaction::Reactions, user::UserMarker};
use serde::{Deserialize, Serialize};
use time::UtcDateTime;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct PostMarker;

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
pub struct Post {
    pub id: Id<PostMarker>,
    pub title: String,
    pub content: String,
    pub user: Id<UserMarker>,
    #[serde(with = "crate::util::iso8601")]
    pub date: UtcDateTime,
    pub reactions: Reactions,
}

/// What a reader submits to write a new post. Id and date are assigned by the store.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePost {
    pub title: String,
    pub content: String,
    pub user_id: Id<UserMarker>,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct EditPost {
    pub title: String,
    pub content: String,
}

impl Post {
    /// A post with every reaction counter at zero.
    #[must_use]
    pub fn new(
        id: Id<PostMarker>,
        CreatePost {
            title,
            content,
            user_id,
        }: CreatePost,
        date: UtcDateTime,
    ) -> Self {
        Self {
            id,
            title,
            content,
            user: user_id,
            date,
            reactions: Reactions::default(),
        }
    }
}
