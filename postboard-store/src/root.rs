use crate::{
    counter::{self, CounterAction, CounterState},
    posts::{self, PostsAction, PostsState},
};
use serde::{Deserialize, Serialize};
use time::UtcDateTime;

/// One complete snapshot of the board.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash)]
pub struct RootState {
    pub posts: PostsState,
    pub counter: CounterState,
}

impl RootState {
    #[must_use]
    pub fn seeded(now: UtcDateTime) -> Self {
        Self {
            posts: PostsState::seeded(now),
            counter: CounterState::default(),
        }
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Action {
    Posts(PostsAction),
    Counter(CounterAction),
}

impl From<PostsAction> for Action {
    fn from(value: PostsAction) -> Self {
        Self::Posts(value)
    }
}

impl From<CounterAction> for Action {
    fn from(value: CounterAction) -> Self {
        Self::Counter(value)
    }
}

/// Routes `action` to the slice it belongs to. The other slice is carried over as is.
#[must_use]
pub fn reduce(state: RootState, action: Action) -> RootState {
    let RootState {
        posts: posts_state,
        counter: counter_state,
    } = state;

    match action {
        Action::Posts(action) => RootState {
            posts: posts::reduce(posts_state, action),
            counter: counter_state,
        },
        Action::Counter(action) => RootState {
            posts: posts_state,
            counter: counter::reduce(counter_state, action),
        },
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        Action, RootState,
        counter::{CounterAction, select_count},
        posts::{PostsAction, select_all_posts},
        reduce,
    };
    use postboard_common::model::{Id, reaction::Reaction};
    use time::macros::utc_datetime;

    #[test]
    fn slices_are_reduced_independently() {
        let seeded = RootState::seeded(utc_datetime!(2025-06-01 12:00));

        let counted = reduce(seeded.clone(), CounterAction::IncrementByAmount(3).into());
        assert_eq!(select_count(&counted), 3);
        assert_eq!(counted.posts, seeded.posts);

        let reacted = reduce(
            counted.clone(),
            PostsAction::reaction_added(Id::from(1_u64), Reaction::ThumbsUp).into(),
        );
        assert_eq!(select_count(&reacted), 3);
        assert_eq!(
            select_all_posts(&reacted)[0]
                .reactions
                .get(Reaction::ThumbsUp),
            1
        );
    }

    #[test]
    fn actions_deserialize_into_their_slice() {
        let action: Action = serde_json::from_str(r#"{"type":"increment"}"#).unwrap();
        assert_eq!(action, Action::Counter(CounterAction::Increment));

        let action: Action =
            serde_json::from_str(r#"{"type":"incrementByAmount","payload":-2}"#).unwrap();
        assert_eq!(action, Action::Counter(CounterAction::IncrementByAmount(-2)));

        let action: Action = serde_json::from_str(
            r#"{"type":"reactionAdded","payload":{"postId":"2","reaction":"eyes"}}"#,
        )
        .unwrap();
        assert_eq!(
            action,
            Action::Posts(PostsAction::reaction_added(Id::from(2_u64), Reaction::Eyes))
        );

        assert!(serde_json::from_str::<Action>(r#"{"type":"postDeleted"}"#).is_err());
    }
}
