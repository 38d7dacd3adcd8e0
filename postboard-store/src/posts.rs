//! The posts slice: an insertion-ordered list of posts with unique ids.

use crate::RootState;
use postboard_common::model::{
    Id, PostboardSnowflakeGenerator,
    post::{CreatePost, EditPost, Post, PostMarker},
    reaction::Reaction,
};
use serde::{Deserialize, Serialize};
use time::{Duration, UtcDateTime};
use tracing::debug;

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash)]
pub struct PostsState(Vec<Post>);

impl PostsState {
    /// The two posts every fresh board starts with, dated ten minutes before `now`.
    #[must_use]
    pub fn seeded(now: UtcDateTime) -> Self {
        let date = now - Duration::minutes(10);
        let seed = |id: u64, title: &str, content: &str, user: u64| {
            Post::new(
                Id::from(id),
                CreatePost {
                    title: title.to_owned(),
                    content: content.to_owned(),
                    user_id: Id::from(user),
                },
                date,
            )
        };

        Self(vec![
            seed(1, "First Post!", "Hello!", 0),
            seed(2, "Second Post", "More text", 1),
        ])
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Post] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn find(&self, id: Id<PostMarker>) -> Option<&Post> {
        self.0.iter().find(|post| post.id == id)
    }

    fn find_mut(&mut self, id: Id<PostMarker>) -> Option<&mut Post> {
        self.0.iter_mut().find(|post| post.id == id)
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum PostsAction {
    /// Carries a fully prepared post, see [`prepare_post`].
    PostAdded(Post),
    PostUpdated {
        id: Id<PostMarker>,
        title: String,
        content: String,
    },
    ReactionAdded {
        post_id: Id<PostMarker>,
        reaction: Reaction,
    },
}

impl PostsAction {
    #[must_use]
    pub fn post_updated(id: Id<PostMarker>, EditPost { title, content }: EditPost) -> Self {
        Self::PostUpdated { id, title, content }
    }

    #[must_use]
    pub fn reaction_added(post_id: Id<PostMarker>, reaction: Reaction) -> Self {
        Self::ReactionAdded { post_id, reaction }
    }
}

/// Turns a submission into a complete post: a fresh id from `generator`, `date` as the
/// creation time and zeroed reactions.
///
/// The id is one that `existing` does not hold yet. This is the only impure step of adding a
/// post. The reducer then just appends the result.
#[must_use]
pub fn prepare_post(
    create: CreatePost,
    existing: &PostsState,
    generator: &mut PostboardSnowflakeGenerator,
    date: UtcDateTime,
) -> Post {
    // Seed posts and posts from wire actions carry ids the generator never handed out.
    let id = loop {
        let id = generator.generate_at(date).into();
        if existing.find(id).is_none() {
            break id;
        }
    };

    Post::new(id, create, date)
}

/// Applies `action` to `state`.
///
/// Updates and reactions aimed at an unknown post leave the state as it was, as does adding a
/// post whose id is already taken.
#[must_use]
pub fn reduce(mut state: PostsState, action: PostsAction) -> PostsState {
    match action {
        PostsAction::PostAdded(post) => {
            if state.find(post.id).is_some() {
                debug!(post_id = %post.id, "Ignoring new post with a taken id");
            } else {
                state.0.push(post);
            }
        }
        PostsAction::PostUpdated { id, title, content } => match state.find_mut(id) {
            Some(post) => {
                post.title = title;
                post.content = content;
            }
            None => debug!(post_id = %id, "Ignoring update of unknown post"),
        },
        PostsAction::ReactionAdded { post_id, reaction } => match state.find_mut(post_id) {
            Some(post) => post.reactions.increment(reaction),
            None => debug!(%post_id, %reaction, "Ignoring reaction to unknown post"),
        },
    }

    state
}

#[must_use]
pub fn select_all_posts(state: &RootState) -> &[Post] {
    state.posts.as_slice()
}

#[must_use]
pub fn select_post_by_id(state: &RootState, id: Id<PostMarker>) -> Option<&Post> {
    state.posts.find(id)
}

#[cfg(test)]
mod tests {
    use crate::posts::{PostsAction, PostsState, prepare_post, reduce};
    use postboard_common::{
        model::{
            Id, PostboardSnowflakeGenerator,
            post::{CreatePost, EditPost, Post, PostMarker},
            reaction::Reaction,
        },
        snowflake::{ProcessId, WorkerId},
    };
    use time::{Duration, macros::utc_datetime};

    fn generator() -> PostboardSnowflakeGenerator {
        PostboardSnowflakeGenerator::new(WorkerId::new_unchecked(1), ProcessId::new_unchecked(2))
    }

    fn submission(title: &str, content: &str, user: u64) -> CreatePost {
        CreatePost {
            title: title.to_owned(),
            content: content.to_owned(),
            user_id: Id::from(user),
        }
    }

    fn seeded() -> PostsState {
        PostsState::seeded(utc_datetime!(2025-06-01 12:00))
    }

    #[test]
    fn seed_posts() {
        let state = seeded();
        let posts = state.as_slice();

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, Id::from(1_u64));
        assert_eq!(posts[0].title, "First Post!");
        assert_eq!(posts[0].user, Id::from(0_u64));
        assert_eq!(posts[1].id, Id::from(2_u64));
        assert_eq!(posts[1].content, "More text");
        assert_eq!(posts[1].user, Id::from(1_u64));
        for post in posts {
            assert_eq!(post.date, utc_datetime!(2025-06-01 12:00) - Duration::minutes(10));
            assert_eq!(post.reactions.total(), 0);
        }
    }

    #[test]
    fn prepared_posts_are_appended() {
        let mut generator = generator();
        let date = utc_datetime!(2025-06-01 12:30);
        let post = prepare_post(submission("T", "C", 7), &seeded(), &mut generator, date);

        let state = reduce(seeded(), PostsAction::PostAdded(post.clone()));

        assert_eq!(state.len(), 3);
        assert_eq!(state.as_slice().last(), Some(&post));
        assert_eq!(post.user, Id::from(7_u64));
        assert_eq!(post.date, date);
        assert_eq!(post.reactions.total(), 0);
        assert_eq!(&state.as_slice()[..2], seeded().as_slice());
    }

    #[test]
    fn prepared_ids_skip_ids_already_on_the_board() {
        // At the epoch a generator for worker 0 and process 0 counts 0, 1, 2, ...
        let mut generator = PostboardSnowflakeGenerator::new(
            WorkerId::new_unchecked(0),
            ProcessId::new_unchecked(0),
        );
        let date = utc_datetime!(2024-12-31 23:59);
        let mut state = seeded();

        for n in 0..3 {
            let post = prepare_post(submission("T", "C", n), &state, &mut generator, date);
            state = reduce(state, PostsAction::PostAdded(post));
        }

        let ids: Vec<_> = state.as_slice().iter().map(|post| post.id).collect();
        assert_eq!(ids, [1_u64, 2, 0, 3, 4].map(Id::<PostMarker>::from));
        assert!(state.as_slice()[2..].iter().all(|post| post.date == date));
    }

    #[test]
    fn taken_ids_are_not_added_twice() {
        let state = seeded();
        let duplicate = Post {
            title: "Impostor".to_owned(),
            ..state.as_slice()[0].clone()
        };

        assert_eq!(
            reduce(state.clone(), PostsAction::PostAdded(duplicate)),
            state
        );
    }

    #[test]
    fn update_changes_only_title_and_content() {
        let before = reduce(
            seeded(),
            PostsAction::reaction_added(Id::from(2_u64), Reaction::Hooray),
        );
        let after = reduce(
            before.clone(),
            PostsAction::post_updated(
                Id::from(2_u64),
                EditPost {
                    title: "New Title".to_owned(),
                    content: "New Body".to_owned(),
                },
            ),
        );

        let old = before.find(Id::from(2_u64)).unwrap();
        let new = after.find(Id::from(2_u64)).unwrap();
        assert_eq!(new.title, "New Title");
        assert_eq!(new.content, "New Body");
        assert_eq!(new.id, old.id);
        assert_eq!(new.user, old.user);
        assert_eq!(new.date, old.date);
        assert_eq!(new.reactions, old.reactions);
        assert_eq!(after.find(Id::from(1_u64)), before.find(Id::from(1_u64)));
    }

    #[test]
    fn update_of_unknown_post_is_ignored() {
        let state = seeded();
        let action = PostsAction::post_updated(
            Id::from(99_u64),
            EditPost {
                title: "Nope".to_owned(),
                content: "Nope".to_owned(),
            },
        );

        assert_eq!(reduce(state.clone(), action), state);
    }

    #[test]
    fn reactions_count_up_one_at_a_time() {
        let mut state = seeded();
        for _ in 0..5 {
            state = reduce(
                state,
                PostsAction::reaction_added(Id::from(1_u64), Reaction::Heart),
            );
        }

        let post = state.find(Id::from(1_u64)).unwrap();
        for (reaction, count) in post.reactions.iter() {
            let expected = if reaction == Reaction::Heart { 5 } else { 0 };
            assert_eq!(count, expected, "{reaction}");
        }
        assert_eq!(state.find(Id::from(2_u64)), seeded().find(Id::from(2_u64)));
    }

    #[test]
    fn reaction_to_unknown_post_is_ignored() {
        let state = seeded();
        let action = PostsAction::reaction_added(Id::from(3_u64), Reaction::Eyes);

        assert_eq!(reduce(state.clone(), action), state);
    }

    #[test]
    fn earlier_snapshots_are_untouched() {
        let first = seeded();
        let second = reduce(
            first.clone(),
            PostsAction::reaction_added(Id::from(1_u64), Reaction::Rocket),
        );

        assert_ne!(first, second);
        assert_eq!(first, seeded());
    }

    #[test]
    fn actions_in_wire_form() {
        let update: PostsAction = serde_json::from_str(
            r#"{"type":"postUpdated","payload":{"id":"2","title":"T","content":"C"}}"#,
        )
        .unwrap();
        assert_eq!(
            update,
            PostsAction::PostUpdated {
                id: Id::from(2_u64),
                title: "T".to_owned(),
                content: "C".to_owned(),
            }
        );

        let reaction: PostsAction = serde_json::from_str(
            r#"{"type":"reactionAdded","payload":{"postId":"1","reaction":"thumbsUp"}}"#,
        )
        .unwrap();
        assert_eq!(
            reaction,
            PostsAction::reaction_added(Id::from(1_u64), Reaction::ThumbsUp)
        );

        assert!(
            serde_json::from_str::<PostsAction>(
                r#"{"type":"reactionAdded","payload":{"postId":"1","reaction":"confused"}}"#,
            )
            .is_err()
        );
    }
}
