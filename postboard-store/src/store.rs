use crate::{
    Action, RootState,
    posts::{self, PostsAction},
    reduce,
};
use postboard_common::{
    model::{
        Id, PostboardSnowflakeGenerator,
        post::{CreatePost, EditPost, PostMarker},
        reaction::Reaction,
    },
    snowflake::{ProcessId, WorkerId},
};
use time::UtcDateTime;
use tracing::trace;

/// Owns the current snapshot. Every change goes through [`Store::dispatch`].
#[derive(Clone, Debug)]
pub struct Store {
    state: RootState,
    snowflake_generator: PostboardSnowflakeGenerator,
}

impl Store {
    #[must_use]
    pub fn new(initial_state: RootState, worker_id: WorkerId, process_id: ProcessId) -> Self {
        Self {
            state: initial_state,
            snowflake_generator: PostboardSnowflakeGenerator::new(worker_id, process_id),
        }
    }

    #[must_use]
    pub fn state(&self) -> &RootState {
        &self.state
    }

    pub fn dispatch(&mut self, action: impl Into<Action>) {
        let action = action.into();
        trace!(?action, "Dispatching action");

        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
    }

    /// Adds a post dated now and returns its freshly generated id.
    pub fn create_post(&mut self, post: CreatePost) -> Id<PostMarker> {
        self.create_post_at(post, UtcDateTime::now())
    }

    pub fn create_post_at(&mut self, post: CreatePost, date: UtcDateTime) -> Id<PostMarker> {
        let post = posts::prepare_post(
            post,
            &self.state.posts,
            &mut self.snowflake_generator,
            date,
        );
        let id = post.id;
        self.dispatch(PostsAction::PostAdded(post));

        id
    }

    pub fn update_post(&mut self, id: Id<PostMarker>, edit: EditPost) {
        self.dispatch(PostsAction::post_updated(id, edit));
    }

    pub fn add_reaction(&mut self, post_id: Id<PostMarker>, reaction: Reaction) {
        self.dispatch(PostsAction::reaction_added(post_id, reaction));
    }
}
