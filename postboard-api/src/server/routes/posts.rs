use crate::server::{
    Result, ServerError, ServerRouter, SharedStore,
    json::{Created, Json},
};
use axum::extract::State;
use axum_extra::routing::{RouterExt, TypedPath};
use postboard_common::model::{
    Id,
    post::{CreatePost, EditPost, Post, PostMarker},
    reaction::Reaction,
};
use postboard_store::{
    RootState,
    posts::{select_all_posts, select_post_by_id},
};
use serde::Deserialize;
use tracing::info;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(list_posts)
        .typed_post(create_post)
        .typed_get(get_post)
        .typed_post(edit_post)
        .typed_post(add_reaction)
}

fn post_by_id(state: &RootState, id: Id<PostMarker>) -> Result<Post> {
    select_post_by_id(state, id)
        .cloned()
        .ok_or(ServerError::PostByIdNotFound(id))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts", rejection(ServerError))]
struct ListPostsPath();

async fn list_posts(
    ListPostsPath(): ListPostsPath,
    State(store): State<SharedStore>,
) -> Json<Vec<Post>> {
    let store = store.read().await;

    Json(select_all_posts(store.state()).to_vec())
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts/{id}", rejection(ServerError))]
struct GetPostPath {
    id: Id<PostMarker>,
}

async fn get_post(
    GetPostPath { id }: GetPostPath,
    State(store): State<SharedStore>,
) -> Result<Json<Post>> {
    let store = store.read().await;

    Ok(Json(post_by_id(store.state(), id)?))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts/create", rejection(ServerError))]
struct CreatePostPath();

async fn create_post(
    CreatePostPath(): CreatePostPath,
    State(store): State<SharedStore>,
    Json(submission): Json<CreatePost>,
) -> Result<Created<Post>> {
    let mut store = store.write().await;
    let id = store.create_post(submission);
    info!(post_id = %id, "Created post");

    Ok(Created::at(&GetPostPath { id }, post_by_id(store.state(), id)?))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts/{id}/edit", rejection(ServerError))]
struct EditPostPath {
    id: Id<PostMarker>,
}

async fn edit_post(
    EditPostPath { id }: EditPostPath,
    State(store): State<SharedStore>,
    Json(edit): Json<EditPost>,
) -> Result<Json<Post>> {
    let mut store = store.write().await;
    // The store ignores unknown ids, but a client asking for one deserves a 404.
    post_by_id(store.state(), id)?;
    store.update_post(id, edit);

    Ok(Json(post_by_id(store.state(), id)?))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts/{id}/reactions", rejection(ServerError))]
struct PostReactionsPath {
    id: Id<PostMarker>,
}

#[derive(Deserialize)]
struct AddReaction {
    reaction: String,
}

async fn add_reaction(
    PostReactionsPath { id }: PostReactionsPath,
    State(store): State<SharedStore>,
    Json(AddReaction { reaction }): Json<AddReaction>,
) -> Result<Json<Post>> {
    let reaction: Reaction = reaction.parse()?;

    let mut store = store.write().await;
    post_by_id(store.state(), id)?;
    store.add_reaction(id, reaction);

    Ok(Json(post_by_id(store.state(), id)?))
}
