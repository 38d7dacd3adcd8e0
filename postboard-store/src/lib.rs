//! In-memory state container for the post board.
//!
//! State is a tree of immutable snapshots ([`RootState`]). An [`Action`] describes one intended
//! change; [`reduce`] turns a snapshot and an action into the next snapshot. Selectors such as
//! [`posts::select_all_posts`] read from a snapshot. [`Store`] owns the current snapshot and the
//! id generator used to prepare new posts.

pub mod counter;
pub mod posts;
mod root;
mod store;

pub use root::{Action, RootState, reduce};
pub use store::Store;
