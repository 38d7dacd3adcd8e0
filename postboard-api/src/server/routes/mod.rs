use crate::server::ServerRouter;

mod counter;
mod posts;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .merge(posts::routes())
        .merge(counter::routes())
}
