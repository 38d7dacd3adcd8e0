use crate::server::{ServerRouter, SharedStore, json::Json};
use axum::{
    extract::State,
    routing::{get, post},
};
use postboard_store::counter::{CounterAction, select_count};
use serde::{Deserialize, Serialize};

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .route("/counter", get(get_count))
        .route("/counter/increment", post(increment))
        .route("/counter/decrement", post(decrement))
        .route("/counter/increment-by", post(increment_by))
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Serialize)]
struct Count {
    value: i64,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Deserialize)]
struct IncrementBy {
    amount: i64,
}

async fn get_count(State(store): State<SharedStore>) -> Json<Count> {
    let store = store.read().await;

    Json(Count {
        value: select_count(store.state()),
    })
}

async fn apply(store: &SharedStore, action: CounterAction) -> Json<Count> {
    let mut store = store.write().await;
    store.dispatch(action);

    Json(Count {
        value: select_count(store.state()),
    })
}

async fn increment(State(store): State<SharedStore>) -> Json<Count> {
    apply(&store, CounterAction::Increment).await
}

async fn decrement(State(store): State<SharedStore>) -> Json<Count> {
    apply(&store, CounterAction::Decrement).await
}

async fn increment_by(
    State(store): State<SharedStore>,
    Json(IncrementBy { amount }): Json<IncrementBy>,
) -> Json<Count> {
    apply(&store, CounterAction::IncrementByAmount(amount)).await
}

#[cfg(test)]
mod tests {
    use crate::server::{self, ServerState};
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use postboard_common::snowflake::{ProcessId, WorkerId};
    use postboard_store::{RootState, Store};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app() -> Router {
        let store = Store::new(
            RootState::default(),
            WorkerId::new_unchecked(0),
            ProcessId::new_unchecked(0),
        );
        server::routes().with_state(ServerState::new(store))
    }

    async fn post(app: &Router, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method("POST").uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn counts() {
        let app = app();

        assert_eq!(
            post(&app, "/counter/increment", None).await,
            (StatusCode::OK, json!({"value": 1}))
        );
        assert_eq!(
            post(&app, "/counter/increment-by", Some(json!({"amount": 41}))).await,
            (StatusCode::OK, json!({"value": 42}))
        );
        assert_eq!(
            post(&app, "/counter/decrement", None).await,
            (StatusCode::OK, json!({"value": 41}))
        );

        let request = Request::builder()
            .uri("/counter")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(
            serde_json::from_slice::<Value>(&bytes).unwrap(),
            json!({"value": 41})
        );
    }

    #[tokio::test]
    async fn rejects_non_numeric_amounts() {
        let (status, body) = post(
            &app(),
            "/counter/increment-by",
            Some(json!({"amount": "lots"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"status": 400}));
    }
}
