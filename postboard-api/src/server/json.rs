use crate::server::{Result, ServerError};
use axum::{
    Json as AxumJson,
    extract::FromRequest,
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use axum_extra::{TypedHeader, routing::TypedPath};
use headers::ContentType;
use serde::Serialize;

/// JSON request bodies and responses. Rejections and serialization failures become
/// [`ServerError`]s so they share the error body of every other failure.
#[derive(FromRequest, Debug, Clone, Copy, Default)]
#[from_request(via(AxumJson), rejection(ServerError))]
pub struct Json<T>(pub T);

fn json_body<T: Serialize>(value: &T) -> Result<(TypedHeader<ContentType>, Vec<u8>)> {
    let json = serde_json::to_vec(value)?;

    Ok((TypedHeader(ContentType::json()), json))
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        json_body(&self.0).into_response()
    }
}

/// `201 Created` pointing at where the new resource can be read back.
#[derive(Debug, Clone)]
pub struct Created<T> {
    location: Uri,
    body: T,
}

impl<T> Created<T> {
    #[must_use]
    pub fn at(path: &impl TypedPath, body: T) -> Self {
        Self {
            location: path.to_uri(),
            body,
        }
    }
}

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        let location = [(header::LOCATION, self.location.to_string())];

        json_body(&self.body)
            .map(|body| (StatusCode::CREATED, location, body))
            .into_response()
    }
}
