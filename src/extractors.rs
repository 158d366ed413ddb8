use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Path, Query},
    http::{request::Parts, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::errors::RequestError;

/// An integer row identifier taken from the route's single path parameter.
/// Anything that does not parse as an `i64` is a 400.
pub struct PathId(pub i64);

#[axum::async_trait]
impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = RequestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(%rejection, "rejected path parameter");
                RequestError::bad_request()
            })?;
        match raw.parse::<i64>() {
            Ok(id) => Ok(PathId(id)),
            Err(_) => {
                tracing::debug!(id = %raw, "identifier is not an integer");
                Err(RequestError::bad_request())
            }
        }
    }
}

/// `Path<T>` with rejections in the `{"msg": ...}` shape.
pub struct PathParam<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for PathParam<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = RequestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(%rejection, "rejected path parameter");
                RequestError::bad_request()
            })?;
        Ok(PathParam(value))
    }
}

/// `Json<T>` that reports malformed bodies as `{"msg": "Bad request"}`.
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<S, B, T> FromRequest<S, B> for JsonBody<T>
where
    Json<T>: FromRequest<S, B, Rejection = JsonRejection>,
    S: Send + Sync,
    B: Send + 'static,
{
    type Rejection = RequestError;

    async fn from_request(req: Request<B>, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(%rejection, "rejected request body");
                RequestError::bad_request()
            })?;
        Ok(JsonBody(value))
    }
}

/// `Query<T>` with the same error shape as every other rejection.
pub struct QueryParams<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = RequestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(%rejection, "rejected query string");
                RequestError::bad_request()
            })?;
        Ok(QueryParams(value))
    }
}
