use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use common::domain::DomainError;
use common::http::ApiError;
use http::request::Parts;
use serde::de::DeserializeOwned;
use std::convert::Infallible;

/// Header set by the authenticating reverse proxy
pub const REMOTE_USER_HEADER: &str = "x-remote-user";

/// JSON body whose rejections use the shared failure shape (400)
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError(DomainError::ValidationError(
                rejection.body_text(),
            ))),
        }
    }
}

/// Query string extractor with the shared failure shape
#[derive(Debug, Clone)]
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError(DomainError::ValidationError(
                rejection.body_text(),
            ))),
        }
    }
}

/// Path parameters with the shared failure shape
#[derive(Debug, Clone)]
pub struct ApiPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError(DomainError::ValidationError(
                rejection.body_text(),
            ))),
        }
    }
}

/// Staff identity forwarded by the reverse proxy, if any
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaffUser(pub Option<String>);

impl StaffUser {
    pub fn into_inner(self) -> Option<String> {
        self.0
    }
}

impl<S> FromRequestParts<S> for StaffUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .headers
            .get(REMOTE_USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        Ok(Self(user))
    }
}
