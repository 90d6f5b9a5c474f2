//! Request extractors that turn malformed input into `ApiError`.

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use warden_core::validation::{FieldErrors, Validate};
use warden_domain::pagination::{PageRequest, PageRequestError};

use crate::error::ApiError;

/// JSON body that has passed its field rules. Parse failures and rule
/// violations are both 422.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                ApiError::Validation(FieldErrors::single("body", rejection.body_text()))
            })?;
        value.validate().map_err(ApiError::Validation)?;
        Ok(Self(value))
    }
}

/// `?page=&limit=` with defaults 1 / 10, validated.
pub struct PageQuery(pub PageRequest);

impl<S> FromRequestParts<S> for PageQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    // Parse synchronously and return a 'static future (axum-core 0.5 signature).
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let result = parse_page_query(parts.uri.query());
        async move { result }
    }
}

pub fn parse_page_query(raw: Option<&str>) -> Result<PageQuery, ApiError> {
    let page: PageRequest = serde_qs::from_str(raw.unwrap_or_default())
        .map_err(|e| ApiError::Validation(FieldErrors::single("query", e.to_string())))?;
    page.validate().map_err(|e| {
        let field = match e {
            PageRequestError::Page | PageRequestError::PageTooLarge => "page",
            PageRequestError::Limit => "limit",
        };
        ApiError::Validation(FieldErrors::single(field, e.to_string()))
    })?;
    Ok(PageQuery(page))
}

/// Parse a path id. A malformed UUID is 400, not 404.
pub fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::InvalidId)
}
