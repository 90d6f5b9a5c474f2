//! `Authorization: Bearer <token>` extractor.

use axum::extract::FromRequestParts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};
use http::request::Parts;
use http::HeaderMap;

/// Raw bearer token, if the request carried one.
///
/// Never rejects: an absent or unparsable header yields `BearerToken(None)` and the
/// guard decides what that means for the operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub Option<String>);

impl BearerToken {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let token = headers
            .typed_get::<Authorization<Bearer>>()
            .map(|auth| auth.token().to_owned())
            .filter(|t| !t.is_empty());
        Self(token)
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    // Read headers synchronously and return a 'static future (axum-core 0.5 signature).
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = Self::from_headers(&parts.headers);
        async move { Ok(token) }
    }
}
