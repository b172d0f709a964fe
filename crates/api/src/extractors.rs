//! Request extractors.

use axum::{extract::FromRequestParts, http::request::Parts};
use clipstream_common::{AppError, IdentityClaims};
use clipstream_db::entities::user;

/// Authenticated user extractor.
///
/// Rejections go through [`AppError`] so a missing identity produces the
/// same `{"message"}` body as every other error.
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by the auth middleware when the bearer token verified.
        parts
            .extensions
            .get::<user::Model>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}

/// Optional authenticated user extractor.
///
/// Used where anonymous access is allowed but identity changes behavior,
/// such as view counting.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<user::Model>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<user::Model>().cloned()))
    }
}

/// Verified identity claims extractor.
///
/// Available whenever the bearer token verified, even before a local user
/// row exists; the sync endpoint depends on this.
#[derive(Debug, Clone)]
pub struct AuthClaims(pub IdentityClaims);

impl<S> FromRequestParts<S> for AuthClaims
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<IdentityClaims>()
            .cloned()
            .map(AuthClaims)
            .ok_or(AppError::Unauthorized)
    }
}
