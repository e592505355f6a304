//! Request extractors for authenticated routes.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use super::AppState;
use super::error::ApiError;
use crate::auth::Claims;

/// A validated administrator session.
///
/// Rejects missing, malformed, and expired tokens, and tokens issued to
/// verified email addresses: `/admin/*` accepts administrator-bound tokens
/// only.
pub struct AdminSession(pub Claims);

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(ApiError::Unauthenticated)?;

        let claims = state
            .jwt
            .validate(&token)
            .map_err(|_| ApiError::Unauthenticated)?;

        if !claims.is_admin() {
            return Err(ApiError::Unauthenticated);
        }

        Ok(Self(claims))
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
fn bearer_token(parts: &Parts) -> Option<String> {
    let raw = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;

    let (scheme, rest) = raw.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = rest.trim();
    if token.is_empty() {
        return None;
    }

    Some(token.to_string())
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_auth(value: &str) -> Parts {
        Request::builder()
            .header(header::AUTHORIZATION, value)
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[test]
    fn bearer_token_parsed() {
        let parts = parts_with_auth("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&parts).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn bearer_scheme_case_insensitive() {
        let parts = parts_with_auth("bearer tok");
        assert_eq!(bearer_token(&parts).as_deref(), Some("tok"));
    }

    #[test]
    fn missing_header_yields_none() {
        let parts = Request::builder().body(()).unwrap().into_parts().0;
        assert!(bearer_token(&parts).is_none());
    }

    #[test]
    fn wrong_scheme_yields_none() {
        let parts = parts_with_auth("Basic dXNlcjpwYXNz");
        assert!(bearer_token(&parts).is_none());
    }

    #[test]
    fn empty_token_yields_none() {
        let parts = parts_with_auth("Bearer ");
        assert!(bearer_token(&parts).is_none());
    }
}
