use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use super::jwt::JwtKeys;
use crate::error::ApiError;

/// Extracts and validates the bearer token, resolving the caller's user ID.
/// A missing or non-Bearer header is 401; a token that fails verification
/// for any reason is 403. Handlers taking this extractor cannot run without
/// an authenticated identity.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);

        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or(ApiError::Unauthorized)?;

        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "token rejected");
            ApiError::Forbidden
        })?;

        Ok(AuthUser(claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::get,
        Router,
    };
    use jsonwebtoken::{DecodingKey, EncodingKey};
    use tower::ServiceExt;

    use crate::state::AppState;

    fn test_app() -> (Router, JwtKeys) {
        let state = AppState::fake();
        let keys = JwtKeys::from_ref(&state);
        let app = Router::new()
            .route(
                "/whoami",
                get(|AuthUser(id): AuthUser| async move { id.to_string() }),
            )
            .with_state(state);
        (app, keys)
    }

    fn get_whoami(auth: Option<String>) -> Request<Body> {
        let mut builder = Request::builder().uri("/whoami");
        if let Some(value) = auth {
            builder = builder.header("Authorization", value);
        }
        builder.body(Body::empty()).expect("request")
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let (app, _) = test_app();
        let res = app.oneshot(get_whoami(None)).await.expect("oneshot");
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_unauthorized() {
        let (app, _) = test_app();
        let res = app
            .oneshot(get_whoami(Some("Basic dXNlcjpwdw==".into())))
            .await
            .expect("oneshot");
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn garbage_token_is_forbidden() {
        let (app, _) = test_app();
        let res = app
            .oneshot(get_whoami(Some("Bearer not-a-jwt".into())))
            .await
            .expect("oneshot");
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn foreign_signed_token_is_forbidden() {
        let (app, keys) = test_app();
        let other = JwtKeys {
            encoding: EncodingKey::from_secret(b"other-secret"),
            decoding: DecodingKey::from_secret(b"other-secret"),
            issuer: keys.issuer.clone(),
            audience: keys.audience.clone(),
            ttl: keys.ttl,
        };
        let token = other.sign(Uuid::new_v4()).expect("sign");
        let res = app
            .oneshot(get_whoami(Some(format!("Bearer {token}"))))
            .await
            .expect("oneshot");
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn valid_token_resolves_user() {
        let (app, keys) = test_app();
        let user_id = Uuid::new_v4();
        let token = keys.sign(user_id).expect("sign");
        let res = app
            .oneshot(get_whoami(Some(format!("Bearer {token}"))))
            .await
            .expect("oneshot");
        assert_eq!(res.status(), StatusCode::OK);
    }
}
