use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::debug;

use crate::{error::AppError, session::USER_ID_KEY};

/// Id of the logged-in user. Requests without one are sent to `/login`.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        match session.get::<i32>(USER_ID_KEY).await {
            Ok(Some(user_id)) => Ok(AuthUser(user_id)),
            Ok(None) => {
                debug!(path = %parts.uri.path(), "no user in session, redirecting to login");
                Err(Redirect::to("/login").into_response())
            }
            Err(e) => Err(AppError::from(e).into_response()),
        }
    }
}
