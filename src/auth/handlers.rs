use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::CredentialsForm,
        services::{self, INVALID_LOGIN, MISSING_CREDENTIALS, USERNAME_TAKEN},
    },
    error::AppError,
    session::USER_ID_KEY,
    state::AppState,
    views,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/register", get(register_form).post(register))
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
}

#[instrument(skip(session))]
pub async fn index(session: Session) -> Result<Redirect, AppError> {
    let target = match session.get::<i32>(USER_ID_KEY).await? {
        Some(_) => "/search",
        None => "/login",
    };
    Ok(Redirect::to(target))
}

pub async fn register_form() -> Html<String> {
    Html(views::register_page())
}

#[instrument(skip(state, form))]
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    let Some((username, password)) = form.into_parts() else {
        warn!("registration with missing credentials");
        return Ok(MISSING_CREDENTIALS.into_response());
    };

    match services::register(&state.db, &username, &password).await? {
        Some(user) => {
            info!(user_id = user.id, username = %user.username, "user registered");
            Ok(Redirect::to("/login").into_response())
        }
        None => {
            warn!(%username, "username already registered");
            Ok(USERNAME_TAKEN.into_response())
        }
    }
}

pub async fn login_form() -> Html<String> {
    Html(views::login_page())
}

#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    let Some((username, password)) = form.into_parts() else {
        warn!("login with missing credentials");
        return Ok(MISSING_CREDENTIALS.into_response());
    };

    let Some(user) = services::authenticate(&state.db, &username, &password).await? else {
        return Ok(INVALID_LOGIN.into_response());
    };

    // new id on privilege change
    session.cycle_id().await?;
    session.insert(USER_ID_KEY, user.id).await?;

    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok(Redirect::to("/search").into_response())
}

#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Redirect, AppError> {
    if let Some(user_id) = session.get::<i32>(USER_ID_KEY).await? {
        info!(user_id, "user logged out");
    }
    session.flush().await?;
    Ok(Redirect::to("/"))
}
