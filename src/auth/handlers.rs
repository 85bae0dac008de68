use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            AuthResponse, JwtKeys, LoginRequest, PublicUser, RegisterRequest, RegisterResponse,
            RegisteredUser, SessionUser,
        },
        extractors::{AuthUser, MaybeSession},
        password::{hash_password, verify_password},
        repo_types::User,
        validation::{normalize_email, validate_registration},
    },
    error::{AppError, AppResult},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
}

pub fn session_routes() -> Router<AppState> {
    Router::new().route("/auth/session", get(get_session))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let Json(payload) = payload?;
    let account = validate_registration(payload)
        .inspect_err(|e| warn!(error = %e, "registration rejected"))?;

    if state.users.find_by_email(&account.email).await?.is_some() {
        warn!(email = %account.email, "email already registered");
        return Err(AppError::Conflict("email already registered".into()));
    }

    let hash = hash_password(&account.password)?;
    let user = state
        .users
        .create(&account.name, &account.email, &hash)
        .await?
        .ok_or_else(|| {
            warn!(email = %account.email, "email registered concurrently");
            AppError::Conflict("email already registered".into())
        })?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "user registered".into(),
            user: RegisteredUser {
                id: user.id,
                nome: user.name,
                email: user.email,
                data_criacao: user.created_at,
            },
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let email = payload.email.as_deref().map(normalize_email).unwrap_or_default();
    let password = payload.senha.unwrap_or_default();
    if email.is_empty() || password.is_empty() {
        return Err(AppError::validation("email and password are required"));
    }

    let Some(user) = state.users.find_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(&password, &user.password_hash)? {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    info!(user_id = %user.id, email = %user.email, "user logged in");
    issue_session(&JwtKeys::from_ref(&state), user)
}

/// Re-issues a full-length token for a still-valid session.
#[instrument(skip(state, session))]
pub async fn refresh(
    State(state): State<AppState>,
    AuthUser(session): AuthUser,
) -> AppResult<impl IntoResponse> {
    let Some(user) = state.users.find_by_id(session.id).await? else {
        warn!(user_id = %session.id, "session refers to a missing user");
        return Err(AppError::Unauthorized);
    };
    issue_session(&JwtKeys::from_ref(&state), user)
}

#[instrument(skip(state, session))]
pub async fn logout(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
) -> impl IntoResponse {
    if let Some(user) = session {
        info!(user_id = %user.id, "user logged out");
    }
    let keys = JwtKeys::from_ref(&state);
    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, keys.cleared_cookie())],
    )
}

#[instrument(skip(session))]
pub async fn get_session(AuthUser(session): AuthUser) -> Json<SessionUser> {
    Json(session)
}

fn issue_session(keys: &JwtKeys, user: User) -> AppResult<impl IntoResponse> {
    let identity = SessionUser {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
    };
    let token = keys.sign(&identity)?;
    let cookie = keys.session_cookie(&token);
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse {
            token,
            user: PublicUser {
                id: user.id,
                nome: user.name,
                email: user.email,
            },
        }),
    ))
}
