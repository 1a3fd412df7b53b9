use awards_storage::{
    dto::user::{CreateTeamRequest, CreateUserRequest, UpdateUserRequest, UserFilter},
    models::{Team, User, UserStatus},
    services::Directory,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::actor::Actor;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/teams",
    responses(
        (status = 200, description = "All teams ordered by name", body = Vec<Team>)
    ),
    tag = "directory"
)]
pub async fn list_teams(State(state): State<AppState>) -> Result<Json<Vec<Team>>, WebError> {
    let teams = Directory::new(state.pool()).list_teams().await?;
    Ok(Json(teams))
}

/// The directory is seeded before any actor exists, so the actor header is optional here
#[utoipa::path(
    post,
    path = "/api/teams",
    request_body = CreateTeamRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Team created", body = Team),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Team name already exists")
    ),
    tag = "directory"
)]
pub async fn create_team(
    State(state): State<AppState>,
    actor: Option<Actor>,
    Json(req): Json<CreateTeamRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let team = Directory::new(state.pool())
        .create_team(&req, actor.map(|a| a.0))
        .await?;

    Ok((StatusCode::CREATED, Json(team)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/users",
    params(UserFilter),
    responses(
        (status = 200, description = "Users matching the filter", body = Vec<User>)
    ),
    tag = "directory"
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(filter): Query<UserFilter>,
) -> Result<Json<Vec<User>>, WebError> {
    let users = Directory::new(state.pool()).list_users(&filter).await?;
    Ok(Json(users))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "User not found")
    ),
    tag = "directory"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, WebError> {
    let user = Directory::new(state.pool()).get_user(id).await?;
    Ok(Json(user))
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Team not found"),
        (status = 409, description = "Email already exists")
    ),
    tag = "directory"
)]
pub async fn create_user(
    State(state): State<AppState>,
    actor: Option<Actor>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let user = Directory::new(state.pool())
        .create_user(&req, actor.map(|a| a.0))
        .await?;

    Ok((StatusCode::CREATED, Json(user)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User id")
    ),
    request_body = UpdateUserRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User or team not found"),
        (status = 409, description = "Email already exists")
    ),
    tag = "directory"
)]
pub async fn update_user(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<User>, WebError> {
    req.validate()?;

    let user = Directory::new(state.pool())
        .update_user(id, &req, Some(actor))
        .await?;

    Ok(Json(user))
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/deactivate",
    params(
        ("id" = Uuid, Path, description = "User id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "User deactivated", body = User),
        (status = 400, description = "Actor tried to deactivate themselves"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    tag = "directory"
)]
pub async fn deactivate_user(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, WebError> {
    let user = Directory::new(state.pool())
        .set_user_status(id, UserStatus::Inactive, Some(actor))
        .await?;
    Ok(Json(user))
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/activate",
    params(
        ("id" = Uuid, Path, description = "User id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "User activated", body = User),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    tag = "directory"
)]
pub async fn activate_user(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, WebError> {
    let user = Directory::new(state.pool())
        .set_user_status(id, UserStatus::Active, Some(actor))
        .await?;
    Ok(Json(user))
}
