use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{CreateTaskRequest, DeletedTaskResponse, TaskQuery, UpdateTaskRequest},
    repo_types::Task,
    services,
};
use crate::{auth::extractors::AuthUser, error::AppResult, state::AppState};

pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
}

#[instrument(skip(state, user, payload))]
pub async fn create_task(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Task>)> {
    let Json(req) = payload?;
    let task = services::create_task(&state, &user, req).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

#[instrument(skip(state, user, query))]
pub async fn list_tasks(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    query: Result<Query<TaskQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Task>>> {
    let Query(query) = query?;
    let filter = services::filter_from(query, state.config.display_offset())?;
    let tasks = services::list_tasks(&state, &user, &filter).await?;
    Ok(Json(tasks))
}

#[instrument(skip(state, user))]
pub async fn get_task(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Task>> {
    let id = services::parse_task_id(&id)?;
    let task = services::get_task(&state, &user, id).await?;
    Ok(Json(task))
}

#[instrument(skip(state, user, payload))]
pub async fn update_task(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> AppResult<Json<Task>> {
    let id = services::parse_task_id(&id)?;
    let Json(req) = payload?;
    let task = services::update_task(&state, &user, id, req).await?;
    Ok(Json(task))
}

#[instrument(skip(state, user))]
pub async fn delete_task(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<DeletedTaskResponse>> {
    let id = services::parse_task_id(&id)?;
    let task = services::delete_task(&state, &user, id).await?;
    Ok(Json(DeletedTaskResponse {
        message: "task deleted".into(),
        tarefa: task,
    }))
}
