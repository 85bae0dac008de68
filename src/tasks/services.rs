use time::{OffsetDateTime, UtcOffset};
use tracing::{debug, info};

use super::{
    dto::{CreateTaskRequest, TaskQuery, UpdateTaskRequest},
    repo_types::{NewTask, Task, TaskChanges, TaskFilter},
};
use crate::{
    auth::dto::SessionUser,
    display::parse_timestamp,
    error::{AppError, AppResult},
    notifications::NotificationKind,
    state::AppState,
};

fn task_not_found() -> AppError {
    AppError::NotFound("task not found".into())
}

pub fn parse_task_id(raw: &str) -> AppResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::validation("invalid id"))
}

/// Blank means "not provided"; anything else must parse. Values without an
/// offset are wall-clock times at `local`.
fn optional_timestamp(
    raw: Option<&str>,
    what: &str,
    local: UtcOffset,
) -> AppResult<Option<OffsetDateTime>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_timestamp(value, local)
            .map(Some)
            .ok_or_else(|| AppError::validation(format!("invalid {what}"))),
    }
}

pub fn new_task_from(
    req: CreateTaskRequest,
    now: OffsetDateTime,
    local: UtcOffset,
) -> AppResult<NewTask> {
    let description = req
        .descricao
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| AppError::validation("description required"))?
        .to_string();

    let forecast_at = optional_timestamp(req.data_previsao.as_deref(), "forecast date", local)?;
    let closed_at = optional_timestamp(req.data_encerramento.as_deref(), "closure date", local)?;

    if forecast_at.is_some_and(|f| f < now) {
        return Err(AppError::validation("forecast cannot be in the past"));
    }

    Ok(NewTask {
        description,
        forecast_at,
        closed_at,
        completed: req.situacao.unwrap_or(false),
    })
}

pub fn changes_from(req: UpdateTaskRequest, local: UtcOffset) -> AppResult<TaskChanges> {
    let UpdateTaskRequest {
        descricao,
        data_previsao,
        data_encerramento,
        situacao,
    } = req;

    if descricao.is_none()
        && data_previsao.is_none()
        && data_encerramento.is_none()
        && situacao.is_none()
    {
        return Err(AppError::validation("nothing to update"));
    }

    let description = match descricao {
        Some(d) if d.trim().is_empty() => {
            return Err(AppError::validation("description required"));
        }
        Some(d) => Some(d.trim().to_string()),
        None => None,
    };
    let forecast_at = data_previsao
        .map(|v| optional_timestamp(v.as_deref(), "forecast date", local))
        .transpose()?;
    let closed_at = data_encerramento
        .map(|v| optional_timestamp(v.as_deref(), "closure date", local))
        .transpose()?;

    Ok(TaskChanges {
        description,
        forecast_at,
        closed_at,
        completed: situacao,
    })
}

pub fn filter_from(q: TaskQuery, local: UtcOffset) -> AppResult<TaskFilter> {
    let created_from = optional_timestamp(q.date_from.as_deref(), "dateFrom", local)?;
    let created_to = optional_timestamp(q.date_to.as_deref(), "dateTo", local)?;
    let completed = q
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s == "true" || s == "1");
    let search = q
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    Ok(TaskFilter {
        created_from,
        created_to,
        completed,
        search,
    })
}

/// Picks the notification for an update from the flag before and after it.
pub fn classify_update(was_completed: bool, updated: &Task) -> NotificationKind {
    if updated.completed && !was_completed {
        NotificationKind::Completed
    } else {
        NotificationKind::Updated
    }
}

pub async fn create_task(
    state: &AppState,
    user: &SessionUser,
    req: CreateTaskRequest,
) -> AppResult<Task> {
    let local = state.config.display_offset();
    let new_task = new_task_from(req, OffsetDateTime::now_utc(), local)?;
    let task = state.tasks.insert(user.id, &new_task).await?;
    info!(user_id = %user.id, task_id = %task.id, "task created");

    state
        .notifier
        .notify(NotificationKind::Created, &task, user)
        .await;
    Ok(task)
}

pub async fn list_tasks(
    state: &AppState,
    user: &SessionUser,
    filter: &TaskFilter,
) -> AppResult<Vec<Task>> {
    let tasks = state.tasks.list(user.id, filter).await?;
    debug!(user_id = %user.id, count = tasks.len(), ?filter, "tasks listed");
    Ok(tasks)
}

pub async fn get_task(state: &AppState, user: &SessionUser, id: i64) -> AppResult<Task> {
    state
        .tasks
        .find(user.id, id)
        .await?
        .ok_or_else(task_not_found)
}

pub async fn update_task(
    state: &AppState,
    user: &SessionUser,
    id: i64,
    req: UpdateTaskRequest,
) -> AppResult<Task> {
    let changes = changes_from(req, state.config.display_offset())?;

    let existing = get_task(state, user, id).await?;
    let updated = state
        .tasks
        .update(user.id, id, &changes)
        .await?
        .ok_or_else(task_not_found)?;
    info!(user_id = %user.id, task_id = %id, "task updated");

    let kind = classify_update(existing.completed, &updated);
    state.notifier.notify(kind, &updated, user).await;
    Ok(updated)
}

pub async fn delete_task(state: &AppState, user: &SessionUser, id: i64) -> AppResult<Task> {
    let removed = state
        .tasks
        .delete(user.id, id)
        .await?
        .ok_or_else(task_not_found)?;
    info!(user_id = %user.id, task_id = %id, "task deleted");

    state
        .notifier
        .notify(NotificationKind::Deleted, &removed, user)
        .await;
    Ok(removed)
}
