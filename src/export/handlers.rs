use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use time::OffsetDateTime;
use tracing::{error, info, instrument};

use super::template::render_task_report;
use crate::{
    auth::extractors::AuthUser,
    error::AppResult,
    state::AppState,
    tasks::{dto::TaskQuery, services},
};

pub fn export_routes() -> Router<AppState> {
    Router::new().route("/tasks/export", get(export_tasks))
}

/// GET /tasks/export?dateFrom&dateTo&status&search → `tarefas.pdf`
#[instrument(skip(state, user, query))]
pub async fn export_tasks(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    query: Result<Query<TaskQuery>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(query) = query?;
    let filter = services::filter_from(query, state.config.display_offset())?;
    let tasks = services::list_tasks(&state, &user, &filter).await?;

    let html = render_task_report(
        &tasks,
        &user.name,
        OffsetDateTime::now_utc(),
        state.config.display_offset(),
    );
    let pdf = state.renderer.render(&html).await.inspect_err(|e| {
        error!(user_id = %user.id, error = %e, "pdf render failed");
    })?;

    info!(user_id = %user.id, tasks = tasks.len(), bytes = pdf.len(), "tasks exported");
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                r#"attachment; filename="tarefas.pdf""#,
            ),
        ],
        pdf,
    ))
}
