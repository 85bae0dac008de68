use anyhow::Context;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::repo_types::{NewTask, Task, TaskChanges, TaskFilter};

const TASK_COLUMNS: &str = "id, description, created_at, forecast_at, closed_at, completed, user_id";

/// Task store. Every method is scoped to `owner`; rows of other users are
/// indistinguishable from missing ones.
#[async_trait]
pub trait TaskRepo: Send + Sync {
    async fn insert(&self, owner: i64, task: &NewTask) -> anyhow::Result<Task>;

    /// Newest first.
    async fn list(&self, owner: i64, filter: &TaskFilter) -> anyhow::Result<Vec<Task>>;

    async fn find(&self, owner: i64, id: i64) -> anyhow::Result<Option<Task>>;

    /// Applies the present fields. `None` when no owned row matched.
    async fn update(
        &self,
        owner: i64,
        id: i64,
        changes: &TaskChanges,
    ) -> anyhow::Result<Option<Task>>;

    /// Removes the row and returns its last state.
    async fn delete(&self, owner: i64, id: i64) -> anyhow::Result<Option<Task>>;
}

#[derive(Clone)]
pub struct PgTaskRepo {
    db: PgPool,
}

impl PgTaskRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TaskRepo for PgTaskRepo {
    async fn insert(&self, owner: i64, task: &NewTask) -> anyhow::Result<Task> {
        let row = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (description, forecast_at, closed_at, completed, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(&task.description)
        .bind(task.forecast_at)
        .bind(task.closed_at)
        .bind(task.completed)
        .bind(owner)
        .fetch_one(&self.db)
        .await
        .context("insert task")?;
        Ok(row)
    }

    async fn list(&self, owner: i64, filter: &TaskFilter) -> anyhow::Result<Vec<Task>> {
        let rows = select_query(owner, filter)
            .build_query_as::<Task>()
            .fetch_all(&self.db)
            .await
            .context("list tasks")?;
        Ok(rows)
    }

    async fn find(&self, owner: i64, id: i64) -> anyhow::Result<Option<Task>> {
        let row = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
              FROM tasks
             WHERE id = $1 AND user_id = $2
            "#
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await
        .context("find task")?;
        Ok(row)
    }

    async fn update(
        &self,
        owner: i64,
        id: i64,
        changes: &TaskChanges,
    ) -> anyhow::Result<Option<Task>> {
        let Some(mut query) = update_query(owner, id, changes) else {
            anyhow::bail!("update without changes");
        };
        let row = query
            .build_query_as::<Task>()
            .fetch_optional(&self.db)
            .await
            .context("update task")?;
        Ok(row)
    }

    async fn delete(&self, owner: i64, id: i64) -> anyhow::Result<Option<Task>> {
        let row = sqlx::query_as::<_, Task>(&format!(
            r#"
            DELETE FROM tasks
             WHERE id = $1 AND user_id = $2
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await
        .context("delete task")?;
        Ok(row)
    }
}

/// `SELECT` scoped to `owner` with one `AND` clause per present filter.
pub(crate) fn select_query(owner: i64, filter: &TaskFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = "
    ));
    qb.push_bind(owner);

    if let Some(from) = filter.created_from {
        qb.push(" AND created_at >= ").push_bind(from);
    }
    if let Some(to) = filter.created_to {
        qb.push(" AND created_at <= ").push_bind(to);
    }
    if let Some(completed) = filter.completed {
        qb.push(" AND completed = ").push_bind(completed);
    }
    if let Some(term) = filter.search.as_deref() {
        qb.push(" AND description ILIKE ").push_bind(like_pattern(term));
    }

    qb.push(" ORDER BY created_at DESC, id DESC");
    qb
}

/// Single `UPDATE ... RETURNING` touching only the present columns.
/// `None` when there is nothing to set.
pub(crate) fn update_query(
    owner: i64,
    id: i64,
    changes: &TaskChanges,
) -> Option<QueryBuilder<'static, Postgres>> {
    if changes.is_empty() {
        return None;
    }

    let mut qb = QueryBuilder::new("UPDATE tasks SET ");
    let mut set = qb.separated(", ");
    if let Some(description) = &changes.description {
        set.push("description = ").push_bind_unseparated(description.clone());
    }
    if let Some(forecast_at) = changes.forecast_at {
        set.push("forecast_at = ").push_bind_unseparated(forecast_at);
    }
    if let Some(closed_at) = changes.closed_at {
        set.push("closed_at = ").push_bind_unseparated(closed_at);
    }
    if let Some(completed) = changes.completed {
        set.push("completed = ").push_bind_unseparated(completed);
    }

    qb.push(" WHERE id = ").push_bind(id);
    qb.push(" AND user_id = ").push_bind(owner);
    qb.push(format!(" RETURNING {TASK_COLUMNS}"));
    Some(qb)
}

/// `%term%` with LIKE metacharacters escaped so the term matches literally.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}
