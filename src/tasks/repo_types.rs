use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Task row. JSON keys keep the names existing clients use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i64,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "data_criacao", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(rename = "data_previsao", with = "time::serde::rfc3339::option", default)]
    pub forecast_at: Option<OffsetDateTime>,
    #[serde(rename = "data_encerramento", with = "time::serde::rfc3339::option", default)]
    pub closed_at: Option<OffsetDateTime>,
    #[serde(rename = "situacao")]
    pub completed: bool,
    #[serde(rename = "usuario_id")]
    pub user_id: i64,
}

/// Validated input for an insert; the owner comes from the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub description: String,
    pub forecast_at: Option<OffsetDateTime>,
    pub closed_at: Option<OffsetDateTime>,
    pub completed: bool,
}

/// Sparse update. `None` leaves the column untouched; for the nullable
/// timestamps `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    pub description: Option<String>,
    pub forecast_at: Option<Option<OffsetDateTime>>,
    pub closed_at: Option<Option<OffsetDateTime>>,
    pub completed: Option<bool>,
}

impl TaskChanges {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.forecast_at.is_none()
            && self.closed_at.is_none()
            && self.completed.is_none()
    }
}

/// Listing filters, ANDed together. Creation bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub created_from: Option<OffsetDateTime>,
    pub created_to: Option<OffsetDateTime>,
    pub completed: Option<bool>,
    pub search: Option<String>,
}
