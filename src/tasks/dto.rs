use serde::{Deserialize, Deserializer, Serialize};

use super::repo_types::Task;

#[derive(Debug, Default, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub data_previsao: Option<String>,
    #[serde(default)]
    pub data_encerramento: Option<String>,
    #[serde(default)]
    pub situacao: Option<bool>,
}

/// Sparse update body. For the timestamps, an explicit `null` is kept apart
/// from an absent key: `Some(None)` clears, `None` leaves untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub data_previsao: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub data_encerramento: Option<Option<String>>,
    #[serde(default)]
    pub situacao: Option<bool>,
}

fn present<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// Query string shared by listing and export.
#[derive(Debug, Default, Deserialize)]
pub struct TaskQuery {
    #[serde(rename = "dateFrom")]
    pub date_from: Option<String>,
    #[serde(rename = "dateTo")]
    pub date_to: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeletedTaskResponse {
    pub message: String,
    pub tarefa: Task,
}
