use time::{OffsetDateTime, UtcOffset};

use crate::{
    display::{format_optional, format_timestamp, html_escape, status_label},
    tasks::repo_types::Task,
};

const STYLE: &str = r#"
  body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; margin: 0; padding: 20px; }
  h1 { color: #2563eb; text-align: center; margin-bottom: 20px; border-bottom: 1px solid #e5e7eb; padding-bottom: 10px; }
  .header-info { text-align: center; margin-bottom: 30px; font-size: 14px; color: #6b7280; }
  .task-list { margin-top: 20px; }
  .task-item { margin-bottom: 15px; padding: 15px; border-left: 5px solid #3b82f6; background-color: #f9fafb; }
  .task-header { display: flex; justify-content: space-between; margin-bottom: 10px; }
  .task-title { font-weight: bold; font-size: 16px; color: #111827; margin: 0; }
  .task-status { font-size: 12px; padding: 4px 8px; border-radius: 12px; }
  .status-complete { background-color: #d1fae5; color: #065f46; }
  .status-open { background-color: #fef3c7; color: #92400e; }
  .task-details { font-size: 13px; }
  .detail-label { font-weight: bold; color: #4b5563; }
  .footer { margin-top: 40px; text-align: center; font-size: 12px; color: #9ca3af; }
"#;

fn task_item(task: &Task, offset: UtcOffset) -> String {
    let badge = if task.completed {
        "status-complete"
    } else {
        "status-open"
    };
    let closed = task
        .closed_at
        .map(|c| format_timestamp(c, offset))
        .unwrap_or_else(|| "Não encerrada".to_string());
    format!(
        r#"<div class="task-item">
  <div class="task-header">
    <h3 class="task-title">{description}</h3>
    <span class="task-status {badge}">{status}</span>
  </div>
  <div class="task-details">
    <p><span class="detail-label">Criação:</span> {created}</p>
    <p><span class="detail-label">Previsão:</span> {forecast}</p>
    <p><span class="detail-label">Encerramento:</span> {closed}</p>
  </div>
</div>"#,
        description = html_escape(&task.description),
        status = status_label(task.completed),
        created = format_timestamp(task.created_at, offset),
        forecast = format_optional(task.forecast_at, offset),
    )
}

/// Printable task list handed to the PDF renderer.
pub fn render_task_report(
    tasks: &[Task],
    user_name: &str,
    exported_at: OffsetDateTime,
    offset: UtcOffset,
) -> String {
    let items: String = tasks.iter().map(|t| task_item(t, offset)).collect();
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <title>Lista de Tarefas</title>
  <style>{STYLE}</style>
</head>
<body>
  <h1>Lista de Tarefas</h1>
  <div class="header-info">
    <p>Usuário: {user}</p>
    <p>Data de Exportação: {exported}</p>
    <p>Total de Tarefas: {count}</p>
  </div>
  <div class="task-list">
{items}
  </div>
  <div class="footer">
    <p>© {year} Sistema de Gerenciamento de Tarefas</p>
  </div>
</body>
</html>"#,
        user = html_escape(user_name),
        exported = format_timestamp(exported_at, offset),
        count = tasks.len(),
        year = exported_at.to_offset(offset).year(),
    )
}
