use time::{OffsetDateTime, UtcOffset};

use super::NotificationKind;
use crate::{
    display::{format_optional, format_timestamp, html_escape, status_label},
    tasks::repo_types::Task,
};

const SUBJECT_PREFIX: &str = "Sistema de Tarefas - ";

pub fn subject(kind: NotificationKind) -> String {
    let title = match kind {
        NotificationKind::Created => "Nova Tarefa Criada",
        NotificationKind::Updated => "Tarefa Atualizada",
        NotificationKind::Completed => "Tarefa Concluída",
        NotificationKind::Deleted => "Tarefa Excluída",
    };
    format!("{SUBJECT_PREFIX}{title}")
}

/// (heading, intro, closing line)
fn copy(kind: NotificationKind) -> (&'static str, &'static str, &'static str) {
    match kind {
        NotificationKind::Created => (
            "Nova Tarefa Criada",
            "Uma nova tarefa foi criada no sistema:",
            "Acesse o sistema para gerenciar suas tarefas.",
        ),
        NotificationKind::Updated => (
            "Tarefa Atualizada",
            "Uma tarefa foi atualizada no sistema:",
            "Acesse o sistema para verificar todas as atualizações.",
        ),
        NotificationKind::Completed => (
            "Tarefa Concluída",
            "Uma tarefa foi marcada como concluída:",
            "Parabéns por completar mais uma tarefa!",
        ),
        NotificationKind::Deleted => (
            "Tarefa Excluída",
            "Uma tarefa foi excluída do sistema:",
            "Esta tarefa foi removida permanentemente do sistema.",
        ),
    }
}

fn task_details(task: &Task, offset: UtcOffset) -> String {
    let closed = task
        .closed_at
        .map(|c| {
            format!(
                "<p><strong>Data de Encerramento:</strong> {}</p>",
                format_timestamp(c, offset)
            )
        })
        .unwrap_or_default();
    format!(
        r#"<div style="margin: 20px 0; padding: 15px; border-left: 4px solid #3b82f6; background-color: #f9fafb;">
  <h3 style="margin: 0 0 10px 0; color: #111827;">{description}</h3>
  <p><strong>Data de Criação:</strong> {created}</p>
  <p><strong>Data de Previsão:</strong> {forecast}</p>
  {closed}
  <p><strong>Situação:</strong> {status}</p>
</div>"#,
        description = html_escape(&task.description),
        created = format_timestamp(task.created_at, offset),
        forecast = format_optional(task.forecast_at, offset),
        status = status_label(task.completed),
    )
}

pub fn render(kind: NotificationKind, task: &Task, user_name: &str, offset: UtcOffset) -> String {
    let (heading, intro, closing) = copy(kind);
    let year = OffsetDateTime::now_utc().to_offset(offset).year();
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px; color: #374151;">
  <h2 style="color: #1f2937; border-bottom: 1px solid #e5e7eb; padding-bottom: 10px;">{heading}</h2>
  <p>Olá {name},</p>
  <p>{intro}</p>
  {details}
  <p>{closing}</p>
  <div style="margin-top: 30px; padding-top: 15px; border-top: 1px solid #e5e7eb; font-size: 12px; color: #6b7280;">
    <p>Esta é uma mensagem automática. Por favor, não responda a este email.</p>
    <p>© {year} Sistema de Gerenciamento de Tarefas</p>
  </div>
</div>"#,
        name = html_escape(user_name),
        details = task_details(task, offset),
    )
}
