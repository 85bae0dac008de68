//! Best-effort email notifications for task lifecycle events.
//!
//! [`Notifier::notify`] never fails: transport errors are logged and dropped
//! so the CRUD response that triggered them is unaffected.

use std::{fmt, sync::Arc};

use time::UtcOffset;
use tracing::{info, warn};

use crate::{auth::dto::SessionUser, tasks::repo_types::Task};

pub mod mailer;
pub mod templates;

pub use mailer::Mailer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Created,
    Updated,
    Completed,
    Deleted,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Created => "task_created",
            NotificationKind::Updated => "task_updated",
            NotificationKind::Completed => "task_completed",
            NotificationKind::Deleted => "task_deleted",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone)]
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
    offset: UtcOffset,
}

impl Notifier {
    pub fn new(mailer: Arc<dyn Mailer>, offset: UtcOffset) -> Self {
        Self { mailer, offset }
    }

    /// Sends the notification for `kind` to the task owner. Call only after
    /// the store mutation has succeeded.
    pub async fn notify(&self, kind: NotificationKind, task: &Task, recipient: &SessionUser) {
        let subject = templates::subject(kind);
        let html = templates::render(kind, task, &recipient.name, self.offset);
        match self.mailer.send(&recipient.email, &subject, &html).await {
            Ok(()) => info!(%kind, task_id = %task.id, "notification sent"),
            Err(e) => warn!(%kind, task_id = %task.id, error = %e, "notification failed"),
        }
    }
}
