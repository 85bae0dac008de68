use crate::auth::repo::{PgUserRepo, UserRepo};
use crate::config::AppConfig;
use crate::export::{renderer, PdfRenderer};
use crate::notifications::{mailer, Notifier};
use crate::tasks::repo::{PgTaskRepo, TaskRepo};
use anyhow::Context;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepo>,
    pub tasks: Arc<dyn TaskRepo>,
    pub notifier: Notifier,
    pub renderer: Arc<dyn PdfRenderer>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = sqlx::postgres::PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to postgres")?;

        if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
            tracing::warn!(error = %e, "migration failed; continuing");
        }

        let mailer = mailer::from_config(&config.mail)?;
        let notifier = Notifier::new(mailer, config.display_offset());
        let renderer = renderer::from_config(&config.pdf)?;
        tracing::info!(backend = renderer.backend(), "pdf renderer ready");

        Ok(Self::from_parts(
            config,
            Arc::new(PgUserRepo::new(db.clone())),
            Arc::new(PgTaskRepo::new(db)),
            notifier,
            renderer,
        ))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserRepo>,
        tasks: Arc<dyn TaskRepo>,
        notifier: Notifier,
        renderer: Arc<dyn PdfRenderer>,
    ) -> Self {
        Self {
            config,
            users,
            tasks,
            notifier,
            renderer,
        }
    }
}
