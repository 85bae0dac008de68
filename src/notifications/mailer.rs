use std::{sync::Arc, time::Duration};

use anyhow::Context;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use serde_json::json;
use tracing::info;

use crate::config::{MailConfig, SmtpConfig};

/// Outbound mail transport.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> anyhow::Result<()>;
}

/// HTTP relay, then SMTP, then the log transport.
pub fn from_config(cfg: &MailConfig) -> anyhow::Result<Arc<dyn Mailer>> {
    if let Some(url) = &cfg.api_url {
        return Ok(Arc::new(HttpMailer::new(url, cfg.api_key.clone(), &cfg.from)?));
    }
    if let Some(smtp) = &cfg.smtp {
        info!(host = %smtp.host, "sending notifications over smtp");
        return Ok(Arc::new(SmtpMailer::new(smtp, &cfg.from)?));
    }
    info!("no mail transport configured; notifications will only be logged");
    Ok(Arc::new(LogMailer))
}

/// JSON mail relay: `POST {from, to: [..], subject, html}` with a bearer key.
#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    from: String,
}

impl HttpMailer {
    pub fn new(url: &str, api_key: Option<String>, from: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("build mail http client")?;
        Ok(Self {
            client,
            url: url.to_string(),
            api_key,
            from: from.to_string(),
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> anyhow::Result<()> {
        let body = json!({
            "from": self.from,
            "to": [to],
            "subject": subject,
            "html": html,
        });
        let mut request = self.client.post(&self.url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await.context("mail relay request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("mail relay rejected message ({status}): {body}");
        }
        Ok(())
    }
}

/// STARTTLS submission through a relay such as Gmail.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpMailer {
    pub fn new(cfg: &SmtpConfig, from: &str) -> anyhow::Result<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.host)
            .with_context(|| format!("smtp relay {}", cfg.host))?
            .timeout(Some(Duration::from_secs(10)));
        if let Some(port) = cfg.port {
            builder = builder.port(port);
        }
        if !cfg.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                cfg.username.clone(),
                cfg.password.clone(),
            ));
        }
        Ok(Self {
            transport: builder.build(),
            from: from.to_string(),
        })
    }
}

pub(crate) fn build_message(
    from: &str,
    to: &str,
    subject: &str,
    html: &str,
) -> anyhow::Result<Message> {
    let message = Message::builder()
        .from(from.parse::<Mailbox>().context("invalid sender address")?)
        .to(to.parse::<Mailbox>().context("invalid recipient address")?)
        .subject(subject)
        .header(ContentType::TEXT_HTML)
        .body(html.to_string())
        .context("build mail message")?;
    Ok(message)
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> anyhow::Result<()> {
        let message = build_message(&self.from, to, subject, html)?;
        self.transport.send(message).await.context("smtp send")?;
        Ok(())
    }
}

/// Writes the envelope to the log instead of sending.
#[derive(Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> anyhow::Result<()> {
        info!(%to, %subject, bytes = html.len(), "mail (log transport)");
        Ok(())
    }
}
