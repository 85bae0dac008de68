use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub cookie_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: Option<u16>,
    pub username: String,
    pub password: String,
}

/// Outbound mail. The HTTP relay wins over SMTP; with neither,
/// notifications only go to the log.
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub smtp: Option<SmtpConfig>,
    pub from: String,
}

/// PDF export. A conversion service URL selects the remote renderer,
/// otherwise a local headless Chromium is launched per export.
#[derive(Debug, Clone, Deserialize)]
pub struct PdfConfig {
    pub renderer_url: Option<String>,
    pub chrome_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt: JwtConfig,
    pub mail: MailConfig,
    pub pdf: PdfConfig,
    pub display_offset_hours: i8,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = match non_empty_var("APP_PORT") {
            Some(v) => v
                .parse::<u16>()
                .map_err(|e| anyhow::anyhow!("invalid APP_PORT {v:?}: {e}"))?,
            None => 8080,
        };
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "tarefas".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "tarefas-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 30),
            cookie_name: std::env::var("SESSION_COOKIE")
                .unwrap_or_else(|_| "tarefas_session".into()),
        };
        let mail = MailConfig {
            api_url: non_empty_var("MAIL_API_URL"),
            api_key: non_empty_var("MAIL_API_KEY"),
            smtp: non_empty_var("SMTP_HOST").map(|host| SmtpConfig {
                host,
                port: std::env::var("SMTP_PORT").ok().and_then(|v| v.parse().ok()),
                username: std::env::var("SMTP_USER").unwrap_or_default(),
                password: std::env::var("SMTP_PASSWORD").unwrap_or_default(),
            }),
            from: std::env::var("MAIL_FROM")
                .unwrap_or_else(|_| "Sistema de Tarefas <no-reply@tarefas.local>".into()),
        };
        let display_offset_hours = std::env::var("DISPLAY_UTC_OFFSET_HOURS")
            .ok()
            .and_then(|v| v.parse::<i8>().ok())
            .unwrap_or(-3);
        Ok(Self {
            host,
            port,
            database_url,
            jwt,
            mail,
            pdf: PdfConfig {
                renderer_url: non_empty_var("PDF_RENDERER_URL"),
                chrome_path: non_empty_var("CHROME_PATH"),
            },
            display_offset_hours,
        })
    }

    pub fn bind_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port).parse()?;
        Ok(addr)
    }

    /// Offset used when printing timestamps in emails and reports.
    pub fn display_offset(&self) -> time::UtcOffset {
        time::UtcOffset::from_hms(self.display_offset_hours, 0, 0).unwrap_or(time::UtcOffset::UTC)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
