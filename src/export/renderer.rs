use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use chromiumoxide::{
    browser::{Browser, BrowserConfig},
    cdp::browser_protocol::page::PrintToPdfParams,
};
use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use tracing::{debug, warn};

use crate::config::PdfConfig;

// A4 in inches
const PAPER_WIDTH_IN: f64 = 8.27;
const PAPER_HEIGHT_IN: f64 = 11.7;

/// HTML-to-PDF conversion.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render(&self, html: &str) -> anyhow::Result<Bytes>;

    fn backend(&self) -> &'static str {
        "custom"
    }
}

/// Remote conversion service when `renderer_url` is set, local Chromium otherwise.
pub fn from_config(cfg: &PdfConfig) -> anyhow::Result<Arc<dyn PdfRenderer>> {
    match &cfg.renderer_url {
        Some(url) => Ok(Arc::new(RemoteRenderer::new(url)?)),
        None => Ok(Arc::new(HeadlessRenderer::new(cfg.chrome_path.as_deref()))),
    }
}

/// Launches a headless Chromium for each export and prints the page.
#[derive(Clone, Default)]
pub struct HeadlessRenderer {
    chrome_path: Option<PathBuf>,
}

impl HeadlessRenderer {
    /// Without a path the browser is looked up on the system.
    pub fn new(chrome_path: Option<&str>) -> Self {
        Self {
            chrome_path: chrome_path.map(PathBuf::from),
        }
    }

    fn browser_config(&self) -> anyhow::Result<BrowserConfig> {
        let mut builder = BrowserConfig::builder()
            .arg("--headless")
            .arg("--disable-gpu")
            .arg("--no-sandbox");
        if let Some(path) = &self.chrome_path {
            builder = builder.chrome_executable(path);
        }
        builder.build().map_err(|e| anyhow::anyhow!("chromium config: {e}"))
    }
}

async fn print_page(browser: &Browser, html: &str) -> anyhow::Result<Bytes> {
    let page = browser
        .new_page("about:blank")
        .await
        .context("open chromium page")?;
    page.set_content(html).await.context("load report html")?;
    let params = PrintToPdfParams {
        paper_width: Some(PAPER_WIDTH_IN),
        paper_height: Some(PAPER_HEIGHT_IN),
        print_background: Some(true),
        ..Default::default()
    };
    let pdf = page.pdf(params).await.context("print pdf")?;
    Ok(Bytes::from(pdf))
}

#[async_trait]
impl PdfRenderer for HeadlessRenderer {
    async fn render(&self, html: &str) -> anyhow::Result<Bytes> {
        let config = self.browser_config()?;
        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .context("launch chromium (set CHROME_PATH or PDF_RENDERER_URL)")?;
        let events = tokio::spawn(async move { while handler.next().await.is_some() {} });

        let result = print_page(&browser, html).await;

        if let Err(e) = browser.close().await {
            warn!(error = %e, "chromium close failed");
        }
        if let Err(e) = browser.wait().await {
            warn!(error = %e, "chromium wait failed");
        }
        events.abort();
        if let Ok(pdf) = &result {
            debug!(bytes = pdf.len(), "pdf printed by local chromium");
        }
        result
    }

    fn backend(&self) -> &'static str {
        "headless-chromium"
    }
}

/// Chromium conversion service speaking the Gotenberg
/// `/forms/chromium/convert/html` form API.
#[derive(Clone)]
pub struct RemoteRenderer {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteRenderer {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("build pdf http client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PdfRenderer for RemoteRenderer {
    async fn render(&self, html: &str) -> anyhow::Result<Bytes> {
        let page = Part::bytes(html.as_bytes().to_vec())
            .file_name("index.html")
            .mime_str("text/html")?;
        let form = Form::new()
            .part("files", page)
            .text("paperWidth", PAPER_WIDTH_IN.to_string())
            .text("paperHeight", PAPER_HEIGHT_IN.to_string())
            .text("printBackground", "true");

        let url = format!("{}/forms/chromium/convert/html", self.base_url);
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .context("pdf renderer request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("pdf renderer failed ({status}): {body}");
        }
        response.bytes().await.context("read rendered pdf")
    }

    fn backend(&self) -> &'static str {
        "remote-chromium"
    }
}
