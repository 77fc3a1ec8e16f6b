//! Exposes a `Client` struct to log in to the modem and fetch its documents.

use std::time::{Duration, Instant};

use anyhow::Context;
use reqwest::header::CONTENT_TYPE;
use reqwest::RequestBuilder;

use super::session::{login_envelope, Session};
use super::{Document, Modem};
use crate::config::Config;

fn elapsed_ms(start: &Instant) -> u128 {
    start.elapsed().as_millis()
}

pub struct Client {
    /// Example: `http://192.168.100.1`
    base_url: String,
    /// Username to log in with
    username: String,
    /// Password to log in with, scraping is disabled without one
    password: Option<String>,
    /// Applies to every single request
    timeout: Duration,
}

impl Client {
    pub fn new(host: &str, username: &str, password: Option<&str>, timeout: Duration) -> Client {
        let host = host.trim().trim_end_matches('/');
        let base_url = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("http://{}", host)
        };

        Client {
            base_url,
            username: username.to_string(),
            password: password.filter(|p| !p.is_empty()).map(str::to_string),
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Client {
        Client::new(
            &config.host,
            &config.username,
            config.password.as_deref(),
            config.request_timeout,
        )
    }

    /// Example: `client.make_url("/xml/getter.xml")` will produce
    /// `http://{host}/xml/getter.xml`
    pub fn make_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn request_with<F>(
        &self,
        name: &str,
        http: &reqwest::Client,
        url: &str,
        func: F,
    ) -> anyhow::Result<Vec<u8>>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let now = Instant::now();
        let builder = func(http.post(url));

        let resp = builder.send().await.context("send request")?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("{} {} failed ({}): {}", name, url, status, body.trim());
        }

        let bytes = resp.bytes().await.context("read response body")?;

        log::debug!(
            "{} request to {} ({}) took {}ms, {} bytes",
            name,
            url,
            status.as_u16(),
            elapsed_ms(&now),
            bytes.len(),
        );

        Ok(bytes.to_vec())
    }
}

impl Modem for Client {
    type Session = Session;

    fn has_credentials(&self) -> bool {
        self.password.is_some()
    }

    /// Create a new session by posting the SOAP login envelope.
    async fn authenticate(&self) -> anyhow::Result<Session> {
        let password = self.password.as_deref().context("no password configured")?;

        let http = Session::transport(self.timeout)?;
        let url = self.make_url("/xml/login.xml");
        let envelope = login_envelope(&self.username, password);

        let _ = self
            .request_with("login", &http, &url, |req| {
                req.header(CONTENT_TYPE, "text/xml").body(envelope)
            })
            .await?;

        Ok(Session::new(http))
    }

    async fn fetch_document(
        &self,
        session: &Session,
        document: Document,
    ) -> anyhow::Result<Vec<u8>> {
        let http = session.http();
        let url = self.make_url("/xml/getter.xml");
        let selector = document.selector().to_string();
        let form: [(&str, &str); 1] = [("fun", &selector)];

        self.request_with(document.name(), http, &url, |req| req.form(&form))
            .await
            .with_context(|| format!("fetch {}", document))
    }
}
