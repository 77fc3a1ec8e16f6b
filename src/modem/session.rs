use std::time::Duration;

use anyhow::Context;
use quick_xml::escape::escape;

/// An authenticated session with the modem.
///
/// The modem hands out a cookie on login, so the session owns the
/// cookie-aware http client that received it. Every cycle builds a new one.
#[derive(Debug, Clone)]
pub struct Session {
    http: reqwest::Client,
}

impl Session {
    /// A client with an empty cookie jar, ready to log in.
    pub(crate) fn transport(timeout: Duration) -> anyhow::Result<reqwest::Client> {
        reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .context("invalid http client configuration")
    }

    pub(crate) fn new(http: reqwest::Client) -> Session {
        Session { http }
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }
}

/// SOAP envelope posted to `/xml/login.xml`.
pub(crate) fn login_envelope(username: &str, password: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <Login>
      <Username>{}</Username>
      <LoginPassword>{}</LoginPassword>
    </Login>
  </soap:Body>
</soap:Envelope>"#,
        escape(username),
        escape(password)
    )
}
