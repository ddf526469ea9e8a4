//! Reqwest-backed implementation of the watcher's transport port.
//!
//! Stateless: the identity token is owned by the caller and replayed as
//! a `uid` cookie on every identity-requiring request. `ok` / `no`
//! bodies map onto the port's results; a `no` on read means invalid
//! identity (a successful read body is either empty or lines that start
//! with a `(` sender prefix, so the literal is unambiguous).

use reqwest::{Response, header};

use gabble_core::watcher::ChatTransport;
use gabble_types::error::TransportError;
use gabble_types::session::SessionToken;

/// HTTP client for a gabble chat server.
#[derive(Debug, Clone)]
pub struct HttpChatTransport {
    http: reqwest::Client,
    base: String,
}

impl HttpChatTransport {
    /// `base` is the server root, e.g. `http://127.0.0.1:8100`.
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, command: &str) -> String {
        format!("{}/{command}", self.base)
    }

    fn cookie(token: SessionToken) -> String {
        format!("uid={token}")
    }
}

fn transport_err(e: reqwest::Error) -> TransportError {
    TransportError::Failed(e.to_string())
}

/// Find the `uid` value among the response's `Set-Cookie` headers.
fn token_from_cookies(resp: &Response) -> Option<SessionToken> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|cookie| cookie.split(';').next()?.trim().strip_prefix("uid=")?.parse().ok())
}

impl ChatTransport for HttpChatTransport {
    async fn join(&self, name: &str) -> Result<SessionToken, TransportError> {
        let resp = self
            .http
            .get(self.url("join"))
            .query(&[("name", name)])
            .send()
            .await
            .map_err(transport_err)?;
        let token = token_from_cookies(&resp);
        let body = resp.text().await.map_err(transport_err)?;
        if body.trim() == "ok" {
            token.ok_or(TransportError::Rejected)
        } else {
            Err(TransportError::Rejected)
        }
    }

    async fn post(
        &self,
        name: &str,
        token: SessionToken,
        text: &str,
    ) -> Result<bool, TransportError> {
        let resp = self
            .http
            .get(self.url("post"))
            .query(&[("name", name), ("msg", text)])
            .header(header::COOKIE, Self::cookie(token))
            .send()
            .await
            .map_err(transport_err)?;
        let body = resp.text().await.map_err(transport_err)?;
        Ok(body.trim() == "ok")
    }

    async fn read(&self, name: &str, token: SessionToken) -> Result<String, TransportError> {
        let resp = self
            .http
            .get(self.url("read"))
            .query(&[("name", name)])
            .header(header::COOKIE, Self::cookie(token))
            .send()
            .await
            .map_err(transport_err)?;
        let body = resp.text().await.map_err(transport_err)?;
        if body.trim() == "no" {
            return Err(TransportError::Rejected);
        }
        Ok(body)
    }

    async fn leave(&self, name: &str, token: SessionToken) -> Result<bool, TransportError> {
        let resp = self
            .http
            .get(self.url("leave"))
            .query(&[("name", name)])
            .header(header::COOKIE, Self::cookie(token))
            .send()
            .await
            .map_err(transport_err)?;
        let body = resp.text().await.map_err(transport_err)?;
        Ok(body.trim() == "ok")
    }
}
