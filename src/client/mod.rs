pub mod config;
pub mod factory;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use log::debug;
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::api::{self, Envelope};
use crate::store::CredentialStore;

/// Why a call failed. Every operation of this crate returns one of these,
/// callers are expected to tell them apart.
#[derive(Error, Debug)]
pub enum RequestError {
    /// The call never reached the server, or the reply never came back.
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The server answered with something that is not an envelope.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The server rejected the credential, or refused to issue one.
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Any other failure reported by the server.
    #[error("Application error: {0}")]
    Application(String),

    /// The credential store could not be updated.
    #[error("Storage error: {0:#}")]
    Storage(#[source] anyhow::Error),
}

impl RequestError {
    pub fn is_authentication(&self) -> bool {
        matches!(self, RequestError::Authentication(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, RequestError::Transport(_))
    }
}

/// The request body.
#[derive(Debug, Clone)]
pub enum Payload {
    None,
    Json(String),
}

impl Payload {
    pub fn json<T: Serialize>(value: &T) -> Result<Self, RequestError> {
        match serde_json::to_string(value) {
            Ok(json) => Ok(Payload::Json(json)),
            Err(e) => Err(RequestError::Protocol(format!("encode request body: {e}"))),
        }
    }
}

/// A decoded envelope together with the HTTP status it came with.
#[derive(Debug)]
pub struct Reply<T: Serialize + DeserializeOwned> {
    pub status: StatusCode,
    pub envelope: Envelope<T>,
}

impl<T: Serialize + DeserializeOwned> Reply<T> {
    /// Returns the payload of a successful envelope. `fallback` is the reason
    /// used when a failed envelope carries no message.
    pub fn into_data(self, fallback: &str) -> Result<T, RequestError> {
        if !self.envelope.success {
            return Err(self.failure(fallback));
        }
        match self.envelope.data {
            Some(data) => Ok(data),
            None => Err(RequestError::Protocol(String::from(
                "server didn't return data in envelope",
            ))),
        }
    }

    pub fn into_unit(self, fallback: &str) -> Result<(), RequestError> {
        if !self.envelope.success {
            return Err(self.failure(fallback));
        }
        Ok(())
    }

    /// Classifies a failed envelope as an authentication or application error.
    pub fn failure(&self, fallback: &str) -> RequestError {
        let reason = self.envelope.reason().unwrap_or(fallback).to_string();
        if is_auth_failure(self.status, &reason) {
            RequestError::Authentication(reason)
        } else {
            RequestError::Application(reason)
        }
    }
}

const AUTH_KEYWORDS: &[&str] = &[
    "unauthorized",
    "unauthenticated",
    "forbidden",
    "token",
    "credential",
    "expired",
    "not logged in",
    "login required",
    "permission denied",
];

/// The envelope has no error code, so the HTTP status and the wording of the
/// reason are the only hints that a failure is about authorization.
fn is_auth_failure(status: StatusCode, reason: &str) -> bool {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return true;
    }
    let reason = reason.to_lowercase();
    AUTH_KEYWORDS.iter().any(|kw| reason.contains(kw))
}

/// Sends requests to the API server, attaching the credential held by the
/// store to every call.
#[derive(Clone)]
pub struct Client {
    url: String,
    client: reqwest::Client,
    store: Arc<dyn CredentialStore>,
}

impl Client {
    pub fn new(
        url: &str,
        timeout: Option<Duration>,
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self> {
        let url = url.trim_end_matches('/');
        let parsed = match Url::parse(url) {
            Ok(url) => url,
            Err(_) => bail!("invalid server url '{url}'"),
        };
        match parsed.scheme() {
            "http" | "https" => {}
            _ => bail!(
                "invalid url scheme, expect 'http' or 'https', not '{}'",
                parsed.scheme()
            ),
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            bail!("invalid server url, query and fragment are not allowed");
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("build http client")?;

        Ok(Self {
            url: url.to_string(),
            client,
            store,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Sends the request and unwraps the payload of the reply.
    pub async fn send_data<T>(
        &self,
        method: Method,
        path: &str,
        payload: Payload,
        fallback: &str,
    ) -> Result<T, RequestError>
    where
        T: Serialize + DeserializeOwned,
    {
        let reply: Reply<T> = self.send(method, path, payload).await?;
        reply.into_data(fallback)
    }

    /// Like [`Client::send_data`], for endpoints whose envelope carries no
    /// payload.
    pub async fn send_unit(
        &self,
        method: Method,
        path: &str,
        payload: Payload,
        fallback: &str,
    ) -> Result<(), RequestError> {
        let reply: Reply<Value> = self.send(method, path, payload).await?;
        reply.into_unit(fallback)
    }

    /// Issues one request to `url + path` and decodes the envelope. The
    /// request is never retried; the envelope is returned as is, whatever
    /// its `success` says.
    pub async fn send<T>(
        &self,
        method: Method,
        path: &str,
        payload: Payload,
    ) -> Result<Reply<T>, RequestError>
    where
        T: Serialize + DeserializeOwned,
    {
        let url = format!("{}{}", self.url, path);
        debug!("Request server: {method} {url}");

        let mut req = self
            .client
            .request(method, &url)
            .header(api::HEADER_ACCEPT, api::MIME_JSON);

        req = match payload {
            Payload::Json(json) => req.header(api::HEADER_CONTENT_TYPE, api::MIME_JSON).body(json),
            Payload::None => req,
        };

        if let Some(token) = self.store.load() {
            req = req.header(api::HEADER_AUTHORIZATION, format!("Bearer {token}"));
        }

        let resp = req.send().await.map_err(RequestError::Transport)?;
        let status = resp.status();
        let text = resp.text().await.map_err(RequestError::Transport)?;
        debug!("Server replied with status {status}, body size {}", text.len());

        let envelope = decode_envelope(status, &text)?;
        Ok(Reply { status, envelope })
    }
}

/// Decodes the envelope loosely first. `data` is only bound to `T` when the
/// envelope reports success; a failed envelope keeps its reason whatever
/// `data` holds.
fn decode_envelope<T>(status: StatusCode, text: &str) -> Result<Envelope<T>, RequestError>
where
    T: Serialize + DeserializeOwned,
{
    let raw: Envelope<Value> = match serde_json::from_str(text) {
        Ok(envelope) => envelope,
        Err(e) => {
            return Err(RequestError::Protocol(format!(
                "invalid envelope from server (status {status}): {e}, body: {:?}",
                truncate_body(text)
            )))
        }
    };

    let data = match raw.data {
        Some(data) if raw.success => match serde_json::from_value(data) {
            Ok(data) => Some(data),
            Err(e) => {
                return Err(RequestError::Protocol(format!(
                    "invalid data in envelope from server (status {status}): {e}"
                )))
            }
        },
        _ => None,
    };

    Ok(Envelope {
        success: raw.success,
        data,
        message: raw.message,
        error: raw.error,
    })
}

fn truncate_body(text: &str) -> &str {
    const MAX_BODY_DISPLAY: usize = 128;
    match text.char_indices().nth(MAX_BODY_DISPLAY) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
