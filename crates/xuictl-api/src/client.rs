// Panel HTTP client (request engine)
//
// Wraps `reqwest::Client` with host-relative URL construction, the session
// cookie, linear-backoff retries for transient transport failures, and
// envelope validation. Endpoint modules (inbounds, clients, database) are
// thin wrappers that hand this engine a path, a payload and a target model.

use std::fmt;

use reqwest::header::{ACCEPT, COOKIE};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, is_transient_transport};
use crate::model::json_string::{WireModel, decode_json_string};
use crate::session::Session;
use crate::transport::TransportConfig;
use crate::wire::{self, Envelope, fields};

/// HTTP verbs the panel API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
        })
    }
}

/// Whether a response body goes through the envelope validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Check {
    /// Require `success` to be truthy.
    #[default]
    Envelope,
    /// Trust the HTTP status alone and return the raw response.
    Skip,
}

/// A fully read panel response.
///
/// The body is buffered so it can be validated and then handed back.
#[derive(Debug, Clone)]
pub struct PanelResponse {
    status: u16,
    session_cookie: Option<String>,
    body: String,
}

impl PanelResponse {
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Value of the `session` cookie set by this response, if any.
    pub fn session_cookie(&self) -> Option<&str> {
        self.session_cookie.as_deref()
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Decode the envelope without checking `success`.
    pub fn envelope(&self) -> Result<Envelope, Error> {
        Envelope::parse(&self.body)
    }

    /// Decode `obj` into a model without checking `success`.
    pub fn object<T: WireModel>(&self) -> Result<Option<T>, Error> {
        self.envelope()?.take_object().map(decode).transpose()
    }

    /// Decode the body as arbitrary JSON.
    pub fn json(&self) -> Result<Value, Error> {
        serde_json::from_str(&self.body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: self.body.clone(),
        })
    }
}

/// Request engine shared by every endpoint group.
///
/// Cloning is cheap and clones share both the connection pool and the
/// [`Session`], so a login through one clone authenticates all of them.
#[derive(Debug, Clone)]
pub struct PanelClient {
    http: reqwest::Client,
    session: Session,
    transport: TransportConfig,
}

impl PanelClient {
    /// Build a client (and its `reqwest::Client`) from a transport config.
    pub fn new(session: Session, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, session, transport.clone()))
    }

    /// Use a pre-built `reqwest::Client`.
    ///
    /// The client must not carry its own cookie store, or the session
    /// cookie would be sent twice.
    pub fn with_client(http: reqwest::Client, session: Session, transport: TransportConfig) -> Self {
        Self {
            http,
            session,
            transport,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn transport(&self) -> &TransportConfig {
        &self.transport
    }

    /// `{host}/{path}`.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.session.host(), path.trim_start_matches('/'))
    }

    // ── Request pipeline ─────────────────────────────────────────────

    /// Send one logical request.
    ///
    /// Connect errors and timeouts are retried up to the session's
    /// `max_retries` total attempts, waiting `attempt × backoff_unit`
    /// between them. HTTP error statuses and envelope failures are
    /// returned after the first attempt.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        check: Check,
    ) -> Result<PanelResponse, Error> {
        let url = self.url(path);
        let max_retries = self.session.max_retries().max(1);
        let mut attempt: u32 = 1;

        let resp = loop {
            debug!(%method, %url, attempt, "sending request");
            match self.attempt(method, &url, body).await {
                Ok(resp) => break resp,
                Err(e) if is_transient_transport(&e) => {
                    if attempt >= max_retries {
                        return Err(Error::RetriesExhausted {
                            attempts: attempt,
                            url,
                            source: e,
                        });
                    }
                    let delay = self.transport.backoff_unit * attempt;
                    warn!(
                        %url,
                        error = %e,
                        attempt,
                        max_retries,
                        "request failed, retrying in {delay:?}"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(Error::Transport(e)),
            }
        };

        if !(200..300).contains(&resp.status) {
            return Err(Error::Status {
                status: resp.status,
                body: wire::preview(&resp.body).to_owned(),
            });
        }

        if check == Check::Envelope {
            wire::validate(&resp.body)?;
        }

        Ok(resp)
    }

    /// One network round trip: send, then read the whole body.
    async fn attempt(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<PanelResponse, reqwest::Error> {
        let mut builder = match method {
            Method::Get => self.http.get(url),
            Method::Post => self.http.post(url),
        }
        .header(ACCEPT, "application/json");

        if let Some(cookie) = self.session.cookie_header() {
            builder = builder.header(COOKIE, cookie);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let session_cookie = resp
            .cookies()
            .find(|c| c.name() == fields::SESSION_COOKIE)
            .map(|c| c.value().to_owned())
            .filter(|v| !v.is_empty());
        let body = resp.text().await?;

        Ok(PanelResponse {
            status,
            session_cookie,
            body,
        })
    }

    // ── Envelope helpers for endpoint modules ────────────────────────

    /// GET, validate, and return `obj` (`None` when absent or null).
    pub(crate) async fn get_object(&self, path: &str) -> Result<Option<Value>, Error> {
        let resp = self.send(Method::Get, path, None, Check::Envelope).await?;
        Ok(resp.envelope()?.take_object())
    }

    /// POST a JSON body, validate, and return `obj`.
    pub(crate) async fn post_object(&self, path: &str, body: &Value) -> Result<Option<Value>, Error> {
        let resp = self
            .send(Method::Post, path, Some(body), Check::Envelope)
            .await?;
        Ok(resp.envelope()?.take_object())
    }
}

/// Build a model from an envelope's `obj`.
pub(crate) fn decode<T: WireModel>(value: Value) -> Result<T, Error> {
    let body = value.to_string();
    T::from_wire(value).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body,
    })
}

/// Build a list of models; the list itself may also arrive string-encoded.
pub(crate) fn decode_list<T: WireModel>(value: Value) -> Result<Vec<T>, Error> {
    match decode_json_string(value) {
        Value::Array(items) => items.into_iter().map(decode).collect(),
        Value::Null => Ok(Vec::new()),
        other => Err(Error::Deserialization {
            message: "expected a JSON array".into(),
            body: other.to_string(),
        }),
    }
}
