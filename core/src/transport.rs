//! Pluggable HTTP transport.
//!
//! # Design
//! The request layer never talks to the network directly. It asks an
//! [`HttpClientFactory`] for a fresh [`SocialHttpClient`], optionally turns on
//! basic authentication, and hands it a fully built [`HttpRequest`]. Tests
//! substitute a recording double; production code uses [`UreqClientFactory`],
//! whose agent owns a thread-safe connection pool shared by every client it
//! produces.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::context::{ClientContext, Credentials, RequestTarget};
use crate::error::TransportError;
use crate::http::{Entity, HttpMethod, HttpRequest, HttpResponse};

/// A client able to execute one request against a target host.
pub trait SocialHttpClient {
    /// Attach the session's basic credentials to requests made by this client.
    fn set_basic_authenticate_to_request(&mut self);

    fn execute(&self, target: &RequestTarget, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Produces configured clients.
pub trait HttpClientFactory {
    type Client: SocialHttpClient;

    fn new_instance(&self, context: &ClientContext) -> Self::Client;
}

/// Value of an `Authorization` header for `credentials`.
pub fn basic_auth_header(credentials: &Credentials) -> String {
    let token = STANDARD.encode(format!("{}:{}", credentials.username, credentials.password));
    format!("Basic {token}")
}

/// Factory of blocking clients backed by a shared `ureq` agent.
#[derive(Clone)]
pub struct UreqClientFactory {
    agent: ureq::Agent,
}

impl UreqClientFactory {
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Every request made through this factory fails once `timeout` elapses.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::build(Some(timeout))
    }

    fn build(timeout: Option<Duration>) -> Self {
        // Status codes are returned as data; services interpret them.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqClientFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClientFactory for UreqClientFactory {
    type Client = UreqClient;

    fn new_instance(&self, context: &ClientContext) -> UreqClient {
        UreqClient {
            agent: self.agent.clone(),
            credentials: context.credentials.clone(),
            basic_auth: false,
        }
    }
}

/// One client produced by [`UreqClientFactory`].
pub struct UreqClient {
    agent: ureq::Agent,
    credentials: Option<Credentials>,
    basic_auth: bool,
}

impl SocialHttpClient for UreqClient {
    fn set_basic_authenticate_to_request(&mut self) {
        self.basic_auth = true;
    }

    fn execute(&self, target: &RequestTarget, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = target.resolve(&request.url)?;
        let mut headers = request.headers;
        if self.basic_auth {
            let credentials = self.credentials.as_ref().ok_or(TransportError::MissingCredentials)?;
            headers.push(("Authorization".to_string(), basic_auth_header(credentials)));
        }

        let result = match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(url.as_str());
                for (name, value) in &headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(url.as_str());
                for (name, value) in &headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match request.body {
                    Some(body) => builder.send(&body[..]),
                    None => builder.send_empty(),
                }
            }
        };
        let response = result.map_err(|err| match err {
            ureq::Error::Io(io) => TransportError::Io(io),
            other => TransportError::Protocol(other.to_string()),
        })?;

        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| Some((name.as_str().to_string(), value.to_str().ok()?.to_string())))
            .collect();
        let lookup = |name: &str| {
            headers
                .iter()
                .find(|(n, _)| n.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.clone())
        };
        let content_length = lookup("content-length").and_then(|v| v.trim().parse::<u64>().ok());
        let content_type = lookup("content-type");

        let entity = match status {
            204 | 304 => None,
            _ => Some(Entity::streaming(
                response.into_body().into_reader(),
                content_length,
                content_type,
            )),
        };

        Ok(HttpResponse {
            status,
            headers,
            entity,
        })
    }
}
