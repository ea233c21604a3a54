//! Connection and REST path configuration.
//!
//! # Design
//! `ClientContext` is an immutable value passed to the request layer rather
//! than process-wide state, so tests can run several contexts side by side.
//! `from_env` overlays `SOCIAL_*` variables on the defaults.

use std::fmt;
use std::net::{IpAddr, Ipv6Addr};

use url::Url;

use crate::error::ConfigError;

/// URL scheme used to reach the REST service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Http,
    Https,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a request carries basic authentication credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPolicy {
    None,
    BasicAuth,
}

/// Host a request is dispatched to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    pub host: String,
    pub port: u16,
    pub protocol: Protocol,
}

impl RequestTarget {
    /// Root URL of the host. A bare IPv6 address is bracketed.
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&format!("{}://localhost/", self.protocol))?;
        match self.host.parse::<Ipv6Addr>() {
            Ok(ip) => url
                .set_ip_host(IpAddr::V6(ip))
                .map_err(|()| url::ParseError::InvalidIpv6Address)?,
            Err(_) => url.set_host(Some(&self.host))?,
        }
        url.set_port(Some(self.port))
            .map_err(|()| url::ParseError::InvalidPort)?;
        Ok(url)
    }

    /// Resolve `target_url` against this host. Absolute `http`/`https` URLs
    /// pass through.
    pub fn resolve(&self, target_url: &str) -> Result<Url, url::ParseError> {
        match Url::parse(target_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(url),
            Ok(_) | Err(url::ParseError::RelativeUrlWithoutBase) => self.base_url()?.join(target_url),
            Err(err) => Err(err),
        }
    }
}

/// Username and password of the current session.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Everything needed to address the social REST service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientContext {
    pub host: String,
    pub port: u16,
    pub protocol: Protocol,
    pub rest_context_name: String,
    pub rest_version: String,
    pub portal_container_name: String,
    pub credentials: Option<Credentials>,
}

impl Default for ClientContext {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8080,
            protocol: Protocol::Http,
            rest_context_name: "rest".to_string(),
            rest_version: "v1-alpha3".to_string(),
            portal_container_name: "portal".to_string(),
            credentials: None,
        }
    }
}

impl ClientContext {
    /// Defaults overridden by any `SOCIAL_*` environment variable that is set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut context = Self::default();
        if let Some(host) = lookup("SOCIAL_HOST") {
            context.host = host;
        }
        if let Some(port) = lookup("SOCIAL_PORT") {
            context.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "SOCIAL_PORT",
                value: port.clone(),
            })?;
        }
        if let Some(protocol) = lookup("SOCIAL_PROTOCOL") {
            context.protocol = match protocol.to_ascii_lowercase().as_str() {
                "http" => Protocol::Http,
                "https" => Protocol::Https,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "SOCIAL_PROTOCOL",
                        value: protocol,
                    })
                }
            };
        }
        if let Some(name) = lookup("SOCIAL_REST_CONTEXT") {
            context.rest_context_name = name;
        }
        if let Some(version) = lookup("SOCIAL_REST_VERSION") {
            context.rest_version = version;
        }
        if let Some(container) = lookup("SOCIAL_PORTAL_CONTAINER") {
            context.portal_container_name = container;
        }
        if let (Some(username), Some(password)) = (lookup("SOCIAL_USERNAME"), lookup("SOCIAL_PASSWORD")) {
            context.credentials = Some(Credentials { username, password });
        }
        Ok(context)
    }

    /// A copy of this context logged in as `username`.
    pub fn with_session(&self, username: &str, password: &str) -> Self {
        Self {
            credentials: Some(Credentials::new(username, password)),
            ..self.clone()
        }
    }

    pub fn target(&self) -> RequestTarget {
        RequestTarget {
            host: self.host.clone(),
            port: self.port,
            protocol: self.protocol,
        }
    }

    /// `/{restContextName}[/private]/api/social/{restVersion}/{portalContainerName}/`
    ///
    /// Resource names such as `identity` or `activity` are appended to the
    /// returned path.
    pub fn build_common_rest_path(&self, is_private: bool) -> String {
        let private_segment = if is_private { "/private" } else { "" };
        format!(
            "/{}{private_segment}/api/social/{}/{}/",
            self.rest_context_name, self.rest_version, self.portal_container_name
        )
    }
}
