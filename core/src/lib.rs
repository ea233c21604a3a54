//! Blocking client SDK for the social networking REST API.
//!
//! # Overview
//! Identities, profiles and activities are exposed as JSON resources under
//! `/{rest}/[private/]api/social/{version}/{container}/`. This crate builds
//! those requests, executes them over a pluggable transport and turns the
//! responses into typed models.
//!
//! # Design
//! - `ClientContext` is an immutable value passed in explicitly; nothing is
//!   read from globals once a context is built.
//! - `SocialHttpClientSupport` is the request layer: one blocking round trip
//!   per call, transport failures surfaced as `ClientError`.
//! - The transport sits behind `HttpClientFactory` / `SocialHttpClient`;
//!   `UreqClientFactory` is the production implementation.
//! - `IdentityService` and `ActivityService` interpret status codes and
//!   payloads on top of the request layer.

pub mod context;
pub mod error;
pub mod http;
pub mod model;
pub mod service;
pub mod support;
pub mod transport;

#[cfg(test)]
mod testing;

pub use context::{AuthPolicy, ClientContext, Credentials, Protocol, RequestTarget};
pub use error::{ApiError, ClientError, ConfigError, TransportError};
pub use http::{Entity, HttpMethod, HttpRequest, HttpResponse};
pub use model::{IdentityId, Model, RestActivity, RestIdentity, RestProfile};
pub use service::{ActivityService, IdentityService};
pub use support::{consume, convert_model_to_byte_array, get_content, process_content, SocialHttpClientSupport};
pub use transport::{basic_auth_header, HttpClientFactory, SocialHttpClient, UreqClient, UreqClientFactory};
