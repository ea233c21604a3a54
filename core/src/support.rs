//! Request execution and response reading for the social REST services.
//!
//! # Design
//! `SocialHttpClientSupport` owns only an immutable `ClientContext` and a
//! client factory, so one instance can be shared between threads whenever
//! the factory can. Every call is a single blocking round trip: build the
//! request, ask the factory for a client, dispatch, return the raw response.
//! Transport failures are mapped to `ClientError` at this boundary; nothing
//! is retried.
//!
//! Reading helpers (`process_content`, `get_content`, `consume`) are free
//! functions since they only touch the response.

use std::io;

use encoding_rs::{Encoding, UTF_8};
use tracing::{debug, warn};

use crate::context::{AuthPolicy, ClientContext};
use crate::error::ClientError;
use crate::http::{Entity, HttpMethod, HttpRequest, HttpResponse};
use crate::model::Model;
use crate::transport::{HttpClientFactory, SocialHttpClient};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Builds and executes GET/POST requests against the configured host.
#[derive(Debug, Clone)]
pub struct SocialHttpClientSupport<F> {
    context: ClientContext,
    factory: F,
}

impl<F: HttpClientFactory> SocialHttpClientSupport<F> {
    pub fn new(context: ClientContext, factory: F) -> Self {
        Self { context, factory }
    }

    pub fn execute_get(&self, target_url: &str, auth_policy: AuthPolicy) -> Result<HttpResponse, ClientError> {
        let request = json_request(HttpMethod::Get, target_url);
        self.dispatch(request, auth_policy)
    }

    /// POST `model` as a JSON body. `None` sends no body at all.
    pub fn execute_post(
        &self,
        target_url: &str,
        auth_policy: AuthPolicy,
        model: Option<&dyn Model>,
    ) -> Result<HttpResponse, ClientError> {
        let mut request = json_request(HttpMethod::Post, target_url);
        request.body = convert_model_to_byte_array(model).map_err(ClientError::from_cause)?;
        self.dispatch(request, auth_policy)
    }

    /// POST without a body.
    pub fn execute_post_empty(&self, target_url: &str, auth_policy: AuthPolicy) -> Result<HttpResponse, ClientError> {
        self.execute_post(target_url, auth_policy, None)
    }

    pub fn build_common_rest_path_from_context(&self, is_private: bool) -> String {
        self.context.build_common_rest_path(is_private)
    }

    fn dispatch(&self, request: HttpRequest, auth_policy: AuthPolicy) -> Result<HttpResponse, ClientError> {
        let mut client = self.factory.new_instance(&self.context);
        if auth_policy == AuthPolicy::BasicAuth {
            client.set_basic_authenticate_to_request();
        }
        let target = self.context.target();
        debug!(
            method = request.method.as_str(),
            url = %request.url,
            host = %target.host,
            port = target.port,
            ?auth_policy,
            body_len = request.body.as_ref().map(Vec::len),
            "dispatching request"
        );
        let method = request.method;
        let url = request.url.clone();
        client.execute(&target, request).map_err(|err| {
            warn!(method = method.as_str(), %url, error = %err, "request failed");
            ClientError::from_cause(err)
        })
    }
}

fn json_request(method: HttpMethod, target_url: &str) -> HttpRequest {
    let mut request = HttpRequest::new(method, target_url);
    request.set_header("Content-Type", JSON_CONTENT_TYPE);
    request
}

/// UTF-8 JSON bytes of `model`, or `None` when there is no model.
pub fn convert_model_to_byte_array(model: Option<&dyn Model>) -> io::Result<Option<Vec<u8>>> {
    let Some(model) = model else {
        return Ok(None);
    };
    let mut bytes = Vec::new();
    model.write_json_string(&mut bytes)?;
    Ok(Some(bytes))
}

/// Buffer the response entity in place and return a handle on it.
///
/// After this call the entity can be read any number of times and the
/// connection behind it is released. A response without an entity yields
/// `None`.
pub fn process_content(response: &mut HttpResponse) -> Result<Option<Entity>, ClientError> {
    let Some(entity) = response.entity.take() else {
        return Ok(None);
    };
    let buffered = entity.buffer().map_err(ClientError::from_cause)?;
    let handle = buffered.try_clone();
    response.entity = Some(buffered);
    Ok(handle)
}

/// The response body decoded as text.
///
/// An unknown content length is reported as empty content, even if a body
/// was sent chunked.
pub fn get_content(response: &mut HttpResponse) -> Result<String, ClientError> {
    let entity = process_content(response)?;
    let entity = match entity {
        Some(entity) if entity.content_length().is_some() => entity,
        _ => return Err(ClientError::new("Content of response is empty.")),
    };
    let encoding = match entity.charset() {
        Some(label) => Encoding::for_label(label.as_bytes())
            .ok_or_else(|| ClientError::new(format!("Unsupported charset: {label}")))?,
        None => UTF_8,
    };
    let bytes = entity.bytes().map_err(ClientError::from_cause)?;
    let (text, _, _) = encoding.decode(&bytes);
    Ok(text.into_owned())
}

/// Release the connection behind a streaming entity. Buffered entities are
/// left untouched.
pub fn consume(entity: &mut Entity) -> io::Result<()> {
    entity.close();
    Ok(())
}
