//! Identity lookups under `identity/`.
//!
//! Ids and provider/remote names are percent-encoded as single path
//! segments before they reach the URL.

use tracing::debug;

use super::{encode_segment, parse_json, require};
use crate::context::AuthPolicy;
use crate::error::ApiError;
use crate::model::{IdentityId, RestIdentity};
use crate::support::SocialHttpClientSupport;
use crate::transport::HttpClientFactory;

/// Read access to identities. The REST resource is read-only, so writes
/// are rejected without a round trip.
#[derive(Debug, Clone)]
pub struct IdentityService<F> {
    support: SocialHttpClientSupport<F>,
}

impl<F: HttpClientFactory> IdentityService<F> {
    pub fn new(support: SocialHttpClientSupport<F>) -> Self {
        Self { support }
    }

    pub fn identity_url(&self, id: &str) -> String {
        format!(
            "{}identity/{}.json",
            self.support.build_common_rest_path_from_context(true),
            encode_segment(id)
        )
    }

    pub fn identity_id_url(&self, provider_id: &str, remote_id: &str) -> String {
        format!(
            "{}identity/{}/{}/id/show.json",
            self.support.build_common_rest_path_from_context(true),
            encode_segment(provider_id),
            encode_segment(remote_id)
        )
    }

    pub fn get(&self, id: &str) -> Result<RestIdentity, ApiError> {
        require(id, "identity id")?;
        let response = self.support.execute_get(&self.identity_url(id), AuthPolicy::BasicAuth)?;
        parse_json(response, 200)
    }

    /// Id of the identity `remote_id` registered by `provider_id`.
    pub fn get_identity_id(&self, provider_id: &str, remote_id: &str) -> Result<String, ApiError> {
        require(provider_id, "provider id")?;
        require(remote_id, "remote id")?;
        let url = self.identity_id_url(provider_id, remote_id);
        let response = self.support.execute_get(&url, AuthPolicy::BasicAuth)?;
        let IdentityId { id } = parse_json::<IdentityId>(response, 200)?;
        debug!(provider_id, remote_id, %id, "resolved identity id");
        Ok(id)
    }

    pub fn create(&self, _identity: &RestIdentity) -> Result<RestIdentity, ApiError> {
        Err(ApiError::UnsupportedMethod("identity create"))
    }

    pub fn update(&self, _identity: &RestIdentity) -> Result<RestIdentity, ApiError> {
        Err(ApiError::UnsupportedMethod("identity update"))
    }

    pub fn delete(&self, _identity: &RestIdentity) -> Result<RestIdentity, ApiError> {
        Err(ApiError::UnsupportedMethod("identity delete"))
    }
}
