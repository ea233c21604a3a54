//! Activity stream operations under `activity/`.

use tracing::debug;

use super::{encode_segment, parse_json, require};
use crate::context::AuthPolicy;
use crate::error::ApiError;
use crate::model::RestActivity;
use crate::support::SocialHttpClientSupport;
use crate::transport::HttpClientFactory;

/// Posting, reading and deleting activities of the session's identity.
#[derive(Debug, Clone)]
pub struct ActivityService<F> {
    support: SocialHttpClientSupport<F>,
}

impl<F: HttpClientFactory> ActivityService<F> {
    pub fn new(support: SocialHttpClientSupport<F>) -> Self {
        Self { support }
    }

    fn base_path(&self) -> String {
        self.support.build_common_rest_path_from_context(true)
    }

    pub fn get(&self, id: &str) -> Result<RestActivity, ApiError> {
        require(id, "activity id")?;
        let url = format!("{}activity/{}.json", self.base_path(), encode_segment(id));
        let response = self.support.execute_get(&url, AuthPolicy::BasicAuth)?;
        parse_json(response, 200)
    }

    /// Post `activity`; the server fills in id, owner and posted time.
    pub fn create(&self, activity: &RestActivity) -> Result<RestActivity, ApiError> {
        require(&activity.title, "activity title")?;
        let url = format!("{}activity.json", self.base_path());
        let response = self.support.execute_post(&url, AuthPolicy::BasicAuth, Some(activity))?;
        let created: RestActivity = parse_json(response, 200)?;
        debug!(id = ?created.id, "activity created");
        Ok(created)
    }

    pub fn update(&self, _activity: &RestActivity) -> Result<RestActivity, ApiError> {
        Err(ApiError::UnsupportedMethod("activity update"))
    }

    /// Delete `activity` and return it as the server last saw it.
    pub fn delete(&self, activity: &RestActivity) -> Result<RestActivity, ApiError> {
        let id = activity.id.as_deref().unwrap_or_default();
        require(id, "activity id")?;
        let url = format!("{}activity/destroy/{}.json", self.base_path(), encode_segment(id));
        let response = self.support.execute_post_empty(&url, AuthPolicy::BasicAuth)?;
        parse_json(response, 200)
    }
}
