//! Domain models exchanged with the social REST service.
//!
//! # Design
//! Any `Serialize` type is a [`Model`] through the blanket impl, so request
//! payloads need no hand-written JSON writers. Field names follow the
//! service's camelCase JSON.

use std::io;

use serde::{Deserialize, Serialize};

/// A value that can write itself as JSON text.
pub trait Model {
    fn write_json_string(&self, writer: &mut dyn io::Write) -> io::Result<()>;
}

impl<T: Serialize + ?Sized> Model for T {
    fn write_json_string(&self, writer: &mut dyn io::Write) -> io::Result<()> {
        serde_json::to_writer(writer, self).map_err(io::Error::from)
    }
}

/// A social identity, e.g. an organization user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestIdentity {
    pub id: String,
    pub provider_id: String,
    pub remote_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<RestProfile>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestProfile {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Body of the `identity/{provider}/{remote}/id/show` resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityId {
    pub id: String,
}

/// An activity posted to a stream.
///
/// Server-assigned fields are omitted from request bodies while unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestActivity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_time: Option<u64>,
    #[serde(default)]
    pub liked: bool,
}

impl RestActivity {
    pub fn with_title(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Self::default()
        }
    }
}
