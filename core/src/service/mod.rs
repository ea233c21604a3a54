//! Typed services over the social REST resources.
//!
//! Each service executes through a `SocialHttpClientSupport` and interprets
//! the raw response: the expected status yields a parsed model, everything
//! else maps to an `ApiError`.

mod activity;
mod identity;

pub use activity::ActivityService;
pub use identity::IdentityService;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::{ApiError, ClientError};
use crate::http::HttpResponse;
use crate::support::{consume, get_content};

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &mut HttpResponse, expected: u16) -> Result<(), ApiError> {
    let status = response.status;
    if status == expected {
        return Ok(());
    }
    match status {
        401 | 404 => {
            if let Some(entity) = response.entity.as_mut() {
                consume(entity).map_err(ClientError::from_cause)?;
            }
            if status == 404 {
                Err(ApiError::NotFound)
            } else {
                Err(ApiError::Unauthorized)
            }
        }
        _ => Err(ApiError::HttpError {
            status,
            body: error_body(response),
        }),
    }
}

/// Best-effort text of an error response. When `get_content` refuses the
/// body, whatever was buffered is decoded lossily instead.
fn error_body(response: &mut HttpResponse) -> String {
    match get_content(response) {
        Ok(body) => body,
        Err(err) => {
            warn!(status = response.status, error = %err, "could not read error response body");
            response
                .entity
                .as_ref()
                .and_then(|entity| entity.bytes().ok())
                .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
                .unwrap_or_default()
        }
    }
}

fn parse_json<T: DeserializeOwned>(mut response: HttpResponse, expected: u16) -> Result<T, ApiError> {
    check_status(&mut response, expected)?;
    let content = get_content(&mut response)?;
    serde_json::from_str(&content).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Characters escaped inside one path segment; `/` included so a value can
/// never span segments.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

fn encode_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

/// Reject values that are blank or that would be read as a dot segment.
fn require(value: &str, name: &'static str) -> Result<(), ApiError> {
    if value.trim().is_empty() || value == "." || value == ".." {
        return Err(ApiError::InvalidArgument(name));
    }
    Ok(())
}
