//! HTTP wire types shared by the request layer and its transports.
//!
//! # Design
//! Requests are plain data built by `SocialHttpClientSupport` and handed to a
//! `SocialHttpClient`. Responses carry an optional [`Entity`] whose content
//! is either still a live stream from the connection or an in-memory buffer.
//! A streaming entity holds the underlying connection until it is read to the
//! end, buffered or consumed.

use std::fmt;
use std::io::{self, Read};

use bytes::Bytes;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: &str) -> Self {
        Self {
            method,
            url: url.to_string(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Replace any header named `name` (case-insensitive) with `value`.
    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

enum Content {
    Stream(Box<dyn Read + Send>),
    Buffered(Bytes),
    Closed,
}

/// The body of a response.
pub struct Entity {
    content: Content,
    content_length: Option<u64>,
    content_type: Option<String>,
}

impl Entity {
    /// A body still backed by the connection. `content_length` is `None`
    /// when the server did not declare one.
    pub fn streaming<R>(reader: R, content_length: Option<u64>, content_type: Option<String>) -> Self
    where
        R: Read + Send + 'static,
    {
        Self {
            content: Content::Stream(Box::new(reader)),
            content_length,
            content_type,
        }
    }

    /// An in-memory body whose length is known.
    pub fn buffered(data: impl Into<Bytes>, content_type: Option<String>) -> Self {
        let data = data.into();
        Self {
            content_length: Some(data.len() as u64),
            content: Content::Buffered(data),
            content_type,
        }
    }

    pub fn is_streaming(&self) -> bool {
        matches!(self.content, Content::Stream(_))
    }

    /// Declared length in bytes, `None` when unknown.
    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    /// The `charset` parameter of the content type, if any.
    pub fn charset(&self) -> Option<&str> {
        self.content_type
            .as_deref()?
            .split(';')
            .skip(1)
            .filter_map(|param| param.split_once('='))
            .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
            .map(|(_, value)| value.trim().trim_matches('"'))
    }

    /// Read a streaming body fully into memory. The declared length is kept
    /// as-is, so an unknown length stays unknown after buffering.
    pub fn buffer(self) -> io::Result<Entity> {
        let data = match self.content {
            Content::Stream(mut reader) => {
                let mut data = Vec::new();
                reader.read_to_end(&mut data)?;
                Bytes::from(data)
            }
            Content::Buffered(data) => data,
            Content::Closed => return Err(content_closed()),
        };
        Ok(Entity {
            content: Content::Buffered(data),
            content_length: self.content_length,
            content_type: self.content_type,
        })
    }

    /// The buffered bytes. Fails for streaming or closed entities.
    pub fn bytes(&self) -> io::Result<Bytes> {
        match &self.content {
            Content::Buffered(data) => Ok(data.clone()),
            Content::Stream(_) => Err(io::Error::other("entity content is streaming, buffer it first")),
            Content::Closed => Err(content_closed()),
        }
    }

    /// Drop the connection stream of a streaming entity.
    pub(crate) fn close(&mut self) {
        if self.is_streaming() {
            self.content = Content::Closed;
        }
    }

    /// A second handle on a buffered entity, sharing its bytes.
    pub(crate) fn try_clone(&self) -> Option<Entity> {
        match &self.content {
            Content::Buffered(data) => Some(Entity {
                content: Content::Buffered(data.clone()),
                content_length: self.content_length,
                content_type: self.content_type.clone(),
            }),
            _ => None,
        }
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let content = match &self.content {
            Content::Stream(_) => "stream",
            Content::Buffered(_) => "buffered",
            Content::Closed => "closed",
        };
        f.debug_struct("Entity")
            .field("content", &content)
            .field("content_length", &self.content_length)
            .field("content_type", &self.content_type)
            .finish()
    }
}

fn content_closed() -> io::Error {
    io::Error::other("entity content has already been consumed")
}

/// An HTTP response as returned by a transport.
///
/// The caller owns the response; a streaming entity must be consumed or
/// buffered to release the connection.
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub entity: Option<Entity>,
}
