//! In-memory transport double for unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, Cursor};
use std::rc::Rc;

use crate::context::{ClientContext, Credentials, RequestTarget};
use crate::error::TransportError;
use crate::http::{Entity, HttpRequest, HttpResponse};
use crate::transport::{basic_auth_header, HttpClientFactory, SocialHttpClient};

/// What the double observed for one request.
#[derive(Debug, Clone)]
pub struct Sent {
    pub target: RequestTarget,
    pub request: HttpRequest,
    pub authorization: Option<String>,
}

struct Canned {
    status: u16,
    body: String,
    declare_length: bool,
}

#[derive(Default)]
struct State {
    sent: Vec<Sent>,
    responses: VecDeque<Canned>,
    failure: Option<String>,
}

/// Records every request and answers with canned responses, 200 with an
/// empty body once the queue runs dry.
#[derive(Clone, Default)]
pub struct RecordingFactory {
    state: Rc<RefCell<State>>,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        let factory = Self::new();
        factory.state.borrow_mut().failure = Some(message.to_string());
        factory
    }

    pub fn respond(&self, status: u16, body: &str) -> &Self {
        self.push(status, body, true)
    }

    /// Answer without a declared content length, as a chunked response would.
    pub fn respond_chunked(&self, status: u16, body: &str) -> &Self {
        self.push(status, body, false)
    }

    fn push(&self, status: u16, body: &str, declare_length: bool) -> &Self {
        self.state.borrow_mut().responses.push_back(Canned {
            status,
            body: body.to_string(),
            declare_length,
        });
        self
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.state.borrow().sent.clone()
    }

    pub fn last(&self) -> Sent {
        self.sent().pop().expect("no request was sent")
    }
}

impl HttpClientFactory for RecordingFactory {
    type Client = RecordingClient;

    fn new_instance(&self, context: &ClientContext) -> RecordingClient {
        RecordingClient {
            state: Rc::clone(&self.state),
            credentials: context.credentials.clone(),
            basic_auth: false,
        }
    }
}

pub struct RecordingClient {
    state: Rc<RefCell<State>>,
    credentials: Option<Credentials>,
    basic_auth: bool,
}

impl SocialHttpClient for RecordingClient {
    fn set_basic_authenticate_to_request(&mut self) {
        self.basic_auth = true;
    }

    fn execute(&self, target: &RequestTarget, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let authorization = if self.basic_auth {
            let credentials = self.credentials.as_ref().ok_or(TransportError::MissingCredentials)?;
            Some(basic_auth_header(credentials))
        } else {
            None
        };
        let mut state = self.state.borrow_mut();
        state.sent.push(Sent {
            target: target.clone(),
            request,
            authorization,
        });
        if let Some(message) = &state.failure {
            return Err(io::Error::new(io::ErrorKind::ConnectionRefused, message.clone()).into());
        }
        let Canned {
            status,
            body,
            declare_length,
        } = state.responses.pop_front().unwrap_or(Canned {
            status: 200,
            body: String::new(),
            declare_length: true,
        });
        let length = declare_length.then_some(body.len() as u64);
        Ok(HttpResponse {
            status,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            entity: Some(Entity::streaming(
                Cursor::new(body.into_bytes()),
                length,
                Some("application/json".to_string()),
            )),
        })
    }
}
