//! Shared fixtures: a recording reporter and a scripted HTTP client.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Mutex;

use bytes::Bytes;
use futures_util::stream;
use http::{Request, Response};
use netmeter::{BodyMetadata, HttpClient, RequestDescriptor, ResponseBody, ResponseDescriptor};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Received {
        request:  RequestDescriptor,
        response: ResponseDescriptor,
    },
    StreamError {
        request_id: u32,
        message:    String,
    },
    ExchangeError {
        request_id: u32,
        message:    String,
    },
}

/// Reporter that keeps every event in arrival order.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<Event>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<Event> { self.events.lock().unwrap().clone() }

    pub fn received(&self) -> Vec<ResponseDescriptor> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Received { response, .. } => Some(response),
                _ => None,
            })
            .collect()
    }
}

impl netmeter::EventReporter for RecordingReporter {
    fn response_received(&self, request: &RequestDescriptor, response: &ResponseDescriptor) {
        self.events.lock().unwrap().push(Event::Received {
            request:  request.clone(),
            response: response.clone(),
        });
    }

    fn response_input_stream_error(
        &self,
        request: &RequestDescriptor,
        _response: &ResponseDescriptor,
        error: &(dyn StdError + 'static),
    ) {
        self.events.lock().unwrap().push(Event::StreamError {
            request_id: request.id(),
            message:    error.to_string(),
        });
    }

    fn http_exchange_error(&self, request: &RequestDescriptor, error: &(dyn StdError + 'static)) {
        self.events.lock().unwrap().push(Event::ExchangeError {
            request_id: request.id(),
            message:    error.to_string(),
        });
    }
}

#[derive(Debug)]
pub struct TestError(pub String);

impl fmt::Display for TestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

impl StdError for TestError {}

type Reply = Box<dyn FnOnce() -> Result<Response<ResponseBody>, TestError> + Send>;

/// Client that answers requests with queued replies, in order.
#[derive(Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Reply>>,
}

impl ScriptedClient {
    pub fn new() -> Self { Self::default() }

    pub fn reply(self, reply: impl FnOnce() -> Result<Response<ResponseBody>, TestError> + Send + 'static) -> Self {
        self.replies.lock().unwrap().push_back(Box::new(reply));
        self
    }
}

impl HttpClient for ScriptedClient {
    type Error = TestError;

    async fn execute(&self, _request: Request<Bytes>) -> Result<Response<ResponseBody>, TestError> {
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(reply) => reply(),
            None => Err(TestError("no scripted reply left".to_string())),
        }
    }
}

/// A body of `chunks` with no declared length, served as a chunked response.
pub fn chunked_body(chunks: Vec<Vec<u8>>) -> ResponseBody {
    let items: Vec<Result<Bytes, TestError>> = chunks.into_iter().map(|c| Ok(Bytes::from(c))).collect();
    ResponseBody::from_stream(
        BodyMetadata {
            content_type:   Some("application/octet-stream".to_string()),
            content_length: None,
        },
        stream::iter(items),
    )
}

pub fn get(url: &str) -> Request<Bytes> {
    Request::get(url)
        .header(http::header::HOST, "example.com")
        .body(Bytes::new())
        .unwrap()
}
