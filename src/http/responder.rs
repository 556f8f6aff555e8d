//! Responder capability
//!
//! Handlers emit responses through three primitive operations (set status,
//! set header, write body) instead of writing to an output stream directly.
//! The production implementation accumulates into a hyper response; tests
//! substitute a recording double and assert call counts and arguments.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::logger;

pub trait Responder: Send {
    fn status(&mut self, code: u16);

    fn header(&mut self, name: &'static str, value: &str);

    fn body(&mut self, data: &[u8]);
}

/// Responder backed by a hyper response builder
pub struct HyperResponder {
    status: u16,
    headers: Vec<(&'static str, String)>,
    body: Bytes,
}

impl HyperResponder {
    pub const fn new() -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    pub fn body_len(&self) -> usize {
        self.body.len()
    }

    /// Consume the accumulated status, headers, and body into a response
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let mut builder = Response::builder().status(self.status);
        for (name, value) in &self.headers {
            builder = builder.header(*name, value);
        }

        builder.body(Full::new(self.body)).unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build response: {e}"));
            Response::new(Full::new(Bytes::new()))
        })
    }
}

impl Responder for HyperResponder {
    fn status(&mut self, code: u16) {
        self.status = code;
    }

    fn header(&mut self, name: &'static str, value: &str) {
        self.headers.push((name, value.to_string()));
    }

    fn body(&mut self, data: &[u8]) {
        self.body = Bytes::copy_from_slice(data);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Responder;

    /// Test double recording every primitive call
    #[derive(Debug, Default)]
    pub struct RecordingResponder {
        pub statuses: Vec<u16>,
        pub headers: Vec<(String, String)>,
        pub bodies: Vec<Vec<u8>>,
    }

    impl Responder for RecordingResponder {
        fn status(&mut self, code: u16) {
            self.statuses.push(code);
        }

        fn header(&mut self, name: &'static str, value: &str) {
            self.headers.push((name.to_string(), value.to_string()));
        }

        fn body(&mut self, data: &[u8]) {
            self.bodies.push(data.to_vec());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_response_carries_status_header_and_body() {
        let mut out = HyperResponder::new();
        out.status(200);
        out.header("Content-Type", "application/json");
        out.body(b"[]");

        assert_eq!(out.body_len(), 2);

        let response = out.into_response();
        assert_eq!(response.status(), 200);
        assert_eq!(
            response.headers().get("Content-Type").unwrap(),
            "application/json"
        );
    }

    #[test]
    fn defaults_to_200_with_empty_body() {
        let out = HyperResponder::new();
        assert_eq!(out.body_len(), 0);

        let response = out.into_response();
        assert_eq!(response.status(), 200);
        assert!(response.headers().is_empty());
    }
}
