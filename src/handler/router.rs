//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: route matching on verb + path
//! shape, body collection, dispatch to the CRUD operations, and access
//! logging.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Method, Request, Response};

use crate::config::AppState;
use crate::handler::squirrels;
use crate::http::{self, HyperResponder, Responder};
use crate::logger::{self, AccessLogEntry};
use crate::store::{SquirrelStore, StoreError};

/// Enumerated route table: one variant per (verb, path shape) pair the
/// service answers, with every non-matching case funnelled to `NotFound`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Index,
    Retrieve(String),
    Create,
    Update(String),
    Delete(String),
    NotFound,
}

/// Match a request line against the route table, in fixed order.
///
/// The collection name must be `squirrels`. "id required but absent" and
/// "unknown path" are distinct non-matches that share the same outcome.
pub fn match_route(method: &Method, path: &str) -> Route {
    let (collection, id) = parse_path(path);

    if collection != Some("squirrels") {
        return Route::NotFound;
    }

    match (method, id) {
        (&Method::GET, None) => Route::Index,
        (&Method::GET, Some(id)) => Route::Retrieve(id.to_string()),
        (&Method::POST, None) => Route::Create,
        // Creation never takes a caller-supplied identifier
        (&Method::POST, Some(_)) => Route::NotFound,
        (&Method::PUT, Some(id)) => Route::Update(id.to_string()),
        (&Method::DELETE, Some(id)) => Route::Delete(id.to_string()),
        _ => Route::NotFound,
    }
}

/// Positional path parse: segment one is the collection, segment two the
/// id. Empty segments and anything past the id are ignored.
fn parse_path(path: &str) -> (Option<&str>, Option<&str>) {
    let mut segments = path.split('/');
    segments.next(); // empty segment before the leading slash
    let collection = segments.next().filter(|s| !s.is_empty());
    let id = segments.next().filter(|s| !s.is_empty());
    (collection, id)
}

/// Dispatch a matched route to its operation
pub async fn dispatch(
    route: Route,
    body: &[u8],
    store: &dyn SquirrelStore,
    out: &mut dyn Responder,
) -> Result<(), StoreError> {
    match route {
        Route::Index => squirrels::index(store, out).await,
        Route::Retrieve(id) => squirrels::retrieve(store, &id, out).await,
        Route::Create => squirrels::create(store, body, out).await,
        Route::Update(id) => squirrels::update(store, &id, body, out).await,
        Route::Delete(id) => squirrels::delete(store, &id, out).await,
        Route::NotFound => {
            squirrels::not_found(out);
            Ok(())
        }
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = std::time::Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let version = format!("{:?}", req.version());

    let access_log = state
        .cached_access_log
        .load(std::sync::atomic::Ordering::Relaxed);

    if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
        return Ok(resp);
    }

    let route = match_route(&method, uri.path());

    // Only POST/PUT carry a payload; collecting an absent body yields
    // empty bytes either way
    let body = match req.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            Bytes::new()
        }
    };

    let mut out = HyperResponder::new();
    let response = match dispatch(route, &body, state.store.as_ref(), &mut out).await {
        Ok(()) => out.into_response(),
        Err(e) => {
            logger::log_error(&format!("Storage failure for {method} {}: {e}", uri.path()));
            http::build_500_response()
        }
    };

    if access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            method.to_string(),
            uri.path().to_string(),
        );
        entry.query = uri.query().map(ToString::to_string);
        entry.http_version = version
            .strip_prefix("HTTP/")
            .unwrap_or(version.as_str())
            .to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = response_body_len(&response);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

fn response_body_len(response: &Response<Full<Bytes>>) -> usize {
    use hyper::body::Body;
    usize::try_from(response.body().size_hint().exact().unwrap_or(0)).unwrap_or(usize::MAX)
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(
    req: &Request<hyper::body::Incoming>,
    max_body_size: u64,
) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    let size_str = content_length.to_str().ok()?;
    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            logger::log_warning(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            Some(http::build_413_response())
        }
        Ok(_) => None,
        Err(_) => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: '{size_str}', skipping size check"
            ));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::squirrels::mock::MockStore;
    use crate::http::responder::testing::RecordingResponder;

    #[test]
    fn get_collection_matches_index() {
        assert_eq!(match_route(&Method::GET, "/squirrels"), Route::Index);
    }

    #[test]
    fn get_with_id_matches_retrieve() {
        assert_eq!(
            match_route(&Method::GET, "/squirrels/1"),
            Route::Retrieve("1".to_string())
        );
    }

    #[test]
    fn post_collection_matches_create() {
        assert_eq!(match_route(&Method::POST, "/squirrels"), Route::Create);
    }

    #[test]
    fn post_with_id_is_not_found() {
        // Preserved behavior: 404, not 400/405
        assert_eq!(match_route(&Method::POST, "/squirrels/42"), Route::NotFound);
    }

    #[test]
    fn put_requires_an_id() {
        assert_eq!(
            match_route(&Method::PUT, "/squirrels/1"),
            Route::Update("1".to_string())
        );
        assert_eq!(match_route(&Method::PUT, "/squirrels"), Route::NotFound);
    }

    #[test]
    fn delete_requires_an_id() {
        assert_eq!(
            match_route(&Method::DELETE, "/squirrels/2"),
            Route::Delete("2".to_string())
        );
        assert_eq!(match_route(&Method::DELETE, "/squirrels"), Route::NotFound);
    }

    #[test]
    fn unknown_collection_is_not_found() {
        assert_eq!(match_route(&Method::GET, "/mike"), Route::NotFound);
        assert_eq!(match_route(&Method::GET, "/"), Route::NotFound);
        assert_eq!(match_route(&Method::POST, "/api/squirrels"), Route::NotFound);
    }

    #[test]
    fn unknown_verb_is_not_found() {
        assert_eq!(match_route(&Method::PATCH, "/squirrels/1"), Route::NotFound);
        assert_eq!(match_route(&Method::HEAD, "/squirrels"), Route::NotFound);
    }

    #[test]
    fn trailing_slash_reads_as_collection_path() {
        assert_eq!(match_route(&Method::GET, "/squirrels/"), Route::Index);
    }

    #[tokio::test]
    async fn not_found_dispatch_makes_no_storage_calls() {
        let store = MockStore::default();
        let mut out = RecordingResponder::default();

        dispatch(Route::NotFound, b"", &store, &mut out)
            .await
            .unwrap();

        assert!(store.calls().is_empty());
        assert_eq!(out.statuses, vec![404]);
        assert_eq!(
            out.headers,
            vec![("Content-Type".to_string(), "text/plain".to_string())]
        );
        assert_eq!(out.bodies, vec![b"404 Not Found".to_vec()]);
    }
}
