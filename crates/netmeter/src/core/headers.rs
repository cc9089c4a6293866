use http::HeaderMap;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE, HOST};

/// Whether a `Content-Length` header is present at all.
///
/// Presence alone selects the known-length path, even when the value does
/// not parse.
pub fn has_declared_length(headers: &HeaderMap) -> bool { headers.contains_key(CONTENT_LENGTH) }

/// Parsed `Content-Length`, or `None` when absent or malformed.
pub fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

pub fn host(headers: &HeaderMap) -> Option<String> { header_string(headers, HOST) }

pub fn content_type(headers: &HeaderMap) -> Option<String> { header_string(headers, CONTENT_TYPE) }

fn header_string(headers: &HeaderMap, name: http::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}
