//! Speed bookkeeping driven by real interpreter events.

use std::sync::Arc;

use bytes::Bytes;
use futures_util::stream;
use http::header::CONTENT_LENGTH;
use http::{Request, Response};
use netmeter::{BodyMetadata, ExchangeInterpreter, ResponseBody, TimeInterval};
use netmeter_store::{FileSpeedStore, SpeedReporter, SpeedStore};
use tempfile::tempdir;

fn request() -> Request<()> { Request::get("https://cdn.example.com/asset").body(()).unwrap() }

fn chunked(sizes: &[usize]) -> ResponseBody {
    let chunks: Vec<Result<Bytes, std::io::Error>> = sizes
        .iter()
        .map(|&size| Ok(Bytes::from(vec![0u8; size])))
        .collect();
    ResponseBody::from_stream(BodyMetadata::default(), stream::iter(chunks))
}

#[tokio::test]
async fn test_measured_body_updates_file_store() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("speeds.json");
    let reporter = Arc::new(SpeedReporter::new(FileSpeedStore::open(&path).unwrap(), "wifi"));
    let interpreter = ExchangeInterpreter::new(Arc::clone(&reporter));

    let response = Response::new(chunked(&[1_000, 1_000, 1_000, 1_000]));
    let response = interpreter
        .on_response(1, TimeInterval::new(0, 2_000), &request(), response)
        .unwrap();
    assert!(!reporter.store().has_average_speed("wifi"));

    let body = response.into_body().bytes().await.unwrap();
    assert_eq!(body.len(), 4_000);
    assert_eq!(reporter.store().average_speed("wifi"), 2_000.0);

    let reopened = FileSpeedStore::open(&path).unwrap();
    assert_eq!(reopened.average_speed("wifi"), 2_000.0);
}

#[tokio::test]
async fn test_declared_length_feeds_store_immediately() {
    let dir = tempdir().unwrap();
    let reporter = Arc::new(SpeedReporter::new(
        FileSpeedStore::open(dir.path().join("speeds.json")).unwrap(),
        "4g",
    ));
    let interpreter = ExchangeInterpreter::new(Arc::clone(&reporter));

    let response = Response::builder()
        .header(CONTENT_LENGTH, "500")
        .body(ResponseBody::from_bytes(vec![0u8; 500]))
        .unwrap();
    interpreter
        .on_response(2, TimeInterval::new(1_000, 1_250), &request(), response)
        .unwrap();

    assert_eq!(reporter.store().average_speed("4g"), 2_000.0);
}

#[tokio::test]
async fn test_abandoned_body_leaves_store_untouched() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("speeds.json");
    let reporter = Arc::new(SpeedReporter::new(FileSpeedStore::open(&path).unwrap(), "wifi"));
    let interpreter = ExchangeInterpreter::new(Arc::clone(&reporter));

    let response = interpreter
        .on_response(3, TimeInterval::new(0, 100), &request(), Response::new(chunked(&[10, 10])))
        .unwrap();
    drop(response);

    assert!(!reporter.store().has_average_speed("wifi"));
    assert!(!path.exists());
}
