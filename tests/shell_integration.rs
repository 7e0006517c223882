//! Integration tests for the interactive session loop.
//!
//! Commands are written into an in-memory pipe while the session runs, so
//! suggestions arrive between commands just as they would for a user.

mod common;

use common::{session_with, FakeProvider, RecordingRenderer};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncWriteExt, BufReader, DuplexStream};

async fn type_line(input: &mut DuplexStream, line: &str) {
    input.write_all(line.as_bytes()).await.unwrap();
    input.write_all(b"\n").await.unwrap();
}

async fn pause() {
    tokio::time::sleep(Duration::from_secs(1)).await;
}

#[tokio::test(start_paused = true)]
async fn test_shell_fills_form_and_submits() {
    let provider = Arc::new(FakeProvider::new());
    let mut session = session_with(provider.clone());
    let mut renderer = RecordingRenderer::default();
    let mut out = Vec::new();
    let (mut input, reader) = tokio::io::duplex(1024);

    let script = async move {
        type_line(&mut input, "edit origin Paris").await;
        pause().await;
        type_line(&mut input, "edit dest Lyon").await;
        pause().await;
        type_line(&mut input, "add").await;
        type_line(&mut input, "edit #2 Dijon").await;
        pause().await;
        type_line(&mut input, "select origin 1").await;
        type_line(&mut input, "select d 1").await;
        type_line(&mut input, "select 2 Dijon-1").await;
        type_line(&mut input, "optimize off").await;
        type_line(&mut input, "submit").await;
        type_line(&mut input, "quit").await;
    };

    let (result, ()) = tokio::join!(
        session.run(BufReader::new(reader), &mut out, &mut renderer),
        script
    );
    result.unwrap();

    let transcript = String::from_utf8(out).unwrap();
    assert!(transcript.contains("Origin (#0) suggestions:"));
    assert!(transcript.contains("1. Paris, Testland"));
    assert!(transcript.contains("Added Stop 1 (#2)"));
    assert!(transcript.contains("Stop 1 set to Dijon, Testland"));
    assert!(transcript.contains("Waypoint optimization off"));

    assert_eq!(renderer.rendered.len(), 1);
    let (request, route) = &renderer.rendered[0];
    assert_eq!(request.origin, "Paris, Testland");
    assert_eq!(request.destination, "Lyon, Testland");
    assert_eq!(request.waypoints, vec!["Dijon, Testland"]);
    assert!(!request.optimize);
    assert_eq!(route.legs.len(), 2);
    assert_eq!(provider.prediction_calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_shell_reports_invalid_fields_on_submit() {
    let provider = Arc::new(FakeProvider::new());
    let mut session = session_with(provider.clone());
    let mut renderer = RecordingRenderer::default();
    let mut out = Vec::new();
    let (mut input, reader) = tokio::io::duplex(1024);

    let script = async move {
        type_line(&mut input, "edit origin Paris").await;
        type_line(&mut input, "submit").await;
        type_line(&mut input, "remove origin").await;
        type_line(&mut input, "select origin 9").await;
        type_line(&mut input, "teleport").await;
        type_line(&mut input, "show").await;
        type_line(&mut input, "quit").await;
    };

    let (result, ()) = tokio::join!(
        session.run(BufReader::new(reader), &mut out, &mut renderer),
        script
    );
    result.unwrap();

    let transcript = String::from_utf8(out).unwrap();
    assert!(transcript.contains(
        "Select a suggested address for: origin #0 (not confirmed), destination #1 (missing)"
    ));
    assert!(transcript.contains("#0 is not a stop"));
    assert!(transcript.contains("No such suggestion for Origin"));
    assert!(transcript.contains("Unknown command 'teleport'"));
    assert!(transcript.contains("[?] Origin (#0): Paris"));
    assert!(renderer.rendered.is_empty());
    assert!(provider.route_requests().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_shell_stops_at_end_of_input() {
    let provider = Arc::new(FakeProvider::new());
    let mut session = session_with(provider);
    let mut renderer = RecordingRenderer::default();
    let mut out = Vec::new();

    session
        .run(BufReader::new(&b"help\n"[..]), &mut out, &mut renderer)
        .await
        .unwrap();

    let transcript = String::from_utf8(out).unwrap();
    assert!(transcript.contains("Commands:"));
}
