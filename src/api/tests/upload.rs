//! Upload endpoint tests: validation rejections and the event stream.

use super::*;

#[tokio::test]
async fn upload_streams_documents_and_completes() {
    let (app, processor) = create_test_app(test_config());
    let archive = build_zip(&[
        ("first.html", &page("First")),
        ("image.png", b"\x89PNG"),
        ("second.html", &page("Second")),
        ("notes/", b""),
        ("notes/third.html", &page("Third")),
    ]);

    let response = app
        .oneshot(upload_request("archive", Some("application/zip"), &archive))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("application/x-ndjson")
    );

    let events = read_events(response.into_body()).await;
    let kinds = kinds(&events);

    // log events first, then metadata before any chunk, one terminal event
    assert_eq!(kinds.first().map(String::as_str), Some("log"));
    let metadata_pos = kinds.iter().position(|k| k == "metadata").unwrap();
    let chunk_pos = kinds.iter().position(|k| k == "documents_chunk").unwrap();
    assert!(metadata_pos < chunk_pos);
    assert_eq!(kinds.last().map(String::as_str), Some("chunks_complete"));

    let metadata = &events[metadata_pos];
    assert_eq!(metadata["count"], 3);
    assert_eq!(metadata["totalChunks"], 1);

    let chunk = &events[chunk_pos];
    assert_eq!(chunk["documentsInChunk"], 3);
    assert_eq!(chunk["chunkIndex"], 0);
    let titles: Vec<&str> = chunk["chunk"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["First", "Second", "Third"]);

    let complete = events.last().unwrap();
    assert_eq!(complete["sentChunks"], 1);
    assert_eq!(complete["totalChunks"], 1);
    assert_eq!(complete["total"], 3);

    assert!(
        !processor.has_active_session(),
        "session slot released after completion"
    );
}

#[tokio::test]
async fn upload_splits_large_result_into_chunks() {
    let mut config = test_config();
    config.chunking.default_chunk_size = 2;
    let (app, _processor) = create_test_app(config);

    let members: Vec<(String, Vec<u8>)> = (0..5)
        .map(|i| (format!("p{i}.html"), page(&format!("P{i}"))))
        .collect();
    let member_refs: Vec<(&str, &[u8])> = members
        .iter()
        .map(|(name, data)| (name.as_str(), data.as_slice()))
        .collect();
    let archive = build_zip(&member_refs);

    let response = app
        .oneshot(upload_request("archive", Some("application/zip"), &archive))
        .await
        .unwrap();
    let events = read_events(response.into_body()).await;

    let chunk_sizes: Vec<u64> = events
        .iter()
        .filter(|e| e["type"] == "documents_chunk")
        .map(|e| e["documentsInChunk"].as_u64().unwrap())
        .collect();
    assert_eq!(chunk_sizes, vec![2, 2, 1]);

    let total_from_chunks: u64 = chunk_sizes.iter().sum();
    assert_eq!(total_from_chunks, 5);

    let metadata = events.iter().find(|e| e["type"] == "metadata").unwrap();
    assert_eq!(metadata["totalChunks"], 3, "ceil(5 / 2)");

    // Every chunk is preceded by a progress event
    for window in events.windows(2) {
        if window[1]["type"] == "documents_chunk" {
            assert_eq!(window[0]["type"], "progress");
        }
    }
}

#[tokio::test]
async fn upload_with_no_html_members_streams_empty_result() {
    let (app, _processor) = create_test_app(test_config());
    let archive = build_zip(&[("readme.txt", b"plain text"), ("data.csv", b"1,2")]);

    let response = app
        .oneshot(upload_request("archive", Some("application/zip"), &archive))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let events = read_events(response.into_body()).await;

    let metadata = events.iter().find(|e| e["type"] == "metadata").unwrap();
    assert_eq!(metadata["count"], 0);
    assert_eq!(metadata["totalChunks"], 0);

    assert!(!events.iter().any(|e| e["type"] == "documents_chunk"));

    let complete = events.last().unwrap();
    assert_eq!(complete["type"], "chunks_complete");
    assert_eq!(complete["sentChunks"], 0);
    assert_eq!(complete["totalChunks"], 0);
    assert_eq!(complete["total"], 0);
}

#[tokio::test]
async fn upload_without_archive_field_returns_400() {
    let (app, processor) = create_test_app(test_config());

    let response = app
        .oneshot(upload_request("something_else", None, b"whatever"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "no archive file provided");

    assert!(!processor.has_active_session(), "no session was opened");
}

#[tokio::test]
async fn upload_of_non_archive_bytes_returns_422() {
    let (app, processor) = create_test_app(test_config());

    let response = app
        .oneshot(upload_request(
            "archive",
            Some("application/zip"),
            b"these bytes are not a zip container",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(
        json["error"].as_str().unwrap().contains("corrupt archive"),
        "structured error body, got {json}"
    );
    assert!(
        json["details"]
            .as_str()
            .unwrap()
            .contains("valid export archive")
    );

    assert!(!processor.has_active_session());
}

#[tokio::test]
async fn oversize_upload_returns_structured_413() {
    let mut config = test_config();
    config.upload.max_file_size = 256;
    let (app, _processor) = create_test_app(config);

    // Valid archive, just bigger than the configured limit (but inside the
    // body-limit slack, so the handler makes the decision)
    let padding = vec![b'x'; 4096];
    let archive = build_zip(&[("big.html", padding.as_slice())]);
    assert!(archive.len() > 256);

    let response = app
        .oneshot(upload_request("archive", Some("application/zip"), &archive))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "file too large");
    assert!(json["details"].as_str().unwrap().contains("maximum allowed size"));
}

#[tokio::test]
async fn upload_with_disallowed_media_type_returns_415() {
    let (app, _processor) = create_test_app(test_config());
    let archive = build_zip(&[("a.html", &page("A"))]);

    let response = app
        .oneshot(upload_request("archive", Some("text/html"), &archive))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["error"].as_str().unwrap().contains("text/html"));
}

#[tokio::test]
async fn upload_without_declared_media_type_is_accepted() {
    let (app, _processor) = create_test_app(test_config());
    let archive = build_zip(&[("a.html", &page("A"))]);

    let response = app
        .oneshot(upload_request("archive", None, &archive))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let events = read_events(response.into_body()).await;
    assert_eq!(
        events.last().unwrap()["type"],
        "chunks_complete",
        "media type check only applies when the client declares one"
    );
}

#[tokio::test]
async fn upload_sends_received_file_log() {
    let (app, _processor) = create_test_app(test_config());
    let archive = build_zip(&[("a.html", &page("A"))]);

    let response = app
        .oneshot(upload_request("archive", Some("application/zip"), &archive))
        .await
        .unwrap();
    let events = read_events(response.into_body()).await;

    let logs: Vec<&str> = events
        .iter()
        .filter(|e| e["type"] == "log")
        .map(|e| e["message"].as_str().unwrap())
        .collect();
    assert!(
        logs.iter().any(|m| m.contains("received archive export.zip")),
        "expected received-file log, got {logs:?}"
    );
}
