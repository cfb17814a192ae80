//! Upload handler: multipart intake, validation, and the event stream.

use super::error_response;
use crate::api::AppState;
use crate::archive::ArchiveReader;
use crate::error::Error;
use crate::session::EventSink;
use crate::types::StreamEvent;
use axum::{
    body::Body,
    extract::{Multipart, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use futures::Stream;
use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_util::sync::CancellationToken;

/// Multipart field that carries the archive bytes
const ARCHIVE_FIELD: &str = "archive";

/// POST /upload - Upload an export archive and stream extracted documents
///
/// Rejections happen before any stream byte is written and return a
/// structured JSON body. Accepted uploads answer with a newline-delimited
/// JSON event stream that stays open until a terminal event.
#[utoipa::path(
    post,
    path = "/upload",
    tag = "upload",
    request_body(
        content = Vec<u8>,
        description = "Export archive upload (multipart/form-data, field `archive`)",
        content_type = "multipart/form-data"
    ),
    responses(
        (status = 200, description = "Newline-delimited JSON event stream", content_type = "application/x-ndjson"),
        (status = 400, description = "No archive payload provided", body = crate::error::ApiError),
        (status = 413, description = "Upload exceeds the configured size limit", body = crate::error::ApiError),
        (status = 415, description = "Declared media type not allowed", body = crate::error::ApiError),
        (status = 422, description = "Upload is not a valid archive", body = crate::error::ApiError)
    )
)]
pub async fn upload_archive(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut archive_bytes: Option<Bytes> = None;
    let mut archive_name: Option<String> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            ARCHIVE_FIELD => {
                if let Some(content_type) = field.content_type()
                    && !state.config.upload.allows_media_type(content_type)
                {
                    return error_response(&Error::UnsupportedMediaType(content_type.to_string()));
                }
                archive_name = field.file_name().map(str::to_string);
                match field.bytes().await {
                    Ok(bytes) => archive_bytes = Some(bytes),
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to read uploaded archive field");
                        return (
                            StatusCode::BAD_REQUEST,
                            axum::Json(crate::error::ApiError::new(format!(
                                "failed to read upload: {e}"
                            ))),
                        )
                            .into_response();
                    }
                }
            }
            _ => {}
        }
    }

    let archive = match archive_bytes {
        Some(bytes) => bytes,
        None => {
            tracing::warn!("upload request without an archive field");
            return error_response(&Error::NoFileProvided);
        }
    };

    let limit = state.config.upload.max_file_size;
    if archive.len() as u64 > limit {
        return error_response(&Error::UploadTooLarge {
            size: archive.len() as u64,
            limit,
        });
    }

    // Validate the container up front so corrupt uploads get an HTTP-level
    // rejection; after this point the response framing is committed and
    // failures can only surface as stream events
    if let Err(e) = ArchiveReader::probe(&archive) {
        return error_response(&e);
    }

    let guard = state.processor.begin_session();
    let disconnect_token = guard.cancel_token().clone();
    let (sink, receiver) = EventSink::channel();

    sink.send(StreamEvent::log("starting upload processing"));
    let file_name = archive_name.unwrap_or_else(|| "upload.zip".to_string());
    sink.send(StreamEvent::log(format!(
        "received archive {} ({:.2} KB)",
        file_name,
        archive.len() as f64 / 1024.0
    )));

    let processor = state.processor.clone();
    tokio::spawn(async move {
        processor.run_session(archive, sink, guard).await;
    });

    let events = SessionEventStream {
        events: UnboundedReceiverStream::new(receiver),
        _disconnect: DisconnectGuard(disconnect_token),
    };
    let lines = events.filter_map(|event| match serde_json::to_string(&event) {
        Ok(json) => Some(Ok::<_, Infallible>(format!("{json}\n"))),
        Err(e) => {
            tracing::warn!(error = %e, "failed to serialize stream event");
            None
        }
    });

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/x-ndjson"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(lines),
    )
        .into_response()
}

/// Cancels the session token when the response body is dropped
///
/// Hyper drops the body when the client disconnects, which routes transport
/// closure into the same cancellation path as an explicit abort. On normal
/// completion the session has already finished and the cancel is a no-op.
struct DisconnectGuard(CancellationToken);

impl Drop for DisconnectGuard {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

/// Event stream for one session, with disconnect wiring attached
struct SessionEventStream {
    events: UnboundedReceiverStream<StreamEvent>,
    _disconnect: DisconnectGuard,
}

impl Stream for SessionEventStream {
    type Item = StreamEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.events).poll_next(cx)
    }
}
