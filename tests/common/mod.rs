//! Shared fixtures for integration tests.

use std::io::{Cursor, Write};

/// Build an in-memory ZIP with the given (name, content) members, in order
pub fn build_zip(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, content) in files {
        if name.ends_with('/') {
            writer
                .add_directory(name.trim_end_matches('/'), options)
                .unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

/// Minimal HTML page with a title element
pub fn page(title: &str) -> Vec<u8> {
    format!("<html><head><title>{title}</title></head><body><p>{title} body</p></body></html>")
        .into_bytes()
}

/// An archive of `count` generated pages
pub fn archive_with_pages(count: usize) -> Vec<u8> {
    let members: Vec<(String, Vec<u8>)> = (0..count)
        .map(|i| (format!("page{i:04}.html"), page(&format!("Page {i}"))))
        .collect();
    let member_refs: Vec<(&str, &[u8])> = members
        .iter()
        .map(|(name, data)| (name.as_str(), data.as_slice()))
        .collect();
    build_zip(&member_refs)
}

/// Hand-built multipart/form-data body for the upload endpoint
pub fn multipart_upload(data: &[u8]) -> (String, Vec<u8>) {
    let boundary = "docstream-e2e-boundary-9f3c51";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"archive\"; filename=\"export.zip\"\r\n",
    );
    body.extend_from_slice(b"Content-Type: application/zip\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    (
        format!("multipart/form-data; boundary={boundary}"),
        body,
    )
}

/// Parse accumulated NDJSON text into event values
pub fn parse_events(text: &str) -> Vec<serde_json::Value> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).expect("each line must be valid JSON"))
        .collect()
}
