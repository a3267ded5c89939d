use std::path::Path;

use anyhow::{Context, bail};
use rand::Rng;
use rand::distributions::Alphanumeric;
use reqwest::Method;
use serde_json::json;
use yt_auth::AuthedClient;

/// Metadata for the `videos.insert` call.
#[derive(Debug, Clone)]
pub struct VideoMetadata {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub category_id: String,
    pub privacy_status: String,
}

/// Build the JSON video resource for the upload request.
fn video_resource(meta: &VideoMetadata) -> serde_json::Value {
    let mut snippet = json!({
        "title": meta.title,
        "description": meta.description,
        "categoryId": meta.category_id,
    });
    // The API returns 400 Bad Request for empty tag strings, so the field is
    // omitted entirely when no tags are set.
    if !meta.tags.is_empty() {
        snippet["tags"] = json!(meta.tags);
    }
    json!({
        "snippet": snippet,
        "status": { "privacyStatus": meta.privacy_status },
    })
}

/// Frame the metadata and media bytes as a multipart/related body.
fn multipart_related_body(boundary: &str, metadata: &[u8], media: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(metadata.len() + media.len() + 256);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
    body.extend_from_slice(metadata);
    body.extend_from_slice(format!("\r\n--{boundary}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(media);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

/// Upload one video file in a single multipart request and return the new
/// video ID. No chunking, no resumption, no retry.
pub async fn upload_video(
    client: &AuthedClient,
    api_base: &str,
    file: &Path,
    meta: &VideoMetadata,
) -> anyhow::Result<String> {
    let media = tokio::fs::read(file)
        .await
        .with_context(|| format!("failed to read video file '{}'", file.display()))?;
    tracing::info!(file = %file.display(), bytes = media.len(), "uploading video");

    let metadata =
        serde_json::to_vec(&video_resource(meta)).context("failed to encode video metadata")?;
    let boundary: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(24)
        .map(char::from)
        .collect();
    let body = multipart_related_body(&boundary, &metadata, &media);

    let url = format!("{api_base}/upload/youtube/v3/videos");
    let response = client
        .request(Method::POST, &url)
        .query(&[("uploadType", "multipart"), ("part", "snippet,status")])
        .header(
            "Content-Type",
            format!("multipart/related; boundary={boundary}"),
        )
        .body(body)
        .send()
        .await
        .context("upload request failed")?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        bail!("upload rejected (status {status}): {body}");
    }

    let body: serde_json::Value = response
        .json()
        .await
        .context("upload response was not JSON")?;
    let id = body
        .get("id")
        .and_then(|v| v.as_str())
        .context("upload response missing video id")?;
    Ok(id.to_string())
}
