use std::sync::Arc;

use reqwest::header::HeaderMap;
use serde::Deserialize;
use tracing::debug;

use crate::bilibili::VIEW_URL;
use crate::bilibili::models::{Envelope, VideoId, VideoMetadata};
use crate::common::errors::{Result, SummaryError};
use crate::common::http::Transport;

#[derive(Debug, Deserialize)]
struct ViewData {
    pages: Vec<ViewPage>,
    owner: ViewOwner,
}

#[derive(Debug, Deserialize)]
struct ViewPage {
    cid: u64,
}

#[derive(Debug, Deserialize)]
struct ViewOwner {
    mid: u64,
}

/// Looks up the content id and owner id of a video.
pub struct MetadataResolver {
    transport: Arc<dyn Transport>,
}

impl MetadataResolver {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn resolve(&self, video_id: &VideoId, headers: &HeaderMap) -> Result<VideoMetadata> {
        let url = format!("{}?bvid={}", VIEW_URL, urlencoding::encode(video_id));
        let body = self.transport.get(&url, headers).await?;
        debug!("Video details response: {}", body);

        let envelope = Envelope::parse(&body)?;
        if envelope.code != 0 {
            return Err(SummaryError::Api {
                code: envelope.code,
                message: envelope.message,
                body: Some(body),
            });
        }

        let data = envelope
            .data
            .ok_or_else(|| SummaryError::malformed("video details response has no data"))?;
        let view: ViewData = serde_json::from_value(data)
            .map_err(|e| SummaryError::malformed(format!("video details: {}", e)))?;

        let page = view
            .pages
            .first()
            .ok_or_else(|| SummaryError::malformed("video details contain no pages"))?;

        Ok(VideoMetadata {
            content_id: page.cid,
            owner_id: view.owner.mid,
        })
    }
}
