use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::bilibili::models::{Envelope, SessionCredential, SummaryResult, VideoId};
use crate::bilibili::wbi::{self, WbiParams};
use crate::bilibili::{CONCLUSION_URL, KeyProvider, MetadataResolver, request_headers};
use crate::common::errors::{Result, SummaryError};
use crate::common::http::{HttpClient, Transport};

/// Progress of one summary fetch cycle.
///
/// A cycle always starts at `Idle` and ends in `Done` or `Failed`; it is
/// never resumed, so a retry re-runs every step with fresh keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryStage {
    Idle,
    ResolvingMetadata,
    FetchingKeys,
    Signing,
    FetchingSummary,
    Done,
    Failed,
}

impl std::fmt::Display for SummaryStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::ResolvingMetadata => "resolving-metadata",
            Self::FetchingKeys => "fetching-keys",
            Self::Signing => "signing",
            Self::FetchingSummary => "fetching-summary",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Runs the metadata -> keys -> signed summary request cycle.
///
/// The gateway holds no per-caller state: the credential is passed into
/// every call, so one gateway can serve concurrent callers.
pub struct SummaryGateway {
    transport: Arc<dyn Transport>,
    metadata: MetadataResolver,
    keys: KeyProvider,
    user_agent: String,
    clock: fn() -> u64,
}

impl SummaryGateway {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            metadata: MetadataResolver::new(transport.clone()),
            keys: KeyProvider::new(transport.clone()),
            transport,
            user_agent: HttpClient::default_user_agent(),
            clock: wbi::unix_now,
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Replaces the source of the `wts` timestamp.
    pub fn with_clock(mut self, clock: fn() -> u64) -> Self {
        self.clock = clock;
        self
    }

    pub async fn get_summary(
        &self,
        video_id: &VideoId,
        credential: &SessionCredential,
    ) -> Result<SummaryResult> {
        self.get_summary_observed(video_id, credential, |_| {}).await
    }

    /// Same as [`get_summary`](Self::get_summary), reporting every stage
    /// transition to `on_stage`.
    pub async fn get_summary_observed<F>(
        &self,
        video_id: &VideoId,
        credential: &SessionCredential,
        mut on_stage: F,
    ) -> Result<SummaryResult>
    where
        F: FnMut(SummaryStage),
    {
        let mut observe = |stage: SummaryStage| {
            debug!("Summary cycle for {}: {}", video_id, stage);
            on_stage(stage);
        };

        observe(SummaryStage::Idle);
        info!("Starting to retrieve video AI summary, BV ID: {}", video_id);

        match self.run_cycle(video_id, credential, &mut observe).await {
            Ok(result) => {
                observe(SummaryStage::Done);
                info!("Successfully retrieved video AI summary");
                Ok(result)
            }
            Err(e) => {
                observe(SummaryStage::Failed);
                error!("Failed to retrieve video AI summary: {}", e);
                Err(e)
            }
        }
    }

    async fn run_cycle<F>(
        &self,
        video_id: &VideoId,
        credential: &SessionCredential,
        observe: &mut F,
    ) -> Result<SummaryResult>
    where
        F: FnMut(SummaryStage),
    {
        let headers = request_headers(&self.user_agent, credential)?;

        observe(SummaryStage::ResolvingMetadata);
        observe(SummaryStage::FetchingKeys);
        let (metadata, keys) = tokio::try_join!(
            self.metadata.resolve(video_id, &headers),
            self.keys.fetch_keys(&headers),
        )?;
        debug!(
            "Resolved video details, CID: {}, UP ID: {}",
            metadata.content_id, metadata.owner_id
        );

        observe(SummaryStage::Signing);
        let mut params = WbiParams::new();
        params
            .insert("bvid", video_id)
            .insert("cid", metadata.content_id)
            .insert("up_mid", metadata.owner_id);
        let query = keys.sign_at(params, (self.clock)())?;

        observe(SummaryStage::FetchingSummary);
        let url = format!("{}?{}", CONCLUSION_URL, query);
        let body = self.transport.get(&url, &headers).await?;
        debug!("AI summary response: {}", body);

        parse_summary(body)
    }
}

/// Parses the conclusion endpoint body. A zero status without a
/// `model_result` yields an empty result.
fn parse_summary(body: String) -> Result<SummaryResult> {
    let envelope = Envelope::parse(&body)?;
    if envelope.code != 0 {
        return Err(SummaryError::Api {
            code: envelope.code,
            message: envelope.message,
            body: Some(body),
        });
    }

    let model_result = envelope
        .data
        .and_then(|mut data| data.get_mut("model_result").map(Value::take))
        .filter(|v| !v.is_null());

    match model_result {
        Some(value) => serde_json::from_value(value)
            .map_err(|e| SummaryError::malformed(format!("summary model_result: {}", e))),
        None => {
            warn!("No summary data available");
            Ok(SummaryResult::default())
        }
    }
}
