use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct BilibiliConfig {
    /// `SESSDATA` cookie of a logged-in account.
    pub sessdata: Option<String>,
    /// Video to summarize (`BV...`).
    pub video_id: Option<String>,
}
