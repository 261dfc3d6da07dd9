use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::bilibili::wbi::{self, WbiParams};
use crate::common::errors::Result;

/// Public video id (the `BV...` string), used verbatim in every request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(pub String);

impl From<String> for VideoId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for VideoId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::ops::Deref for VideoId {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The `SESSDATA` cookie value of a logged-in session.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCredential(String);

impl SessionCredential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// First ten characters followed by `...`, safe to log.
    pub fn masked(&self) -> String {
        let prefix: String = self.0.chars().take(10).collect();
        format!("{}...", prefix)
    }
}

impl std::fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SessionCredential")
            .field(&self.masked())
            .finish()
    }
}

/// Internal ids of a video, resolved once per cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoMetadata {
    pub content_id: u64,
    pub owner_id: u64,
}

/// The two rotating key fragments that feed the WBI signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WbiKeys {
    pub img_key: String,
    pub sub_key: String,
}

impl WbiKeys {
    pub fn sign_at(&self, params: WbiParams, wts: u64) -> Result<String> {
        wbi::sign_at(params, &self.img_key, &self.sub_key, wts)
    }
}

/// AI summary of a video. Section and part order follows the video.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub outline: Vec<OutlineSection>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subtitle: Vec<SubtitleSection>,
}

impl SummaryResult {
    /// True when the platform had nothing to show for the video.
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty() && self.outline.is_empty() && self.subtitle.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineSection {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, alias = "timestamp", deserialize_with = "null_as_default")]
    pub timestamp_seconds: u64,
    #[serde(default, alias = "part_outline", deserialize_with = "null_as_default")]
    pub parts: Vec<OutlinePart>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlinePart {
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, alias = "timestamp", deserialize_with = "null_as_default")]
    pub timestamp_seconds: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleSection {
    /// May be empty.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, alias = "timestamp", deserialize_with = "null_as_default")]
    pub timestamp_seconds: u64,
    #[serde(default, alias = "part_subtitle", deserialize_with = "null_as_default")]
    pub parts: Vec<SubtitlePart>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitlePart {
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, alias = "start_timestamp", deserialize_with = "null_as_default")]
    pub start_seconds: u64,
    #[serde(default, alias = "end_timestamp", deserialize_with = "null_as_default")]
    pub end_seconds: u64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The `{code, message, data}` wrapper every web API response uses.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    pub code: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

impl Envelope {
    pub fn parse(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_deserializes_platform_names() {
        let raw = r#"{
            "result_type": 2,
            "summary": "A walk through the city",
            "outline": [
                {"title": "Intro", "timestamp": 0, "part_outline": [
                    {"timestamp": 3, "content": "Greeting"},
                    {"timestamp": 9, "content": "Route"}
                ]}
            ],
            "subtitle": [
                {"title": "", "timestamp": 0, "part_subtitle": [
                    {"start_timestamp": 0, "end_timestamp": 4, "content": "Hello"}
                ]}
            ]
        }"#;

        let result: SummaryResult = serde_json::from_str(raw).unwrap();
        assert_eq!(result.summary, "A walk through the city");
        assert_eq!(result.outline[0].title, "Intro");
        assert_eq!(result.outline[0].parts[1].content, "Route");
        assert_eq!(result.outline[0].parts[1].timestamp_seconds, 9);
        assert_eq!(result.subtitle[0].title, "");
        assert_eq!(result.subtitle[0].parts[0].end_seconds, 4);
        assert!(!result.is_empty());
    }

    #[test]
    fn test_summary_tolerates_null_lists() {
        let raw = r#"{"summary": null, "outline": null, "subtitle": null}"#;
        let result: SummaryResult = serde_json::from_str(raw).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_summary_reads_null_timestamps_as_zero() {
        let raw = r#"{
            "summary": "s",
            "outline": [{"title": null, "timestamp": null, "part_outline": [
                {"timestamp": null, "content": "a"}
            ]}],
            "subtitle": [{"title": "t", "timestamp": null, "part_subtitle": [
                {"start_timestamp": null, "end_timestamp": null, "content": "b"}
            ]}]
        }"#;

        let result: SummaryResult = serde_json::from_str(raw).unwrap();
        assert_eq!(result.outline[0].timestamp_seconds, 0);
        assert_eq!(result.outline[0].parts[0].timestamp_seconds, 0);
        assert_eq!(result.subtitle[0].timestamp_seconds, 0);
        assert_eq!(result.subtitle[0].parts[0].start_seconds, 0);
        assert_eq!(result.subtitle[0].parts[0].end_seconds, 0);
        assert_eq!(result.subtitle[0].parts[0].content, "b");
    }

    #[test]
    fn test_envelope_requires_code() {
        assert!(Envelope::parse(r#"{"message": "0"}"#).is_err());

        let envelope = Envelope::parse(r#"{"code": -404, "message": "not found", "data": null}"#)
            .unwrap();
        assert_eq!(envelope.code, -404);
        assert_eq!(envelope.message, "not found");
        assert!(envelope.data.is_none());
    }

    #[test]
    fn test_credential_is_masked_in_debug() {
        let cred = SessionCredential::new("0123456789abcdef%2C1700000000");
        assert_eq!(cred.masked(), "0123456789...");
        assert!(!format!("{:?}", cred).contains("abcdef"));
        assert_eq!(cred.expose(), "0123456789abcdef%2C1700000000");
    }
}
