//! Fetches the AI-generated summary (outline + timestamped subtitles) of a
//! Bilibili video through the WBI-signed web API.

pub mod bilibili;
pub mod common;
pub mod configs;
pub mod report;

pub use bilibili::{SessionCredential, SummaryGateway, SummaryResult, VideoId};
pub use common::errors::SummaryError;
