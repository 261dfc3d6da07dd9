//! Bilibili web API client: WBI signing and the AI summary fetch cycle.

use reqwest::header::{COOKIE, HeaderMap, HeaderValue, REFERER, USER_AGENT};

use crate::common::errors::{Result, SummaryError};

pub mod keys;
pub mod metadata;
pub mod models;
pub mod summary;
pub mod wbi;

pub use keys::KeyProvider;
pub use metadata::MetadataResolver;
pub use models::*;
pub use summary::{SummaryGateway, SummaryStage};
pub use wbi::{WbiParams, derive_mixin_key, sign, sign_at};

pub const VIEW_URL: &str = "https://api.bilibili.com/x/web-interface/view";
pub const NAV_URL: &str = "https://api.bilibili.com/x/web-interface/nav";
pub const CONCLUSION_URL: &str = "https://api.bilibili.com/x/web-interface/view/conclusion/get";
pub const REFERER_URL: &str = "https://www.bilibili.com/";

/// Status code the nav endpoint returns for an unauthenticated session.
pub const NOT_LOGGED_IN_CODE: i64 = -101;

/// Headers shared by every request of one cycle.
pub fn request_headers(user_agent: &str, credential: &SessionCredential) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, header_value("User-Agent", user_agent)?);
    headers.insert(REFERER, HeaderValue::from_static(REFERER_URL));
    headers.insert(
        COOKIE,
        header_value("Cookie", &format!("SESSDATA={}", credential.expose()))?,
    );
    Ok(headers)
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| SummaryError::transport(REFERER_URL, format!("invalid {} header: {}", name, e)))
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use reqwest::header::HeaderMap;

    use crate::common::errors::{Result, SummaryError};
    use crate::common::http::Transport;

    pub const IMG_URL: &str =
        "https://i0.hdslb.com/bfs/wbi/7cd084941338484aae1ad9425b84077c.png";
    pub const SUB_URL: &str =
        "https://i0.hdslb.com/bfs/wbi/4932caff0ff746eab6f01bf08b70ac45.png";

    pub fn view_body(cid: u64, mid: u64) -> String {
        format!(
            r#"{{"code":0,"message":"0","ttl":1,"data":{{"bvid":"BV1xx411c7mD","pages":[{{"cid":{},"page":1,"part":"P1"}}],"owner":{{"mid":{},"name":"uploader"}}}}}}"#,
            cid, mid
        )
    }

    pub fn nav_body(code: i64) -> String {
        format!(
            r#"{{"code":{},"message":"0","ttl":1,"data":{{"isLogin":true,"wbi_img":{{"img_url":"{}","sub_url":"{}"}}}}}}"#,
            code, IMG_URL, SUB_URL
        )
    }

    /// Serves canned bodies keyed by endpoint (the URL without its query)
    /// and records every request it sees.
    #[derive(Default)]
    pub struct StubTransport {
        routes: HashMap<String, String>,
        calls: Mutex<Vec<(String, HeaderMap)>>,
    }

    impl StubTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn route(mut self, endpoint: &str, body: impl Into<String>) -> Self {
            self.routes.insert(endpoint.to_string(), body.into());
            self
        }

        pub fn urls(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|(url, _)| url.clone())
                .collect()
        }

        pub fn headers(&self) -> Vec<HeaderMap> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|(_, headers)| headers.clone())
                .collect()
        }

        pub fn called(&self, endpoint: &str) -> bool {
            self.urls()
                .iter()
                .any(|url| url.split('?').next() == Some(endpoint))
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn get(&self, url: &str, headers: &HeaderMap) -> Result<String> {
            self.calls
                .lock()
                .unwrap()
                .push((url.to_string(), headers.clone()));

            let endpoint = url.split('?').next().unwrap_or(url);
            self.routes
                .get(endpoint)
                .cloned()
                .ok_or_else(|| SummaryError::transport(url, "connection refused"))
        }
    }
}
