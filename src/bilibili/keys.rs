use std::sync::Arc;

use reqwest::header::HeaderMap;
use serde::Deserialize;
use tracing::debug;

use crate::bilibili::models::{Envelope, WbiKeys};
use crate::bilibili::{NAV_URL, NOT_LOGGED_IN_CODE};
use crate::common::errors::{Result, SummaryError};
use crate::common::http::Transport;

#[derive(Debug, Deserialize)]
struct NavData {
    wbi_img: WbiImg,
}

#[derive(Debug, Deserialize)]
struct WbiImg {
    img_url: String,
    sub_url: String,
}

/// Fetches the current WBI key fragments. Keys rotate server-side, so
/// nothing is cached between calls.
pub struct KeyProvider {
    transport: Arc<dyn Transport>,
}

impl KeyProvider {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn fetch_keys(&self, headers: &HeaderMap) -> Result<WbiKeys> {
        let body = self.transport.get(NAV_URL, headers).await?;
        let envelope = Envelope::parse(&body)?;

        match envelope.code {
            0 => {}
            NOT_LOGGED_IN_CODE => {
                return Err(SummaryError::Auth {
                    code: envelope.code,
                    message: format!("account not logged in: {}", envelope.message),
                });
            }
            code => {
                return Err(SummaryError::Api {
                    code,
                    message: envelope.message,
                    body: Some(body),
                });
            }
        }

        let data = envelope
            .data
            .ok_or_else(|| SummaryError::malformed("nav response has no data"))?;
        let nav: NavData = serde_json::from_value(data)
            .map_err(|e| SummaryError::malformed(format!("nav wbi_img: {}", e)))?;

        let keys = WbiKeys {
            img_key: key_from_url(&nav.wbi_img.img_url)?,
            sub_key: key_from_url(&nav.wbi_img.sub_url)?,
        };
        debug!("Fetched WBI keys");
        Ok(keys)
    }
}

/// The file name of `url` without its extension.
fn key_from_url(url: &str) -> Result<String> {
    let file = url.rsplit('/').next().unwrap_or(url);
    match file.rfind('.') {
        Some(dot) if dot > 0 => Ok(file[..dot].to_string()),
        _ => Err(SummaryError::malformed(format!(
            "cannot extract WBI key from {:?}",
            url
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bilibili::testing::{StubTransport, nav_body};

    async fn fetch_with(body: &str) -> Result<WbiKeys> {
        let stub = Arc::new(StubTransport::new().route(NAV_URL, body));
        KeyProvider::new(stub).fetch_keys(&HeaderMap::new()).await
    }

    #[test]
    fn test_key_from_url() {
        assert_eq!(
            key_from_url("https://i0.hdslb.com/bfs/wbi/7cd084941338484aae1ad9425b84077c.png")
                .unwrap(),
            "7cd084941338484aae1ad9425b84077c"
        );
        assert_eq!(key_from_url("https://a/b/c.d.png").unwrap(), "c.d");
        assert!(key_from_url("https://a/b/noext").is_err());
        assert!(key_from_url("https://a/b.c/").is_err());
        assert!(key_from_url("https://a/b/.png").is_err());
    }

    #[tokio::test]
    async fn test_fetch_keys() {
        let keys = fetch_with(&nav_body(0)).await.unwrap();
        assert_eq!(keys.img_key, "7cd084941338484aae1ad9425b84077c");
        assert_eq!(keys.sub_key, "4932caff0ff746eab6f01bf08b70ac45");
    }

    #[tokio::test]
    async fn test_fetch_keys_not_logged_in_is_auth_error() {
        let err = fetch_with(&nav_body(NOT_LOGGED_IN_CODE)).await.unwrap_err();
        assert!(err.is_auth(), "got {:?}", err);
        assert_eq!(err.code(), Some(-101));
    }

    #[tokio::test]
    async fn test_fetch_keys_other_codes_are_api_errors() {
        let err = fetch_with(r#"{"code":-412,"message":"request was banned"}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, SummaryError::Api { code: -412, .. }));
    }

    #[tokio::test]
    async fn test_fetch_keys_missing_wbi_img_is_malformed() {
        for body in [
            r#"{"code":0}"#,
            r#"{"code":0,"data":{"isLogin":true}}"#,
            r#"{"code":0,"data":{"wbi_img":{"img_url":"https://x/a.png"}}}"#,
            r#"{"code":0,"data":{"wbi_img":{"img_url":"https://x/a","sub_url":"https://x/b"}}}"#,
        ] {
            let result = fetch_with(body).await;
            assert!(
                matches!(result, Err(SummaryError::MalformedResponse(_))),
                "body {} gave {:?}",
                body,
                result
            );
        }
    }
}
