//! WBI request signing.
//!
//! The platform accepts a request on a WBI-protected endpoint only when the
//! query carries a fresh `wts` timestamp and a `w_rid` digest computed over
//! the canonical query plus a mixin key derived from two rotating key
//! fragments.

use std::collections::BTreeMap;

use md5::{Digest, Md5};

use crate::common::errors::{Result, SummaryError};

const MIXIN_KEY_ENC_TAB: [usize; 64] = [
    46, 47, 18, 2, 53, 8, 23, 32, 15, 50, 10, 31, 58, 3, 45, 35, 27, 43, 5, 49, 33, 9, 42, 19, 29,
    28, 14, 39, 12, 38, 41, 13, 37, 48, 7, 16, 24, 55, 40, 61, 26, 17, 0, 1, 60, 51, 30, 4, 22, 25,
    54, 21, 56, 59, 6, 63, 57, 62, 11, 36, 20, 34, 44, 52,
];

const RAW_KEY_LEN: usize = 64;
const MIXIN_KEY_LEN: usize = 32;

/// Characters removed from every value before encoding.
const STRIPPED_CHARS: &[char] = &['!', '\'', '(', ')', '*'];

/// Parameters of a signed request, kept sorted by key.
///
/// Values are stringified on insertion, so integers end up as plain
/// decimal text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WbiParams(BTreeMap<String, String>);

impl WbiParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        self.0.insert(key.into(), value.to_string());
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for WbiParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

/// Derives the 32-character mixin key from the two key fragments.
pub fn derive_mixin_key(img_key: &str, sub_key: &str) -> Result<String> {
    let raw = format!("{}{}", img_key, sub_key);
    if !raw.is_ascii() || raw.len() != RAW_KEY_LEN {
        return Err(SummaryError::InvalidKeyFormat(format!(
            "expected {} ASCII characters across img_key and sub_key, got {} (img_key={:?}, sub_key={:?})",
            RAW_KEY_LEN,
            raw.chars().count(),
            img_key,
            sub_key
        )));
    }

    let bytes = raw.as_bytes();
    Ok(MIXIN_KEY_ENC_TAB[..MIXIN_KEY_LEN]
        .iter()
        .map(|&index| bytes[index] as char)
        .collect())
}

/// Signs `params` with the current Unix time as `wts`.
pub fn sign(params: WbiParams, img_key: &str, sub_key: &str) -> Result<String> {
    sign_at(params, img_key, sub_key, unix_now())
}

/// Signs `params` with an explicit `wts`, returning `query&w_rid=<digest>`.
///
/// Output is byte-identical for identical inputs, whatever order the
/// parameters were inserted in.
pub fn sign_at(mut params: WbiParams, img_key: &str, sub_key: &str, wts: u64) -> Result<String> {
    let mixin_key = derive_mixin_key(img_key, sub_key)?;
    params.insert("wts", wts);

    let query = params
        .0
        .iter()
        .map(|(k, v)| {
            let v_clean = v.replace(STRIPPED_CHARS, "");
            format!(
                "{}={}",
                urlencoding::encode(k),
                urlencoding::encode(&v_clean)
            )
        })
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Md5::new();
    hasher.update(format!("{}{}", query, mixin_key).as_bytes());
    let w_rid = format!("{:x}", hasher.finalize());

    Ok(format!("{}&w_rid={}", query, w_rid))
}

pub fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
