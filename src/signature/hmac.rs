//! Truncated HMAC-SHA256 signatures
//!
//! The digest is hex encoded and cut to its first 16 characters:
//!
//! ```text
//! signature = hex(HMAC-SHA256(secret, input))[..16]
//! ```

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::constants::{HMAC_DIGEST_HEX_LEN, RENDER_SIGNING_SEPARATOR};
use crate::params::ParameterSet;
use crate::query::{encode_query, encode_query_sorted};

use super::RenderRoute;

type HmacSha256 = Hmac<Sha256>;

/// Compute the 16 hex character digest of `data`
pub fn truncated_digest(secret: &[u8], data: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(data);
    let mut digest = hex::encode(mac.finalize().into_bytes());
    digest.truncate(HMAC_DIGEST_HEX_LEN);
    digest
}

/// Signing input for project URLs
///
/// `project + path + sorted query`, with `__v` always left out so the digest
/// does not change with the cache buster.
pub fn project_signing_input(project: &str, path: &str, params: &ParameterSet) -> String {
    let query = encode_query_sorted(&params.without_cache_buster().to_value());
    format!("{}{}{}", project, path, query)
}

/// Signing input for render URLs
///
/// `deck#template#version#extension#query`, absent version/extension as empty
/// strings, query in insertion order without `__v`.
pub fn render_signing_input(route: &RenderRoute, params: &ParameterSet) -> String {
    let query = encode_query(&params.without_cache_buster().to_value());
    let version = route.version.map(|v| v.to_string()).unwrap_or_default();
    [
        route.deck.as_str(),
        route.template.as_str(),
        version.as_str(),
        route.extension.as_deref().unwrap_or(""),
        query.as_str(),
    ]
    .join(RENDER_SIGNING_SEPARATOR)
}
