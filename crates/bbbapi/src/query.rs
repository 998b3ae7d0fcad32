//! Query string encoding and signed call URLs.

use crate::config::ClientConfig;
use crate::params::Params;
use crate::signer::sign;

/// A fully built, signed call URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// The call name, e.g. `create`.
    pub call: String,
    /// Encoded parameters without the checksum pair.
    pub query: String,
    /// Hex checksum over call, query and secret.
    pub checksum: String,
    /// Absolute URL including the checksum.
    pub url: String,
}

/// Encodes parameters as `key=value` pairs joined by `&`.
///
/// Keys and values are percent-encoded. The same encoding feeds the
/// checksum, so the server sees exactly what was signed.
pub fn encode_params(params: &Params) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Builds the signed URL for `call` with `params`.
pub fn build_call_url(call: &str, params: &Params, config: &ClientConfig) -> SignedRequest {
    let query = encode_params(params);
    let checksum = sign(call, &query, &config.secret);

    let mut full_query = query.clone();
    if !full_query.is_empty() {
        full_query.push('&');
    }
    full_query.push_str("checksum=");
    full_query.push_str(&checksum);

    let url = format!("{}{}?{}", config.base_url(), call, full_query);

    SignedRequest {
        call: call.to_string(),
        query,
        checksum,
        url,
    }
}
