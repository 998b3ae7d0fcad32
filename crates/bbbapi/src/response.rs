//! Response normalization.
//!
//! The server reports failures through two channels:
//!
//! 1. an XML body whose `returncode` is not `SUCCESS`
//! 2. a `302` with an empty body whose `Location` header carries a JSON
//!    array of errors, even when no redirect was requested
//!
//! [`normalize`] folds both into [`BbbError::Api`] and wraps everything
//! else into an [`ApiResponse`]. The per-call wrappers below then fix up
//! the shapes a caller actually wants.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ApiError, BbbError, BbbResult};
use crate::meeting::{Meeting, meetings_from_payload, normalize_meeting};
use crate::transport::RawResponse;
use crate::xml;

/// The `returncode` of a successful call.
pub const SUCCESS: &str = "SUCCESS";

/// A successful, decoded response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: Vec<(String, String)>,
    /// Raw response body.
    pub body: String,
    /// Decoded content of the `<response>` element.
    pub xml: Value,
}

impl ApiResponse {
    /// Returns a top-level text field of the payload.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.xml.get(name).and_then(Value::as_str)
    }

    /// Returns the `returncode` field.
    pub fn return_code(&self) -> Option<&str> {
        self.field("returncode")
    }

    /// Returns the `messageKey` field, if present.
    pub fn message_key(&self) -> Option<&str> {
        self.field("messageKey").filter(|k| !k.is_empty())
    }

    /// Returns the `message` field, if present.
    pub fn message(&self) -> Option<&str> {
        self.field("message").filter(|m| !m.is_empty())
    }

    /// Returns the first value of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns every value of a header, matched case-insensitively.
    pub fn header_all(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

/// Classifies a raw response as success or failure.
///
/// # Errors
///
/// - [`BbbError::Api`] if the server reported a failure through either
///   channel
/// - [`BbbError::MalformedResponse`] if the body or redirect payload could
///   not be decoded
pub fn normalize(raw: RawResponse) -> BbbResult<ApiResponse> {
    if raw.status == 302 && raw.body.is_empty() {
        let err = redirect_error(&raw)?;
        debug!(message_key = %err.message_key, "Server reported failure via redirect");
        return Err(err.into());
    }

    let mut document = xml::decode(&raw.body).inspect_err(|e| {
        warn!(status = raw.status, error = %e, "Could not decode response body");
    })?;

    let payload = document
        .get_mut("response")
        .map(Value::take)
        .ok_or_else(|| BbbError::malformed("missing <response> element"))?;

    let return_code = payload
        .get("returncode")
        .and_then(Value::as_str)
        .ok_or_else(|| BbbError::malformed("missing <returncode> element"))?;

    if return_code != SUCCESS {
        let text = |name: &str| {
            payload
                .get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let err = ApiError::new(text("message"), text("messageKey"), return_code);
        debug!(
            return_code = %err.return_code,
            message_key = %err.message_key,
            "Server reported failure"
        );
        return Err(err.into());
    }

    Ok(ApiResponse {
        status: raw.status,
        headers: raw.headers,
        body: raw.body,
        xml: payload,
    })
}

#[derive(Debug, Deserialize)]
struct RedirectFailure {
    #[serde(default)]
    message: String,
    #[serde(default)]
    key: String,
}

/// Decodes the error array embedded in a redirect's `Location` header.
///
/// The array starts at the first `[` of the header and is percent-encoded.
fn redirect_error(raw: &RawResponse) -> BbbResult<ApiError> {
    let location = raw
        .header("location")
        .ok_or_else(|| BbbError::malformed("302 response without Location header"))?;

    let start = location
        .find('[')
        .ok_or_else(|| BbbError::malformed(format!("no error payload in redirect: {}", location)))?;

    let decoded = urlencoding::decode(&location[start..])
        .map_err(|e| BbbError::malformed(format!("invalid redirect encoding: {}", e)))?;

    let failures: Vec<RedirectFailure> = serde_json::from_str(&decoded)
        .map_err(|e| BbbError::malformed(format!("invalid redirect payload: {}", e)))?;

    let first = failures
        .into_iter()
        .next()
        .ok_or_else(|| BbbError::malformed("empty redirect error list"))?;

    Ok(ApiError::new(first.message, first.key, ApiError::FAILED))
}

/// Result of `join`.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinResponse {
    pub response: ApiResponse,
    pub join: JoinInfo,
}

/// Where and how to enter a joined meeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinInfo {
    /// Client URL from the payload, present when `redirect=false`.
    pub url: Option<String>,
    /// `Set-Cookie` headers of the response.
    pub cookies: Vec<String>,
}

impl From<ApiResponse> for JoinResponse {
    fn from(response: ApiResponse) -> Self {
        let join = JoinInfo {
            url: response.field("url").map(str::to_string),
            cookies: response
                .header_all("set-cookie")
                .into_iter()
                .map(str::to_string)
                .collect(),
        };
        Self { response, join }
    }
}

/// Result of `getMeetings`.
#[derive(Debug, Clone, PartialEq)]
pub struct MeetingsResponse {
    pub response: ApiResponse,
    /// Always a list, empty when the server has no meetings.
    pub meetings: Vec<Meeting>,
}

impl TryFrom<ApiResponse> for MeetingsResponse {
    type Error = BbbError;

    fn try_from(response: ApiResponse) -> BbbResult<Self> {
        let meetings = meetings_from_payload(&response.xml)?;
        Ok(Self { response, meetings })
    }
}

/// Result of `getMeetingInfo`.
#[derive(Debug, Clone, PartialEq)]
pub struct MeetingInfoResponse {
    pub response: ApiResponse,
    pub meeting: Meeting,
}

impl TryFrom<ApiResponse> for MeetingInfoResponse {
    type Error = BbbError;

    fn try_from(response: ApiResponse) -> BbbResult<Self> {
        let meeting = normalize_meeting(response.xml.clone())?;
        Ok(Self { response, meeting })
    }
}

/// Result of `isMeetingRunning`.
#[derive(Debug, Clone, PartialEq)]
pub struct RunningResponse {
    pub response: ApiResponse,
    pub running: bool,
}

impl From<ApiResponse> for RunningResponse {
    fn from(response: ApiResponse) -> Self {
        let running = response
            .field("running")
            .is_some_and(|r| r.eq_ignore_ascii_case("true"));
        Self { response, running }
    }
}
