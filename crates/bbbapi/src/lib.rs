//! Checksum-signed client for the BigBlueButton API.
//!
//! - [`BbbApi`] - One method per remote call plus persistent-room flows
//! - [`ClientConfig`] - Host, secret, path, scheme and port
//! - [`Params`] - Ordered call parameters
//! - [`BbbError`] - Transport, API and malformed-response failures
//!
//! # Architecture
//!
//! ```text
//!  BbbApi ──► build_call_url (encode_params + sign)
//!    │
//!    ▼
//!  Transport (GET / POST) ──► RawResponse
//!    │
//!    ▼
//!  normalize ──► ApiResponse / BbbError::Api
//!    │
//!    ▼
//!  JoinResponse, MeetingsResponse, ... (lists never ambiguous)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use bbbapi::{BbbApi, ClientConfig, Params};
//!
//! let api = BbbApi::new(ClientConfig::new("bbb.example.com", secret))?;
//! let joined = api
//!     .join_persistent_room(
//!         &Params::new().with("meetingID", "club").with("fullName", "Ada")
//!             .with("password", "oneone").with("redirect", false),
//!         &Params::new().with("name", "Club").with("meetingID", "club")
//!             .with("attendeePW", "oneone").with("moderatorPW", "twotwo"),
//!         &[],
//!     )
//!     .await?;
//! println!("{:?}", joined.join.url);
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod meeting;
pub mod params;
pub mod query;
pub mod response;
pub mod signer;
pub mod slides;
pub mod transport;
pub mod xml;

// Re-export main types at crate root
pub use api::BbbApi;
pub use config::{ClientConfig, Scheme};
pub use error::{ApiError, BbbError, BbbResult, ErrorKind};
pub use meeting::{Attendee, Cardinality, Meeting};
pub use params::Params;
pub use query::{SignedRequest, build_call_url, encode_params};
pub use response::{
    ApiResponse, JoinInfo, JoinResponse, MeetingInfoResponse, MeetingsResponse, RunningResponse,
    normalize,
};
pub use signer::sign;
pub use slides::{Slide, encode_slide_document};
pub use transport::{BoxFuture, HttpTransport, RawResponse, Transport};
