//! The API façade.
//!
//! [`BbbApi`] exposes one method per remote call plus the composite flows
//! built on top of them. Each call signs its URL, goes through the
//! [`Transport`] once and is normalized before returning. Composite flows
//! run strictly in sequence and stop at the first failure.

use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::BbbResult;
use crate::params::Params;
use crate::query::{SignedRequest, build_call_url};
use crate::response::{
    ApiResponse, JoinResponse, MeetingInfoResponse, MeetingsResponse, RunningResponse, normalize,
};
use crate::slides::{Slide, encode_slide_document};
use crate::transport::{HttpTransport, Transport};

/// Remote call names.
pub mod calls {
    pub const CREATE: &str = "create";
    pub const JOIN: &str = "join";
    pub const GET_MEETINGS: &str = "getMeetings";
    pub const GET_MEETING_INFO: &str = "getMeetingInfo";
    pub const IS_MEETING_RUNNING: &str = "isMeetingRunning";
    pub const END: &str = "end";
}

/// Client for one API server.
///
/// Holds an immutable [`ClientConfig`] and a transport; no other state is
/// shared between calls, so a client can be used from several tasks at once.
#[derive(Debug)]
pub struct BbbApi<T: Transport = HttpTransport> {
    config: ClientConfig,
    transport: T,
}

impl BbbApi<HttpTransport> {
    /// Creates a client that talks HTTP(S) to the configured server.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: ClientConfig) -> BbbResult<Self> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;
        Ok(Self { config, transport })
    }
}

impl<T: Transport> BbbApi<T> {
    /// Creates a client with a custom transport.
    pub fn with_transport(config: ClientConfig, transport: T) -> BbbResult<Self> {
        config.validate()?;
        Ok(Self { config, transport })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Builds the signed URL for any call without sending it.
    pub fn call_url(&self, call: &str, params: &Params) -> SignedRequest {
        build_call_url(call, params, &self.config)
    }

    /// Issues a signed GET for `call` and normalizes the response.
    pub async fn call(&self, call: &str, params: &Params) -> BbbResult<ApiResponse> {
        let request = self.call_url(call, params);
        debug!(call, method = "GET", "Calling API");
        let raw = self.transport.get(&request.url).await?;
        normalize(raw)
    }

    /// Creates a meeting.
    pub async fn create(&self, params: &Params) -> BbbResult<ApiResponse> {
        self.call(calls::CREATE, params).await
    }

    /// Creates a meeting and preloads the given slides.
    ///
    /// The checksum covers only the query parameters, not the body.
    pub async fn create_with_slides(
        &self,
        params: &Params,
        slides: &[Slide],
    ) -> BbbResult<ApiResponse> {
        let request = self.call_url(calls::CREATE, params);
        let body = encode_slide_document(slides)?;
        debug!(
            call = calls::CREATE,
            method = "POST",
            slides = slides.len(),
            "Calling API"
        );
        let raw = self.transport.post(&request.url, body).await?;
        normalize(raw)
    }

    /// Creates a meeting, uploading slides only when there are any.
    pub async fn create_with_optional_slides(
        &self,
        params: &Params,
        slides: &[Slide],
    ) -> BbbResult<ApiResponse> {
        if slides.is_empty() {
            self.create(params).await
        } else {
            self.create_with_slides(params, slides).await
        }
    }

    /// Joins a meeting. Pass `redirect=false` to receive the client URL.
    pub async fn join(&self, params: &Params) -> BbbResult<JoinResponse> {
        self.call(calls::JOIN, params).await.map(JoinResponse::from)
    }

    /// Builds the signed join URL without contacting the server.
    pub fn join_url(&self, params: &Params) -> SignedRequest {
        self.call_url(calls::JOIN, params)
    }

    /// Lists all meetings on the server.
    pub async fn get_meetings(&self) -> BbbResult<MeetingsResponse> {
        let response = self.call(calls::GET_MEETINGS, &Params::new()).await?;
        MeetingsResponse::try_from(response)
    }

    /// Fetches details of one meeting.
    pub async fn get_meeting_info(&self, params: &Params) -> BbbResult<MeetingInfoResponse> {
        let response = self.call(calls::GET_MEETING_INFO, params).await?;
        MeetingInfoResponse::try_from(response)
    }

    /// Checks whether a meeting is running.
    pub async fn is_meeting_running(&self, params: &Params) -> BbbResult<RunningResponse> {
        self.call(calls::IS_MEETING_RUNNING, params)
            .await
            .map(RunningResponse::from)
    }

    /// Ends a meeting.
    pub async fn end(&self, params: &Params) -> BbbResult<ApiResponse> {
        self.call(calls::END, params).await
    }

    /// Ensures a persistent room exists, then joins it.
    ///
    /// `create` on an existing meeting ID succeeds, so the room may already
    /// be running. If creation fails, the join is never attempted.
    #[tracing::instrument(skip_all, fields(meeting_id = create_params.get("meetingID")))]
    pub async fn join_persistent_room(
        &self,
        join_params: &Params,
        create_params: &Params,
        slides: &[Slide],
    ) -> BbbResult<JoinResponse> {
        self.ensure_room(create_params, slides).await?;
        self.join(join_params).await
    }

    /// Ensures a persistent room exists, then returns the signed join URL.
    ///
    /// The join endpoint is never contacted; the URL is meant for handing
    /// to a browser.
    #[tracing::instrument(skip_all, fields(meeting_id = create_params.get("meetingID")))]
    pub async fn join_persistent_room_url(
        &self,
        join_params: &Params,
        create_params: &Params,
        slides: &[Slide],
    ) -> BbbResult<SignedRequest> {
        self.ensure_room(create_params, slides).await?;
        Ok(self.join_url(join_params))
    }

    async fn ensure_room(&self, create_params: &Params, slides: &[Slide]) -> BbbResult<()> {
        let created = self
            .create_with_optional_slides(create_params, slides)
            .await?;
        info!(
            message_key = created.message_key().unwrap_or_default(),
            "Room ready"
        );
        Ok(())
    }
}
