//! Invoke Request Use Case
//!
//! Sends one authenticated, versioned request to Cloud Director and,
//! when asked to, waits for the task the request started.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use vcd_domain::request::{Headers, OutgoingRequest, RequestSpec};
use vcd_domain::response::ApiResponse;
use vcd_domain::{
    ApiVersion, Credential, ExplicitCredentials, InvokerSettings, TaskOutcome, TaskReference,
};

use crate::auth::resolve_credential;
use crate::error::{VcdError, VcdResult};
use crate::negotiate_version::VersionNegotiator;
use crate::ports::{HttpClient, SessionRegistry, TaskObserver};
use crate::task_poller::{TaskPoll, TaskPoller};

/// Whether to wait for a task started by the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitPolicy {
    /// Return the response document as is.
    #[default]
    NoWait,
    /// Poll the task referenced by the response, for at most `task_timeout`.
    WaitForTask {
        /// Total budget for polling.
        task_timeout: Duration,
    },
}

/// One call to make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Method, endpoint, body, timeout and accept override.
    pub spec: RequestSpec,
    /// API version; negotiated with the endpoint when `None`.
    pub api_version: Option<ApiVersion>,
    /// Explicit credentials, used when the registry has no session.
    pub credentials: ExplicitCredentials,
    /// Task waiting behavior.
    pub wait: WaitPolicy,
    /// Skip TLS certificate validation.
    pub skip_cert_check: bool,
}

impl Invocation {
    /// An invocation with no explicit credentials, no version and no wait.
    #[must_use]
    pub fn new(spec: RequestSpec) -> Self {
        Self {
            spec,
            api_version: None,
            credentials: ExplicitCredentials::none(),
            wait: WaitPolicy::NoWait,
            skip_cert_check: false,
        }
    }

    /// Sets the API version.
    #[must_use]
    pub fn with_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Sets the explicit credentials.
    #[must_use]
    pub fn with_credentials(mut self, credentials: ExplicitCredentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Waits for the started task, for at most `task_timeout`.
    #[must_use]
    pub const fn wait_for_task(mut self, task_timeout: Duration) -> Self {
        self.wait = WaitPolicy::WaitForTask { task_timeout };
        self
    }

    /// Sets the certificate policy.
    #[must_use]
    pub const fn skip_cert_check(mut self, skip: bool) -> Self {
        self.skip_cert_check = skip;
        self
    }
}

/// What an invocation produced.
///
/// Callers that asked to wait get the task outcome instead of the document
/// when a task was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvokeOutcome {
    /// The parsed response (no wait requested).
    Document(ApiResponse),
    /// Waiting was requested but the response referenced no task. The
    /// request itself succeeded.
    NoTaskToAwait(ApiResponse),
    /// The task started by the request was awaited.
    Task {
        /// The task that was polled.
        reference: TaskReference,
        /// How waiting ended.
        outcome: TaskOutcome,
    },
}

impl InvokeOutcome {
    /// Returns the response document, if the outcome carries one.
    #[must_use]
    pub const fn response(&self) -> Option<&ApiResponse> {
        match self {
            Self::Document(response) | Self::NoTaskToAwait(response) => Some(response),
            Self::Task { .. } => None,
        }
    }

    /// Returns the task outcome, if a task was awaited.
    #[must_use]
    pub const fn task_outcome(&self) -> Option<&TaskOutcome> {
        match self {
            Self::Task { outcome, .. } => Some(outcome),
            _ => None,
        }
    }
}

/// Use case for invoking the API.
///
/// # Example
///
/// ```ignore
/// let client = Arc::new(ReqwestHttpClient::new()?);
/// let invoker = RequestInvoker::new(client, Arc::new(NoSessions), InvokerSettings::default());
///
/// let spec = RequestSpec::new(HttpMethod::Post, Endpoint::parse("https://vcd/api/vApp/vapp-1/power/action/powerOn")?);
/// let outcome = invoker
///     .invoke(&Invocation::new(spec)
///         .with_version(ApiVersion::new("34.0")?)
///         .with_credentials(ExplicitCredentials::session_token(token))
///         .wait_for_task(Duration::from_secs(600)))
///     .await?;
/// ```
pub struct RequestInvoker<C: HttpClient> {
    client: Arc<C>,
    sessions: Arc<dyn SessionRegistry>,
    negotiator: VersionNegotiator<C>,
    poller: TaskPoller<C>,
}

impl<C: HttpClient> RequestInvoker<C> {
    /// Creates an invoker.
    pub fn new(client: Arc<C>, sessions: Arc<dyn SessionRegistry>, settings: InvokerSettings) -> Self {
        Self {
            negotiator: VersionNegotiator::new(Arc::clone(&client)),
            poller: TaskPoller::new(Arc::clone(&client), settings),
            client,
            sessions,
        }
    }

    /// Reports task progress to `observer`.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn TaskObserver>) -> Self {
        self.poller = self.poller.with_observer(observer);
        self
    }

    /// Runs one invocation.
    ///
    /// # Errors
    ///
    /// - [`VcdError::AuthenticationMissing`] before any network call when no
    ///   credential is available
    /// - [`VcdError::RequestFailed`] on transport failure or a non-2xx status,
    ///   of the request itself, of version negotiation, or of a task poll
    /// - [`VcdError::NoVersionsAvailable`] when negotiation finds no version
    /// - [`VcdError::InvalidDocument`] when a response cannot be parsed
    pub async fn invoke(&self, invocation: &Invocation) -> VcdResult<InvokeOutcome> {
        let spec = &invocation.spec;
        let host = spec.endpoint.host();

        let credential = resolve_credential(self.sessions.as_ref(), host, &invocation.credentials)?;

        let version = match &invocation.api_version {
            Some(version) => version.clone(),
            None => {
                info!(host, "no API version supplied, negotiating");
                self.negotiator
                    .highest_supported_version(&spec.endpoint, spec.api_timeout, invocation.skip_cert_check)
                    .await?
            }
        };

        let request = build_request(spec, &version, &credential, invocation.skip_cert_check);
        debug!(
            method = %request.method,
            url = %request.url,
            version = %version,
            auth = credential.kind(),
            has_body = request.body.is_some(),
            "sending request"
        );

        let response = self
            .client
            .execute(&request)
            .await
            .map_err(|e| VcdError::transport(&e, request.url.clone()))?;

        if !response.is_success() {
            return Err(VcdError::http_status(&response, request.url));
        }
        debug!(status = %response.status, elapsed_ms = response.duration.as_millis(), "response received");

        let api_response =
            ApiResponse::from_response(response).map_err(|e| VcdError::InvalidDocument(e.to_string()))?;

        let WaitPolicy::WaitForTask { task_timeout } = invocation.wait else {
            return Ok(InvokeOutcome::Document(api_response));
        };

        let Some(reference) = TaskReference::find(&api_response.document) else {
            warn!(url = %request.url, "wait for task requested but the response references no task");
            return Ok(InvokeOutcome::NoTaskToAwait(api_response));
        };

        let poll = TaskPoll {
            href: reference.href.clone(),
            headers: auth_headers(&credential, spec.accept_header(&version)),
            api_timeout: spec.api_timeout,
            skip_cert_check: invocation.skip_cert_check,
        };
        let outcome = self.poller.poll_until_done(&poll, task_timeout).await?;

        Ok(InvokeOutcome::Task { reference, outcome })
    }
}

/// Assembles the request handed to the transport.
///
/// The body travels with its content type or not at all.
#[must_use]
pub fn build_request(
    spec: &RequestSpec,
    version: &ApiVersion,
    credential: &Credential,
    skip_cert_check: bool,
) -> OutgoingRequest {
    OutgoingRequest {
        method: spec.method,
        url: spec.endpoint.as_str().to_string(),
        headers: auth_headers(credential, spec.accept_header(version)),
        body: spec.body.clone(),
        timeout: spec.api_timeout,
        skip_cert_check,
    }
}

fn auth_headers(credential: &Credential, accept: String) -> Headers {
    let mut headers = Headers::new();
    headers.insert(credential.header_name(), credential.header_value());
    headers.insert("Accept", accept);
    headers
}
