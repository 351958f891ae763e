//! Subcommand implementations.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::debug;
use vcd_application::{InvokeOutcome, Invocation, RequestInvoker, SessionStore, VersionNegotiator};
use vcd_domain::request::{HttpMethod, RequestBody, RequestSpec};
use vcd_domain::{ApiVersion, Endpoint, ExplicitCredentials};
use vcd_infrastructure::{ReqwestHttpClient, TracingObserver, load_sessions};

use crate::cli::{InvokeArgs, VersionsArgs};
use crate::config::Settings;

/// `vcd versions`
pub async fn versions(args: VersionsArgs, settings: &Settings) -> anyhow::Result<ExitCode> {
    let endpoint = Endpoint::parse(&args.uri)?;
    let timeout = args.api_timeout.map_or_else(|| settings.api_timeout(), Duration::from_secs);

    let negotiator = VersionNegotiator::new(Arc::new(ReqwestHttpClient::new()?));
    let version = negotiator
        .highest_supported_version(&endpoint, timeout, args.skip_cert_check || settings.skip_cert_check)
        .await?;

    println!("{version}");
    Ok(ExitCode::SUCCESS)
}

/// `vcd invoke`
pub async fn invoke(args: InvokeArgs, settings: &Settings) -> anyhow::Result<ExitCode> {
    let invocation = build_invocation(args, settings).await?;
    let sessions = session_store(settings).await?;

    let invoker = RequestInvoker::new(
        Arc::new(ReqwestHttpClient::new()?),
        Arc::new(sessions),
        settings.invoker_settings(),
    )
    .with_observer(Arc::new(TracingObserver::new()));

    match invoker.invoke(&invocation).await? {
        InvokeOutcome::Document(response) | InvokeOutcome::NoTaskToAwait(response) => {
            println!("{}", response.raw);
            Ok(ExitCode::SUCCESS)
        }
        InvokeOutcome::Task { outcome, .. } => {
            println!("{}", outcome.succeeded());
            Ok(if outcome.succeeded() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

/// Merges flags over settings into an invocation.
async fn build_invocation(args: InvokeArgs, settings: &Settings) -> anyhow::Result<Invocation> {
    let method: HttpMethod = args.method.parse()?;
    let endpoint = Endpoint::parse(&args.uri)?;

    let content = match (&args.body, &args.body_file) {
        (Some(body), _) => Some(body.clone()),
        (None, Some(path)) => Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read body file {}", path.display()))?,
        ),
        (None, None) => None,
    };

    let mut spec = RequestSpec::new(method, endpoint).with_timeout(
        args.api_timeout.map_or_else(|| settings.api_timeout(), Duration::from_secs),
    );
    if let Some(body) = RequestBody::from_parts(args.content_type, content)? {
        spec = spec.with_body(body);
    }
    if let Some(accept) = args.accept.or_else(|| settings.accept.clone()) {
        spec = spec.with_accept(accept);
    }

    let mut invocation = Invocation::new(spec)
        .with_credentials(ExplicitCredentials {
            session_token: args.session_token,
            jwt: args.jwt,
        })
        .skip_cert_check(args.skip_cert_check || settings.skip_cert_check);

    if let Some(version) = args.api_version {
        invocation = invocation.with_version(ApiVersion::new(version)?);
    }
    if args.wait {
        let budget = args.task_timeout.map_or_else(|| settings.task_timeout(), Duration::from_secs);
        invocation = invocation.wait_for_task(budget);
    }

    debug!(?invocation, "invocation assembled");
    Ok(invocation)
}

async fn session_store(settings: &Settings) -> anyhow::Result<SessionStore> {
    let mut store = match &settings.sessions_file {
        Some(path) => load_sessions(path).await?,
        None => SessionStore::new(),
    };
    for (host, token) in &settings.sessions {
        store.insert(host, token.clone());
    }
    debug!(hosts = ?store.hosts(), "session registry ready");
    Ok(store)
}
