//! Transport and end-to-end tests against a wiremock server.
#![allow(clippy::unwrap_used, missing_docs)]

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use vcd_application::{
    HttpClient, HttpClientError, InvokeOutcome, Invocation, NoSessions, RequestInvoker, VcdError,
};
use vcd_domain::request::{HttpMethod, OutgoingRequest, RequestBody, RequestSpec};
use vcd_domain::{ApiVersion, Endpoint, ExplicitCredentials, InvokerSettings, TaskOutcome};
use vcd_infrastructure::{ReqwestHttpClient, TracingObserver};
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const VCLOUD_XML: &str = "application/vnd.vmware.vcloud+xml;version=34.0";

const VERSIONS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<SupportedVersions xmlns="http://www.vmware.com/vcloud/versions">
    <VersionInfo deprecated="true"><Version>27.0</Version></VersionInfo>
    <VersionInfo deprecated="false"><Version>33.0</Version></VersionInfo>
    <VersionInfo deprecated="false"><Version>34.0</Version></VersionInfo>
</SupportedVersions>"#;

fn xml_response(status: u16, body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_raw(body.into(), VCLOUD_XML)
}

fn client() -> ReqwestHttpClient {
    ReqwestHttpClient::new().unwrap()
}

// =============================================================================
// TRANSPORT
// =============================================================================

#[tokio::test]
async fn test_sends_headers_and_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/org"))
        .and(header("x-vcloud-authorization", "tok-1"))
        .and(header("accept", "application/*+xml;version=34.0"))
        .respond_with(xml_response(200, "<OrgList/>"))
        .expect(1)
        .mount(&server)
        .await;

    let request = OutgoingRequest::get(format!("{}/api/org", server.uri()), Duration::from_secs(5))
        .with_header("x-vcloud-authorization", "tok-1")
        .with_header("Accept", "application/*+xml;version=34.0");

    let response = client().execute(&request).await.unwrap();

    assert_eq!(response.status.as_u16(), 200);
    assert_eq!(response.body, "<OrgList/>");
    assert!(
        response
            .content_type()
            .is_some_and(|ct| ct.starts_with("application/vnd.vmware.vcloud+xml"))
    );
}

#[tokio::test]
async fn test_body_is_sent_with_content_type() {
    let server = MockServer::start().await;
    let content = "<UndeployVAppParams><UndeployPowerAction>powerOff</UndeployPowerAction></UndeployVAppParams>";
    Mock::given(method("POST"))
        .and(path("/api/vApp/vapp-1/action/undeploy"))
        .and(header(
            "content-type",
            "application/vnd.vmware.vcloud.undeployVAppParams+xml",
        ))
        .and(body_string(content))
        .respond_with(xml_response(202, "<Task/>"))
        .expect(1)
        .mount(&server)
        .await;

    let mut request = OutgoingRequest::get(
        format!("{}/api/vApp/vapp-1/action/undeploy", server.uri()),
        Duration::from_secs(5),
    );
    request.method = HttpMethod::Post;
    request.body = Some(
        RequestBody::new("application/vnd.vmware.vcloud.undeployVAppParams+xml", content).unwrap(),
    );

    let response = client().execute(&request).await.unwrap();

    assert_eq!(response.status.as_u16(), 202);
}

#[tokio::test]
async fn test_no_body_means_no_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(xml_response(202, "<Task/>"))
        .mount(&server)
        .await;

    let mut request = OutgoingRequest::get(format!("{}/api/vApp/vapp-1/power/action/powerOn", server.uri()), Duration::from_secs(5));
    request.method = HttpMethod::Post;
    client().execute(&request).await.unwrap();

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert!(received[0].headers.get("content-type").is_none());
    assert!(received[0].body.is_empty());
}

#[tokio::test]
async fn test_non_success_status_is_returned() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(xml_response(
            404,
            r#"<Error message="No access to entity" minorErrorCode="ACCESS_TO_RESOURCE_IS_FORBIDDEN"/>"#,
        ))
        .mount(&server)
        .await;

    let request = OutgoingRequest::get(format!("{}/api/vApp/missing", server.uri()), Duration::from_secs(5));
    let response = client().execute(&request).await.unwrap();

    assert_eq!(response.status.as_u16(), 404);
    assert!(!response.is_success());
}

#[tokio::test]
async fn test_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(xml_response(200, "<Org/>").set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let request = OutgoingRequest::get(format!("{}/api/org/1", server.uri()), Duration::from_millis(100));
    let result = client().execute(&request).await;

    assert_eq!(result, Err(HttpClientError::Timeout { timeout_ms: 100 }));
}

#[tokio::test]
async fn test_invalid_url() {
    let request = OutgoingRequest::get("not a url", Duration::from_secs(1));
    let result = client().execute(&request).await;

    assert!(matches!(result, Err(HttpClientError::InvalidUrl(_))));
}

// =============================================================================
// END TO END
// =============================================================================

#[tokio::test]
async fn test_negotiate_invoke_and_wait() {
    let server = MockServer::start().await;
    let task_href = format!("{}/api/task/t-1", server.uri());

    Mock::given(method("GET"))
        .and(path("/api/versions"))
        .and(header("accept", "application/*+xml"))
        .respond_with(xml_response(200, VERSIONS))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/vApp/vapp-1/power/action/powerOn"))
        .and(header("x-vcloud-authorization", "tok-1"))
        .and(header("accept", "application/*+xml;version=34.0"))
        .respond_with(xml_response(
            202,
            format!(r#"<Task href="{task_href}" status="queued" operationName="vappPowerOn"/>"#),
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/task/t-1"))
        .and(header("x-vcloud-authorization", "tok-1"))
        .respond_with(xml_response(
            200,
            format!(r#"<Task href="{task_href}" status="success" operationName="vappPowerOn"/>"#),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let invoker = RequestInvoker::new(
        Arc::new(client()),
        Arc::new(NoSessions),
        InvokerSettings::default(),
    )
    .with_observer(Arc::new(TracingObserver::new()));
    let endpoint =
        Endpoint::parse(&format!("{}/api/vApp/vapp-1/power/action/powerOn", server.uri())).unwrap();
    let invocation = Invocation::new(RequestSpec::new(HttpMethod::Post, endpoint))
        .with_credentials(ExplicitCredentials::session_token("tok-1"))
        .wait_for_task(Duration::from_secs(60));

    let outcome = invoker.invoke(&invocation).await.unwrap();

    assert_eq!(outcome.task_outcome(), Some(&TaskOutcome::Succeeded));
}

#[tokio::test]
async fn test_error_body_message_surfaces() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(xml_response(
            403,
            r#"<Error message="Access is forbidden" majorErrorCode="403" minorErrorCode="ACCESS_TO_RESOURCE_IS_FORBIDDEN"/>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let invoker = RequestInvoker::new(Arc::new(client()), Arc::new(NoSessions), InvokerSettings::default());
    let url = format!("{}/api/org/1", server.uri());
    let invocation = Invocation::new(RequestSpec::get(Endpoint::parse(&url).unwrap()))
        .with_version(ApiVersion::new("34.0").unwrap())
        .with_credentials(ExplicitCredentials::jwt("eyJ0eXAi"));

    let result = invoker.invoke(&invocation).await;

    assert_eq!(
        result,
        Err(VcdError::RequestFailed {
            message: "403 Forbidden: Access is forbidden (ACCESS_TO_RESOURCE_IS_FORBIDDEN)".into(),
            resource: Some(url),
        })
    );
}

#[tokio::test]
async fn test_plain_document_without_wait() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("X-VMWARE-VCLOUD-ACCESS-TOKEN", "eyJ0eXAi"))
        .respond_with(xml_response(200, r#"<Org name="acme"/>"#))
        .mount(&server)
        .await;

    let invoker = RequestInvoker::new(Arc::new(client()), Arc::new(NoSessions), InvokerSettings::default());
    let url = format!("{}/api/org/1", server.uri());
    let invocation = Invocation::new(RequestSpec::get(Endpoint::parse(&url).unwrap()))
        .with_version(ApiVersion::new("34.0").unwrap())
        .with_credentials(ExplicitCredentials::jwt("eyJ0eXAi"));

    let outcome = invoker.invoke(&invocation).await.unwrap();

    let InvokeOutcome::Document(response) = outcome else {
        unreachable!("expected a document");
    };
    assert_eq!(
        response.document.as_xml().unwrap().attribute("name"),
        Some("acme")
    );
}
