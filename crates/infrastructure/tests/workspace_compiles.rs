//! Integration test to verify the workspace compiles correctly.

#![allow(clippy::no_effect_underscore_binding, clippy::unwrap_used, missing_docs)]

#[test]
fn domain_crate_compiles() {
    // Verify domain types are accessible
    let _method = vcd_domain::request::HttpMethod::Get;
    let endpoint = vcd_domain::Endpoint::parse("https://vcd.example.com/api").unwrap();
    let _spec = vcd_domain::request::RequestSpec::get(endpoint);
    let _status = vcd_domain::TaskStatus::Running;
}

#[test]
fn application_crate_compiles() {
    // Verify application types are accessible
    let _error = vcd_application::VcdError::AuthenticationMissing {
        host: "vcd.example.com".into(),
    };
    let _wait = vcd_application::WaitPolicy::NoWait;
}

#[test]
fn infrastructure_crate_compiles() {
    // Verify infrastructure adapters are accessible
    let _client = vcd_infrastructure::ReqwestHttpClient::new().unwrap();
    let _observer = vcd_infrastructure::TracingObserver::new();
}
