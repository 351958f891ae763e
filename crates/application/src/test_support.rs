//! Scripted transport shared by the use case tests.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use vcd_domain::request::{Headers, OutgoingRequest};
use vcd_domain::response::ResponseSpec;

use crate::ports::{HttpClient, HttpClientError};

type Scripted = Result<ResponseSpec, HttpClientError>;

/// Replays scripted responses in order and records every request.
///
/// The last scripted response is repeated forever, which is how the
/// "task never finishes" cases are expressed.
pub struct MockHttpClient {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<OutgoingRequest>>,
}

impl MockHttpClient {
    pub fn new(script: impl IntoIterator<Item = Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<OutgoingRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl HttpClient for MockHttpClient {
    fn execute(
        &self,
        request: &OutgoingRequest,
    ) -> impl Future<Output = Result<ResponseSpec, HttpClientError>> + Send {
        self.requests.lock().unwrap().push(request.clone());

        let mut script = self.script.lock().unwrap();
        let next = if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script
                .front()
                .cloned()
                .unwrap_or_else(|| Err(HttpClientError::Other("no scripted response".into())))
        };

        async move { next }
    }
}

pub fn xml(status: u16, body: &str) -> Scripted {
    let mut headers = Headers::new();
    headers.insert("Content-Type", "application/vnd.vmware.vcloud+xml;version=34.0");
    Ok(ResponseSpec::new(status, headers, body, Duration::from_millis(5)))
}

pub fn task(status: &str) -> Scripted {
    xml(
        200,
        &format!(r#"<Task href="https://vcd.example.com/api/task/t-1" status="{status}" operationName="vappDeploy"/>"#),
    )
}

pub const VERSIONS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<SupportedVersions xmlns="http://www.vmware.com/vcloud/versions">
    <VersionInfo deprecated="true"><Version>27.0</Version></VersionInfo>
    <VersionInfo deprecated="false"><Version>33.0</Version></VersionInfo>
    <VersionInfo deprecated="false"><Version>34.0</Version></VersionInfo>
</SupportedVersions>"#;
