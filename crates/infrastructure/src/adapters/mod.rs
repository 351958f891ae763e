//! Port implementations backed by external crates.

mod reqwest_client;
mod tracing_observer;

pub use reqwest_client::ReqwestHttpClient;
pub use tracing_observer::TracingObserver;
