//! HTTP Request domain types

mod body;
mod header;
mod method;
mod outgoing;
mod spec;

pub use body::RequestBody;
pub use header::{Header, Headers};
pub use method::HttpMethod;
pub use outgoing::OutgoingRequest;
pub use spec::{DEFAULT_ACCEPT, DEFAULT_API_TIMEOUT, RequestSpec, versioned_accept};
