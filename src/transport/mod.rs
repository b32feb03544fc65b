mod http_transport;
mod prepared_upstream;

pub(crate) use http_transport::api_error_from_response;
pub use http_transport::{build_reqwest_client, HttpTransport, MAX_ERROR_BODY_BYTES};
pub use prepared_upstream::PreparedUpstream;
