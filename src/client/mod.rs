//! REST client for the server of record.

pub mod api;
pub mod error;
pub mod transport;

pub use api::ApiClient;
pub use error::ClientError;
pub use transport::{ApiRequest, HttpTransport, Method, Transport};
