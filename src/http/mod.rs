mod error;
mod request;
mod response;
mod transport;

pub use error::TransportError;
pub use request::{FilePart, MultipartBody, PendingRequest, RequestBody};
pub use response::HttpResponse;
pub use transport::{ReqwestTransport, Transport};
