//! Request/response interceptors

use crate::client::{Request, Response};
use crate::Result;

/// A hook into the request pipeline.
///
/// Interceptors run in registration order: each may mutate the outgoing
/// request before transport and observe the final response afterwards. A
/// failure from [`Interceptor::on_request`] aborts the call before any
/// network traffic happens.
pub trait Interceptor: Send + Sync {
    /// Called for every outbound request
    fn on_request(&self, request: &mut Request) -> Result<()>;

    /// Called once the response is available (cached or from the network)
    fn on_response(&self, _response: &Response) {}
}
