use std::future::Future;
use std::sync::Arc;

use super::decode::StatusResponse;
use super::error::FetchError;

/// Fetches the status of one upload by its transport token.
///
/// Implementations own the transport (HTTP method, route, encoding); the poll
/// loop only sees a decoded [`StatusResponse`] or a [`FetchError`].
pub trait StatusSource: Send + Sync + 'static {
    fn fetch(
        &self,
        transport_id: &str,
    ) -> impl Future<Output = Result<StatusResponse, FetchError>> + Send;
}

impl<S: StatusSource> StatusSource for Arc<S> {
    fn fetch(
        &self,
        transport_id: &str,
    ) -> impl Future<Output = Result<StatusResponse, FetchError>> + Send {
        (**self).fetch(transport_id)
    }
}
