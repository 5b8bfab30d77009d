//! Upload status: the typed server response and where it comes from.
//!
//! The status service reports `{ "pos": n, "length": n, "error"?: bool }` for
//! an upload token. [`StatusResponse`] is the validated form of that body;
//! [`StatusSource`] abstracts the fetch so the poll loop never sees transport
//! details. [`HttpStatusSource`] is the curl-backed implementation.

mod decode;
mod error;
mod http;
mod source;

pub use decode::{decode, percent_of, StatusResponse};
pub use error::{DecodeError, FetchError};
pub use http::{HttpStatusSource, StatusEndpoint};
pub use source::StatusSource;
