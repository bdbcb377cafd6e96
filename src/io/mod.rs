//! Resource fetching for descriptors and tiles.
//!
//! - [`Fetcher`]: async byte fetch by URL, the seam tests mock
//! - [`HttpFetcher`]: `reqwest` implementation with a request timeout

mod fetcher;
mod http;

pub use fetcher::Fetcher;
pub use http::{HttpFetcher, DEFAULT_TIMEOUT, USER_AGENT};
