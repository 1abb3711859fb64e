//! Card-flip trading API client.
//!
//! - [`request`] - request descriptors and URL building
//! - [`normalize`] - payload decoding and error-message precedence
//! - [`transport`] - the network seam and the Fetch API implementation
//! - [`CardFlipApi`] - one method per remote operation

mod client;
pub mod normalize;
pub mod request;
pub mod transport;

pub use client::CardFlipApi;
