//! Browser utilities.
//!
//! - [`dom`] - window, storage, history and document title helpers
//! - [`logging`] - tracing subscriber writing to the devtools console

pub mod dom;
pub mod logging;
