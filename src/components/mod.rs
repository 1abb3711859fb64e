//! UI components built with Leptos.
//!
//! - [`router`] - Application routing (main entry point)
//! - [`layout`] - Links, session badge and the admin frame
//! - [`views`] - One component per routed screen

pub mod layout;
pub mod router;
pub mod views;

pub use router::AppRouter;
